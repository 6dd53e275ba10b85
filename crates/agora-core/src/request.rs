//! HTTP request representation
//!
//! A [`Request`] is the routed, HTTP-shaped input to a controller: method,
//! URI, headers, decoded query parameters, path parameters bound by the
//! (external) router, and the id of the authenticated principal, if any.
//! Carrying the authentication state on the request keeps the pipeline
//! free of session handling, which lives outside this workspace.

use crate::exception::{Error, Result};
use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri};
use std::collections::HashMap;

/// HTTP request as seen by a controller
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Query parameters decoded from the URI, later additions winning
	pub query_params: HashMap<String, String>,
	/// Parameters bound from the route pattern (e.g. `id` in `/discussions/{id}`)
	pub path_params: HashMap<String, String>,
	/// Id of the authenticated user; `None` means a guest
	pub authenticated_as: Option<i64>,
}

impl Request {
	/// Start building a request
	///
	/// # Examples
	///
	/// ```
	/// use agora_core::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/api/discussions?sort=createdAt")
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.query_param("sort"), Some("createdAt"));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Shorthand for a GET request builder
	///
	/// # Examples
	///
	/// ```
	/// use agora_core::Request;
	///
	/// let request = Request::get("/api/users/2").build().unwrap();
	/// assert_eq!(request.uri.path(), "/api/users/2");
	/// ```
	pub fn get(uri: impl AsRef<str>) -> RequestBuilder {
		RequestBuilder::default().method(Method::GET).uri(uri)
	}

	/// Look up a query parameter by name
	pub fn query_param(&self, name: &str) -> Option<&str> {
		self.query_params.get(name).map(|v| v.as_str())
	}

	/// Look up a path parameter by name
	pub fn path_param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(|v| v.as_str())
	}

	/// Path parameter parsed as a resource id
	///
	/// Missing or non-numeric values are an invalid-parameter error, not a
	/// panic; the router is outside this workspace and cannot be trusted to
	/// have validated the segment.
	pub fn id_param(&self, name: &str) -> Result<i64> {
		let raw = self
			.path_param(name)
			.ok_or_else(|| Error::InvalidParameter(format!("missing path parameter `{name}`")))?;
		raw.parse::<i64>()
			.map_err(|_| Error::InvalidParameter(format!("path parameter `{name}` must be an id")))
	}
}

/// Builder for [`Request`]
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	headers: HeaderMap,
	body: Bytes,
	query_params: Vec<(String, String)>,
	path_params: HashMap<String, String>,
	authenticated_as: Option<i64>,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn uri(mut self, uri: impl AsRef<str>) -> Self {
		self.uri = Some(uri.as_ref().to_string());
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	pub fn body(mut self, body: Bytes) -> Self {
		self.body = body;
		self
	}

	/// Add a query parameter, overriding one decoded from the URI
	///
	/// # Examples
	///
	/// ```
	/// use agora_core::Request;
	///
	/// let request = Request::get("/api/discussions")
	///     .query_param("page[limit]", "5")
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.query_param("page[limit]"), Some("5"));
	/// ```
	pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query_params.push((name.into(), value.into()));
		self
	}

	/// Bind a path parameter, as the router would
	pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.path_params.insert(name.into(), value.into());
		self
	}

	/// Mark the request as made by the given user id
	pub fn authenticated_as(mut self, user_id: i64) -> Self {
		self.authenticated_as = Some(user_id);
		self
	}

	pub fn build(self) -> Result<Request> {
		let uri: Uri = self
			.uri
			.unwrap_or_else(|| "/".to_string())
			.parse()
			.map_err(|e| Error::InvalidParameter(format!("invalid request uri: {e}")))?;

		let mut query_params = HashMap::new();
		if let Some(query) = uri.query() {
			for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
				query_params.insert(name.into_owned(), value.into_owned());
			}
		}
		for (name, value) in self.query_params {
			query_params.insert(name, value);
		}

		Ok(Request {
			method: self.method.unwrap_or(Method::GET),
			uri,
			headers: self.headers,
			body: self.body,
			query_params,
			path_params: self.path_params,
			authenticated_as: self.authenticated_as,
		})
	}
}
