//! HTTP response representation

use bytes::Bytes;
use hyper::{HeaderMap, StatusCode, header};
use serde::Serialize;

use crate::exception::{Error, Result};

/// HTTP response produced by a controller
#[derive(Debug)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use agora_core::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// Response with HTTP 200 OK
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// Response with HTTP 400 Bad Request
	pub fn bad_request() -> Self {
		Self::new(StatusCode::BAD_REQUEST)
	}

	/// Response with HTTP 403 Forbidden
	pub fn forbidden() -> Self {
		Self::new(StatusCode::FORBIDDEN)
	}

	/// Response with HTTP 404 Not Found
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	/// Attach a JSON body and content type
	///
	/// # Examples
	///
	/// ```
	/// use agora_core::Response;
	/// use serde_json::json;
	///
	/// let response = Response::ok().with_json(&json!({"data": []})).unwrap();
	/// assert_eq!(
	///     response.headers.get(hyper::header::CONTENT_TYPE).unwrap(),
	///     "application/json"
	/// );
	/// ```
	pub fn with_json<T: Serialize>(mut self, value: &T) -> Result<Self> {
		let body =
			serde_json::to_vec(value).map_err(|e| Error::Internal(format!("serialization: {e}")))?;
		self.headers.insert(
			header::CONTENT_TYPE,
			header::HeaderValue::from_static("application/json"),
		);
		self.body = Bytes::from(body);
		Ok(self)
	}

	/// Parse the body back into JSON, for assertions and logging
	pub fn json(&self) -> Result<serde_json::Value> {
		serde_json::from_slice(&self.body)
			.map_err(|e| Error::Internal(format!("response body is not JSON: {e}")))
	}
}
