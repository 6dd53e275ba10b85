//! Controller trait, ancestor markers, and the list spec
//!
//! There is no inheritance between controllers; what looks like a class
//! hierarchy to an extension author is an explicit lineage of type keys.
//! Hooks registered against a marker apply to every controller that
//! carries it, and hooks against the concrete type resolve after them.

use crate::app::{App, Settings};
use agora_core::{Request, Result};
use agora_model::{FetchResult, Query, SortOrder};
use agora_rest::ResourceSerializer;
use async_trait::async_trait;

/// Root of every controller lineage; hooks registered here run for all
/// controllers
pub struct SerializeController;

/// Marker carried by single-resource controllers
pub struct ShowController;

/// Marker carried by collection controllers
pub struct ListController;

/// A wire-level field name and the store column backing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiField {
	pub name: String,
	pub column: String,
}

impl ApiField {
	/// Field whose column is the snake_case form of its name
	///
	/// # Examples
	///
	/// ```
	/// use agora_api::ApiField;
	///
	/// let field = ApiField::new("createdAt");
	/// assert_eq!(field.column, "created_at");
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		let column = snake_case(&name);
		Self { name, column }
	}
}

/// Convert a camelCase wire name to its store column form
pub(crate) fn snake_case(name: &str) -> String {
	let mut out = String::with_capacity(name.len() + 2);
	for ch in name.chars() {
		if ch.is_ascii_uppercase() {
			out.push('_');
			out.push(ch.to_ascii_lowercase());
		} else {
			out.push(ch);
		}
	}
	out
}

/// Declarative per-controller defaults for list and include handling
///
/// The pipeline clones this at the start of BuildingQuery and lets the
/// resolved hooks mutate the copy; afterwards it is read-only for the
/// rest of the request.
#[derive(Debug, Clone)]
pub struct ListSpec {
	/// Sort fields clients may use
	pub sort_fields: Vec<ApiField>,
	/// Sort applied when the request names none, by field name
	pub default_sort: Vec<(String, SortOrder)>,
	/// Relations always included
	pub includes: Vec<String>,
	/// Relations clients may request via `include`
	pub optional_includes: Vec<String>,
	/// Relations explicitly removed by hooks; requesting one is an error
	pub removed_includes: Vec<String>,
	/// Filter fields clients may use
	pub filter_fields: Vec<ApiField>,
	/// Page size applied when the request names none
	pub limit: usize,
	/// Cap on the requestable page size
	pub max_limit: Option<usize>,
}

impl ListSpec {
	pub fn new(settings: &Settings) -> Self {
		Self {
			sort_fields: Vec::new(),
			default_sort: Vec::new(),
			includes: Vec::new(),
			optional_includes: Vec::new(),
			removed_includes: Vec::new(),
			filter_fields: Vec::new(),
			limit: settings.default_page_limit,
			max_limit: Some(settings.max_page_limit),
		}
	}

	pub fn sort_field(mut self, name: &str) -> Self {
		self.sort_fields.push(ApiField::new(name));
		self
	}

	pub fn include(mut self, name: &str) -> Self {
		self.includes.push(name.to_string());
		self
	}

	pub fn optional_include(mut self, name: &str) -> Self {
		self.optional_includes.push(name.to_string());
		self
	}

	pub fn filter_field(mut self, name: &str) -> Self {
		self.filter_fields.push(ApiField::new(name));
		self
	}
}

/// One API endpoint's behavior
///
/// Implementations stay declarative: identity and lineage, the required
/// ability, the default serializer, the list spec, and how to load data.
/// The pipeline owns everything else.
#[async_trait]
pub trait ApiController: Send + Sync {
	/// Key hooks are registered against for this exact type
	fn key(&self) -> &'static str;

	/// Type keys from the root marker down to [`Self::key`], in that order
	fn lineage(&self) -> Vec<&'static str>;

	/// Resource type this controller serves
	fn resource_type(&self) -> &'static str;

	/// Ability the actor must have, if any
	fn ability(&self) -> Option<&'static str> {
		None
	}

	/// Serializer used when no hook overrides it
	fn default_serializer(&self) -> Box<dyn ResourceSerializer>;

	/// Declarative defaults, before hooks
	fn list_spec(&self, settings: &Settings) -> ListSpec {
		ListSpec::new(settings)
	}

	/// Fetch the data the validated query describes
	async fn load(&self, request: &Request, query: &Query, app: &App) -> Result<FetchResult>;
}
