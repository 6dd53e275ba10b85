//! Query description consumed by the store
//!
//! A [`Query`] is what the pipeline's BuildingQuery phase produces:
//! validated filters, a resolved ordering, the clamped page window, and
//! the include names to eager-load. The store executes it; nothing here
//! talks to the request anymore.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
	Eq,
	Contains,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
	String(String),
	Integer(i64),
	Boolean(bool),
}

impl From<&str> for FilterValue {
	fn from(value: &str) -> Self {
		FilterValue::String(value.to_string())
	}
}

impl From<i64> for FilterValue {
	fn from(value: i64) -> Self {
		FilterValue::Integer(value)
	}
}

impl From<bool> for FilterValue {
	fn from(value: bool) -> Self {
		FilterValue::Boolean(value)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
	pub field: String,
	pub operator: FilterOperator,
	pub value: FilterValue,
}

impl Filter {
	pub fn new(
		field: impl Into<String>,
		operator: FilterOperator,
		value: impl Into<FilterValue>,
	) -> Self {
		Self {
			field: field.into(),
			operator,
			value: value.into(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
	Asc,
	Desc,
}

/// A fully resolved store query
///
/// # Examples
///
/// ```
/// use agora_model::{Filter, FilterOperator, Query, SortOrder};
///
/// let query = Query::new("discussions")
///     .filter(Filter::new("user_id", FilterOperator::Eq, 2))
///     .order_by("created_at", SortOrder::Desc)
///     .limit(20);
/// assert_eq!(query.resource, "discussions");
/// assert_eq!(query.order_by.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
	pub resource: String,
	pub filters: Vec<Filter>,
	/// Columns and directions, applied in order
	pub order_by: Vec<(String, SortOrder)>,
	pub limit: Option<usize>,
	pub offset: usize,
	/// Relation names to eager-load
	pub includes: Vec<String>,
}

impl Query {
	pub fn new(resource: impl Into<String>) -> Self {
		Self {
			resource: resource.into(),
			..Self::default()
		}
	}

	pub fn filter(mut self, filter: Filter) -> Self {
		self.filters.push(filter);
		self
	}

	pub fn order_by(mut self, column: impl Into<String>, order: SortOrder) -> Self {
		self.order_by.push((column.into(), order));
		self
	}

	pub fn limit(mut self, limit: usize) -> Self {
		self.limit = Some(limit);
		self
	}

	pub fn offset(mut self, offset: usize) -> Self {
		self.offset = offset;
		self
	}

	pub fn with(mut self, include: impl Into<String>) -> Self {
		self.includes.push(include.into());
		self
	}
}
