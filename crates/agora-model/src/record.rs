//! Dynamic resource records
//!
//! A [`Record`] is the shape a fetched resource takes inside the pipeline:
//! the resource type, the id, a column-named attribute map, and a side
//! table of related records filled by eager loading or by data-preparation
//! hooks. Records are owned snapshots; mutating one never affects the
//! store or another request.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A fetched resource instance
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
	/// Resource type, e.g. `discussions`
	pub resource: String,
	pub id: i64,
	/// Scalar attributes keyed by store column name
	pub attributes: Map<String, Value>,
	/// Eager-loaded or hook-attached related records, keyed by relation name
	pub related: BTreeMap<String, Related>,
}

/// Related data attached to a record
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
	One(Box<Record>),
	Many(Vec<Record>),
}

impl Record {
	/// Create an empty record
	///
	/// # Examples
	///
	/// ```
	/// use agora_model::Record;
	///
	/// let mut record = Record::new("discussions", 1);
	/// record.set_attribute("title", "Hello");
	/// assert_eq!(record.attribute("title"), Some(&"Hello".into()));
	/// ```
	pub fn new(resource: impl Into<String>, id: i64) -> Self {
		Self {
			resource: resource.into(),
			id,
			attributes: Map::new(),
			related: BTreeMap::new(),
		}
	}

	/// Read a scalar attribute by column name
	pub fn attribute(&self, name: &str) -> Option<&Value> {
		self.attributes.get(name)
	}

	/// Set or replace a scalar attribute
	pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		self.attributes.insert(name.into(), value.into());
	}

	/// Attach a to-one related record
	pub fn attach_one(&mut self, name: impl Into<String>, record: Record) {
		self.related.insert(name.into(), Related::One(Box::new(record)));
	}

	/// Attach a to-many related collection
	pub fn attach_many(&mut self, name: impl Into<String>, records: Vec<Record>) {
		self.related.insert(name.into(), Related::Many(records));
	}
}

/// Result of the fetch phase: one record, or an ordered page plus the
/// total count before the page was cut
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
	One(Record),
	Many { records: Vec<Record>, total: usize },
}

impl FetchResult {
	/// All records in the result, in order
	pub fn records(&self) -> Vec<&Record> {
		match self {
			FetchResult::One(record) => vec![record],
			FetchResult::Many { records, .. } => records.iter().collect(),
		}
	}

	/// Apply a mutation to every record in the result
	///
	/// # Examples
	///
	/// ```
	/// use agora_model::{FetchResult, Record};
	///
	/// let mut result = FetchResult::One(Record::new("discussions", 1));
	/// result.each_record_mut(|record| record.set_attribute("title", "rewritten"));
	/// assert_eq!(result.records()[0].attribute("title"), Some(&"rewritten".into()));
	/// ```
	pub fn each_record_mut(&mut self, mut f: impl FnMut(&mut Record)) {
		match self {
			FetchResult::One(record) => f(record),
			FetchResult::Many { records, .. } => {
				for record in records.iter_mut() {
					f(record);
				}
			}
		}
	}

	/// Mutable access to the first record, if any
	///
	/// Convenient in data-preparation hooks on single-resource controllers,
	/// where the result is known to hold exactly one record.
	pub fn first_mut(&mut self) -> Option<&mut Record> {
		match self {
			FetchResult::One(record) => Some(record),
			FetchResult::Many { records, .. } => records.first_mut(),
		}
	}

	/// Number of records in the result
	pub fn len(&self) -> usize {
		match self {
			FetchResult::One(_) => 1,
			FetchResult::Many { records, .. } => records.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
