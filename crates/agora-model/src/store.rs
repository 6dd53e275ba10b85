//! In-memory store
//!
//! Implements the query interface the pipeline consumes: filter, sort,
//! page, and eager-load by relation name. Tables live behind a read-write
//! lock and queries hand out cloned snapshots, so a data-preparation hook
//! mutating its result can never leak the change into another request.
//!
//! A relational database would normally sit behind this interface; it is
//! out of scope for the pipeline, and this store stands in for it in
//! deployments and tests alike.

use crate::query::{FilterOperator, FilterValue, Query, SortOrder};
use crate::record::Record;
use crate::registry::{ModelRegistry, RelationshipKind, RelationshipMetadata};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

/// Thread-safe in-memory table store
#[derive(Debug, Default)]
pub struct Store {
	tables: RwLock<HashMap<String, Vec<Record>>>,
}

impl Store {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a record into its resource table
	///
	/// # Examples
	///
	/// ```
	/// use agora_model::{Record, Store};
	///
	/// let store = Store::new();
	/// store.insert(Record::new("discussions", 1));
	/// assert!(store.find("discussions", 1).is_some());
	/// ```
	pub fn insert(&self, record: Record) {
		let mut tables = self.tables.write().unwrap();
		tables
			.entry(record.resource.clone())
			.or_default()
			.push(record);
	}

	/// Find a single record by resource type and id
	pub fn find(&self, resource: &str, id: i64) -> Option<Record> {
		let tables = self.tables.read().unwrap();
		tables
			.get(resource)?
			.iter()
			.find(|r| r.id == id)
			.cloned()
	}

	/// Number of rows in a resource table
	pub fn count(&self, resource: &str) -> usize {
		let tables = self.tables.read().unwrap();
		tables.get(resource).map(|t| t.len()).unwrap_or(0)
	}

	/// Execute a query: filter, order, page, then eager-load includes
	///
	/// Returns the page of records and the total count after filtering but
	/// before the page window was applied, for pagination metadata.
	pub fn execute(&self, query: &Query, registry: &ModelRegistry) -> (Vec<Record>, usize) {
		let (mut page, total) = self.select(query);
		self.load_related(&mut page, &query.includes, registry);
		(page, total)
	}

	/// Execute a query without touching its includes
	///
	/// Data-preparation hooks use this to fetch records they attach by
	/// hand; eager loading needs the model registry, which hooks do not
	/// hold.
	pub fn select(&self, query: &Query) -> (Vec<Record>, usize) {
		let mut records: Vec<Record> = {
			let tables = self.tables.read().unwrap();
			tables
				.get(&query.resource)
				.map(|t| {
					t.iter()
						.filter(|r| query.filters.iter().all(|f| matches_filter(r, f)))
						.cloned()
						.collect()
				})
				.unwrap_or_default()
		};

		let total = records.len();

		if !query.order_by.is_empty() {
			records.sort_by(|a, b| {
				for (column, order) in &query.order_by {
					let ordering = compare_values(a.attribute(column), b.attribute(column));
					let ordering = match order {
						SortOrder::Asc => ordering,
						SortOrder::Desc => ordering.reverse(),
					};
					if ordering != Ordering::Equal {
						return ordering;
					}
				}
				a.id.cmp(&b.id)
			});
		}

		let page: Vec<Record> = records
			.into_iter()
			.skip(query.offset)
			.take(query.limit.unwrap_or(usize::MAX))
			.collect();

		(page, total)
	}

	/// Eager-load declared relations onto the given records
	///
	/// Names without a loadable declaration are skipped; their data, if
	/// any, arrives from data-preparation hooks instead.
	pub fn load_related(&self, records: &mut [Record], includes: &[String], registry: &ModelRegistry) {
		for record in records.iter_mut() {
			for name in includes {
				let Some(rel) = registry.get(&record.resource, name) else {
					continue;
				};
				if !rel.is_loadable() {
					continue;
				}
				self.load_relation(record, rel);
			}
		}
	}

	fn load_relation(&self, record: &mut Record, rel: &RelationshipMetadata) {
		match rel.kind {
			RelationshipKind::BelongsTo => {
				let Some(fk) = rel.foreign_key.as_deref() else {
					return;
				};
				let Some(target_id) = record.attribute(fk).and_then(Value::as_i64) else {
					return;
				};
				if let Some(target) = self.find(&rel.target, target_id) {
					record.attach_one(rel.name.clone(), target);
				}
			}
			RelationshipKind::HasMany => {
				let Some(fk) = rel.foreign_key.as_deref() else {
					return;
				};
				let tables = self.tables.read().unwrap();
				let rows: Vec<Record> = tables
					.get(&rel.target)
					.map(|t| {
						t.iter()
							.filter(|r| r.attribute(fk).and_then(Value::as_i64) == Some(record.id))
							.cloned()
							.collect()
					})
					.unwrap_or_default();
				drop(tables);
				record.attach_many(rel.name.clone(), rows);
			}
			RelationshipKind::BelongsToMany => {
				let Some(pivot) = rel.pivot.as_ref() else {
					return;
				};
				let tables = self.tables.read().unwrap();
				let target_ids: Vec<i64> = tables
					.get(&pivot.table)
					.map(|t| {
						t.iter()
							.filter(|r| {
								r.attribute(&pivot.owner_key).and_then(Value::as_i64)
									== Some(record.id)
							})
							.filter_map(|r| r.attribute(&pivot.target_key).and_then(Value::as_i64))
							.collect()
					})
					.unwrap_or_default();
				let rows: Vec<Record> = tables
					.get(&rel.target)
					.map(|t| {
						t.iter()
							.filter(|r| target_ids.contains(&r.id))
							.cloned()
							.collect()
					})
					.unwrap_or_default();
				drop(tables);
				record.attach_many(rel.name.clone(), rows);
			}
		}
	}
}

fn matches_filter(record: &Record, filter: &crate::query::Filter) -> bool {
	let attribute = record.attribute(&filter.field);
	match (&filter.operator, &filter.value) {
		(FilterOperator::Eq, FilterValue::String(expected)) => {
			attribute.and_then(Value::as_str) == Some(expected.as_str())
		}
		(FilterOperator::Eq, FilterValue::Integer(expected)) => {
			attribute.and_then(Value::as_i64) == Some(*expected)
		}
		(FilterOperator::Eq, FilterValue::Boolean(expected)) => {
			attribute.and_then(Value::as_bool) == Some(*expected)
		}
		(FilterOperator::Contains, FilterValue::String(needle)) => attribute
			.and_then(Value::as_str)
			.is_some_and(|haystack| haystack.contains(needle.as_str())),
		(FilterOperator::Contains, _) => false,
	}
}

/// Order attribute values: null < number < string < bool
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
	fn rank(value: Option<&Value>) -> u8 {
		match value {
			None | Some(Value::Null) => 0,
			Some(Value::Number(_)) => 1,
			Some(Value::String(_)) => 2,
			Some(Value::Bool(_)) => 3,
			Some(_) => 4,
		}
	}

	match (a, b) {
		(Some(Value::Number(x)), Some(Value::Number(y))) => {
			let x = x.as_f64().unwrap_or(0.0);
			let y = y.as_f64().unwrap_or(0.0);
			x.partial_cmp(&y).unwrap_or(Ordering::Equal)
		}
		(Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
		(Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
		_ => rank(a).cmp(&rank(b)),
	}
}
