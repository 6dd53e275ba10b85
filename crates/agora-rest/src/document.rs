//! JSON-API response envelope
//!
//! The outbound document shape: `{data, included?, meta?}` where primary
//! data is one resource object or an ordered list of them. Relationship
//! linkage is emitted only for relations the pipeline resolved as
//! included, and the related records themselves land in `included`,
//! serialized by the serializer registered for their own type.

use crate::serializer::{ResourceSerializer, SerializerRegistry};
use agora_model::{FetchResult, Record, Related};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// A resource identifier: type and id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
	#[serde(rename = "type")]
	pub kind: String,
	pub id: String,
}

/// Linkage data of one relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
	One(ResourceIdentifier),
	Many(Vec<ResourceIdentifier>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipObject {
	pub data: RelationshipData,
}

/// One serialized resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
	#[serde(rename = "type")]
	pub kind: String,
	pub id: String,
	pub attributes: Map<String, Value>,
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub relationships: Map<String, Value>,
}

/// Primary document data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
	One(ResourceObject),
	Many(Vec<ResourceObject>),
}

/// The response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
	pub data: PrimaryData,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub included: Vec<ResourceObject>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<Map<String, Value>>,
}

impl Document {
	/// Attach pagination (or other) metadata
	pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
		self.meta = Some(meta);
		self
	}
}

/// Render a fetch result into a document
///
/// `serializer` serializes the primary data; related records are
/// serialized by whatever the registry holds for their resource type, and
/// records of unregistered types are left out of `included` (their linkage
/// is still emitted).
pub fn render(
	result: &FetchResult,
	serializer: &dyn ResourceSerializer,
	includes: &[String],
	serializers: &SerializerRegistry,
) -> Document {
	let mut included = Vec::new();
	let mut seen = HashSet::new();

	let data = match result {
		FetchResult::One(record) => PrimaryData::One(resource_object(
			record,
			serializer,
			includes,
			serializers,
			&mut included,
			&mut seen,
		)),
		FetchResult::Many { records, .. } => PrimaryData::Many(
			records
				.iter()
				.map(|record| {
					resource_object(
						record,
						serializer,
						includes,
						serializers,
						&mut included,
						&mut seen,
					)
				})
				.collect(),
		),
	};

	Document {
		data,
		included,
		meta: None,
	}
}

fn resource_object(
	record: &Record,
	serializer: &dyn ResourceSerializer,
	includes: &[String],
	serializers: &SerializerRegistry,
	included: &mut Vec<ResourceObject>,
	seen: &mut HashSet<(String, String)>,
) -> ResourceObject {
	let mut relationships = Map::new();

	for name in includes {
		let Some(related) = record.related.get(name) else {
			continue;
		};
		let data = match related {
			Related::One(related_record) => {
				RelationshipData::One(identifier_of(related_record, serializers, included, seen))
			}
			Related::Many(related_records) => RelationshipData::Many(
				related_records
					.iter()
					.map(|r| identifier_of(r, serializers, included, seen))
					.collect(),
			),
		};
		let value = serde_json::to_value(RelationshipObject { data })
			.unwrap_or(Value::Null);
		relationships.insert(name.clone(), value);
	}

	ResourceObject {
		kind: serializer.resource_type().to_string(),
		id: record.id.to_string(),
		attributes: serializer.default_attributes(record),
		relationships,
	}
}

fn identifier_of(
	record: &Record,
	serializers: &SerializerRegistry,
	included: &mut Vec<ResourceObject>,
	seen: &mut HashSet<(String, String)>,
) -> ResourceIdentifier {
	let identifier = ResourceIdentifier {
		kind: record.resource.clone(),
		id: record.id.to_string(),
	};

	let key = (identifier.kind.clone(), identifier.id.clone());
	if seen.insert(key)
		&& let Some(serializer) = serializers.serializer_for(&record.resource)
	{
		included.push(ResourceObject {
			kind: serializer.resource_type().to_string(),
			id: record.id.to_string(),
			attributes: serializer.default_attributes(record),
			relationships: Map::new(),
		});
	}

	identifier
}
