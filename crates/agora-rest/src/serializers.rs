//! Built-in serializers for the forum's resource types
//!
//! Attribute names are camelCase on the wire; records carry store column
//! names, so each serializer owns that mapping.

use crate::serializer::ResourceSerializer;
use agora_model::Record;
use serde_json::{Map, Value};

/// Copy a record attribute into the wire map under a (possibly renamed) key
fn copy(record: &Record, attributes: &mut Map<String, Value>, column: &str, name: &str) {
	if let Some(value) = record.attribute(column) {
		attributes.insert(name.to_string(), value.clone());
	}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DiscussionSerializer;

impl ResourceSerializer for DiscussionSerializer {
	fn resource_type(&self) -> &'static str {
		"discussions"
	}

	fn default_attributes(&self, record: &Record) -> Map<String, Value> {
		let mut attributes = Map::new();
		copy(record, &mut attributes, "title", "title");
		copy(record, &mut attributes, "created_at", "createdAt");
		copy(record, &mut attributes, "comment_count", "commentCount");
		copy(record, &mut attributes, "is_private", "isPrivate");
		attributes
	}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PostSerializer;

impl ResourceSerializer for PostSerializer {
	fn resource_type(&self) -> &'static str {
		"posts"
	}

	fn default_attributes(&self, record: &Record) -> Map<String, Value> {
		let mut attributes = Map::new();
		copy(record, &mut attributes, "content_type", "contentType");
		copy(record, &mut attributes, "content", "content");
		copy(record, &mut attributes, "created_at", "createdAt");
		attributes
	}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UserSerializer;

impl ResourceSerializer for UserSerializer {
	fn resource_type(&self) -> &'static str {
		"users"
	}

	fn default_attributes(&self, record: &Record) -> Map<String, Value> {
		let mut attributes = Map::new();
		copy(record, &mut attributes, "username", "username");
		copy(record, &mut attributes, "display_name", "displayName");
		copy(record, &mut attributes, "joined_at", "joinedAt");
		attributes
	}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GroupSerializer;

impl ResourceSerializer for GroupSerializer {
	fn resource_type(&self) -> &'static str {
		"groups"
	}

	fn default_attributes(&self, record: &Record) -> Map<String, Value> {
		let mut attributes = Map::new();
		copy(record, &mut attributes, "name_singular", "nameSingular");
		copy(record, &mut attributes, "name_plural", "namePlural");
		attributes
	}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ForumSerializer;

impl ResourceSerializer for ForumSerializer {
	fn resource_type(&self) -> &'static str {
		"forums"
	}

	fn default_attributes(&self, record: &Record) -> Map<String, Value> {
		let mut attributes = Map::new();
		copy(record, &mut attributes, "title", "title");
		copy(record, &mut attributes, "description", "description");
		attributes
	}
}
