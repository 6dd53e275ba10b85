//! Resource model registry
//!
//! Holds the declared relationships between resource types. A relationship
//! must be declared here before a serializer or controller may expose it;
//! the application builder enforces that when extensions are applied.
//!
//! The registry is built once at bootstrap and then shared read-only; it
//! is passed into each pipeline execution rather than accessed through a
//! global.

use std::collections::HashSet;

/// How the target rows of a relationship are located
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
	/// Owner row carries the foreign key (e.g. discussion → user)
	BelongsTo,
	/// Target rows carry the foreign key back to the owner (e.g. user → discussions)
	HasMany,
	/// Linked through a pivot table (e.g. user → groups via `group_user`)
	BelongsToMany,
}

/// Pivot table description for [`RelationshipKind::BelongsToMany`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pivot {
	pub table: String,
	/// Pivot column referencing the owner row
	pub owner_key: String,
	/// Pivot column referencing the target row
	pub target_key: String,
}

/// A declared relationship between two resource types
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipMetadata {
	/// Resource type owning the relation, e.g. `users`
	pub owner: String,
	/// Relation name as exposed on the wire, e.g. `groups`
	pub name: String,
	/// Target resource type, e.g. `groups`
	pub target: String,
	pub kind: RelationshipKind,
	/// Foreign key column; `None` for exposure-only declarations whose data
	/// is attached by hooks rather than eager-loaded
	pub foreign_key: Option<String>,
	pub pivot: Option<Pivot>,
}

impl RelationshipMetadata {
	/// Owner carries `foreign_key` pointing at one target row
	pub fn belongs_to(
		owner: impl Into<String>,
		name: impl Into<String>,
		target: impl Into<String>,
		foreign_key: impl Into<String>,
	) -> Self {
		Self {
			owner: owner.into(),
			name: name.into(),
			target: target.into(),
			kind: RelationshipKind::BelongsTo,
			foreign_key: Some(foreign_key.into()),
			pivot: None,
		}
	}

	/// Target rows carry `foreign_key` pointing back at the owner
	pub fn has_many(
		owner: impl Into<String>,
		name: impl Into<String>,
		target: impl Into<String>,
		foreign_key: impl Into<String>,
	) -> Self {
		Self {
			owner: owner.into(),
			name: name.into(),
			target: target.into(),
			kind: RelationshipKind::HasMany,
			foreign_key: Some(foreign_key.into()),
			pivot: None,
		}
	}

	/// Owner and target linked through a pivot table
	pub fn belongs_to_many(
		owner: impl Into<String>,
		name: impl Into<String>,
		target: impl Into<String>,
		pivot: Pivot,
	) -> Self {
		Self {
			owner: owner.into(),
			name: name.into(),
			target: target.into(),
			kind: RelationshipKind::BelongsToMany,
			foreign_key: None,
			pivot: Some(pivot),
		}
	}

	/// Exposure-only declaration: serializable, never eager-loaded
	///
	/// Used by serializer extenders for relations whose data is computed
	/// and attached by a data-preparation hook.
	pub fn exposure(
		owner: impl Into<String>,
		name: impl Into<String>,
		target: impl Into<String>,
	) -> Self {
		Self {
			owner: owner.into(),
			name: name.into(),
			target: target.into(),
			kind: RelationshipKind::HasMany,
			foreign_key: None,
			pivot: None,
		}
	}

	/// Whether the store can load this relation itself
	pub fn is_loadable(&self) -> bool {
		self.foreign_key.is_some() || self.pivot.is_some()
	}
}

/// Registry of declared relationships, additive only
///
/// # Examples
///
/// ```
/// use agora_model::{ModelRegistry, RelationshipMetadata};
///
/// let mut registry = ModelRegistry::new();
/// registry.declare(RelationshipMetadata::has_many(
///     "users",
///     "discussions",
///     "discussions",
///     "user_id",
/// ));
///
/// assert!(registry.get("users", "discussions").is_some());
/// assert!(registry.is_declared("discussions"));
/// assert!(!registry.is_declared("comments"));
/// ```
#[derive(Debug, Default)]
pub struct ModelRegistry {
	relationships: Vec<RelationshipMetadata>,
}

impl ModelRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declare a relationship; later declarations of the same
	/// (owner, name) pair take precedence on lookup
	pub fn declare(&mut self, relationship: RelationshipMetadata) {
		tracing::debug!(
			owner = %relationship.owner,
			name = %relationship.name,
			target = %relationship.target,
			"declaring relationship"
		);
		self.relationships.push(relationship);
	}

	/// Look up a relationship by owner type and relation name
	///
	/// Loadable declarations outrank exposure-only ones: a serializer-level
	/// declaration of a relation the model layer already knows how to load
	/// must not disable its eager loading. Within the same rank, the latest
	/// declaration wins.
	pub fn get(&self, owner: &str, name: &str) -> Option<&RelationshipMetadata> {
		let mut exposure_only = None;
		for relationship in self.relationships.iter().rev() {
			if relationship.owner != owner || relationship.name != name {
				continue;
			}
			if relationship.is_loadable() {
				return Some(relationship);
			}
			exposure_only.get_or_insert(relationship);
		}
		exposure_only
	}

	/// Names of all relations declared for an owner type
	pub fn relationships_of(&self, owner: &str) -> HashSet<&str> {
		self.relationships
			.iter()
			.filter(|r| r.owner == owner)
			.map(|r| r.name.as_str())
			.collect()
	}

	/// Whether any owner declares a relation of this name
	pub fn is_declared(&self, name: &str) -> bool {
		self.relationships.iter().any(|r| r.name == name)
	}

	pub fn len(&self) -> usize {
		self.relationships.len()
	}

	pub fn is_empty(&self) -> bool {
		self.relationships.is_empty()
	}
}
