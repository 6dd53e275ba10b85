//! # Agora REST
//!
//! Resource serialization for the forum API: the [`ResourceSerializer`]
//! trait, the built-in serializers for the forum's resource types, the
//! registry the pipeline resolves serializers from, and the JSON-API
//! document types of the response envelope.
//!
//! Serializers decide how a record's attributes appear on the wire.
//! Which relationships appear is never their call: the pipeline hands the
//! resolved include set to the renderer.

pub mod document;
pub mod serializer;
pub mod serializers;

pub use document::{
	Document, PrimaryData, RelationshipData, RelationshipObject, ResourceIdentifier,
	ResourceObject, render,
};
pub use serializer::{ResourceSerializer, SerializerFactory, SerializerRegistry};
pub use serializers::{
	DiscussionSerializer, ForumSerializer, GroupSerializer, PostSerializer, UserSerializer,
};
