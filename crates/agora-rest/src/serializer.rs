//! Serializer trait and registry

use agora_model::Record;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Turns a record into its wire-level attribute map
///
/// `default_attributes` is the extension point: a serializer that extends
/// another wraps it, calls through, and merges its own additions on top,
/// its keys winning on collision.
///
/// # Examples
///
/// ```
/// use agora_model::Record;
/// use agora_rest::{DiscussionSerializer, ResourceSerializer};
/// use serde_json::{Map, Value};
///
/// struct BadgedDiscussionSerializer {
///     inner: DiscussionSerializer,
/// }
///
/// impl ResourceSerializer for BadgedDiscussionSerializer {
///     fn resource_type(&self) -> &'static str {
///         self.inner.resource_type()
///     }
///
///     fn default_attributes(&self, record: &Record) -> Map<String, Value> {
///         let mut attributes = self.inner.default_attributes(record);
///         attributes.insert("badged".into(), true.into());
///         attributes
///     }
/// }
/// ```
pub trait ResourceSerializer: Send + Sync {
	/// Resource type emitted as `type` in resource objects
	fn resource_type(&self) -> &'static str;

	/// Wire attributes for one record
	fn default_attributes(&self, record: &Record) -> Map<String, Value>;
}

/// Factory producing a fresh serializer instance
pub type SerializerFactory = Arc<dyn Fn() -> Box<dyn ResourceSerializer> + Send + Sync>;

/// Maps resource types to their serializers
///
/// Populated once at bootstrap; the pipeline uses it to serialize included
/// records, which carry their own resource type.
#[derive(Default, Clone)]
pub struct SerializerRegistry {
	factories: HashMap<String, SerializerFactory>,
}

impl SerializerRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register the serializer for a resource type
	///
	/// # Examples
	///
	/// ```
	/// use agora_rest::{SerializerRegistry, UserSerializer};
	/// use std::sync::Arc;
	///
	/// let mut registry = SerializerRegistry::new();
	/// registry.register("users", Arc::new(|| Box::new(UserSerializer)));
	/// assert!(registry.serializer_for("users").is_some());
	/// ```
	pub fn register(&mut self, resource_type: impl Into<String>, factory: SerializerFactory) {
		self.factories.insert(resource_type.into(), factory);
	}

	/// Instantiate the serializer registered for a resource type
	pub fn serializer_for(&self, resource_type: &str) -> Option<Box<dyn ResourceSerializer>> {
		self.factories.get(resource_type).map(|factory| factory())
	}
}

impl std::fmt::Debug for SerializerRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SerializerRegistry")
			.field("resource_types", &self.factories.keys().collect::<Vec<_>>())
			.finish()
	}
}
