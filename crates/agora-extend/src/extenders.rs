//! Extender builders
//!
//! An extension describes what it wants fluently on one of the builders
//! here; applying it to the application is the builder's job, through
//! [`Extender::extend`]. Nothing happens until the application is built,
//! so the order of calls inside a single extender never matters, and
//! validation covers the whole set of registrations at once.

use crate::hooks::{Hook, HookPredicate, PrepareContext, type_key};
use crate::registry::ExtensionRegistry;
use agora_core::Result;
use agora_model::{FetchResult, ModelRegistry, Pivot, RelationshipMetadata, SortOrder};
use agora_rest::{ResourceSerializer, SerializerRegistry};
use std::sync::Arc;

/// Mutable view of the application's registries during bootstrap
pub struct ExtendContext<'a> {
	pub models: &'a mut ModelRegistry,
	pub serializers: &'a mut SerializerRegistry,
	pub extensions: &'a mut ExtensionRegistry,
}

/// Something that can be applied to the application while it is built
pub trait Extender: Send + Sync {
	fn extend(&self, ctx: &mut ExtendContext<'_>) -> Result<()>;
}

/// Reshape a controller's pipeline: hooks for data preparation, the
/// serializer, includes, sorting, and page limits
///
/// The type parameter of [`ApiController::new`] is the controller to hook
/// into: a concrete controller, or one of the ancestor markers, in which
/// case the hooks apply to every controller carrying that marker in its
/// lineage (own-type hooks still resolve later and win).
///
/// # Examples
///
/// ```rust,ignore
/// use agora_extend::ApiController;
///
/// let extender = ApiController::new::<ListDiscussionsController>()
///     .add_sort_field("userId")
///     .set_limit(10);
/// ```
#[derive(Clone)]
pub struct ApiController {
	controller: &'static str,
	hooks: Vec<Hook>,
}

impl ApiController {
	/// Target the controller (or ancestor marker) type `C`
	pub fn new<C: 'static>() -> Self {
		Self {
			controller: type_key::<C>(),
			hooks: Vec::new(),
		}
	}

	fn hook(mut self, hook: Hook) -> Self {
		self.hooks.push(hook);
		self
	}

	/// Run a callback over the fetched result before serialization
	pub fn prepare_data_for_serialization(
		self,
		callback: impl Fn(&mut PrepareContext<'_>, &mut FetchResult) + Send + Sync + 'static,
	) -> Self {
		self.hook(Hook::PrepareData(Arc::new(callback)))
	}

	/// Replace the controller's serializer
	pub fn set_serializer(
		self,
		factory: impl Fn() -> Box<dyn ResourceSerializer> + Send + Sync + 'static,
	) -> Self {
		self.hook(Hook::SetSerializer {
			factory: Arc::new(factory),
			when: None,
		})
	}

	/// Replace the serializer only while `when` returns true
	pub fn set_serializer_when(
		self,
		factory: impl Fn() -> Box<dyn ResourceSerializer> + Send + Sync + 'static,
		when: impl Fn() -> bool + Send + Sync + 'static,
	) -> Self {
		self.hook(Hook::SetSerializer {
			factory: Arc::new(factory),
			when: Some(Arc::new(when) as HookPredicate),
		})
	}

	/// Always include a relation in responses
	pub fn add_include(self, name: impl Into<String>) -> Self {
		self.hook(Hook::AddInclude(name.into()))
	}

	/// Stop always including a relation
	pub fn remove_include(self, name: impl Into<String>) -> Self {
		self.hook(Hook::RemoveInclude(name.into()))
	}

	/// Let clients request a relation via the `include` parameter
	pub fn add_optional_include(self, name: impl Into<String>) -> Self {
		self.hook(Hook::AddOptionalInclude(name.into()))
	}

	/// Stop clients from requesting a relation; doing so anyway becomes an
	/// invalid-parameter error
	pub fn remove_optional_include(self, name: impl Into<String>) -> Self {
		self.hook(Hook::RemoveOptionalInclude(name.into()))
	}

	/// Allow a sort field
	pub fn add_sort_field(self, name: impl Into<String>) -> Self {
		self.hook(Hook::AddSortField {
			name: name.into(),
			when: None,
		})
	}

	/// Allow a sort field only while `when` returns true
	pub fn add_sort_field_when(
		self,
		name: impl Into<String>,
		when: impl Fn() -> bool + Send + Sync + 'static,
	) -> Self {
		self.hook(Hook::AddSortField {
			name: name.into(),
			when: Some(Arc::new(when) as HookPredicate),
		})
	}

	/// Disallow a sort field
	pub fn remove_sort_field(self, name: impl Into<String>) -> Self {
		self.hook(Hook::RemoveSortField(name.into()))
	}

	/// Replace the sort applied when the request names none
	pub fn set_sort(self, sort: impl IntoIterator<Item = (&'static str, SortOrder)>) -> Self {
		self.hook(Hook::SetSort(
			sort.into_iter()
				.map(|(name, order)| (name.to_string(), order))
				.collect(),
		))
	}

	/// Replace the default page limit
	pub fn set_limit(self, limit: usize) -> Self {
		self.hook(Hook::SetLimit(limit))
	}

	/// Cap the requestable page limit
	pub fn set_max_limit(self, limit: usize) -> Self {
		self.hook(Hook::SetMaxLimit(limit))
	}
}

impl Extender for ApiController {
	fn extend(&self, ctx: &mut ExtendContext<'_>) -> Result<()> {
		for hook in &self.hooks {
			ctx.extensions.register(self.controller, hook.clone());
		}
		Ok(())
	}
}

/// Declare additional relationships on a resource type's serializer
///
/// A declaration here makes the relation exposable: an include hook may
/// reference it and the renderer will emit it. The data still has to come
/// from somewhere, either an eager-loadable declaration on [`Model`] or a
/// data-preparation hook attaching computed records.
#[derive(Debug, Clone)]
pub struct ApiSerializer {
	resource_type: &'static str,
	relationships: Vec<(String, &'static str)>,
}

impl ApiSerializer {
	pub fn new(resource_type: &'static str) -> Self {
		Self {
			resource_type,
			relationships: Vec::new(),
		}
	}

	/// Declare a to-many relation serialized with the target type's serializer
	pub fn has_many(mut self, name: impl Into<String>, target: &'static str) -> Self {
		self.relationships.push((name.into(), target));
		self
	}

	/// Declare a to-one relation serialized with the target type's serializer
	pub fn has_one(mut self, name: impl Into<String>, target: &'static str) -> Self {
		self.relationships.push((name.into(), target));
		self
	}
}

impl Extender for ApiSerializer {
	fn extend(&self, ctx: &mut ExtendContext<'_>) -> Result<()> {
		for (name, target) in &self.relationships {
			ctx.models.declare(RelationshipMetadata::exposure(
				self.resource_type,
				name.clone(),
				*target,
			));
		}
		Ok(())
	}
}

/// Declare additional eager-loadable relationships on a resource type
#[derive(Debug, Clone)]
pub struct Model {
	resource_type: &'static str,
	relationships: Vec<RelationshipMetadata>,
}

impl Model {
	pub fn new(resource_type: &'static str) -> Self {
		Self {
			resource_type,
			relationships: Vec::new(),
		}
	}

	/// Target rows carry `foreign_key` back to this resource
	pub fn has_many(
		mut self,
		name: impl Into<String>,
		target: &'static str,
		foreign_key: impl Into<String>,
	) -> Self {
		self.relationships.push(RelationshipMetadata::has_many(
			self.resource_type,
			name.into(),
			target,
			foreign_key.into(),
		));
		self
	}

	/// This resource carries `foreign_key` pointing at one target row
	pub fn belongs_to(
		mut self,
		name: impl Into<String>,
		target: &'static str,
		foreign_key: impl Into<String>,
	) -> Self {
		self.relationships.push(RelationshipMetadata::belongs_to(
			self.resource_type,
			name.into(),
			target,
			foreign_key.into(),
		));
		self
	}

	/// Linked to target rows through a pivot table
	pub fn belongs_to_many(
		mut self,
		name: impl Into<String>,
		target: &'static str,
		pivot_table: impl Into<String>,
		owner_key: impl Into<String>,
		target_key: impl Into<String>,
	) -> Self {
		self.relationships.push(RelationshipMetadata::belongs_to_many(
			self.resource_type,
			name.into(),
			target,
			Pivot {
				table: pivot_table.into(),
				owner_key: owner_key.into(),
				target_key: target_key.into(),
			},
		));
		self
	}
}

impl Extender for Model {
	fn extend(&self, ctx: &mut ExtendContext<'_>) -> Result<()> {
		for relationship in &self.relationships {
			ctx.models.declare(relationship.clone());
		}
		Ok(())
	}
}
