//! Application bootstrap
//!
//! [`AppBuilder`] wires the registries together: built-in relationships
//! and serializers first, then every registered extender, then
//! validation. The resulting [`App`] is immutable apart from the store
//! (data) and the gate (ability grants), both of which model external
//! systems; registries never change after build, which is what lets
//! concurrent requests share them without synchronization.

use crate::controller::ApiController;
use crate::pipeline;
use agora_auth::{Actor, Gate};
use agora_core::{Error, Request, Response, Result};
use agora_extend::{ExtendContext, Extender, ExtensionRegistry};
use agora_model::{
	Discussion, Forum, GUEST_GROUP_ID, Group, Model, ModelRegistry, Pivot, Post,
	RelationshipMetadata, Store, User,
};
use agora_rest::{
	DiscussionSerializer, ForumSerializer, GroupSerializer, PostSerializer, SerializerRegistry,
	UserSerializer,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::RwLock;

/// Installation-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Page size applied when a list request names none
	pub default_page_limit: usize,
	/// Cap on requestable page sizes
	pub max_page_limit: usize,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			default_page_limit: 20,
			max_page_limit: 50,
		}
	}
}

/// Builder collecting settings and extenders
#[derive(Default)]
pub struct AppBuilder {
	settings: Settings,
	extenders: Vec<Box<dyn Extender>>,
}

impl AppBuilder {
	pub fn settings(mut self, settings: Settings) -> Self {
		self.settings = settings;
		self
	}

	/// Register an extender; applied in registration order at build
	pub fn extend(mut self, extender: impl Extender + 'static) -> Self {
		self.extenders.push(Box::new(extender));
		self
	}

	/// Apply extenders, validate, and produce the application
	///
	/// Fails with [`Error::Configuration`] when an extender references an
	/// undeclared relationship, so misconfiguration never reaches request
	/// handling.
	pub fn build(self) -> Result<App> {
		let mut models = builtin_relationships();
		let mut serializers = builtin_serializers();
		let mut extensions = ExtensionRegistry::new();

		{
			let mut ctx = ExtendContext {
				models: &mut models,
				serializers: &mut serializers,
				extensions: &mut extensions,
			};
			for extender in &self.extenders {
				extender.extend(&mut ctx)?;
			}
		}

		extensions.validate(&models)?;

		let mut gate = Gate::new();
		gate.grant(GUEST_GROUP_ID, "viewForum");

		tracing::debug!(
			relationships = models.len(),
			hooks = extensions.hook_count(),
			"application built"
		);

		Ok(App {
			settings: self.settings,
			models,
			serializers,
			extensions,
			store: Store::new(),
			gate: RwLock::new(gate),
		})
	}
}

/// The wired application
pub struct App {
	settings: Settings,
	models: ModelRegistry,
	serializers: SerializerRegistry,
	extensions: ExtensionRegistry,
	store: Store,
	gate: RwLock<Gate>,
}

impl App {
	pub fn builder() -> AppBuilder {
		AppBuilder::default()
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn models(&self) -> &ModelRegistry {
		&self.models
	}

	pub fn serializers(&self) -> &SerializerRegistry {
		&self.serializers
	}

	pub fn extensions(&self) -> &ExtensionRegistry {
		&self.extensions
	}

	pub fn store(&self) -> &Store {
		&self.store
	}

	/// Grant an ability to a group; stands in for the external permission
	/// storage
	pub fn grant(&self, group_id: i64, ability: &str) {
		self.gate.write().unwrap().grant(group_id, ability);
	}

	/// Whether the actor may perform the ability
	pub fn allows(&self, actor: &Actor, ability: &str) -> bool {
		self.gate.read().unwrap().allows(actor, ability)
	}

	/// Resolve the actor a request acts as
	///
	/// Unknown user ids fall back to a guest rather than erroring; the
	/// authentication layer owns that distinction and sits outside this
	/// workspace.
	pub fn actor_for(&self, request: &Request) -> Actor {
		let Some(user_id) = request.authenticated_as else {
			return Actor::guest();
		};
		if self.store.find(User::RESOURCE, user_id).is_none() {
			return Actor::guest();
		}
		let groups = self.assigned_groups(user_id);
		Actor::user(user_id, groups)
	}

	fn assigned_groups(&self, user_id: i64) -> Vec<i64> {
		let mut user = match self.store.find(User::RESOURCE, user_id) {
			Some(user) => user,
			None => return Vec::new(),
		};
		self.store.load_related(
			std::slice::from_mut(&mut user),
			&["groups".to_string()],
			&self.models,
		);
		match user.related.get("groups") {
			Some(agora_model::Related::Many(groups)) => groups.iter().map(|g| g.id).collect(),
			_ => Vec::new(),
		}
	}

	/// Run the pipeline for a controller and map the outcome to a response
	pub async fn execute(&self, controller: &dyn ApiController, request: Request) -> Response {
		let actor = self.actor_for(&request);
		match pipeline::run(self, controller, &request, &actor).await {
			Ok(document) => Response::ok()
				.with_json(&document)
				.unwrap_or_else(|error| error_response(&error)),
			Err(error) => error_response(&error),
		}
	}
}

fn error_response(error: &Error) -> Response {
	let status = error.status_code();
	tracing::debug!(%error, status = status.as_u16(), "request failed");
	let body: Value = json!({
		"errors": [{
			"status": status.as_u16().to_string(),
			"detail": error.to_string(),
		}]
	});
	Response::new(status)
		.with_json(&body)
		.unwrap_or_else(|_| Response::new(status))
}

/// Relationships every installation starts with
fn builtin_relationships() -> ModelRegistry {
	let mut models = ModelRegistry::new();
	models.declare(RelationshipMetadata::belongs_to(
		Discussion::RESOURCE,
		"user",
		User::RESOURCE,
		"user_id",
	));
	models.declare(RelationshipMetadata::has_many(
		Discussion::RESOURCE,
		"posts",
		Post::RESOURCE,
		"discussion_id",
	));
	models.declare(RelationshipMetadata::belongs_to(
		Post::RESOURCE,
		"user",
		User::RESOURCE,
		"user_id",
	));
	models.declare(RelationshipMetadata::belongs_to(
		Post::RESOURCE,
		"discussion",
		Discussion::RESOURCE,
		"discussion_id",
	));
	models.declare(RelationshipMetadata::belongs_to_many(
		User::RESOURCE,
		"groups",
		Group::RESOURCE,
		Pivot {
			table: "group_user".into(),
			owner_key: "user_id".into(),
			target_key: "group_id".into(),
		},
	));
	models
}

/// Serializers every installation starts with
fn builtin_serializers() -> SerializerRegistry {
	use std::sync::Arc;

	let mut serializers = SerializerRegistry::new();
	serializers.register(Discussion::RESOURCE, Arc::new(|| Box::new(DiscussionSerializer)));
	serializers.register(Post::RESOURCE, Arc::new(|| Box::new(PostSerializer)));
	serializers.register(User::RESOURCE, Arc::new(|| Box::new(UserSerializer)));
	serializers.register(Group::RESOURCE, Arc::new(|| Box::new(GroupSerializer)));
	serializers.register(Forum::RESOURCE, Arc::new(|| Box::new(ForumSerializer)));
	serializers
}
