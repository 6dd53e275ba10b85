//! Concrete controllers for the forum's resources

use crate::app::{App, Settings};
use crate::controller::{
	ApiController, ListController, ListSpec, SerializeController, ShowController,
};
use agora_core::{Error, Request, Result};
use agora_extend::type_key;
use agora_model::{Discussion, FetchResult, Forum, Model, Post, Query, Record, User};
use agora_rest::{
	DiscussionSerializer, ForumSerializer, PostSerializer, ResourceSerializer, UserSerializer,
};
use async_trait::async_trait;

fn show_lineage<C: 'static>() -> Vec<&'static str> {
	vec![
		type_key::<SerializeController>(),
		type_key::<ShowController>(),
		type_key::<C>(),
	]
}

fn list_lineage<C: 'static>() -> Vec<&'static str> {
	vec![
		type_key::<SerializeController>(),
		type_key::<ListController>(),
		type_key::<C>(),
	]
}

/// Load one record by the `id` path parameter and eager-load its includes
fn load_one(resource: &'static str, request: &Request, query: &Query, app: &App) -> Result<Record> {
	let id = request.id_param("id")?;
	let mut record = app
		.store()
		.find(resource, id)
		.ok_or_else(|| Error::NotFound(format!("{resource} {id}")))?;
	app.store()
		.load_related(std::slice::from_mut(&mut record), &query.includes, app.models());
	Ok(record)
}

/// `GET /api/discussions/{id}`
pub struct ShowDiscussionController;

#[async_trait]
impl ApiController for ShowDiscussionController {
	fn key(&self) -> &'static str {
		type_key::<Self>()
	}

	fn lineage(&self) -> Vec<&'static str> {
		show_lineage::<Self>()
	}

	fn resource_type(&self) -> &'static str {
		Discussion::RESOURCE
	}

	fn ability(&self) -> Option<&'static str> {
		Some("viewForum")
	}

	fn default_serializer(&self) -> Box<dyn ResourceSerializer> {
		Box::new(DiscussionSerializer)
	}

	async fn load(&self, request: &Request, query: &Query, app: &App) -> Result<FetchResult> {
		Ok(FetchResult::One(load_one(
			self.resource_type(),
			request,
			query,
			app,
		)?))
	}
}

/// `GET /api/posts/{id}`
pub struct ShowPostController;

#[async_trait]
impl ApiController for ShowPostController {
	fn key(&self) -> &'static str {
		type_key::<Self>()
	}

	fn lineage(&self) -> Vec<&'static str> {
		show_lineage::<Self>()
	}

	fn resource_type(&self) -> &'static str {
		Post::RESOURCE
	}

	fn ability(&self) -> Option<&'static str> {
		Some("viewForum")
	}

	fn default_serializer(&self) -> Box<dyn ResourceSerializer> {
		Box::new(PostSerializer)
	}

	async fn load(&self, request: &Request, query: &Query, app: &App) -> Result<FetchResult> {
		Ok(FetchResult::One(load_one(
			self.resource_type(),
			request,
			query,
			app,
		)?))
	}
}

/// `GET /api/users/{id}`
pub struct ShowUserController;

#[async_trait]
impl ApiController for ShowUserController {
	fn key(&self) -> &'static str {
		type_key::<Self>()
	}

	fn lineage(&self) -> Vec<&'static str> {
		show_lineage::<Self>()
	}

	fn resource_type(&self) -> &'static str {
		User::RESOURCE
	}

	fn ability(&self) -> Option<&'static str> {
		Some("viewForum")
	}

	fn default_serializer(&self) -> Box<dyn ResourceSerializer> {
		Box::new(UserSerializer)
	}

	fn list_spec(&self, settings: &Settings) -> ListSpec {
		ListSpec::new(settings).include("groups")
	}

	async fn load(&self, request: &Request, query: &Query, app: &App) -> Result<FetchResult> {
		Ok(FetchResult::One(load_one(
			self.resource_type(),
			request,
			query,
			app,
		)?))
	}
}

/// `GET /api`: the forum singleton
pub struct ShowForumController;

#[async_trait]
impl ApiController for ShowForumController {
	fn key(&self) -> &'static str {
		type_key::<Self>()
	}

	fn lineage(&self) -> Vec<&'static str> {
		show_lineage::<Self>()
	}

	fn resource_type(&self) -> &'static str {
		Forum::RESOURCE
	}

	fn ability(&self) -> Option<&'static str> {
		Some("viewForum")
	}

	fn default_serializer(&self) -> Box<dyn ResourceSerializer> {
		Box::new(ForumSerializer)
	}

	async fn load(&self, _request: &Request, query: &Query, app: &App) -> Result<FetchResult> {
		let mut record = app
			.store()
			.find(self.resource_type(), 1)
			.unwrap_or_else(|| Forum::default().record());
		app.store()
			.load_related(std::slice::from_mut(&mut record), &query.includes, app.models());
		Ok(FetchResult::One(record))
	}
}

/// `GET /api/discussions`
pub struct ListDiscussionsController;

#[async_trait]
impl ApiController for ListDiscussionsController {
	fn key(&self) -> &'static str {
		type_key::<Self>()
	}

	fn lineage(&self) -> Vec<&'static str> {
		list_lineage::<Self>()
	}

	fn resource_type(&self) -> &'static str {
		Discussion::RESOURCE
	}

	fn ability(&self) -> Option<&'static str> {
		Some("viewForum")
	}

	fn default_serializer(&self) -> Box<dyn ResourceSerializer> {
		Box::new(DiscussionSerializer)
	}

	fn list_spec(&self, settings: &Settings) -> ListSpec {
		ListSpec::new(settings)
			.sort_field("createdAt")
			.sort_field("commentCount")
	}

	async fn load(&self, _request: &Request, query: &Query, app: &App) -> Result<FetchResult> {
		let (records, total) = app.store().execute(query, app.models());
		Ok(FetchResult::Many { records, total })
	}
}

/// `GET /api/users`
pub struct ListUsersController;

#[async_trait]
impl ApiController for ListUsersController {
	fn key(&self) -> &'static str {
		type_key::<Self>()
	}

	fn lineage(&self) -> Vec<&'static str> {
		list_lineage::<Self>()
	}

	fn resource_type(&self) -> &'static str {
		User::RESOURCE
	}

	fn ability(&self) -> Option<&'static str> {
		Some("viewUserList")
	}

	fn default_serializer(&self) -> Box<dyn ResourceSerializer> {
		Box::new(UserSerializer)
	}

	fn list_spec(&self, settings: &Settings) -> ListSpec {
		ListSpec::new(settings)
			.sort_field("username")
			.sort_field("joinedAt")
			.filter_field("username")
	}

	async fn load(&self, _request: &Request, query: &Query, app: &App) -> Result<FetchResult> {
		let (records, total) = app.store().execute(query, app.models());
		Ok(FetchResult::Many { records, total })
	}
}
