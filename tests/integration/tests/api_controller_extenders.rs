//! API Controller Extender Tests
//!
//! **Purpose:**
//! End-to-end coverage of the controller extension mechanism: data
//! preparation hooks (including ancestor registrations and own-type
//! priority), serializer overrides and their veto predicates, include
//! management (hard, optional, removal), sort-field management, and page
//! limits.
//!
//! **Fixtures Used:**
//! - `prepare_database`: three users, built-in groups, three discussions
//!   with ids {1, 2, 3} authored by users {2, 3, 1}, one post, the forum

use agora_api::{
	App, ListDiscussionsController, ShowController, ShowDiscussionController, ShowForumController,
	ShowPostController, ShowUserController,
};
use agora_core::Request;
use agora_extend as extend;
use agora_integration_tests::{ADMIN_USER_ID, body, get_as, id_list, prepare_database};
use agora_model::{Query, Record, SortOrder};
use agora_rest::{
	DiscussionSerializer, PostSerializer, ResourceSerializer, UserSerializer,
};
use assert_json_diff::assert_json_include;
use hyper::StatusCode;
use serde_json::{Map, Value, json};

#[tokio::test]
async fn prepare_data_serialization_callback_works_if_added() {
	let app = App::builder()
		.extend(
			extend::ApiController::new::<ShowDiscussionController>()
				.prepare_data_for_serialization(|_ctx, data| {
					if let Some(discussion) = data.first_mut() {
						discussion.set_attribute("title", "dataSerializationPrepCustomTitle");
					}
				}),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions/1", ADMIN_USER_ID)
		.path_param("id", "1")
		.build()
		.unwrap();
	let response = app.execute(&ShowDiscussionController, request).await;
	let payload = body(&response);

	assert_eq!(
		payload["data"]["attributes"]["title"],
		"dataSerializationPrepCustomTitle"
	);
}

#[tokio::test]
async fn prepare_data_serialization_callback_works_if_added_to_ancestor() {
	let app = App::builder()
		.extend(
			extend::ApiController::new::<ShowController>().prepare_data_for_serialization(
				|ctx, data| {
					if ctx.controller_is::<ShowDiscussionController>()
						&& let Some(discussion) = data.first_mut()
					{
						discussion.set_attribute("title", "dataSerializationPrepCustomTitle2");
					}
				},
			),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions/1", ADMIN_USER_ID)
		.path_param("id", "1")
		.build()
		.unwrap();
	let response = app.execute(&ShowDiscussionController, request).await;
	let payload = body(&response);

	assert_eq!(
		payload["data"]["attributes"]["title"],
		"dataSerializationPrepCustomTitle2"
	);
}

#[tokio::test]
async fn prepare_data_serialization_callback_prioritizes_own_type() {
	let app = App::builder()
		.extend(
			extend::ApiController::new::<ShowController>().prepare_data_for_serialization(
				|ctx, data| {
					if ctx.controller_is::<ShowDiscussionController>()
						&& let Some(discussion) = data.first_mut()
					{
						discussion.set_attribute("title", "dataSerializationPrepCustomTitle3");
					}
				},
			),
		)
		.extend(
			extend::ApiController::new::<ShowDiscussionController>()
				.prepare_data_for_serialization(|_ctx, data| {
					if let Some(discussion) = data.first_mut() {
						discussion.set_attribute("title", "dataSerializationPrepCustomTitle4");
					}
				}),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions/1", ADMIN_USER_ID)
		.path_param("id", "1")
		.build()
		.unwrap();
	let response = app.execute(&ShowDiscussionController, request).await;
	let payload = body(&response);

	assert_eq!(
		payload["data"]["attributes"]["title"],
		"dataSerializationPrepCustomTitle4"
	);
}

#[tokio::test]
async fn prepare_data_serialization_can_attach_a_computed_relationship() {
	let app = App::builder()
		.extend(extend::ApiSerializer::new("forums").has_many("referenceTest", "users"))
		.extend(
			extend::ApiController::new::<ShowForumController>()
				.add_include("referenceTest")
				.prepare_data_for_serialization(|ctx, data| {
					let (users, _) = ctx.store().select(&Query::new("users").limit(2));
					if let Some(forum) = data.first_mut() {
						forum.attach_many("referenceTest", users);
					}
				}),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api", ADMIN_USER_ID).build().unwrap();
	let response = app.execute(&ShowForumController, request).await;
	let payload = body(&response);

	let linkage = &payload["data"]["relationships"]["referenceTest"]["data"];
	assert_eq!(linkage.as_array().map(Vec::len), Some(2));
	assert_eq!(
		payload["included"].as_array().map(Vec::len),
		Some(2),
		"attached users are serialized into `included`"
	);
}

#[tokio::test]
async fn prepare_data_hook_can_swap_the_serializer_from_an_ancestor() {
	let app = App::builder()
		.extend(
			extend::ApiController::new::<ShowController>().prepare_data_for_serialization(
				|ctx, _data| {
					if ctx.controller_is::<ShowDiscussionController>() {
						ctx.set_serializer(Box::new(CustomDiscussionSerializer2::default()));
					}
				},
			),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions/1", ADMIN_USER_ID)
		.path_param("id", "1")
		.build()
		.unwrap();
	let response = app.execute(&ShowDiscussionController, request).await;
	let payload = body(&response);

	assert!(payload["data"]["attributes"]
		.get("customSerializer2")
		.is_some());
}

#[tokio::test]
async fn prepare_data_serializer_swap_prioritizes_own_type() {
	let app = App::builder()
		.extend(
			extend::ApiController::new::<ShowController>().prepare_data_for_serialization(
				|ctx, _data| {
					if ctx.controller_is::<ShowDiscussionController>() {
						ctx.set_serializer(Box::new(CustomDiscussionSerializer2::default()));
					}
				},
			),
		)
		.extend(
			extend::ApiController::new::<ShowDiscussionController>()
				.prepare_data_for_serialization(|ctx, _data| {
					ctx.set_serializer(Box::new(CustomDiscussionSerializer::default()));
				}),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions/1", ADMIN_USER_ID)
		.path_param("id", "1")
		.build()
		.unwrap();
	let response = app.execute(&ShowDiscussionController, request).await;
	let payload = body(&response);

	assert!(payload["data"]["attributes"].get("customSerializer").is_some());
	assert!(payload["data"]["attributes"]
		.get("customSerializer2")
		.is_none());
}

#[tokio::test]
async fn custom_serializer_doesnt_work_by_default() {
	let app = App::builder().build().unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions/1", ADMIN_USER_ID)
		.path_param("id", "1")
		.build()
		.unwrap();
	let response = app.execute(&ShowDiscussionController, request).await;
	let payload = body(&response);

	assert!(payload["data"]["attributes"].get("customSerializer").is_none());
}

#[tokio::test]
async fn custom_serializer_works_if_set() {
	let app = App::builder()
		.extend(
			extend::ApiController::new::<ShowDiscussionController>()
				.set_serializer(|| Box::new(CustomDiscussionSerializer::default())),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions/1", ADMIN_USER_ID)
		.path_param("id", "1")
		.build()
		.unwrap();
	let response = app.execute(&ShowDiscussionController, request).await;
	let payload = body(&response);

	assert!(payload["data"]["attributes"].get("customSerializer").is_some());
}

#[tokio::test]
async fn custom_serializer_works_if_set_with_a_passing_predicate() {
	let app = App::builder()
		.extend(
			extend::ApiController::new::<ShowPostController>()
				.set_serializer_when(|| Box::new(CustomPostSerializer::default()), || true),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/posts/1", ADMIN_USER_ID)
		.path_param("id", "1")
		.build()
		.unwrap();
	let response = app.execute(&ShowPostController, request).await;
	let payload = body(&response);

	assert!(payload["data"]["attributes"].get("customSerializer").is_some());
}

#[tokio::test]
async fn custom_serializer_doesnt_work_with_a_vetoing_predicate() {
	let app = App::builder()
		.extend(
			extend::ApiController::new::<ShowUserController>()
				.set_serializer_when(|| Box::new(CustomUserSerializer::default()), || false),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/users/2", ADMIN_USER_ID)
		.path_param("id", "2")
		.build()
		.unwrap();
	let response = app.execute(&ShowUserController, request).await;
	let payload = body(&response);

	assert!(payload["data"]["attributes"].get("customSerializer").is_none());
	assert_eq!(payload["data"]["attributes"]["username"], "normal");
}

#[tokio::test]
async fn custom_relationship_not_included_by_default() {
	let app = App::builder().build().unwrap();
	prepare_database(&app);

	let request = get_as("/api/users/2", ADMIN_USER_ID)
		.path_param("id", "2")
		.build()
		.unwrap();
	let response = app.execute(&ShowUserController, request).await;
	let payload = body(&response);

	let relationships = &payload["data"]["relationships"];
	assert!(relationships.get("customApiControllerRelation").is_none());
	assert!(relationships.get("customApiControllerRelation2").is_none());
}

#[tokio::test]
async fn custom_relationship_included_if_added() {
	let app = App::builder()
		.extend(extend::Model::new("users").has_many(
			"customApiControllerRelation",
			"discussions",
			"user_id",
		))
		.extend(
			extend::ApiSerializer::new("users")
				.has_many("customApiControllerRelation", "discussions"),
		)
		.extend(
			extend::ApiController::new::<ShowUserController>()
				.add_include("customApiControllerRelation"),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/users/2", ADMIN_USER_ID)
		.path_param("id", "2")
		.build()
		.unwrap();
	let response = app.execute(&ShowUserController, request).await;
	let payload = body(&response);

	assert_json_include!(
		actual: payload["data"]["relationships"].clone(),
		expected: json!({
			"customApiControllerRelation": {
				"data": [{"type": "discussions", "id": "1"}]
			}
		})
	);
}

#[tokio::test]
async fn custom_relationship_optionally_included_if_added() {
	let app = App::builder()
		.extend(extend::Model::new("users").has_many(
			"customApiControllerRelation2",
			"discussions",
			"user_id",
		))
		.extend(
			extend::ApiSerializer::new("users")
				.has_many("customApiControllerRelation2", "discussions"),
		)
		.extend(
			extend::ApiController::new::<ShowUserController>()
				.add_optional_include("customApiControllerRelation2"),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/users/2", ADMIN_USER_ID)
		.path_param("id", "2")
		.query_param("include", "customApiControllerRelation2")
		.build()
		.unwrap();
	let response = app.execute(&ShowUserController, request).await;
	let payload = body(&response);

	assert!(payload["data"]["relationships"]
		.get("customApiControllerRelation2")
		.is_some());
}

#[tokio::test]
async fn optional_relationship_not_included_without_the_include_param() {
	let app = App::builder()
		.extend(extend::Model::new("users").has_many(
			"customApiControllerRelation2",
			"discussions",
			"user_id",
		))
		.extend(
			extend::ApiSerializer::new("users")
				.has_many("customApiControllerRelation2", "discussions"),
		)
		.extend(
			extend::ApiController::new::<ShowUserController>()
				.add_optional_include("customApiControllerRelation2"),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/users/2", ADMIN_USER_ID)
		.path_param("id", "2")
		.build()
		.unwrap();
	let response = app.execute(&ShowUserController, request).await;
	let payload = body(&response);

	assert!(payload["data"]
		.get("relationships")
		.and_then(|r| r.get("customApiControllerRelation2"))
		.is_none());
}

#[tokio::test]
async fn custom_relationship_included_by_default() {
	let app = App::builder().build().unwrap();
	prepare_database(&app);

	let request = get_as("/api/users/2", ADMIN_USER_ID)
		.path_param("id", "2")
		.build()
		.unwrap();
	let response = app.execute(&ShowUserController, request).await;
	let payload = body(&response);

	assert!(payload["data"]["relationships"].get("groups").is_some());
}

#[tokio::test]
async fn custom_relationship_not_included_if_removed() {
	let app = App::builder()
		.extend(extend::ApiController::new::<ShowUserController>().remove_include("groups"))
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/users/2", ADMIN_USER_ID)
		.path_param("id", "2")
		.build()
		.unwrap();
	let response = app.execute(&ShowUserController, request).await;
	let payload = body(&response);

	assert_eq!(response.status, StatusCode::OK);
	assert!(payload["data"]
		.get("relationships")
		.and_then(|r| r.get("groups"))
		.is_none());
}

#[tokio::test]
async fn custom_relationship_not_optionally_included_if_removed() {
	let app = App::builder()
		.extend(extend::Model::new("users").has_many(
			"customApiControllerRelation2",
			"discussions",
			"user_id",
		))
		.extend(
			extend::ApiSerializer::new("users")
				.has_many("customApiControllerRelation2", "discussions"),
		)
		.extend(
			extend::ApiController::new::<ShowUserController>()
				.add_optional_include("customApiControllerRelation2")
				.remove_optional_include("customApiControllerRelation2"),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/users/2", ADMIN_USER_ID)
		.path_param("id", "2")
		.query_param("include", "customApiControllerRelation2")
		.build()
		.unwrap();
	let response = app.execute(&ShowUserController, request).await;

	assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_requested_include_is_silently_omitted() {
	let app = App::builder().build().unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions/1", ADMIN_USER_ID)
		.path_param("id", "1")
		.query_param("include", "somethingNobodyDeclared")
		.build()
		.unwrap();
	let response = app.execute(&ShowDiscussionController, request).await;
	let payload = body(&response);

	assert_eq!(response.status, StatusCode::OK);
	assert!(payload["data"]
		.get("relationships")
		.and_then(|r| r.get("somethingNobodyDeclared"))
		.is_none());
}

#[tokio::test]
async fn custom_limit_doesnt_work_by_default() {
	let app = App::builder().build().unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions", ADMIN_USER_ID).build().unwrap();
	let response = app.execute(&ListDiscussionsController, request).await;
	let payload = body(&response);

	assert_eq!(payload["data"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn custom_limit_works_if_set() {
	let app = App::builder()
		.extend(extend::ApiController::new::<ListDiscussionsController>().set_limit(1))
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions", ADMIN_USER_ID).build().unwrap();
	let response = app.execute(&ListDiscussionsController, request).await;
	let payload = body(&response);

	assert_eq!(payload["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn custom_max_limit_works_if_set() {
	let app = App::builder()
		.extend(extend::ApiController::new::<ListDiscussionsController>().set_max_limit(1))
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions", ADMIN_USER_ID)
		.query_param("page[limit]", "5")
		.build()
		.unwrap();
	let response = app.execute(&ListDiscussionsController, request).await;
	let payload = body(&response);

	assert_eq!(payload["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn pagination_slices_the_collection_and_reports_the_total() {
	let app = App::builder().build().unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions", ADMIN_USER_ID)
		.query_param("page[limit]", "2")
		.query_param("page[offset]", "1")
		.build()
		.unwrap();
	let response = app.execute(&ListDiscussionsController, request).await;
	let payload = body(&response);

	assert_eq!(id_list(&payload), vec!["2", "3"]);
	assert_eq!(payload["meta"]["total"], 3);
}

#[tokio::test]
async fn custom_sort_field_doesnt_exist_by_default() {
	let app = App::builder().build().unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions", ADMIN_USER_ID)
		.query_param("sort", "userId")
		.build()
		.unwrap();
	let response = app.execute(&ListDiscussionsController, request).await;

	assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn custom_sort_field_doesnt_work_with_a_vetoing_predicate() {
	let app = App::builder()
		.extend(
			extend::ApiController::new::<ListDiscussionsController>()
				.add_sort_field_when("userId", || false),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions", ADMIN_USER_ID)
		.query_param("sort", "userId")
		.build()
		.unwrap();
	let response = app.execute(&ListDiscussionsController, request).await;

	assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn custom_sort_field_exists_if_added() {
	let app = App::builder()
		.extend(extend::ApiController::new::<ListDiscussionsController>().add_sort_field("userId"))
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions", ADMIN_USER_ID)
		.query_param("sort", "userId")
		.build()
		.unwrap();
	let response = app.execute(&ListDiscussionsController, request).await;
	let payload = body(&response);

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(id_list(&payload), vec!["3", "1", "2"]);
}

#[tokio::test]
async fn default_sort_field_exists_out_of_the_box() {
	let app = App::builder().build().unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions", ADMIN_USER_ID)
		.query_param("sort", "createdAt")
		.build()
		.unwrap();
	let response = app.execute(&ListDiscussionsController, request).await;

	assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn custom_sort_field_doesnt_exist_if_removed() {
	let app = App::builder()
		.extend(
			extend::ApiController::new::<ListDiscussionsController>().remove_sort_field("createdAt"),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions", ADMIN_USER_ID)
		.query_param("sort", "createdAt")
		.build()
		.unwrap();
	let response = app.execute(&ListDiscussionsController, request).await;

	assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn custom_sort_field_works_if_set_as_the_default() {
	let app = App::builder()
		.extend(
			extend::ApiController::new::<ListDiscussionsController>()
				.add_sort_field("userId")
				.set_sort([("userId", SortOrder::Desc)]),
		)
		.build()
		.unwrap();
	prepare_database(&app);

	let request = get_as("/api/discussions", ADMIN_USER_ID).build().unwrap();
	let response = app.execute(&ListDiscussionsController, request).await;
	let payload = body(&response);

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(id_list(&payload), vec!["2", "1", "3"]);
}

#[tokio::test]
async fn guest_request_uses_the_default_forum_grant() {
	let app = App::builder().build().unwrap();
	prepare_database(&app);

	let request = Request::get("/api/discussions").build().unwrap();
	let response = app.execute(&ListDiscussionsController, request).await;

	assert_eq!(response.status, StatusCode::OK);
}

// Serializers the extension tests install; each wraps the serializer it
// extends and merges its own marker attribute on top.

#[derive(Default)]
struct CustomDiscussionSerializer {
	inner: DiscussionSerializer,
}

impl ResourceSerializer for CustomDiscussionSerializer {
	fn resource_type(&self) -> &'static str {
		self.inner.resource_type()
	}

	fn default_attributes(&self, record: &Record) -> Map<String, Value> {
		let mut attributes = self.inner.default_attributes(record);
		attributes.insert("customSerializer".into(), true.into());
		attributes
	}
}

#[derive(Default)]
struct CustomDiscussionSerializer2 {
	inner: DiscussionSerializer,
}

impl ResourceSerializer for CustomDiscussionSerializer2 {
	fn resource_type(&self) -> &'static str {
		self.inner.resource_type()
	}

	fn default_attributes(&self, record: &Record) -> Map<String, Value> {
		let mut attributes = self.inner.default_attributes(record);
		attributes.insert("customSerializer2".into(), true.into());
		attributes
	}
}

#[derive(Default)]
struct CustomUserSerializer {
	inner: UserSerializer,
}

impl ResourceSerializer for CustomUserSerializer {
	fn resource_type(&self) -> &'static str {
		self.inner.resource_type()
	}

	fn default_attributes(&self, record: &Record) -> Map<String, Value> {
		let mut attributes = self.inner.default_attributes(record);
		attributes.insert("customSerializer".into(), true.into());
		attributes
	}
}

#[derive(Default)]
struct CustomPostSerializer {
	inner: PostSerializer,
}

impl ResourceSerializer for CustomPostSerializer {
	fn resource_type(&self) -> &'static str {
		self.inner.resource_type()
	}

	fn default_attributes(&self, record: &Record) -> Map<String, Value> {
		let mut attributes = self.inner.default_attributes(record);
		attributes.insert("customSerializer".into(), true.into());
		attributes
	}
}
