//! User Listing Permission Tests
//!
//! **Purpose:**
//! The user index is gated behind the `viewUserList` ability: guests are
//! rejected until the ability is granted to the guest group, and
//! administrators always pass. Also covers the declarative filter and
//! sort allow-lists of the listing.

use agora_api::{App, ListUsersController};
use agora_core::Request;
use agora_integration_tests::{ADMIN_USER_ID, body, get_as, id_list, prepare_database};
use agora_model::GUEST_GROUP_ID;
use hyper::StatusCode;

#[tokio::test]
async fn disallows_index_for_guest() {
	let app = App::builder().build().unwrap();
	prepare_database(&app);

	let request = Request::get("/api/users").build().unwrap();
	let response = app.execute(&ListUsersController, request).await;

	assert_eq!(response.status, StatusCode::FORBIDDEN);
	let payload = body(&response);
	assert_eq!(payload["errors"][0]["status"], "403");
}

#[tokio::test]
async fn shows_index_for_guest_when_they_have_permission() {
	let app = App::builder().build().unwrap();
	prepare_database(&app);
	app.grant(GUEST_GROUP_ID, "viewUserList");

	let request = Request::get("/api/users").build().unwrap();
	let response = app.execute(&ListUsersController, request).await;

	assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn shows_index_for_admin() {
	let app = App::builder().build().unwrap();
	prepare_database(&app);

	let request = get_as("/api/users", ADMIN_USER_ID).build().unwrap();
	let response = app.execute(&ListUsersController, request).await;

	assert_eq!(response.status, StatusCode::OK);
	let payload = body(&response);
	assert_eq!(payload["data"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn filters_by_username() {
	let app = App::builder().build().unwrap();
	prepare_database(&app);

	let request = get_as("/api/users", ADMIN_USER_ID)
		.query_param("filter[username]", "normal")
		.build()
		.unwrap();
	let response = app.execute(&ListUsersController, request).await;
	let payload = body(&response);

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(id_list(&payload), vec!["2"]);
	assert_eq!(payload["meta"]["total"], 1);
}

#[tokio::test]
async fn rejects_a_filter_outside_the_allow_list() {
	let app = App::builder().build().unwrap();
	prepare_database(&app);

	let request = get_as("/api/users", ADMIN_USER_ID)
		.query_param("filter[joinedAt]", "2026-01-01")
		.build()
		.unwrap();
	let response = app.execute(&ListUsersController, request).await;

	assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sorts_by_username() {
	let app = App::builder().build().unwrap();
	prepare_database(&app);

	let request = get_as("/api/users", ADMIN_USER_ID)
		.query_param("sort", "username")
		.build()
		.unwrap();
	let response = app.execute(&ListUsersController, request).await;
	let payload = body(&response);

	// acquaintance < admin < normal
	assert_eq!(id_list(&payload), vec!["3", "1", "2"]);
}
