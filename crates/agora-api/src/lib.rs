//! # Agora API
//!
//! The controller layer of the forum API: the [`ApiController`] trait and
//! its concrete implementations, the request pipeline that runs them, and
//! the [`App`] bootstrap that wires registries, store, and gate together.
//!
//! A request flows through one pipeline execution:
//!
//! ```text
//! Authorizing → BuildingQuery → Fetching → PreparingData → Serializing → Done
//! ```
//!
//! with any phase able to terminate the request in an error that maps to
//! an HTTP status. Extensions registered through `agora-extend` take
//! effect in BuildingQuery (list-spec hooks, serializer overrides) and
//! PreparingData (result mutation).

pub mod app;
pub mod controller;
pub mod controllers;
mod pipeline;

pub use app::{App, AppBuilder, Settings};
pub use controller::{
	ApiController, ApiField, ListController, ListSpec, SerializeController, ShowController,
};
pub use controllers::{
	ListDiscussionsController, ListUsersController, ShowDiscussionController, ShowForumController,
	ShowPostController, ShowUserController,
};
