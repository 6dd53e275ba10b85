//! # Agora
//!
//! An extensible forum platform API layer.
//!
//! Agora exposes a forum's resources (discussions, posts, users, the forum
//! itself) through a JSON-API-shaped pipeline that third-party extensions
//! can reshape without touching the controllers themselves: extenders
//! register ordered hooks against a controller type (or one of its ancestor
//! markers), and the pipeline resolves and applies them per request.
//!
//! ## Crates
//!
//! - [`core`]: error taxonomy and HTTP request/response primitives
//! - [`model`]: domain models, the resource model registry, and the
//!   in-memory store
//! - [`auth`]: actors and the permission gate
//! - [`rest`]: resource serializers and JSON-API document types
//! - [`extend`]: the extension registry and the extender builders
//! - [`api`]: controllers, the request pipeline, and [`api::App`]
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use agora::api::{App, ShowDiscussionController};
//! use agora::core::Request;
//! use agora::extend;
//!
//! let app = App::builder()
//!     .extend(
//!         extend::ApiController::new::<ShowDiscussionController>()
//!             .prepare_data_for_serialization(|_ctx, data| {
//!                 data.each_record_mut(|record| {
//!                     record.set_attribute("title", "rewritten by an extension");
//!                 });
//!             }),
//!     )
//!     .build()?;
//!
//! let request = Request::builder()
//!     .uri("/api/discussions/1")
//!     .path_param("id", "1")
//!     .authenticated_as(1)
//!     .build()?;
//! let response = app.execute(&ShowDiscussionController, request).await;
//! ```

pub use agora_api as api;
pub use agora_auth as auth;
pub use agora_core as core;
pub use agora_extend as extend;
pub use agora_model as model;
pub use agora_rest as rest;
