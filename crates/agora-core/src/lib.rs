//! # Agora Core
//!
//! Core types shared by every agora crate: the error taxonomy and the
//! HTTP request/response primitives the API pipeline consumes.
//!
//! Routing and the HTTP server itself live outside this workspace; a
//! [`Request`] here is the already-routed, HTTP-shaped input to a
//! controller, and a [`Response`] is what the transport layer writes back.

pub mod exception;
pub mod request;
pub mod response;

pub use exception::{Error, Result};
pub use request::{Request, RequestBuilder};
pub use response::Response;
