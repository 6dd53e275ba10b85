//! Error taxonomy for the API pipeline
//!
//! Every failure the pipeline can report is one of a small set of
//! deterministic request-shape or policy errors; there are no transient
//! faults and therefore no retries. [`Error::status_code`] gives the HTTP
//! status the transport layer should answer with.

use hyper::StatusCode;
use thiserror::Error;

/// Result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline error taxonomy
///
/// `Configuration` is surfaced when the application is built, never from a
/// request; the remaining variants terminate a single request.
#[derive(Debug, Error)]
pub enum Error {
	/// The actor lacks the ability the controller requires
	#[error("Permission denied: {0}")]
	PermissionDenied(String),

	/// The request used a sort, include, filter, or page parameter that is
	/// not in the controller's allow-lists
	#[error("Invalid parameter: {0}")]
	InvalidParameter(String),

	/// The addressed resource does not exist
	#[error("Not found: {0}")]
	NotFound(String),

	/// An extender referenced something that was never declared
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// Anything that should not happen on a well-formed deployment
	#[error("Internal error: {0}")]
	Internal(String),
}

impl Error {
	/// HTTP status code this error maps to
	///
	/// # Examples
	///
	/// ```
	/// use agora_core::Error;
	/// use hyper::StatusCode;
	///
	/// assert_eq!(Error::PermissionDenied("x".into()).status_code(), StatusCode::FORBIDDEN);
	/// assert_eq!(Error::InvalidParameter("x".into()).status_code(), StatusCode::BAD_REQUEST);
	/// ```
	pub fn status_code(&self) -> StatusCode {
		match self {
			Error::PermissionDenied(_) => StatusCode::FORBIDDEN,
			Error::InvalidParameter(_) => StatusCode::BAD_REQUEST,
			Error::NotFound(_) => StatusCode::NOT_FOUND,
			Error::Configuration(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}
