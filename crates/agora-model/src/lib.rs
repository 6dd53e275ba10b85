//! # Agora Model
//!
//! The data side of the forum API: typed domain models, the dynamic
//! [`Record`] representation the pipeline works on, the resource model
//! registry of declared relationships, and an in-memory store implementing
//! the query interface the controllers consume.
//!
//! The registry is instance-based: it is populated once when the
//! application is built and injected into each pipeline execution,
//! read-only from then on.

pub mod models;
pub mod query;
pub mod record;
pub mod registry;
pub mod store;

pub use models::{
	ADMIN_GROUP_ID, Discussion, Forum, GUEST_GROUP_ID, Group, MEMBER_GROUP_ID, Model, Post, User,
};
pub use query::{Filter, FilterOperator, FilterValue, Query, SortOrder};
pub use record::{FetchResult, Record, Related};
pub use registry::{ModelRegistry, Pivot, RelationshipKind, RelationshipMetadata};
pub use store::Store;
