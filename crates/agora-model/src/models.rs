//! Forum domain models
//!
//! Typed structs used to seed the store. At fetch time everything flows
//! through [`Record`]s, so the pipeline itself never touches these types;
//! they exist to keep seeding and fixtures honest about column names.

use crate::record::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Group id of the administrators group
pub const ADMIN_GROUP_ID: i64 = 1;
/// Group id applied to unauthenticated actors
pub const GUEST_GROUP_ID: i64 = 2;
/// Group id implicitly applied to every authenticated actor
pub const MEMBER_GROUP_ID: i64 = 3;

/// A seedable domain model
pub trait Model {
	/// Resource type, also the store table name
	const RESOURCE: &'static str;

	fn id(&self) -> i64;

	/// Convert into the record shape the store holds
	fn record(&self) -> Record;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
	pub id: i64,
	pub username: String,
	pub display_name: String,
	pub joined_at: DateTime<Utc>,
}

impl User {
	pub fn new(id: i64, username: impl Into<String>) -> Self {
		let username = username.into();
		Self {
			id,
			display_name: username.clone(),
			username,
			joined_at: Utc::now(),
		}
	}
}

impl Model for User {
	const RESOURCE: &'static str = "users";

	fn id(&self) -> i64 {
		self.id
	}

	fn record(&self) -> Record {
		let mut record = Record::new(Self::RESOURCE, self.id);
		record.set_attribute("username", self.username.clone());
		record.set_attribute("display_name", self.display_name.clone());
		record.set_attribute("joined_at", self.joined_at.to_rfc3339());
		record
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
	pub id: i64,
	pub name_singular: String,
	pub name_plural: String,
}

impl Group {
	pub fn new(id: i64, singular: impl Into<String>, plural: impl Into<String>) -> Self {
		Self {
			id,
			name_singular: singular.into(),
			name_plural: plural.into(),
		}
	}
}

impl Model for Group {
	const RESOURCE: &'static str = "groups";

	fn id(&self) -> i64 {
		self.id
	}

	fn record(&self) -> Record {
		let mut record = Record::new(Self::RESOURCE, self.id);
		record.set_attribute("name_singular", self.name_singular.clone());
		record.set_attribute("name_plural", self.name_plural.clone());
		record
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discussion {
	pub id: i64,
	pub title: String,
	pub created_at: DateTime<Utc>,
	pub user_id: i64,
	pub first_post_id: Option<i64>,
	pub comment_count: i64,
	pub is_private: bool,
}

impl Discussion {
	pub fn new(id: i64, title: impl Into<String>, user_id: i64) -> Self {
		Self {
			id,
			title: title.into(),
			created_at: Utc::now(),
			user_id,
			first_post_id: None,
			comment_count: 1,
			is_private: false,
		}
	}
}

impl Model for Discussion {
	const RESOURCE: &'static str = "discussions";

	fn id(&self) -> i64 {
		self.id
	}

	fn record(&self) -> Record {
		let mut record = Record::new(Self::RESOURCE, self.id);
		record.set_attribute("title", self.title.clone());
		record.set_attribute("created_at", self.created_at.to_rfc3339());
		record.set_attribute("user_id", self.user_id);
		if let Some(first_post_id) = self.first_post_id {
			record.set_attribute("first_post_id", first_post_id);
		}
		record.set_attribute("comment_count", self.comment_count);
		record.set_attribute("is_private", self.is_private);
		record
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
	pub id: i64,
	pub discussion_id: i64,
	pub user_id: i64,
	pub created_at: DateTime<Utc>,
	pub content_type: String,
	pub content: String,
}

impl Post {
	pub fn new(id: i64, discussion_id: i64, user_id: i64, content: impl Into<String>) -> Self {
		Self {
			id,
			discussion_id,
			user_id,
			created_at: Utc::now(),
			content_type: "comment".into(),
			content: content.into(),
		}
	}
}

impl Model for Post {
	const RESOURCE: &'static str = "posts";

	fn id(&self) -> i64 {
		self.id
	}

	fn record(&self) -> Record {
		let mut record = Record::new(Self::RESOURCE, self.id);
		record.set_attribute("discussion_id", self.discussion_id);
		record.set_attribute("user_id", self.user_id);
		record.set_attribute("created_at", self.created_at.to_rfc3339());
		record.set_attribute("content_type", self.content_type.clone());
		record.set_attribute("content", self.content.clone());
		record
	}
}

/// The forum itself: a singleton resource carrying installation-wide
/// attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forum {
	pub id: i64,
	pub title: String,
	pub description: String,
}

impl Default for Forum {
	fn default() -> Self {
		Self {
			id: 1,
			title: "Agora".into(),
			description: "A place to talk".into(),
		}
	}
}

impl Model for Forum {
	const RESOURCE: &'static str = "forums";

	fn id(&self) -> i64 {
		self.id
	}

	fn record(&self) -> Record {
		let mut record = Record::new(Self::RESOURCE, self.id);
		record.set_attribute("title", self.title.clone());
		record.set_attribute("description", self.description.clone());
		record
	}
}
