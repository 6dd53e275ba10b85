//! Request principals

use agora_model::{GUEST_GROUP_ID, MEMBER_GROUP_ID};

/// The principal a request acts as
///
/// Guests belong to the guest group only. Authenticated users belong to
/// the member group implicitly, plus whatever groups they were assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
	user_id: Option<i64>,
	groups: Vec<i64>,
}

impl Actor {
	/// An unauthenticated actor
	///
	/// # Examples
	///
	/// ```
	/// use agora_auth::Actor;
	/// use agora_model::GUEST_GROUP_ID;
	///
	/// let guest = Actor::guest();
	/// assert!(guest.is_guest());
	/// assert!(guest.in_group(GUEST_GROUP_ID));
	/// ```
	pub fn guest() -> Self {
		Self {
			user_id: None,
			groups: vec![GUEST_GROUP_ID],
		}
	}

	/// An authenticated actor with its assigned groups
	pub fn user(user_id: i64, assigned_groups: impl IntoIterator<Item = i64>) -> Self {
		let mut groups = vec![MEMBER_GROUP_ID];
		groups.extend(assigned_groups);
		groups.dedup();
		Self {
			user_id: Some(user_id),
			groups,
		}
	}

	pub fn user_id(&self) -> Option<i64> {
		self.user_id
	}

	pub fn is_guest(&self) -> bool {
		self.user_id.is_none()
	}

	pub fn in_group(&self, group_id: i64) -> bool {
		self.groups.contains(&group_id)
	}

	/// Groups considered when checking abilities
	pub fn groups(&self) -> &[i64] {
		&self.groups
	}
}
