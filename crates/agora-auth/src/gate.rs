//! Ability gate
//!
//! Group-level ability grants. Grants to the guest group apply to every
//! actor (anything a stranger may do, a member may do too); the admin
//! group bypasses all checks.

use crate::actor::Actor;
use agora_model::{ADMIN_GROUP_ID, GUEST_GROUP_ID};
use std::collections::{HashMap, HashSet};

/// Permission checker consulted by the Authorizing phase
///
/// # Examples
///
/// ```
/// use agora_auth::{Actor, Gate};
/// use agora_model::GUEST_GROUP_ID;
///
/// let mut gate = Gate::new();
/// gate.grant(GUEST_GROUP_ID, "viewForum");
///
/// assert!(gate.allows(&Actor::guest(), "viewForum"));
/// assert!(!gate.allows(&Actor::guest(), "viewUserList"));
/// ```
#[derive(Debug, Default)]
pub struct Gate {
	/// group id -> granted ability names
	grants: HashMap<i64, HashSet<String>>,
}

impl Gate {
	pub fn new() -> Self {
		Self::default()
	}

	/// Grant an ability to a group
	pub fn grant(&mut self, group_id: i64, ability: impl Into<String>) {
		self.grants.entry(group_id).or_default().insert(ability.into());
	}

	/// Whether the actor may perform the ability
	pub fn allows(&self, actor: &Actor, ability: &str) -> bool {
		if actor.in_group(ADMIN_GROUP_ID) {
			return true;
		}
		let granted = |group_id: i64| {
			self.grants
				.get(&group_id)
				.is_some_and(|abilities| abilities.contains(ability))
		};
		// Guest grants extend to everyone
		if granted(GUEST_GROUP_ID) {
			return true;
		}
		let allowed = actor.groups().iter().copied().any(granted);
		if !allowed {
			tracing::debug!(ability, user_id = ?actor.user_id(), "ability denied");
		}
		allowed
	}
}
