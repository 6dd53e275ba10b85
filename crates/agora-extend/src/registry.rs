//! Process-wide extension registry
//!
//! Hooks accumulate per type key in insertion order. Resolution for a
//! concrete controller walks its lineage from the root marker to the type
//! itself, concatenating each key's hooks; nothing is skipped or
//! deduplicated, so a later hook may overwrite the effect of an earlier
//! one, and own-type hooks always come after ancestor hooks regardless of
//! the order the registrations arrived in.

use crate::hooks::Hook;
use agora_core::{Error, Result};
use agora_model::ModelRegistry;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ExtensionRegistry {
	hooks: HashMap<String, Vec<Hook>>,
}

impl ExtensionRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a hook to a type key's ordered list
	pub fn register(&mut self, type_key: impl Into<String>, hook: Hook) {
		let type_key = type_key.into();
		tracing::debug!(%type_key, kind = hook.kind(), "registering hook");
		self.hooks.entry(type_key).or_default().push(hook);
	}

	/// Resolve the hooks applicable to a controller with the given lineage
	///
	/// `lineage` is ordered root-first and ends with the controller's own
	/// key. Unregistered keys contribute nothing.
	///
	/// # Examples
	///
	/// ```
	/// use agora_extend::{ExtensionRegistry, Hook};
	///
	/// let mut registry = ExtensionRegistry::new();
	/// registry.register("show", Hook::SetLimit(10));
	/// registry.register("show::discussion", Hook::SetLimit(1));
	///
	/// let hooks = registry.resolve(&["show", "show::discussion"]);
	/// assert_eq!(hooks.len(), 2);
	/// // The own-type hook resolves last and therefore wins.
	/// assert!(matches!(hooks[1], Hook::SetLimit(1)));
	/// ```
	pub fn resolve(&self, lineage: &[&str]) -> Vec<&Hook> {
		lineage
			.iter()
			.filter_map(|key| self.hooks.get(*key))
			.flatten()
			.collect()
	}

	/// Validate hook registrations against the declared relationships
	///
	/// Include hooks referencing a relation no resource type declares are a
	/// configuration error; surfacing it here keeps a typo from becoming a
	/// per-request failure.
	pub fn validate(&self, models: &ModelRegistry) -> Result<()> {
		for (type_key, hooks) in &self.hooks {
			for hook in hooks {
				let name = match hook {
					Hook::AddInclude(name) | Hook::AddOptionalInclude(name) => name,
					_ => continue,
				};
				if !models.is_declared(name) {
					return Err(Error::Configuration(format!(
						"hook `{}` on `{type_key}` references undeclared relationship `{name}`",
						hook.kind(),
					)));
				}
			}
		}
		Ok(())
	}

	/// Total number of registered hooks
	pub fn hook_count(&self) -> usize {
		self.hooks.values().map(|hooks| hooks.len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.hooks.is_empty()
	}
}
