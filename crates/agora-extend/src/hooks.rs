//! Hook kinds and the context handed to data-preparation callbacks

use agora_model::{FetchResult, SortOrder, Store};
use agora_rest::{ResourceSerializer, SerializerFactory};
use std::sync::Arc;

/// Key a type is registered and resolved under
///
/// Ancestor markers and concrete controllers alike are identified by their
/// type name, so lineage is an explicit ordered list of keys rather than
/// anything resembling runtime inheritance.
pub fn type_key<T: 'static>() -> &'static str {
	std::any::type_name::<T>()
}

/// Callback run during the PreparingData phase
///
/// Receives the fetched result by mutable reference; the result is an
/// owned container, so mutations are visible to the rest of this request
/// only.
pub type PrepareDataCallback = Arc<dyn Fn(&mut PrepareContext<'_>, &mut FetchResult) + Send + Sync>;

/// Enabling predicate attached to a hook; returning `false` vetoes it
pub type HookPredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// A single registered hook
#[derive(Clone)]
pub enum Hook {
	/// Mutate the fetched result before serialization
	PrepareData(PrepareDataCallback),
	/// Replace the controller's serializer; a vetoing predicate leaves the
	/// previously effective serializer active
	SetSerializer {
		factory: SerializerFactory,
		when: Option<HookPredicate>,
	},
	/// Add a relation to the hard include set
	AddInclude(String),
	/// Remove a relation from the hard include set
	RemoveInclude(String),
	/// Allow a relation to be requested via the `include` parameter
	AddOptionalInclude(String),
	/// Disallow a previously requestable relation
	RemoveOptionalInclude(String),
	/// Allow a sort field; a vetoing predicate leaves it disallowed
	AddSortField {
		name: String,
		when: Option<HookPredicate>,
	},
	/// Disallow a sort field
	RemoveSortField(String),
	/// Replace the default sort applied when the request names none
	SetSort(Vec<(String, SortOrder)>),
	/// Replace the default page limit
	SetLimit(usize),
	/// Cap the requestable page limit
	SetMaxLimit(usize),
}

impl Hook {
	/// Kind name, for logging and diagnostics
	pub fn kind(&self) -> &'static str {
		match self {
			Hook::PrepareData(_) => "prepareData",
			Hook::SetSerializer { .. } => "setSerializer",
			Hook::AddInclude(_) => "addInclude",
			Hook::RemoveInclude(_) => "removeInclude",
			Hook::AddOptionalInclude(_) => "addOptionalInclude",
			Hook::RemoveOptionalInclude(_) => "removeOptionalInclude",
			Hook::AddSortField { .. } => "addSortField",
			Hook::RemoveSortField(_) => "removeSortField",
			Hook::SetSort(_) => "setSort",
			Hook::SetLimit(_) => "setLimit",
			Hook::SetMaxLimit(_) => "setMaxLimit",
		}
	}
}

impl std::fmt::Debug for Hook {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.kind())
	}
}

/// Context handed to [`Hook::PrepareData`] callbacks
///
/// Lets a hook identify the concrete controller it is running under (hooks
/// registered on ancestor markers often apply conditionally), query the
/// store, and swap the serializer the Serializing phase will use.
pub struct PrepareContext<'a> {
	controller: &'static str,
	store: &'a Store,
	serializer: &'a mut Option<Box<dyn ResourceSerializer>>,
}

impl<'a> PrepareContext<'a> {
	pub fn new(
		controller: &'static str,
		store: &'a Store,
		serializer: &'a mut Option<Box<dyn ResourceSerializer>>,
	) -> Self {
		Self {
			controller,
			store,
			serializer,
		}
	}

	/// Whether the pipeline is running for controller type `C`
	pub fn controller_is<C: 'static>(&self) -> bool {
		self.controller == type_key::<C>()
	}

	/// The store backing this request
	pub fn store(&self) -> &Store {
		self.store
	}

	/// Override the serializer used by the Serializing phase
	pub fn set_serializer(&mut self, serializer: Box<dyn ResourceSerializer>) {
		*self.serializer = Some(serializer);
	}
}
