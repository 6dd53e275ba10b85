//! # Agora Extend
//!
//! The extension mechanism of the forum API. Extensions do not subclass
//! controllers; they register ordered hooks against a controller type (or
//! one of its ancestor markers) through the extender builders in this
//! crate, and the pipeline resolves the applicable hooks per request:
//! ancestor hooks first, own-type hooks last, so the most specific
//! registration wins wherever effects overwrite each other.
//!
//! The [`ExtensionRegistry`] is populated once while the application is
//! built and is read-only afterwards; concurrent requests share it without
//! synchronization.

pub mod extenders;
pub mod hooks;
pub mod registry;

pub use extenders::{ApiController, ApiSerializer, ExtendContext, Extender, Model};
pub use hooks::{Hook, HookPredicate, PrepareContext, PrepareDataCallback, type_key};
pub use registry::ExtensionRegistry;
