//! # Agora Auth
//!
//! The authorization side of the pipeline: who is asking ([`Actor`]) and
//! what they may do ([`Gate`]). Session handling and credential checks are
//! external; an actor arrives already authenticated (or not) on the
//! request.

pub mod actor;
pub mod gate;

pub use actor::Actor;
pub use gate::Gate;
