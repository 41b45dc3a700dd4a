// ============================================================================
// spark-models - Observable Models for Rust
// ============================================================================
//
// Models (key/value entities with change events), Collections (ordered
// groups with array-style queries) and EventBuses (shared signalling
// channels). Dispatch is synchronous, single-threaded and re-entrant.
// ============================================================================

#[macro_use]
mod macros;

pub mod collections;
pub mod core;
pub mod primitives;

// Re-exported so macros can reach `json!` without the caller's import
pub use serde_json;

// Re-export core items at crate root for ergonomic access
pub use crate::core::constants;
pub use crate::core::emitter::{Emitter, Observable};
pub use crate::core::error::{BoxError, Error, Result};
pub use crate::core::listener::{listener, try_listener, Listener, ListenerFn};
pub use crate::core::names::EventNames;

// Re-export primitives at crate root
pub use primitives::event_bus::EventBus;
pub use primitives::model::{model, Model};

// Re-export collections
pub use collections::{Collection, Identified};

// =============================================================================
// TESTS
// =============================================================================
