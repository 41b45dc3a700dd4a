// ============================================================================
// spark-models - Core Module
// Event names, listeners, the emitter and the crate error type
// ============================================================================

pub mod constants;
pub mod emitter;
pub mod error;
pub mod listener;
pub mod names;

// Re-export commonly used items
pub use constants::{change_event, CHANGE, CHANGE_PREFIX, UUID_ATTRIBUTE};
pub use emitter::{Emitter, Observable};
pub use error::{BoxError, Error, Result};
pub use listener::{listener, try_listener, Listener, ListenerFn};
pub use names::EventNames;
