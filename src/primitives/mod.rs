// ============================================================================
// spark-models - Primitives Module
// Observable entities: model and event bus
// ============================================================================

pub mod event_bus;
pub mod model;

// Re-export for convenience
pub use event_bus::EventBus;
pub use model::{model, Model};
