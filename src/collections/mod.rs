// ============================================================================
// spark-models - Collections
// Ordered groups of models or plain values
// ============================================================================
//
// A Collection does not listen to its members. Adding a model does not
// forward the model's change events; wire listeners on the models (or an
// EventBus) when the group needs to react.
// ============================================================================

mod collection;

pub use collection::{Collection, Identified};
