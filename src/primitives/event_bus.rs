// ============================================================================
// spark-models - Event Bus
// A bare emitter shared between otherwise unrelated components
// ============================================================================

use std::rc::Rc;

use crate::core::emitter::{Emitter, Observable};

/// A shared signalling channel.
///
/// Holds an [`Emitter`] and nothing else: no attributes, no identifier.
/// Clones share the same registry, so one bus can be handed to any number
/// of models or views.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use spark_models::{listener, EventBus, Observable};
///
/// let bus = EventBus::new();
/// let view_side = bus.clone();
///
/// view_side.on("selected", &listener(|args| assert_eq!(args, &[json!(7)])));
/// bus.trigger("selected", &[json!(7)]).unwrap();
/// ```
#[derive(Clone, Default)]
pub struct EventBus {
    emitter: Rc<Emitter>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when both handles share one registry.
    pub fn same(&self, other: &EventBus) -> bool {
        Rc::ptr_eq(&self.emitter, &other.emitter)
    }
}

impl Observable for EventBus {
    fn emitter(&self) -> &Emitter {
        &self.emitter
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EventBus").field(&*self.emitter).finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
