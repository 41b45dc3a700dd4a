// ============================================================================
// spark-models - Emitter
// Listener registry and synchronous dispatch shared by Model and EventBus
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, trace};

use super::error::{Error, Result};
use super::listener::Listener;
use super::names::EventNames;

// =============================================================================
// EMITTER
// =============================================================================

/// Event registry plus dispatch.
///
/// Listeners for an event run in registration order. Registering the same
/// listener twice stores two entries, so it runs twice per trigger.
///
/// Dispatch iterates a snapshot of the event's listener list taken when
/// that event starts dispatching. Listeners may call `on`, `off` or
/// `trigger` on the same emitter; the change is visible to the next
/// dispatch, never to the one already running.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use spark_models::{listener, Emitter};
///
/// let emitter = Emitter::new();
/// emitter.on("a b", &listener(|args| assert_eq!(args, &[json!(1)])));
///
/// emitter.trigger("a b", &[json!(1)]).unwrap();
/// ```
#[derive(Default)]
pub struct Emitter {
    listeners: RefCell<HashMap<String, Vec<Listener>>>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` under each name in `names`.
    pub fn on(&self, names: &str, listener: &Listener) {
        let mut listeners = self.listeners.borrow_mut();
        for name in EventNames::parse(names) {
            trace!(event = name, "registering listener");
            listeners
                .entry(name.to_owned())
                .or_default()
                .push(listener.clone());
        }
    }

    /// Remove every registration of `listener` under each name in `names`.
    ///
    /// Other listeners, and `listener` under other names, are untouched.
    /// Removing a listener that was never registered is a no-op.
    pub fn off(&self, names: &str, listener: &Listener) {
        let mut listeners = self.listeners.borrow_mut();
        for name in EventNames::parse(names) {
            let Some(registered) = listeners.get_mut(name) else {
                continue;
            };

            let before = registered.len();
            registered.retain(|l| !l.same(listener));
            trace!(event = name, removed = before - registered.len(), "removed listener");

            if registered.is_empty() {
                listeners.remove(name);
            }
        }
    }

    /// Invoke the listeners of each name in `names`, in listing order,
    /// passing `args` to every one of them.
    ///
    /// The first listener error stops the whole call, including events
    /// later in `names`.
    pub fn trigger(&self, names: &str, args: &[Value]) -> Result<()> {
        for name in EventNames::parse(names) {
            self.dispatch(name, args)?;
        }
        Ok(())
    }

    fn dispatch(&self, name: &str, args: &[Value]) -> Result<()> {
        // Collect first, then call: no borrow is held while listeners run.
        let snapshot: Vec<Listener> = match self.listeners.borrow().get(name) {
            Some(registered) => registered.clone(),
            None => return Ok(()),
        };

        trace!(event = name, listeners = snapshot.len(), "dispatching event");

        for listener in &snapshot {
            if let Err(source) = listener.call(args) {
                debug!(event = name, error = %source, "listener failed, aborting dispatch");
                return Err(Error::Listener {
                    event: name.to_owned(),
                    source,
                });
            }
        }
        Ok(())
    }

    /// Number of registrations under `name` (duplicates counted).
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.borrow().get(name).map_or(0, Vec::len)
    }

    pub fn has_listeners(&self, name: &str) -> bool {
        self.listener_count(name) > 0
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.borrow();
        let mut counts: Vec<(&str, usize)> = listeners
            .iter()
            .map(|(name, l)| (name.as_str(), l.len()))
            .collect();
        counts.sort_unstable();
        f.debug_struct("Emitter").field("listeners", &counts).finish()
    }
}

// =============================================================================
// OBSERVABLE TRAIT
// =============================================================================

/// Event capability for anything that owns an [`Emitter`].
///
/// Implementors only provide `emitter()`. Wrapping types built on top of
/// a [`Model`](crate::Model) can forward to the model's emitter and get
/// the same event surface.
pub trait Observable {
    fn emitter(&self) -> &Emitter;

    /// See [`Emitter::on`].
    fn on(&self, names: &str, listener: &Listener) {
        self.emitter().on(names, listener);
    }

    /// See [`Emitter::off`].
    fn off(&self, names: &str, listener: &Listener) {
        self.emitter().off(names, listener);
    }

    /// See [`Emitter::trigger`].
    fn trigger(&self, names: &str, args: &[Value]) -> Result<()> {
        self.emitter().trigger(names, args)
    }

    fn listener_count(&self, name: &str) -> usize {
        self.emitter().listener_count(name)
    }

    fn has_listeners(&self, name: &str) -> bool {
        self.emitter().has_listeners(name)
    }
}

impl Observable for Emitter {
    fn emitter(&self) -> &Emitter {
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
