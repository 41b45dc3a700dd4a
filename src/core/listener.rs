// ============================================================================
// spark-models - Listener
// Cloneable callback handle compared by identity
// ============================================================================

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::error::BoxError;

/// Boxed listener body: receives the `trigger` arguments positionally.
pub type ListenerFn = dyn Fn(&[Value]) -> Result<(), BoxError>;

// =============================================================================
// LISTENER
// =============================================================================

/// A registered callback.
///
/// Cloning a `Listener` yields the same callback: `off` removes every
/// registration whose handle points at the same closure, whichever clone
/// was used to register it.
///
/// # Example
///
/// ```
/// use spark_models::{listener, EventBus, Observable};
///
/// let bus = EventBus::new();
/// let cb = listener(|args| println!("{args:?}"));
///
/// bus.on("ping", &cb);
/// bus.off("ping", &cb);
/// assert!(!bus.has_listeners("ping"));
/// ```
#[derive(Clone)]
pub struct Listener {
    inner: Rc<ListenerFn>,
}

impl Listener {
    /// Wrap an infallible callback.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) + 'static,
    {
        Self {
            inner: Rc::new(move |args: &[Value]| -> Result<(), BoxError> {
                f(args);
                Ok(())
            }),
        }
    }

    /// Wrap a callback whose `Err` aborts the dispatch it runs in.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<(), BoxError> + 'static,
    {
        Self { inner: Rc::new(f) }
    }

    pub(crate) fn call(&self, args: &[Value]) -> Result<(), BoxError> {
        (self.inner)(args)
    }

    /// True when both handles refer to the same callback.
    pub fn same(&self, other: &Listener) -> bool {
        // Compare data pointers only; vtable pointers may differ across codegen units.
        std::ptr::addr_eq(Rc::as_ptr(&self.inner), Rc::as_ptr(&other.inner))
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("ptr", &(Rc::as_ptr(&self.inner) as *const ()))
            .finish()
    }
}

// =============================================================================
// CREATION FUNCTIONS
// =============================================================================

/// Create a listener from an infallible closure.
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(&[Value]) + 'static,
{
    Listener::new(f)
}

/// Create a listener from a fallible closure.
pub fn try_listener<F>(f: F) -> Listener
where
    F: Fn(&[Value]) -> Result<(), BoxError> + 'static,
{
    Listener::fallible(f)
}

// =============================================================================
// TESTS
// =============================================================================
