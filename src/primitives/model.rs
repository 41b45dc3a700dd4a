// ============================================================================
// spark-models - Model
// Observable key/value entity with a unique identifier
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Map, Value};
use tracing::trace;
use uuid::Uuid;

use crate::core::constants::{change_event, CHANGE};
use crate::core::emitter::{Emitter, Observable};
use crate::core::error::{Error, Result};

// =============================================================================
// MODEL INNER
// =============================================================================

/// Shared state behind a [`Model`] handle.
///
/// Attributes live in their own map, apart from the method namespace, so
/// an attribute called `get`, `set` or `on` is just another key.
struct ModelInner {
    uuid: Uuid,
    attributes: RefCell<Map<String, Value>>,
    emitter: Emitter,
}

impl ModelInner {
    fn new(attributes: Map<String, Value>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            attributes: RefCell::new(attributes),
            emitter: Emitter::new(),
        }
    }
}

// =============================================================================
// MODEL - The public model handle
// =============================================================================

/// An observable key/value entity.
///
/// `set` stores the value and then fires `change:<name>` followed by
/// `change`, both with no arguments. Events fire on every `set`, even when
/// the value is unchanged.
///
/// Cloning a `Model` clones the handle: both clones share attributes,
/// listeners and identifier.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use spark_models::{listener, Model, Observable};
///
/// let person = Model::with_attributes([("name", json!("Andrei"))]);
/// person.on("change:name", &listener(|_| println!("renamed")));
///
/// person.set("name", "Ana").unwrap();
/// assert_eq!(person.get("name"), Some(json!("Ana")));
/// ```
#[derive(Clone)]
pub struct Model {
    inner: Rc<ModelInner>,
}

impl Model {
    /// Create a model with no attributes.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ModelInner::new(Map::new())),
        }
    }

    /// Create a model seeded with `initial`.
    ///
    /// Keys are copied verbatim. Seeding fires no events.
    pub fn with_attributes<I, K, V>(initial: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let attributes = initial
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            inner: Rc::new(ModelInner::new(attributes)),
        }
    }

    /// Create a model from a JSON object (or `null` for an empty model).
    pub fn from_json(initial: Value) -> Result<Self> {
        match initial {
            Value::Object(attributes) => Ok(Self::with_attributes(attributes)),
            Value::Null => Ok(Self::new()),
            other => Err(Error::invalid_argument(format!(
                "Model attributes must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// The identifier assigned at construction.
    pub fn uuid(&self) -> Uuid {
        self.inner.uuid
    }

    // =========================================================================
    // ATTRIBUTES
    // =========================================================================

    /// Get the stored value for `name`, or `None` if it was never set.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.attributes.borrow().get(name).cloned()
    }

    /// Access an attribute with a closure (avoids cloning).
    pub fn with<R>(&self, name: &str, f: impl FnOnce(Option<&Value>) -> R) -> R {
        f(self.inner.attributes.borrow().get(name))
    }

    /// Store `value` under `name`, then fire `change:<name>` and `change`.
    ///
    /// The write happens before any listener runs. A failing listener
    /// stops the remaining dispatch; the value stays written.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let name = name.into();
        self.inner
            .attributes
            .borrow_mut()
            .insert(name.clone(), value.into());

        trace!(model = %self.inner.uuid, attribute = %name, "attribute set");

        self.inner.emitter.trigger(&change_event(&name), &[])?;
        self.inner.emitter.trigger(CHANGE, &[])
    }

    pub fn has(&self, name: &str) -> bool {
        self.inner.attributes.borrow().contains_key(name)
    }

    /// Attribute names currently stored.
    pub fn keys(&self) -> Vec<String> {
        self.inner.attributes.borrow().keys().cloned().collect()
    }

    /// Copy of the attribute map.
    pub fn attributes(&self) -> Map<String, Value> {
        self.inner.attributes.borrow().clone()
    }

    /// Number of stored attributes.
    pub fn len(&self) -> usize {
        self.inner.attributes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Observable for Model {
    fn emitter(&self) -> &Emitter {
        &self.inner.emitter
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity: two handles are equal when they share the same model.
impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Model {}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("uuid", &self.inner.uuid)
            .field("attributes", &self.inner.attributes.borrow())
            .finish()
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// MODEL CREATION FUNCTION
// =============================================================================

/// Create a model seeded with `initial`.
///
/// ```
/// use serde_json::json;
/// use spark_models::model;
///
/// let m = model([("job", json!("Developer"))]);
/// assert_eq!(m.get("job"), Some(json!("Developer")));
/// ```
pub fn model<I, K, V>(initial: I) -> Model
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    Model::with_attributes(initial)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::listener::{listener, try_listener};
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use std::collections::HashSet;

    fn counter() -> (Rc<Cell<usize>>, crate::Listener) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let cb = listener(move |_| count_clone.set(count_clone.get() + 1));
        (count, cb)
    }

    #[test]
    fn uuids_are_unique() {
        let uuids: HashSet<Uuid> = (0..20).map(|_| Model::new().uuid()).collect();
        assert_eq!(uuids.len(), 20);
    }

    #[test]
    fn clone_shares_identity() {
        let a = Model::new();
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.uuid(), b.uuid());

        b.set("x", 1).unwrap();
        assert_eq!(a.get("x"), Some(json!(1)));
        assert_ne!(a, Model::new());
    }

    #[test]
    fn get_missing_attribute_is_none() {
        assert_eq!(Model::new().get("name"), None);
    }

    #[test]
    fn null_is_a_stored_value() {
        let m = Model::new();
        m.set("gone", Value::Null).unwrap();
        assert!(m.has("gone"));
        assert_eq!(m.get("gone"), Some(Value::Null));
    }

    #[test]
    fn set_fires_specific_then_generic() {
        let m = Model::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let generic = {
            let order = order.clone();
            listener(move |_| order.borrow_mut().push("change"))
        };
        let specific = {
            let order = order.clone();
            listener(move |_| order.borrow_mut().push("change:name"))
        };
        // Register generic first; dispatch order is still specific first.
        m.on("change", &generic);
        m.on("change:name", &specific);

        m.set("name", "x").unwrap();
        assert_eq!(*order.borrow(), vec!["change:name", "change"]);
    }

    #[test]
    fn set_fires_even_when_value_unchanged() {
        let m = Model::new();
        let (count, cb) = counter();
        m.on("change", &cb);

        m.set("n", 1).unwrap();
        m.set("n", 1).unwrap();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn change_events_receive_no_arguments() {
        let m = Model::new();
        let seen = Rc::new(Cell::new(usize::MAX));
        let seen_clone = seen.clone();
        m.on("change", &listener(move |args| seen_clone.set(args.len())));

        m.set("a", 1).unwrap();
        assert_eq!(seen.get(), 0);
    }

    #[test]
    fn value_is_written_before_listeners_run() {
        let m = Model::new();
        let observed = Rc::new(RefCell::new(None));

        let cb = {
            let m = m.clone();
            let observed = observed.clone();
            listener(move |_| *observed.borrow_mut() = m.get("k"))
        };
        m.on("change:k", &cb);

        m.set("k", "v").unwrap();
        assert_eq!(*observed.borrow(), Some(json!("v")));
    }

    #[test]
    fn reentrant_set_from_listener() {
        let m = Model::new();
        let cb = {
            let m = m.clone();
            listener(move |_| {
                let n = m.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
                if n < 3 {
                    m.set("count", n + 1).unwrap();
                }
            })
        };
        m.on("change:count", &cb);

        m.set("count", 0).unwrap();
        assert_eq!(m.get("count"), Some(json!(3)));
    }

    #[test]
    fn failing_listener_error_reaches_caller() {
        let m = Model::new();
        let (count, generic) = counter();
        m.on("change:bad", &try_listener(|_| Err("rejected".into())));
        m.on("change", &generic);

        let err = m.set("bad", true).unwrap_err();
        assert_eq!(err.event(), Some("change:bad"));
        assert_eq!(count.get(), 0);
        assert_eq!(m.get("bad"), Some(json!(true)));
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(Model::from_json(json!({"a": 1})).is_ok());
        assert!(Model::from_json(Value::Null).unwrap().is_empty());
        assert!(matches!(
            Model::from_json(json!(3)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn introspection() {
        let m = model([("a", json!(1)), ("b", json!(2))]);
        assert_eq!(m.len(), 2);
        assert_eq!(m.keys(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(m.attributes().get("b"), Some(&json!(2)));
        assert!(m.with("a", |v| v == Some(&json!(1))));
    }
}
