// ============================================================================
// spark-models - Collection
// An ordered group of entries with array-style queries and id lookup
// ============================================================================

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use serde_json::Value;
use tracing::trace;
use uuid::Uuid;

use crate::core::constants::UUID_ATTRIBUTE;
use crate::core::error::{Error, Result};
use crate::primitives::model::{json_kind, Model};

// =============================================================================
// IDENTIFIED
// =============================================================================

/// Entries that carry an identifier, for [`Collection::get`].
pub trait Identified {
    type Id: PartialEq;

    /// The entry's identifier, if it has one.
    fn identifier(&self) -> Option<Self::Id>;

    fn has_identifier(&self, id: &Self::Id) -> bool {
        self.identifier().as_ref() == Some(id)
    }
}

impl Identified for Model {
    type Id = Uuid;

    fn identifier(&self) -> Option<Uuid> {
        Some(self.uuid())
    }

    fn has_identifier(&self, id: &Uuid) -> bool {
        self.uuid() == *id
    }
}

/// Plain JSON entries are identified by their `uuid` field.
impl Identified for Value {
    type Id = Value;

    fn identifier(&self) -> Option<Value> {
        self.get(UUID_ATTRIBUTE).cloned()
    }

    fn has_identifier(&self, id: &Value) -> bool {
        self.get(UUID_ATTRIBUTE).is_some_and(|own| same_id(own, id))
    }
}

/// Numbers match by value, so `1` and `1.0` name the same entry.
fn same_id(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return x == y;
            }
            if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                return x == y;
            }
            x.as_f64() == y.as_f64()
        }
        _ => a == b,
    }
}

impl<T: Identified> Identified for Rc<T> {
    type Id = T::Id;

    fn identifier(&self) -> Option<T::Id> {
        (**self).identifier()
    }

    fn has_identifier(&self, id: &T::Id) -> bool {
        (**self).has_identifier(id)
    }
}

// =============================================================================
// COLLECTION
// =============================================================================

/// An ordered, duplicate-friendly group of entries.
///
/// The backing `Vec` is shared, not copied: a collection built with
/// [`Collection::shared`] sees every change made through the caller's
/// handle, and clones of a collection share one sequence.
///
/// Callback operations (`map`, `filter`, `reduce`, `fold`, `find`,
/// `find_index`, `some`, `every`, `for_each`) call `f(value, index,
/// collection)`, passing the collection itself as the live sequence. No
/// borrow is held while a callback runs, so callbacks may add or remove
/// entries (directly or through listeners they trigger). The visited
/// index range is fixed when the operation starts; entries removed
/// mid-walk end it early.
///
/// # Example
///
/// ```
/// use spark_models::Collection;
///
/// let numbers = Collection::from_vec(vec![1, 2, 3, 1]);
/// numbers.remove(&1);
/// assert_eq!(numbers.to_vec(), vec![2, 3]);
///
/// let doubled = numbers.map(|v, _, _| v * 2);
/// assert_eq!(doubled.to_vec(), vec![4, 6]);
/// ```
pub struct Collection<T> {
    models: Rc<RefCell<Vec<T>>>,
}

impl<T> Collection<T> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn from_vec(models: Vec<T>) -> Self {
        Self::shared(Rc::new(RefCell::new(models)))
    }

    /// Wrap a caller-owned sequence without copying it.
    pub fn shared(models: Rc<RefCell<Vec<T>>>) -> Self {
        Self { models }
    }

    /// The live backing sequence.
    pub fn models(&self) -> Rc<RefCell<Vec<T>>> {
        self.models.clone()
    }

    /// Borrow the backing sequence.
    pub fn borrow(&self) -> Ref<'_, Vec<T>> {
        self.models.borrow()
    }

    pub fn len(&self) -> usize {
        self.models.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry at `index`, if there is one.
    pub fn at(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.models.borrow().get(index).cloned()
    }

    /// Walk `0..len` (length taken now), cloning each entry under a
    /// borrow that ends before the entry is handed out.
    fn entries(&self) -> impl Iterator<Item = (usize, T)> + '_
    where
        T: Clone,
    {
        let len = self.len();
        (0..len).map_while(move |i| self.at(i).map(|v| (i, v)))
    }

    // =========================================================================
    // ADD / REMOVE
    // =========================================================================

    /// Append one entry.
    pub fn push(&self, item: T) {
        self.models.borrow_mut().push(item);
    }

    /// Append every item, in order. An empty iterator is fine.
    pub fn add<I>(&self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut models = self.models.borrow_mut();
        let before = models.len();
        models.extend(items);
        trace!(added = models.len() - before, len = models.len(), "collection add");
    }

    /// Remove every entry equal to `item`, keeping the order of the rest.
    pub fn remove(&self, item: &T)
    where
        T: PartialEq,
    {
        let mut models = self.models.borrow_mut();
        let before = models.len();
        models.retain(|m| m != item);
        trace!(removed = before - models.len(), len = models.len(), "collection remove");
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// First entry whose identifier equals `id`.
    pub fn get(&self, id: &T::Id) -> Option<T>
    where
        T: Identified + Clone,
    {
        self.models
            .borrow()
            .iter()
            .find(|m| m.has_identifier(id))
            .cloned()
    }

    /// Index of the first entry equal to `item`.
    pub fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.models.borrow().iter().position(|m| m == item)
    }

    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(item).is_some()
    }

    // =========================================================================
    // TRANSFORMS (return new collections)
    // =========================================================================

    /// Apply `f(value, index, collection)` to every entry.
    pub fn map<U, F>(&self, mut f: F) -> Collection<U>
    where
        F: FnMut(&T, usize, &Collection<T>) -> U,
        T: Clone,
    {
        self.entries().map(|(i, v)| f(&v, i, self)).collect()
    }

    /// Keep the entries for which `f(value, index, collection)` is true.
    pub fn filter<F>(&self, mut f: F) -> Collection<T>
    where
        F: FnMut(&T, usize, &Collection<T>) -> bool,
        T: Clone,
    {
        self.entries()
            .filter(|(i, v)| f(v, *i, self))
            .map(|(_, v)| v)
            .collect()
    }

    // =========================================================================
    // FOLDS
    // =========================================================================

    /// Left fold seeded by the first entry; `f(acc, value, index, collection)`
    /// runs from the second entry on.
    ///
    /// A single entry is returned as is. An empty collection yields `None`.
    pub fn reduce<F>(&self, mut f: F) -> Option<T>
    where
        F: FnMut(T, &T, usize, &Collection<T>) -> T,
        T: Clone,
    {
        let mut entries = self.entries();
        let (_, first) = entries.next()?;
        Some(entries.fold(first, |acc, (i, v)| f(acc, &v, i, self)))
    }

    /// Left fold from `init` over every entry.
    pub fn fold<A, F>(&self, init: A, mut f: F) -> A
    where
        F: FnMut(A, &T, usize, &Collection<T>) -> A,
        T: Clone,
    {
        self.entries().fold(init, |acc, (i, v)| f(acc, &v, i, self))
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    /// First entry matching the predicate. Stops at the first match.
    pub fn find<F>(&self, mut f: F) -> Option<T>
    where
        F: FnMut(&T, usize, &Collection<T>) -> bool,
        T: Clone,
    {
        self.entries()
            .find(|(i, v)| f(v, *i, self))
            .map(|(_, v)| v)
    }

    /// Index of the first entry matching the predicate.
    pub fn find_index<F>(&self, mut f: F) -> Option<usize>
    where
        F: FnMut(&T, usize, &Collection<T>) -> bool,
        T: Clone,
    {
        self.entries()
            .find(|(i, v)| f(v, *i, self))
            .map(|(i, _)| i)
    }

    pub fn some<F>(&self, f: F) -> bool
    where
        F: FnMut(&T, usize, &Collection<T>) -> bool,
        T: Clone,
    {
        self.find_index(f).is_some()
    }

    pub fn every<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&T, usize, &Collection<T>) -> bool,
        T: Clone,
    {
        self.find_index(|v, i, models| !f(v, i, models)).is_none()
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&T, usize, &Collection<T>),
        T: Clone,
    {
        for (i, v) in self.entries() {
            f(&v, i, self);
        }
    }

    // =========================================================================
    // UTILITIES
    // =========================================================================

    /// Copy of the current entries.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.models.borrow().clone()
    }
}

impl Collection<Value> {
    /// Build a collection from a JSON array (or `null` for an empty one).
    ///
    /// Any other JSON value fails with [`Error::InvalidArgument`].
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Array(models) => Ok(Self::from_vec(models)),
            Value::Null => Ok(Self::new()),
            other => {
                trace!(kind = json_kind(&other), "rejected collection input");
                Err(Error::invalid_argument(
                    "Constructor parameter must be an array",
                ))
            }
        }
    }
}

impl TryFrom<Value> for Collection<Value> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_json(value)
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(models: Vec<T>) -> Self {
        Self::from_vec(models)
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones share the backing sequence.
impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            models: self.models.clone(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let models = self.models.borrow();
        f.debug_struct("Collection")
            .field("models", &*models)
            .field("len", &models.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_empty() {
        let c: Collection<i32> = Collection::new();
        assert_eq!(c.len(), 0);
        assert!(c.is_empty());
    }

    #[test]
    fn shared_sequence_is_not_copied() {
        let backing = Rc::new(RefCell::new(vec![1, 2, 3]));
        let c = Collection::shared(backing.clone());

        backing.borrow_mut().push(4);
        assert_eq!(c.len(), 4);

        c.push(5);
        assert_eq!(*backing.borrow(), vec![1, 2, 3, 4, 5]);
        assert!(Rc::ptr_eq(&c.models(), &backing));
    }

    #[test]
    fn clones_share_entries() {
        let a = Collection::from_vec(vec![1]);
        let b = a.clone();
        b.push(2);
        assert_eq!(a.to_vec(), vec![1, 2]);
    }

    #[test]
    fn add_appends_in_order() {
        let c = Collection::new();
        c.add([1, 2]);
        c.add(Vec::new());
        c.add([3]);
        assert_eq!(c.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn remove_drops_all_equal_entries() {
        let c = Collection::from_vec(vec![1, 2, 3, 1]);
        assert_eq!(c.len(), 4);

        c.remove(&1);
        assert_eq!(c.to_vec(), vec![2, 3]);

        c.remove(&42);
        assert_eq!(c.to_vec(), vec![2, 3]);
    }

    #[test]
    fn remove_models_by_identity() {
        let a = Model::new();
        let b = Model::new();
        let c = Collection::new();
        c.add([a.clone(), b.clone(), a.clone(), b.clone()]);

        c.remove(&a);
        assert_eq!(c.len(), 2);
        assert_eq!(c.borrow()[0], b);
    }

    #[test]
    fn get_by_model_uuid() {
        let a = Model::new();
        let b = Model::new();
        let c = Collection::from_vec(vec![a.clone(), b.clone()]);

        assert_eq!(c.get(&b.uuid()), Some(b));
        assert_eq!(c.get(&Uuid::new_v4()), None);
    }

    #[test]
    fn get_by_json_uuid_field() {
        let c = Collection::from_json(json!([{ "uuid": 1 }, { "uuid": 2 }, 3])).unwrap();
        assert_eq!(c.get(&json!(2)), Some(json!({ "uuid": 2 })));
        assert_eq!(c.get(&json!(9)), None);
    }

    #[test]
    fn from_json_requires_array() {
        assert!(Collection::from_json(json!([1, 2])).is_ok());
        assert!(Collection::from_json(Value::Null).unwrap().is_empty());

        let err = Collection::from_json(json!(3)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(err.to_string(), "Constructor parameter must be an array");
    }

    #[test]
    fn map_passes_value_index_and_models() {
        let c = Collection::from_vec(vec![1, 2, 3, 1]);
        let mut calls = Vec::new();

        let result = c.map(|v, i, models| {
            calls.push((*v, i, models.to_vec()));
            v * 2
        });

        assert_eq!(calls.len(), 4);
        for (i, (v, index, models)) in calls.iter().enumerate() {
            assert_eq!(*index, i);
            assert_eq!(*v, c.borrow()[i]);
            assert_eq!(models, &vec![1, 2, 3, 1]);
        }
        assert_eq!(result.to_vec(), vec![2, 4, 6, 2]);
    }

    #[test]
    fn filter_keeps_matching() {
        let c = Collection::from_vec(vec![1, 2, 3, 1]);
        let result = c.filter(|&v, i, _| v as usize > i);
        assert_eq!(result.to_vec(), vec![1, 2, 3]);

        let none = c.filter(|_, _, _| false);
        assert!(none.is_empty());
    }

    #[test]
    fn callbacks_see_live_sequence() {
        let backing = Rc::new(RefCell::new(vec![10, 20]));
        let c = Collection::shared(backing.clone());
        let mut siblings = Vec::new();
        c.for_each(|_, i, models| {
            assert!(Rc::ptr_eq(&models.models(), &backing));
            siblings.push(models.at(i + 1));
        });
        assert_eq!(siblings, vec![Some(20), None]);
    }

    #[test]
    fn listener_may_grow_collection_during_walk() {
        use crate::core::emitter::Observable;
        use crate::core::listener::listener;

        let member = Model::new();
        let c = Collection::from_vec(vec![member.clone()]);
        member.on(
            "change",
            &listener(cloned!(c => move |_| c.push(Model::new()))),
        );

        c.for_each(|m, _, _| m.set("x", 1).unwrap());
        assert_eq!(c.len(), 2);

        // Range fixed at start: the appended entry is not visited
        let visited = c.map(|m, _, _| m.set("y", 2).unwrap()).len();
        assert_eq!(visited, 2);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn removal_during_walk_ends_early() {
        let c = Collection::from_vec(vec![1, 2, 3]);
        let mut seen = Vec::new();
        c.for_each(|&v, _, models| {
            seen.push(v);
            models.remove(&3);
        });
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(c.to_vec(), vec![1, 2]);
    }

    #[test]
    fn json_uuid_numbers_match_by_value() {
        let c = Collection::from_json(json!([{ "uuid": 1.0 }, { "uuid": "1" }])).unwrap();
        assert_eq!(c.get(&json!(1)), Some(json!({ "uuid": 1.0 })));
        assert_eq!(c.get(&json!("1")), Some(json!({ "uuid": "1" })));
        assert_eq!(c.get(&json!(1.5)), None);

        let big = Collection::from_json(json!([{ "uuid": 9_007_199_254_740_993u64 }])).unwrap();
        assert_eq!(big.get(&json!(9_007_199_254_740_992u64)), None);
    }

    #[test]
    fn reduce_without_seed() {
        let c = Collection::from_vec(vec![1, 2, 3, 4]);
        let mut indices = Vec::new();
        let sum = c.reduce(|acc, v, i, _| {
            indices.push(i);
            acc + v
        });
        assert_eq!(sum, Some(10));
        assert_eq!(indices, vec![1, 2, 3]);

        assert_eq!(Collection::from_vec(vec![7]).reduce(|a, v, _, _| a + v), Some(7));
        assert_eq!(Collection::<i32>::new().reduce(|a, v, _, _| a + v), None);
    }

    #[test]
    fn fold_with_seed() {
        let c = Collection::from_vec(vec!["a", "b"]);
        let joined = c.fold(String::from(">"), |mut acc, v, i, _| {
            acc.push_str(&format!("{v}{i}"));
            acc
        });
        assert_eq!(joined, ">a0b1");
        assert_eq!(Collection::<i32>::new().fold(5, |a, v, _, _| a + v), 5);
    }

    #[test]
    fn find_and_find_index_stop_at_first_match() {
        let c = Collection::from_vec(vec![1, 5, 7, 9]);
        let mut visited = 0;
        let found = c.find(|&v, _, _| {
            visited += 1;
            v > 4
        });
        assert_eq!(found, Some(5));
        assert_eq!(visited, 2);

        assert_eq!(c.find_index(|&v, _, _| v == 9), Some(3));
        assert_eq!(c.find_index(|&v, _, _| v == 0), None);
        assert_eq!(c.find(|&v, _, _| v == 0), None);
    }

    #[test]
    fn index_of_and_contains() {
        let c = Collection::from_vec(vec!["x", "y", "x"]);
        assert_eq!(c.index_of(&"x"), Some(0));
        assert_eq!(c.index_of(&"y"), Some(1));
        assert_eq!(c.index_of(&"z"), None);
        assert!(c.contains(&"y"));
    }

    #[test]
    fn some_and_every() {
        let c = Collection::from_vec(vec![2, 4, 6]);
        assert!(c.every(|v, _, _| v % 2 == 0));
        assert!(!c.some(|&v, _, _| v > 6));
        assert!(Collection::<i32>::new().every(|_, _, _| false));
    }

    #[test]
    fn debug_format() {
        let c = Collection::from_vec(vec![1, 2]);
        let debug = format!("{:?}", c);
        assert!(debug.contains("Collection"));
        assert!(debug.contains("[1, 2]"));
    }
}
