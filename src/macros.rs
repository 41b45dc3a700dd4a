// ============================================================================
// spark-models - Ergonomic Macros
// ============================================================================

/// Helper macro to clone variables into a move closure.
///
/// Models, buses and collections are `Rc` handles; listeners usually need
/// their own clone of whatever they touch.
///
/// # Usage
///
/// ```rust
/// use spark_models::{cloned, listener, EventBus, Model, Observable};
///
/// let model = Model::new();
/// let bus = EventBus::new();
///
/// bus.on("reset", &listener(cloned!(model => move |_| {
///     model.set("count", 0).unwrap();
/// })));
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {
        {
            $( let $n = $n.clone(); )+
            $e
        }
    };
}

/// Build an attribute seed from `key => value` pairs.
///
/// Values go through `serde_json::json!`, so mixed types are fine.
///
/// # Usage
///
/// ```rust
/// use spark_models::{attrs, Model};
///
/// let model = Model::with_attributes(attrs! {
///     "name" => "Andrei",
///     "job" => "Developer",
///     "hypeLevel" => 100,
/// });
/// assert_eq!(model.len(), 3);
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        ::std::vec::Vec::<(::std::string::String, $crate::serde_json::Value)>::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        ::std::vec![
            $( (::std::string::String::from($key), $crate::serde_json::json!($value)) ),+
        ]
    };
}
