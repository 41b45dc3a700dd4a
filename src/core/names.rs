// ============================================================================
// spark-models - Event Names
// Parse step for single or whitespace-separated event name lists
// ============================================================================

// =============================================================================
// EVENT NAMES
// =============================================================================

/// An ordered list of event names parsed from a names string.
///
/// `"a b"` names two events. Runs of whitespace collapse, so empty names
/// never reach the registry. Duplicates are kept in order: `"a a"`
/// dispatches `a` twice.
///
/// # Example
///
/// ```
/// use spark_models::EventNames;
///
/// let names: Vec<&str> = EventNames::parse("change  change:name").into_iter().collect();
/// assert_eq!(names, ["change", "change:name"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventNames<'a> {
    names: Vec<&'a str>,
}

impl<'a> EventNames<'a> {
    /// Split `names` on whitespace.
    pub fn parse(names: &'a str) -> Self {
        Self {
            names: names.split_whitespace().collect(),
        }
    }
}

impl<'a> IntoIterator for EventNames<'a> {
    type Item = &'a str;
    type IntoIter = std::vec::IntoIter<&'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================
