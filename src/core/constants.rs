// ============================================================================
// spark-models - Constants
// Reserved event names and attribute keys
// ============================================================================

// =============================================================================
// EVENT NAMES
// =============================================================================

/// Generic event fired after every `Model::set`.
pub const CHANGE: &str = "change";

/// Prefix of the attribute-specific event (`change:<name>`).
pub const CHANGE_PREFIX: &str = "change:";

// =============================================================================
// ATTRIBUTE KEYS
// =============================================================================

/// Attribute consulted by identifier lookup on plain JSON entries.
pub const UUID_ATTRIBUTE: &str = "uuid";

/// Build the attribute-specific change event name for `attribute`.
pub fn change_event(attribute: &str) -> String {
    let mut name = String::with_capacity(CHANGE_PREFIX.len() + attribute.len());
    name.push_str(CHANGE_PREFIX);
    name.push_str(attribute);
    name
}

// =============================================================================
// TESTS
// =============================================================================
