//! Immutable compiled filter

use crate::condition::Condition;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A condition paired with its wire string, rendered exactly once
///
/// Snapshots are what leaves the editor for execution: the wire string is
/// computed when the snapshot is taken and never recomputed, and equality
/// and hashing compare that string directly.
#[derive(Debug, Clone)]
pub struct FilterSnapshot {
    condition: Condition,
    wire: String,
}

impl FilterSnapshot {
    pub fn new(condition: Condition) -> Self {
        let wire = condition.render_wire();
        Self { condition, wire }
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Filter string for the query transport
    pub fn wire(&self) -> &str {
        &self.wire
    }

    pub fn into_condition(self) -> Condition {
        self.condition
    }
}

impl Condition {
    /// Freeze this condition into a snapshot
    pub fn snapshot(self) -> FilterSnapshot {
        FilterSnapshot::new(self)
    }
}

impl PartialEq for FilterSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.wire == other.wire
    }
}

impl Eq for FilterSnapshot {}

impl Hash for FilterSnapshot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.wire.hash(state);
    }
}

impl AsRef<str> for FilterSnapshot {
    fn as_ref(&self) -> &str {
        &self.wire
    }
}

impl fmt::Display for FilterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.wire)
    }
}
