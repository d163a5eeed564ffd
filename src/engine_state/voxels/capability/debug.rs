//! Diagnostic capability: a read-only dump of the owner's identity and state.

use std::fmt::Write;

use super::CapabilityOwner;

/// Produces human-readable dumps of its owner. Never mutates anything.
///
/// The dump reads the owner at call time, so the capability itself holds no state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DebugCapability;

impl DebugCapability {
    /// A diagnostic capability.
    pub fn new() -> Self {
        Self
    }

    /// Renders the owner's identity followed by one `label: value` line per state entry.
    ///
    /// # Arguments
    /// * `owner` - The owner to describe; `None` yields `"no owner"`
    ///
    /// # Returns
    /// The dump, without a trailing newline
    pub fn dump(&self, owner: Option<&dyn CapabilityOwner>) -> String {
        let Some(owner) = owner else {
            return "no owner".to_string();
        };

        let mut out = owner.identity();
        for (label, value) in owner.state() {
            // Writing into a String cannot fail.
            let _ = write!(out, "\n  {}: {}", label, value);
        }
        out
    }
}
