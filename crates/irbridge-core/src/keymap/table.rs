//! Button identifier → [`KeyBinding`] lookup table.

use std::collections::HashMap;

use super::binding::KeyBinding;

/// Immutable mapping from remote button names to key bindings.
///
/// Built once at startup and shared read-only (it is `Send + Sync` because it
/// never changes after construction).  Button names are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMappingTable {
    bindings: HashMap<String, KeyBinding>,
}

impl KeyMappingTable {
    /// Creates a table from an already-built map.
    pub fn new(bindings: HashMap<String, KeyBinding>) -> Self {
        Self { bindings }
    }

    /// Returns the binding for `button`, if one is configured.
    pub fn get(&self, button: &str) -> Option<&KeyBinding> {
        self.bindings.get(button)
    }

    /// Returns `true` if `button` has a binding.
    pub fn contains(&self, button: &str) -> bool {
        self.bindings.contains_key(button)
    }

    /// Number of configured buttons.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterates over `(button, binding)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyBinding)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, KeyBinding)> for KeyMappingTable {
    fn from_iter<I: IntoIterator<Item = (String, KeyBinding)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
