//! On-demand unit resolution.
//!
//! Indirection and path overrides can name units that are not in the working set yet. A
//! [`BytecodeProvider`] is the seam through which the orchestrator pulls those units in;
//! the loaded unit transfers into the working set and is edited there like any other.

use std::collections::HashMap;

use crate::{metadata::CompiledUnit, Error, Result};

/// Source of compiled units resolved by qualified name.
///
/// Implementations hand over ownership of the unit; once loaded, the unit lives in the
/// working set and the provider is never asked for the same name again during a pass.
pub trait BytecodeProvider {
    /// Loads the unit with the given qualified name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnitNotFound`] if the provider has no unit under that name.
    fn load(&mut self, qualified_name: &str) -> Result<CompiledUnit>;
}

/// A [`BytecodeProvider`] backed by units staged in memory.
///
/// Useful for hosts that materialize units ahead of time, and for tests.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    staged: HashMap<String, CompiledUnit>,
}

impl MemoryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a unit for later loading under its own qualified name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateUnit`] if a unit with the same name is already staged.
    pub fn insert(&mut self, unit: CompiledUnit) -> Result<()> {
        if self.staged.contains_key(&unit.name) {
            return Err(Error::DuplicateUnit(unit.name.clone()));
        }
        self.staged.insert(unit.name.clone(), unit);
        Ok(())
    }

    /// Number of units still staged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }
}

impl BytecodeProvider for MemoryProvider {
    fn load(&mut self, qualified_name: &str) -> Result<CompiledUnit> {
        self.staged
            .remove(qualified_name)
            .ok_or_else(|| Error::UnitNotFound(qualified_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_transfers_ownership() {
        let mut provider = MemoryProvider::new();
        provider.insert(CompiledUnit::new("demo/Real")).unwrap();
        assert_eq!(provider.len(), 1);

        let unit = provider.load("demo/Real").unwrap();
        assert_eq!(unit.name, "demo/Real");
        assert!(provider.is_empty());

        // A second load of the same name fails; the unit moved out.
        assert!(matches!(
            provider.load("demo/Real"),
            Err(Error::UnitNotFound(name)) if name == "demo/Real"
        ));
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let mut provider = MemoryProvider::new();
        assert!(matches!(
            provider.load("demo/Missing"),
            Err(Error::UnitNotFound(name)) if name == "demo/Missing"
        ));
    }

    #[test]
    fn test_duplicate_staging_is_rejected() {
        let mut provider = MemoryProvider::new();
        provider.insert(CompiledUnit::new("demo/Real")).unwrap();
        assert!(matches!(
            provider.insert(CompiledUnit::new("demo/Real")),
            Err(Error::DuplicateUnit(name)) if name == "demo/Real"
        ));
    }
}
