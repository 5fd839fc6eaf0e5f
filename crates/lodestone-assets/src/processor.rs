//! Asset unit processors - per-kind construction dispatch.
//!
//! Each subsystem registers one processor per kind tag at initialization
//! time. A processor is a plain function from a source and a persisted
//! record to a constructed unit (or `None` when the record is unusable).
//! The registry dispatches on the record's name and never has compile-time
//! knowledge of concrete unit types.

use std::sync::Arc;

use lodestone_core::alloc::HashMap;

use crate::record::DataRecord;
use crate::source::AssetSource;
use crate::unit::AssetUnit;

/// A per-kind unit constructor.
pub type UnitProcessor =
    Arc<dyn Fn(&Arc<AssetSource>, &DataRecord) -> Option<Arc<dyn AssetUnit>> + Send + Sync>;

/// Table of unit processors indexed by kind tag.
#[derive(Default)]
pub struct ProcessorRegistry {
    by_kind: HashMap<String, UnitProcessor>,
}

impl ProcessorRegistry {
    /// Create a new empty processor table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor for a kind tag. The last registration for a
    /// kind wins.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        processor: impl Fn(&Arc<AssetSource>, &DataRecord) -> Option<Arc<dyn AssetUnit>>
        + Send
        + Sync
        + 'static,
    ) {
        let kind = kind.into();
        if self
            .by_kind
            .insert(kind.clone(), Arc::new(processor))
            .is_some()
        {
            tracing::debug!(kind, "replaced asset unit processor");
        }
    }

    /// Remove the processor for a kind tag. Returns `true` if one was
    /// registered.
    pub fn clear(&mut self, kind: &str) -> bool {
        self.by_kind.remove(kind).is_some()
    }

    /// Get the processor for a kind tag.
    pub fn get(&self, kind: &str) -> Option<&UnitProcessor> {
        self.by_kind.get(kind)
    }

    /// Check whether a kind tag has a processor.
    pub fn contains(&self, kind: &str) -> bool {
        self.by_kind.contains_key(kind)
    }

    /// Number of registered processors.
    pub fn len(&self) -> usize {
        self.by_kind.len()
    }

    /// Check if no processors are registered.
    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_registration_wins() {
        let mut processors = ProcessorRegistry::new();
        processors.register("shader", |_, _| None);
        processors.register("shader", |_, _| None);
        assert_eq!(processors.len(), 1);
        assert!(processors.contains("shader"));
    }

    #[test]
    fn test_clear() {
        let mut processors = ProcessorRegistry::new();
        processors.register("shader", |_, _| None);
        assert!(processors.clear("shader"));
        assert!(!processors.clear("shader"));
        assert!(processors.is_empty());
    }
}
