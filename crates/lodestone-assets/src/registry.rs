//! The asset unit registry - identity coherency for all live units.
//!
//! One registry exists per running engine instance and is passed explicitly
//! to the subsystems that need it; there is no process-wide singleton. It
//! holds the authoritative by-id map, the secondary by-name index, and the
//! processor table used to hydrate units from persisted records.
//!
//! Units mutate their own id/name out-of-band (asset renames, renumbering
//! on import). The registry stays coherent by subscribing itself as the
//! unit's owner at registration time: the unit announces every change
//! before committing it, and the registry moves its index entries while
//! both the old and the new key are observable.

use std::sync::{Arc, Weak};

use lodestone_core::HashedString;
use lodestone_core::alloc::HashMap;
use parking_lot::Mutex;

use crate::error::{AssetError, AssetResult};
use crate::event::{UnitEvent, UnitEventBuffer};
use crate::id::UnitId;
use crate::processor::ProcessorRegistry;
use crate::record::{ASSET_UNITS_KEY, DataRecord};
use crate::schedule::FrameScheduler;
use crate::source::AssetSource;
use crate::unit::{AssetUnit, AssetUnitExt, UnitOwner};

/// Configuration for an [`AssetUnitRegistry`].
pub struct RegistryConfig {
    /// Auto-assign a generated id when an id-less unit is registered.
    /// When disabled, registering an id-less unit is an error.
    pub auto_generate_ids: bool,

    /// Scheduler handed to units at registration time. Units without one
    /// perform load/unload transitions synchronously.
    pub scheduler: Option<FrameScheduler>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            auto_generate_ids: true,
            scheduler: None,
        }
    }
}

struct Maps {
    by_id: HashMap<UnitId, Arc<dyn AssetUnit>>,
    by_name: HashMap<HashedString, Arc<dyn AssetUnit>>,
}

impl Maps {
    /// Drop the by-name entry for `unit` if it is the one indexed.
    /// Duplicate names are last-write-wins, so removing a shadowed unit
    /// must not evict the winner.
    fn drop_name_entry(&mut self, unit: &Arc<dyn AssetUnit>) {
        let name = unit.name();
        if name.is_empty() {
            return;
        }
        if let Some(current) = self.by_name.get(&name)
            && Arc::ptr_eq(current, unit)
        {
            self.by_name.remove(&name);
        }
    }
}

pub(crate) struct RegistryInner {
    maps: Mutex<Maps>,
    processors: Mutex<ProcessorRegistry>,
    events: Mutex<UnitEventBuffer>,
    config: RegistryConfig,
}

impl RegistryInner {
    fn push_event(&self, event: UnitEvent) {
        self.events.lock().push(event);
    }
}

impl UnitOwner for RegistryInner {
    fn id_changing(&self, old: Option<UnitId>, new: Option<UnitId>) {
        let unit = {
            let mut maps = self.maps.lock();
            let Some(old_id) = old else {
                // The unit is in no index, so there is nothing to move.
                tracing::warn!(
                    ?new,
                    "id assigned to an unindexed asset unit; re-register it to make it reachable"
                );
                return;
            };
            let Some(unit) = maps.by_id.remove(&old_id) else {
                tracing::warn!(%old_id, "id change for a unit the registry does not hold");
                return;
            };
            match new {
                Some(new_id) if maps.by_id.contains_key(&new_id) => {
                    tracing::error!(
                        %old_id,
                        %new_id,
                        "id change collides with a registered unit; dropping the renumbered unit from the indices"
                    );
                    maps.drop_name_entry(&unit);
                }
                Some(new_id) => {
                    maps.by_id.insert(new_id, unit.clone());
                }
                None => {
                    // Unassigned: the unit leaves both indices but remains
                    // owned by its source until explicitly unregistered.
                    maps.drop_name_entry(&unit);
                }
            }
            unit
        };
        self.push_event(UnitEvent::IdChanged {
            unit,
            old_id: old,
            new_id: new,
        });
    }

    fn name_changing(&self, id: Option<UnitId>, old: &HashedString, new: &HashedString) {
        let unit = {
            let mut maps = self.maps.lock();
            let Some(unit) = id.and_then(|id| maps.by_id.get(&id).cloned()) else {
                return;
            };
            if !old.is_empty()
                && let Some(current) = maps.by_name.get(old)
                && Arc::ptr_eq(current, &unit)
            {
                maps.by_name.remove(old);
            }
            if !new.is_empty()
                && maps.by_name.insert(new.clone(), unit.clone()).is_some()
            {
                tracing::debug!(name = %new, "asset unit rename shadows a previously registered unit");
            }
            unit
        };
        self.push_event(UnitEvent::NameChanged {
            unit,
            old_name: old.clone(),
            new_name: new.clone(),
        });
    }
}

/// The engine-instance-wide index of live asset units.
pub struct AssetUnitRegistry {
    inner: Arc<RegistryInner>,
}

impl AssetUnitRegistry {
    /// Create a registry with default configuration (ids auto-generated,
    /// no scheduler: transitions run synchronously).
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                maps: Mutex::new(Maps {
                    by_id: HashMap::new(),
                    by_name: HashMap::new(),
                }),
                processors: Mutex::new(ProcessorRegistry::new()),
                events: Mutex::new(UnitEventBuffer::new()),
                config,
            }),
        }
    }

    /// The scheduler units registered here will defer their transitions to.
    pub fn scheduler(&self) -> Option<&FrameScheduler> {
        self.inner.config.scheduler.as_ref()
    }

    /// Register a processor for a kind tag. The last registration for a
    /// kind wins.
    pub fn register_processor(
        &self,
        kind: impl Into<String>,
        processor: impl Fn(&Arc<AssetSource>, &DataRecord) -> Option<Arc<dyn AssetUnit>>
        + Send
        + Sync
        + 'static,
    ) {
        self.inner.processors.lock().register(kind, processor);
    }

    /// Remove the processor for a kind tag.
    pub fn clear_processor(&self, kind: &str) -> bool {
        self.inner.processors.lock().clear(kind)
    }

    /// Draw an id not currently present in the registry.
    ///
    /// Candidates come from a uniform draw over the full non-zero 32-bit
    /// range; the id space dwarfs any plausible live-unit count, so the
    /// rejection loop terminates on the first draw in practice.
    pub fn generate_id(&self) -> UnitId {
        let maps = self.inner.maps.lock();
        loop {
            if let Some(id) = UnitId::new(rand::random::<u32>())
                && !maps.by_id.contains_key(&id)
            {
                return id;
            }
        }
    }

    /// Register a unit, indexing it by id and (when named) by name.
    ///
    /// An id-less unit gets a generated id when the registry is configured
    /// for it; otherwise registration fails with a logged error, as does an
    /// id collision - an existing entry is never overwritten. Duplicate
    /// names are last-write-wins: the newest unit owns the by-name entry
    /// and the shadowed unit stays reachable by id.
    ///
    /// Returns `true` when the unit was registered.
    pub fn register_unit(&self, unit: Arc<dyn AssetUnit>) -> bool {
        let core = unit.core();
        if core.id().is_none() && self.inner.config.auto_generate_ids {
            // No owner is attached yet, so this is a plain field write.
            core.set_id(Some(self.generate_id()));
        }
        let Some(id) = core.id() else {
            tracing::error!(
                kind = unit.kind(),
                name = %core.name(),
                "cannot register an asset unit without an id"
            );
            return false;
        };
        let name = core.name();
        {
            let mut maps = self.inner.maps.lock();
            if maps.by_id.contains_key(&id) {
                tracing::error!(%id, "asset unit id already registered; refusing to overwrite");
                return false;
            }
            maps.by_id.insert(id, unit.clone());
            if !name.is_empty() && maps.by_name.insert(name.clone(), unit.clone()).is_some() {
                tracing::debug!(name = %name, "asset unit name shadows a previously registered unit");
            }
        }
        let inner: Arc<dyn UnitOwner> = self.inner.clone();
        let owner: Weak<dyn UnitOwner> = Arc::downgrade(&inner);
        core.attach_owner(owner, self.inner.config.scheduler.clone());
        self.inner.push_event(UnitEvent::Added { unit });
        true
    }

    /// Unregister a unit, removing it from both indices.
    ///
    /// A `Removing` event carrying the unit is buffered so consumers can
    /// still query it after the indices let go. Returns the unit, or `None`
    /// if the id was not registered.
    pub fn unregister_unit(&self, id: UnitId) -> Option<Arc<dyn AssetUnit>> {
        let unit = {
            let mut maps = self.inner.maps.lock();
            let unit = maps.by_id.remove(&id)?;
            maps.drop_name_entry(&unit);
            unit
        };
        unit.core().detach_owner();
        self.inner.push_event(UnitEvent::Removing { unit: unit.clone() });
        Some(unit)
    }

    /// Look up a unit by id.
    pub fn get(&self, id: UnitId) -> Option<Arc<dyn AssetUnit>> {
        self.inner.maps.lock().by_id.get(&id).cloned()
    }

    /// Look up a unit by name.
    pub fn get_by_name(&self, name: impl AsRef<str>) -> Option<Arc<dyn AssetUnit>> {
        self.inner
            .maps
            .lock()
            .by_name
            .get(&HashedString::new(name))
            .cloned()
    }

    /// Look up a unit by id and downcast it to a concrete type.
    pub fn get_as<T: AssetUnit>(&self, id: UnitId) -> Option<Arc<T>> {
        self.get(id).and_then(|unit| unit.as_any().downcast().ok())
    }

    /// Check whether an id is registered.
    pub fn contains(&self, id: UnitId) -> bool {
        self.inner.maps.lock().by_id.contains_key(&id)
    }

    /// Number of registered units.
    pub fn len(&self) -> usize {
        self.inner.maps.lock().by_id.len()
    }

    /// Check if no units are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.maps.lock().by_id.is_empty()
    }

    /// Construct a unit from a persisted record, dispatching on the
    /// record's name as the kind tag.
    ///
    /// Unknown kinds are reported and skipped by callers: data recorded by
    /// a newer engine version must not abort its siblings.
    pub fn create_unit(
        &self,
        source: &Arc<AssetSource>,
        record: &DataRecord,
    ) -> AssetResult<Arc<dyn AssetUnit>> {
        let kind = record.name();
        let processor = self.inner.processors.lock().get(kind).cloned();
        let Some(processor) = processor else {
            tracing::error!(
                kind,
                source = source.file_name(),
                "no asset unit processor registered for kind"
            );
            return Err(AssetError::UnknownKind {
                kind: kind.to_string(),
            });
        };
        processor(source, record).ok_or_else(|| AssetError::ProcessorFailed {
            kind: kind.to_string(),
        })
    }

    /// Hydrate every unit described by a source's metadata record.
    ///
    /// Walks the children of the record's `assetUnits` block, constructing,
    /// attaching, and registering one unit per child. A record that fails
    /// to construct is skipped without aborting its siblings. Returns the
    /// number of units registered.
    pub fn create_units_for_source(
        &self,
        source: &Arc<AssetSource>,
        meta: &DataRecord,
    ) -> usize {
        let Some(units) = meta.child(ASSET_UNITS_KEY) else {
            return 0;
        };
        let mut registered = 0;
        for record in units.children() {
            let unit = match self.create_unit(source, record) {
                Ok(unit) => unit,
                Err(err) => {
                    tracing::warn!(
                        source = source.file_name(),
                        error = %err,
                        "skipping asset unit record"
                    );
                    continue;
                }
            };
            source.add_unit(unit.clone());
            if self.register_unit(unit) {
                registered += 1;
            }
        }
        registered
    }

    /// Take all buffered registry events.
    pub fn drain_events(&self) -> Vec<UnitEvent> {
        self.inner.events.lock().drain_all()
    }

    /// Number of buffered registry events.
    pub fn pending_events(&self) -> usize {
        self.inner.events.lock().len()
    }
}

impl Default for AssetUnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}
