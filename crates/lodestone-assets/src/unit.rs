//! Asset units - lazily loadable resources with a five-state lifecycle.
//!
//! An asset unit wraps one payload (a shader, a mesh, a cursor image, ...)
//! that is created on first load and cleared on unload. Concrete unit types
//! implement [`AssetUnit`] by embedding a [`UnitCore`] (identity, state,
//! config, source back-reference) and supplying the kind-specific
//! `load_now_impl`/`unload_now_impl` pair; the shared lifecycle logic lives
//! in [`AssetUnitExt`] so a deferred callback can capture a clone of the
//! unit's `Arc`.
//!
//! `load()`/`unload()` return immediately. When a [`FrameScheduler`] is
//! attached the transition itself runs a few ticks later; otherwise it runs
//! synchronously in place.

use std::any::Any;
use std::sync::{Arc, Weak};

use lodestone_core::HashedString;
use parking_lot::Mutex;

use crate::error::AssetResult;
use crate::id::UnitId;
use crate::record::{AUID_KEY, DataRecord, NAME_KEY};
use crate::schedule::FrameScheduler;
use crate::source::AssetSource;
use crate::state::LoadState;

/// Frames between a load request and the deferred load transition.
pub const LOAD_DELAY_FRAMES: u64 = 2;

/// Frames between an unload request and the deferred unload transition.
/// Shorter than the load delay: unloads are cheap and take precedence.
pub const UNLOAD_DELAY_FRAMES: u64 = 1;

/// Capability a registry hands to a unit at registration time so the unit
/// can announce id/name changes *before* committing them. The registry uses
/// the pre-commit window to move its index entries while both keys are
/// still observable.
pub(crate) trait UnitOwner: Send + Sync {
    fn id_changing(&self, old: Option<UnitId>, new: Option<UnitId>);
    fn name_changing(&self, id: Option<UnitId>, old: &HashedString, new: &HashedString);
}

struct Meta {
    id: Option<UnitId>,
    name: HashedString,
    state: LoadState,
}

/// The shared identity and lifecycle state embedded in every concrete unit.
pub struct UnitCore {
    meta: Mutex<Meta>,
    source: Weak<AssetSource>,
    config: DataRecord,
    owner: Mutex<Option<Weak<dyn UnitOwner>>>,
    scheduler: Mutex<Option<FrameScheduler>>,
}

impl UnitCore {
    /// Build a core from a unit's persisted record.
    ///
    /// The id is taken from the record's `auid` field (absent or zero means
    /// unassigned) and the name from its `name` field, falling back to the
    /// owning source's file name.
    pub fn new(source: &Arc<AssetSource>, config: DataRecord) -> Self {
        let id = config.get_u32(AUID_KEY).and_then(UnitId::new);
        let name = match config.get_str(NAME_KEY) {
            Some(name) => HashedString::new(name),
            None => HashedString::new(source.file_name()),
        };
        Self {
            meta: Mutex::new(Meta {
                id,
                name,
                state: LoadState::Unloaded,
            }),
            source: Arc::downgrade(source),
            config,
            owner: Mutex::new(None),
            scheduler: Mutex::new(None),
        }
    }

    /// The unit's registry id, if assigned.
    pub fn id(&self) -> Option<UnitId> {
        self.meta.lock().id
    }

    /// The unit's name. May be empty.
    pub fn name(&self) -> HashedString {
        self.meta.lock().name.clone()
    }

    /// The unit's current lifecycle state.
    pub fn loading_state(&self) -> LoadState {
        self.meta.lock().state
    }

    /// Change the unit's id.
    ///
    /// No-op when unchanged. Otherwise the owning registry (if any) is
    /// notified with both the old and the new id before the field is
    /// committed, so it can reindex atomically.
    pub fn set_id(&self, new: Option<UnitId>) {
        let old = self.meta.lock().id;
        if old == new {
            return;
        }
        if let Some(owner) = self.owner() {
            owner.id_changing(old, new);
        }
        self.meta.lock().id = new;
    }

    /// Change the unit's name. Symmetric contract to [`UnitCore::set_id`].
    pub fn set_name(&self, new: impl Into<HashedString>) {
        let new = new.into();
        let (old, id) = {
            let meta = self.meta.lock();
            (meta.name.clone(), meta.id)
        };
        if old == new {
            return;
        }
        if let Some(owner) = self.owner() {
            owner.name_changing(id, &old, &new);
        }
        self.meta.lock().name = new;
    }

    /// Upgrade the weak back-reference to the owning source.
    ///
    /// Returns `None` once the source has been destroyed; loads must treat
    /// that as an ordinary failure.
    pub fn source(&self) -> Option<Arc<AssetSource>> {
        self.source.upgrade()
    }

    /// The raw persisted configuration this unit was constructed from.
    pub fn config(&self) -> &DataRecord {
        &self.config
    }

    /// Serialize the unit's identity into `record`.
    ///
    /// Writes `auid`/`name` when assigned/non-empty and removes the keys
    /// otherwise, so a default-identity unit round-trips to a record
    /// without placeholder values.
    pub fn write_record(&self, record: &mut DataRecord) {
        let meta = self.meta.lock();
        match meta.id {
            Some(id) => record.set(AUID_KEY, id.get()),
            None => {
                record.remove(AUID_KEY);
            }
        }
        if meta.name.is_empty() {
            record.remove(NAME_KEY);
        } else {
            record.set(NAME_KEY, meta.name.as_str());
        }
    }

    pub(crate) fn attach_owner(
        &self,
        owner: Weak<dyn UnitOwner>,
        scheduler: Option<FrameScheduler>,
    ) {
        *self.owner.lock() = Some(owner);
        *self.scheduler.lock() = scheduler;
    }

    pub(crate) fn detach_owner(&self) {
        *self.owner.lock() = None;
        *self.scheduler.lock() = None;
    }

    fn owner(&self) -> Option<Arc<dyn UnitOwner>> {
        self.owner.lock().as_ref().and_then(Weak::upgrade)
    }

    fn scheduler(&self) -> Option<FrameScheduler> {
        self.scheduler.lock().clone()
    }

    fn set_state(&self, state: LoadState) {
        self.meta.lock().state = state;
    }
}

/// A polymorphic, lazily loadable asset unit.
///
/// Implementations embed a [`UnitCore`] and keep exactly one payload
/// handle, created in `load_now_impl` and cleared in `unload_now_impl`.
/// Whenever the state reads [`LoadState::Loaded`] the payload must be
/// present.
pub trait AssetUnit: Send + Sync + 'static {
    /// The kind tag this unit was registered under (e.g. `"shader"`).
    fn kind(&self) -> &'static str;

    /// Access the embedded core.
    fn core(&self) -> &UnitCore;

    /// Create the payload. Called with no lifecycle lock held.
    fn load_now_impl(&self) -> AssetResult<()>;

    /// Clear the payload. Called with no lifecycle lock held.
    fn unload_now_impl(&self) -> AssetResult<()>;

    /// Upcast for typed downcasting through registry lookups.
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Lifecycle operations over `Arc`-owned units.
///
/// Implemented for `Arc<U>` (including `Arc<dyn AssetUnit>`) so the
/// deferred transitions can capture the unit by clone.
pub trait AssetUnitExt {
    /// The unit's registry id, if assigned.
    fn id(&self) -> Option<UnitId>;

    /// The unit's name.
    fn name(&self) -> HashedString;

    /// The unit's current lifecycle state.
    fn loading_state(&self) -> LoadState;

    /// Request a load.
    ///
    /// No-op when already loaded or loading. Otherwise the state moves to
    /// [`LoadState::Loading`] and the transition is scheduled
    /// [`LOAD_DELAY_FRAMES`] ticks out, or runs synchronously when no
    /// scheduler is attached. A failed unit is retryable through here.
    fn load(&self);

    /// Perform the load transition immediately.
    ///
    /// No-op when already loaded. When an unload is in flight it wins: the
    /// state resets to [`LoadState::Unloaded`] and no load is attempted
    /// (the stale scheduled unload then no-ops on its own state guard).
    fn load_now(&self);

    /// Request an unload. No-op unless currently loaded.
    fn unload(&self);

    /// Perform the unload transition immediately.
    ///
    /// No-op unless the unit is loaded or an unload is in flight.
    fn unload_now(&self);
}

impl<U: AssetUnit + ?Sized> AssetUnitExt for Arc<U> {
    fn id(&self) -> Option<UnitId> {
        self.core().id()
    }

    fn name(&self) -> HashedString {
        self.core().name()
    }

    fn loading_state(&self) -> LoadState {
        self.core().loading_state()
    }

    fn load(&self) {
        let core = self.core();
        {
            let mut meta = core.meta.lock();
            if matches!(meta.state, LoadState::Loaded | LoadState::Loading) {
                return;
            }
            meta.state = LoadState::Loading;
        }
        match core.scheduler() {
            Some(scheduler) => {
                let unit = Arc::clone(self);
                scheduler.add_delayed_task(LOAD_DELAY_FRAMES, move || unit.load_now());
            }
            None => self.load_now(),
        }
    }

    fn load_now(&self) {
        let core = self.core();
        {
            let mut meta = core.meta.lock();
            match meta.state {
                LoadState::Loaded => return,
                LoadState::Unloading => {
                    // The in-flight unload wins; its scheduled task will
                    // no-op against this state.
                    meta.state = LoadState::Unloaded;
                    return;
                }
                _ => meta.state = LoadState::Loading,
            }
        }
        match self.load_now_impl() {
            Ok(()) => core.set_state(LoadState::Loaded),
            Err(err) => {
                tracing::warn!(
                    kind = self.kind(),
                    unit = %core.name(),
                    error = %err,
                    "asset unit load failed"
                );
                core.set_state(LoadState::Failed);
            }
        }
    }

    fn unload(&self) {
        let core = self.core();
        {
            let mut meta = core.meta.lock();
            if meta.state != LoadState::Loaded {
                return;
            }
            meta.state = LoadState::Unloading;
        }
        match core.scheduler() {
            Some(scheduler) => {
                let unit = Arc::clone(self);
                scheduler.add_delayed_task(UNLOAD_DELAY_FRAMES, move || unit.unload_now());
            }
            None => self.unload_now(),
        }
    }

    fn unload_now(&self) {
        let core = self.core();
        {
            let meta = core.meta.lock();
            if !matches!(meta.state, LoadState::Loaded | LoadState::Unloading) {
                return;
            }
        }
        if let Err(err) = self.unload_now_impl() {
            tracing::warn!(
                kind = self.kind(),
                unit = %core.name(),
                error = %err,
                "asset unit unload failed"
            );
        }
        core.set_state(LoadState::Unloaded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssetError;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct CountingUnit {
        core: UnitCore,
        loads: AtomicUsize,
        unloads: AtomicUsize,
        fail_next_load: AtomicBool,
    }

    impl CountingUnit {
        fn create(source: &Arc<AssetSource>, config: DataRecord) -> Arc<Self> {
            Arc::new(Self {
                core: UnitCore::new(source, config),
                loads: AtomicUsize::new(0),
                unloads: AtomicUsize::new(0),
                fail_next_load: AtomicBool::new(false),
            })
        }
    }

    impl AssetUnit for CountingUnit {
        fn kind(&self) -> &'static str {
            "counting"
        }

        fn core(&self) -> &UnitCore {
            &self.core
        }

        fn load_now_impl(&self) -> AssetResult<()> {
            if self.fail_next_load.swap(false, Ordering::Relaxed) {
                return Err(AssetError::Decode {
                    path: "counting".to_string(),
                    message: "induced failure".to_string(),
                });
            }
            self.loads.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        fn unload_now_impl(&self) -> AssetResult<()> {
            self.unloads.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    fn test_source() -> Arc<AssetSource> {
        AssetSource::bytes("unit.bin", Vec::new())
    }

    #[test]
    fn test_name_defaults_to_source_file_name() {
        let source = test_source();
        let unit = CountingUnit::create(&source, DataRecord::new("counting"));
        assert_eq!(unit.name().as_str(), "unit.bin");
        assert_eq!(unit.id(), None);
    }

    #[test]
    fn test_identity_hydrated_from_record() {
        let source = test_source();
        let mut record = DataRecord::new("counting");
        record.set(AUID_KEY, 7u32);
        record.set(NAME_KEY, "cursorA");
        let unit = CountingUnit::create(&source, record);
        assert_eq!(unit.id().map(UnitId::get), Some(7));
        assert_eq!(unit.name().as_str(), "cursorA");
    }

    #[test]
    fn test_zero_auid_is_unassigned() {
        let source = test_source();
        let mut record = DataRecord::new("counting");
        record.set(AUID_KEY, 0u32);
        let unit = CountingUnit::create(&source, record);
        assert_eq!(unit.id(), None);
    }

    #[test]
    fn test_write_record_round_trip() {
        let source = test_source();
        let mut record = DataRecord::new("counting");
        record.set(AUID_KEY, 7u32);
        record.set(NAME_KEY, "cursorA");
        let unit = CountingUnit::create(&source, record);

        let mut out = DataRecord::new("counting");
        unit.core().write_record(&mut out);
        assert_eq!(out.get_u32(AUID_KEY), Some(7));
        assert_eq!(out.get_str(NAME_KEY), Some("cursorA"));

        let rehydrated = CountingUnit::create(&source, out);
        assert_eq!(rehydrated.id().map(UnitId::get), Some(7));
        assert_eq!(rehydrated.name().as_str(), "cursorA");
    }

    #[test]
    fn test_write_record_strips_default_identity() {
        let source = test_source();
        let unit = CountingUnit::create(&source, DataRecord::new("counting"));
        unit.core().set_name(HashedString::empty());

        // Stale keys from a previous serialization must be cleared.
        let mut out = DataRecord::new("counting");
        out.set(AUID_KEY, 99u32);
        out.set(NAME_KEY, "stale");
        unit.core().write_record(&mut out);
        assert!(!out.has(AUID_KEY));
        assert!(!out.has(NAME_KEY));
    }

    #[test]
    fn test_synchronous_load_without_scheduler() {
        let source = test_source();
        let unit = CountingUnit::create(&source, DataRecord::new("counting"));

        unit.load();
        assert!(unit.loading_state().is_loaded());
        assert_eq!(unit.loads.load(Ordering::Relaxed), 1);

        // Idempotent: no second impl call, no state change.
        unit.load();
        assert!(unit.loading_state().is_loaded());
        assert_eq!(unit.loads.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_failed_load_is_retryable() {
        let source = test_source();
        let unit = CountingUnit::create(&source, DataRecord::new("counting"));
        unit.fail_next_load.store(true, Ordering::Relaxed);

        unit.load();
        assert!(unit.loading_state().is_failed());

        unit.load();
        assert!(unit.loading_state().is_loaded());
        assert_eq!(unit.loads.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_unload_requires_loaded() {
        let source = test_source();
        let unit = CountingUnit::create(&source, DataRecord::new("counting"));

        unit.unload();
        assert!(unit.loading_state().is_unloaded());
        assert_eq!(unit.unloads.load(Ordering::Relaxed), 0);

        unit.load();
        unit.unload();
        assert!(unit.loading_state().is_unloaded());
        assert_eq!(unit.unloads.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_set_id_without_owner_commits() {
        let source = test_source();
        let unit = CountingUnit::create(&source, DataRecord::new("counting"));
        unit.core().set_id(UnitId::new(12));
        assert_eq!(unit.id().map(UnitId::get), Some(12));
    }
}
