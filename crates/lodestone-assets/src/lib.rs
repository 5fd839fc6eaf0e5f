//! Asset unit lifecycle management.
//!
//! An *asset unit* is a named, identified, independently loadable resource
//! owned by an asset source. This crate tracks every live unit in an
//! [`AssetUnitRegistry`] indexed by id and by name, coordinates the
//! five-state load/unload machine (synchronous or deferred through a
//! [`FrameScheduler`]), and hydrates units from persisted [`DataRecord`]
//! metadata through a kind-tag processor table.
//!
//! # Example
//!
//! ```
//! use lodestone_assets::prelude::*;
//! use lodestone_assets::units;
//!
//! let scheduler = FrameScheduler::new();
//! let registry = AssetUnitRegistry::with_config(RegistryConfig {
//!     auto_generate_ids: true,
//!     scheduler: Some(scheduler.clone()),
//! });
//! units::register_builtin_processors(&registry);
//!
//! // A source plus the metadata record describing its units.
//! let source = AssetSource::bytes("glow.mzshader", b"void main() {}".to_vec());
//! let mut meta = DataRecord::new("meta");
//! meta.ensure_child(ASSET_UNITS_KEY)
//!     .add_child(DataRecord::new("shader"));
//! registry.create_units_for_source(&source, &meta);
//!
//! let unit = registry.get_by_name("glow.mzshader").unwrap();
//! unit.load();
//! assert!(unit.loading_state().is_loading());
//!
//! // The transition lands a couple of frames later.
//! for _ in 0..3 {
//!     scheduler.tick();
//! }
//! assert!(unit.loading_state().is_loaded());
//! ```

pub mod error;
pub mod event;
pub mod id;
pub mod processor;
pub mod record;
pub mod registry;
pub mod schedule;
pub mod source;
pub mod state;
pub mod unit;
pub mod units;

pub use error::{AssetError, AssetResult};
pub use event::{UnitEvent, UnitEventBuffer};
pub use id::UnitId;
pub use lodestone_core::HashedString;
pub use processor::{ProcessorRegistry, UnitProcessor};
pub use record::{ASSET_UNITS_KEY, AUID_KEY, DataRecord, NAME_KEY, Value};
pub use registry::{AssetUnitRegistry, RegistryConfig};
pub use schedule::FrameScheduler;
pub use source::{AssetSource, SourceData};
pub use state::LoadState;
pub use unit::{AssetUnit, AssetUnitExt, LOAD_DELAY_FRAMES, UNLOAD_DELAY_FRAMES, UnitCore};

/// The most commonly used types, in one import.
pub mod prelude {
    pub use crate::error::{AssetError, AssetResult};
    pub use crate::event::UnitEvent;
    pub use crate::id::UnitId;
    pub use crate::record::{ASSET_UNITS_KEY, DataRecord};
    pub use crate::registry::{AssetUnitRegistry, RegistryConfig};
    pub use crate::schedule::FrameScheduler;
    pub use crate::source::AssetSource;
    pub use crate::state::LoadState;
    pub use crate::unit::{AssetUnit, AssetUnitExt, UnitCore};
    pub use lodestone_core::HashedString;
}
