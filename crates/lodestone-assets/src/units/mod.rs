//! Built-in asset unit kinds.
//!
//! One module per kind tag the engine persists: `shader`, `renderMesh`,
//! `systemCursor`, `scriptableObject`. Each kind owns exactly one payload
//! handle, created lazily on first load from the owning source's bytes
//! and/or the unit's config record, and cleared on unload.

mod cursor;
mod mesh;
mod scriptable;
mod shader;

pub use cursor::{
    HOTSPOT_X_KEY, HOTSPOT_Y_KEY, SYSTEM_CURSOR_KIND, SystemCursor, SystemCursorUnit,
};
pub use mesh::{RENDER_MESH_KIND, RenderMesh, RenderMeshUnit};
pub use scriptable::{
    CLASS_KEY, PROPERTIES_KEY, SCRIPTABLE_OBJECT_KIND, ScriptableObject, ScriptableObjectUnit,
};
pub use shader::{SHADER_KIND, Shader, ShaderUnit};

use std::sync::Arc;

use crate::registry::AssetUnitRegistry;
use crate::unit::AssetUnit;

/// Register a processor for each built-in kind.
///
/// In the engine each subsystem registers its own kind at initialization;
/// hosts that want the full built-in set call this once instead.
pub fn register_builtin_processors(registry: &AssetUnitRegistry) {
    registry.register_processor(SHADER_KIND, |source, record| {
        Some(ShaderUnit::from_record(source, record) as Arc<dyn AssetUnit>)
    });
    registry.register_processor(RENDER_MESH_KIND, |source, record| {
        Some(RenderMeshUnit::from_record(source, record) as Arc<dyn AssetUnit>)
    });
    registry.register_processor(SYSTEM_CURSOR_KIND, |source, record| {
        Some(SystemCursorUnit::from_record(source, record) as Arc<dyn AssetUnit>)
    });
    registry.register_processor(SCRIPTABLE_OBJECT_KIND, |source, record| {
        Some(ScriptableObjectUnit::from_record(source, record) as Arc<dyn AssetUnit>)
    });
}
