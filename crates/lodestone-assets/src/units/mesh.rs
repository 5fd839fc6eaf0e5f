//! Render mesh asset units.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{AssetError, AssetResult};
use crate::record::DataRecord;
use crate::source::AssetSource;
use crate::unit::{AssetUnit, UnitCore};

/// Kind tag for render mesh unit records.
pub const RENDER_MESH_KIND: &str = "renderMesh";

/// A mesh payload: vertex positions decoded from the source.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderMesh {
    /// Vertex positions in model space.
    pub positions: Vec<[f32; 3]>,
}

impl RenderMesh {
    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// An asset unit wrapping one [`RenderMesh`].
pub struct RenderMeshUnit {
    core: UnitCore,
    mesh: Mutex<Option<Arc<RenderMesh>>>,
}

impl RenderMeshUnit {
    /// Construct a unit from its persisted record.
    pub fn from_record(source: &Arc<AssetSource>, record: &DataRecord) -> Arc<Self> {
        Arc::new(Self {
            core: UnitCore::new(source, record.clone()),
            mesh: Mutex::new(None),
        })
    }

    /// The payload, if resident.
    pub fn mesh(&self) -> Option<Arc<RenderMesh>> {
        self.mesh.lock().clone()
    }

    /// Decode `v x y z` vertex lines. Comments (`#`) and unknown
    /// directives are skipped; a malformed vertex line is an error.
    fn parse(path: &str, text: &str) -> AssetResult<RenderMesh> {
        let mut positions = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            let Some(rest) = line.strip_prefix("v ") else {
                continue;
            };
            let mut coords = [0f32; 3];
            let mut parts = rest.split_whitespace();
            for coord in &mut coords {
                *coord = parts
                    .next()
                    .and_then(|p| p.parse().ok())
                    .ok_or_else(|| AssetError::Decode {
                        path: path.to_string(),
                        message: format!("malformed vertex on line {}", line_no + 1),
                    })?;
            }
            positions.push(coords);
        }
        Ok(RenderMesh { positions })
    }
}

impl AssetUnit for RenderMeshUnit {
    fn kind(&self) -> &'static str {
        RENDER_MESH_KIND
    }

    fn core(&self) -> &UnitCore {
        &self.core
    }

    fn load_now_impl(&self) -> AssetResult<()> {
        let source = self.core.source().ok_or_else(|| AssetError::SourceGone {
            unit: self.core.name().to_string(),
        })?;
        let bytes = source.read_bytes()?;
        let path = source.display_path();
        let text = String::from_utf8(bytes).map_err(|e| AssetError::Decode {
            path: path.clone(),
            message: format!("mesh data is not UTF-8: {}", e),
        })?;
        let mesh = Self::parse(&path, &text)?;
        *self.mesh.lock() = Some(Arc::new(mesh));
        Ok(())
    }

    fn unload_now_impl(&self) -> AssetResult<()> {
        *self.mesh.lock() = None;
        Ok(())
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
