//! Shader asset units.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{AssetError, AssetResult};
use crate::record::DataRecord;
use crate::source::AssetSource;
use crate::unit::{AssetUnit, UnitCore};

/// Kind tag for shader unit records.
pub const SHADER_KIND: &str = "shader";

/// A shader payload: the UTF-8 program text ready for compilation by the
/// render backend.
#[derive(Debug, Clone)]
pub struct Shader {
    /// Label used in backend diagnostics.
    pub label: String,
    /// The shader program text.
    pub source_text: String,
}

/// An asset unit wrapping one [`Shader`].
pub struct ShaderUnit {
    core: UnitCore,
    shader: Mutex<Option<Arc<Shader>>>,
}

impl ShaderUnit {
    /// Construct a unit from its persisted record.
    pub fn from_record(source: &Arc<AssetSource>, record: &DataRecord) -> Arc<Self> {
        Arc::new(Self {
            core: UnitCore::new(source, record.clone()),
            shader: Mutex::new(None),
        })
    }

    /// The payload, if resident.
    pub fn shader(&self) -> Option<Arc<Shader>> {
        self.shader.lock().clone()
    }
}

impl AssetUnit for ShaderUnit {
    fn kind(&self) -> &'static str {
        SHADER_KIND
    }

    fn core(&self) -> &UnitCore {
        &self.core
    }

    fn load_now_impl(&self) -> AssetResult<()> {
        let source = self.core.source().ok_or_else(|| AssetError::SourceGone {
            unit: self.core.name().to_string(),
        })?;
        let bytes = source.read_bytes()?;
        let source_text = String::from_utf8(bytes).map_err(|e| AssetError::Decode {
            path: source.display_path(),
            message: format!("shader source is not UTF-8: {}", e),
        })?;
        *self.shader.lock() = Some(Arc::new(Shader {
            label: self.core.name().to_string(),
            source_text,
        }));
        Ok(())
    }

    fn unload_now_impl(&self) -> AssetResult<()> {
        *self.shader.lock() = None;
        Ok(())
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::AssetUnitExt;

    #[test]
    fn test_load_creates_payload() {
        let source = AssetSource::bytes("water.mzshader", b"void main() {}".to_vec());
        let unit = ShaderUnit::from_record(&source, &DataRecord::new(SHADER_KIND));

        unit.load_now();
        assert!(unit.loading_state().is_loaded());
        let shader = unit.shader().unwrap();
        assert_eq!(shader.source_text, "void main() {}");
        assert_eq!(shader.label, "water.mzshader");

        unit.unload_now();
        assert!(unit.loading_state().is_unloaded());
        assert!(unit.shader().is_none());
    }

    #[test]
    fn test_dead_source_fails_gracefully() {
        let source = AssetSource::bytes("gone.mzshader", b"x".to_vec());
        let unit = ShaderUnit::from_record(&source, &DataRecord::new(SHADER_KIND));
        drop(source);

        unit.load_now();
        assert!(unit.loading_state().is_failed());
        assert!(unit.shader().is_none());
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let source = AssetSource::bytes("bad.mzshader", vec![0xff, 0xfe, 0x00]);
        let unit = ShaderUnit::from_record(&source, &DataRecord::new(SHADER_KIND));

        unit.load_now();
        assert!(unit.loading_state().is_failed());
    }
}
