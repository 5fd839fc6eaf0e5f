//! System cursor asset units.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{AssetError, AssetResult};
use crate::record::DataRecord;
use crate::source::AssetSource;
use crate::unit::{AssetUnit, UnitCore};

/// Kind tag for system cursor unit records.
pub const SYSTEM_CURSOR_KIND: &str = "systemCursor";

/// Config field: cursor hotspot X, in pixels from the image's left edge.
pub const HOTSPOT_X_KEY: &str = "hotspotX";

/// Config field: cursor hotspot Y, in pixels from the image's top edge.
pub const HOTSPOT_Y_KEY: &str = "hotspotY";

/// A cursor payload: raw image bytes plus the click hotspot.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemCursor {
    /// Encoded cursor image bytes, as stored in the source.
    pub image: Vec<u8>,
    /// Click hotspot (x, y) in pixels. Defaults to the top-left corner.
    pub hotspot: (u32, u32),
}

/// An asset unit wrapping one [`SystemCursor`].
pub struct SystemCursorUnit {
    core: UnitCore,
    cursor: Mutex<Option<Arc<SystemCursor>>>,
}

impl SystemCursorUnit {
    /// Construct a unit from its persisted record.
    pub fn from_record(source: &Arc<AssetSource>, record: &DataRecord) -> Arc<Self> {
        Arc::new(Self {
            core: UnitCore::new(source, record.clone()),
            cursor: Mutex::new(None),
        })
    }

    /// The payload, if resident.
    pub fn cursor(&self) -> Option<Arc<SystemCursor>> {
        self.cursor.lock().clone()
    }
}

impl AssetUnit for SystemCursorUnit {
    fn kind(&self) -> &'static str {
        SYSTEM_CURSOR_KIND
    }

    fn core(&self) -> &UnitCore {
        &self.core
    }

    fn load_now_impl(&self) -> AssetResult<()> {
        let source = self.core.source().ok_or_else(|| AssetError::SourceGone {
            unit: self.core.name().to_string(),
        })?;
        let image = source.read_bytes()?;
        if image.is_empty() {
            return Err(AssetError::Decode {
                path: source.display_path(),
                message: "cursor image is empty".to_string(),
            });
        }
        let config = self.core.config();
        let hotspot = (
            config.get_u32(HOTSPOT_X_KEY).unwrap_or(0),
            config.get_u32(HOTSPOT_Y_KEY).unwrap_or(0),
        );
        *self.cursor.lock() = Some(Arc::new(SystemCursor { image, hotspot }));
        Ok(())
    }

    fn unload_now_impl(&self) -> AssetResult<()> {
        *self.cursor.lock() = None;
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
    fn test_hotspot_from_config() {
        let source = AssetSource::bytes("point.mzsyscur", vec![1u8, 2, 3, 4]);
        let mut record = DataRecord::new(SYSTEM_CURSOR_KIND);
        record.set(HOTSPOT_X_KEY, 4u32);
        record.set(HOTSPOT_Y_KEY, 9u32);
        let unit = SystemCursorUnit::from_record(&source, &record);

        unit.load_now();
        let cursor = unit.cursor().unwrap();
        assert_eq!(cursor.hotspot, (4, 9));
        assert_eq!(cursor.image, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_hotspot_defaults_to_origin() {
        let source = AssetSource::bytes("arrow.mzsyscur", vec![1u8]);
        let unit = SystemCursorUnit::from_record(&source, &DataRecord::new(SYSTEM_CURSOR_KIND));

        unit.load_now();
        assert_eq!(unit.cursor().unwrap().hotspot, (0, 0));
    }

    #[test]
    fn test_empty_image_fails() {
        let source = AssetSource::bytes("empty.mzsyscur", Vec::new());
        let unit = SystemCursorUnit::from_record(&source, &DataRecord::new(SYSTEM_CURSOR_KIND));

        unit.load_now();
        assert!(unit.loading_state().is_failed());
    }
}
