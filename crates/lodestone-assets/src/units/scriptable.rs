//! Scriptable object asset units.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{AssetError, AssetResult};
use crate::record::DataRecord;
use crate::source::AssetSource;
use crate::unit::{AssetUnit, UnitCore};

/// Kind tag for scriptable object unit records.
pub const SCRIPTABLE_OBJECT_KIND: &str = "scriptableObject";

/// Config field: the scripting-side class the object instantiates.
pub const CLASS_KEY: &str = "class";

/// Config child record: free-form properties handed to the script.
pub const PROPERTIES_KEY: &str = "properties";

/// A scriptable object payload handed across the scripting bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptableObject {
    /// The scripting-side class name.
    pub class_name: String,
    /// Properties copied from the unit's config record.
    pub properties: DataRecord,
    /// The script body text from the source.
    pub body: String,
}

/// An asset unit wrapping one [`ScriptableObject`].
pub struct ScriptableObjectUnit {
    core: UnitCore,
    object: Mutex<Option<Arc<ScriptableObject>>>,
}

impl ScriptableObjectUnit {
    /// Construct a unit from its persisted record.
    pub fn from_record(source: &Arc<AssetSource>, record: &DataRecord) -> Arc<Self> {
        Arc::new(Self {
            core: UnitCore::new(source, record.clone()),
            object: Mutex::new(None),
        })
    }

    /// The payload, if resident.
    pub fn object(&self) -> Option<Arc<ScriptableObject>> {
        self.object.lock().clone()
    }
}

impl AssetUnit for ScriptableObjectUnit {
    fn kind(&self) -> &'static str {
        SCRIPTABLE_OBJECT_KIND
    }

    fn core(&self) -> &UnitCore {
        &self.core
    }

    fn load_now_impl(&self) -> AssetResult<()> {
        let source = self.core.source().ok_or_else(|| AssetError::SourceGone {
            unit: self.core.name().to_string(),
        })?;
        let bytes = source.read_bytes()?;
        let body = String::from_utf8(bytes).map_err(|e| AssetError::Decode {
            path: source.display_path(),
            message: format!("script body is not UTF-8: {}", e),
        })?;
        let config = self.core.config();
        let class_name = config
            .get_str(CLASS_KEY)
            .map(str::to_string)
            .unwrap_or_else(|| self.core.name().to_string());
        let properties = config
            .child(PROPERTIES_KEY)
            .cloned()
            .unwrap_or_else(|| DataRecord::new(PROPERTIES_KEY));
        *self.object.lock() = Some(Arc::new(ScriptableObject {
            class_name,
            properties,
            body,
        }));
        Ok(())
    }

    fn unload_now_impl(&self) -> AssetResult<()> {
        *self.object.lock() = None;
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
    fn test_class_and_properties_from_config() {
        let source = AssetSource::bytes("spawner.mzso", b"-- lua body".to_vec());
        let mut record = DataRecord::new(SCRIPTABLE_OBJECT_KIND);
        record.set(CLASS_KEY, "EnemySpawner");
        let props = record.add_child(DataRecord::new(PROPERTIES_KEY));
        props.set("rate", 3u32);
        let unit = ScriptableObjectUnit::from_record(&source, &record);

        unit.load_now();
        let object = unit.object().unwrap();
        assert_eq!(object.class_name, "EnemySpawner");
        assert_eq!(object.properties.get_u32("rate"), Some(3));
        assert_eq!(object.body, "-- lua body");
    }

    #[test]
    fn test_class_defaults_to_unit_name() {
        let source = AssetSource::bytes("Orb.mzso", b"".to_vec());
        let unit =
            ScriptableObjectUnit::from_record(&source, &DataRecord::new(SCRIPTABLE_OBJECT_KIND));

        unit.load_now();
        assert_eq!(unit.object().unwrap().class_name, "Orb.mzso");
    }
}
