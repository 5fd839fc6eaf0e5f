//! Asset sources - the file-like owners of asset units.
//!
//! A source is a handle to on-disk or in-memory content plus the list of
//! units hydrated from its metadata. Ownership flows one way: the source
//! owns its units (1 source : N units); each unit holds only a weak
//! back-reference, so a destroyed source leaves its surviving units
//! failing loads gracefully instead of dangling.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{AssetError, AssetResult};
use crate::registry::AssetUnitRegistry;
use crate::unit::{AssetUnit, AssetUnitExt};

/// Where a source's raw bytes come from.
#[derive(Debug, Clone)]
pub enum SourceData {
    /// Content read from a file on disk.
    Disk {
        /// The backing file path.
        path: PathBuf,
    },

    /// Content held in memory (embedded or test data).
    Bytes {
        /// The raw bytes.
        data: Arc<[u8]>,
    },
}

/// A handle to content that owns zero or more asset units.
pub struct AssetSource {
    file_name: String,
    data: SourceData,
    units: Mutex<Vec<Arc<dyn AssetUnit>>>,
}

impl AssetSource {
    /// Create a disk-backed source. The file name (used as the default
    /// unit name) is derived from the path.
    pub fn disk(path: impl Into<PathBuf>) -> Arc<Self> {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Arc::new(Self {
            file_name,
            data: SourceData::Disk { path },
            units: Mutex::new(Vec::new()),
        })
    }

    /// Create an in-memory source with the given file name.
    pub fn bytes(file_name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Arc<Self> {
        Arc::new(Self {
            file_name: file_name.into(),
            data: SourceData::Bytes { data: data.into() },
            units: Mutex::new(Vec::new()),
        })
    }

    /// The source's file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// A display string for diagnostics.
    pub fn display_path(&self) -> String {
        match &self.data {
            SourceData::Disk { path } => path.display().to_string(),
            SourceData::Bytes { .. } => format!("bytes://{}", self.file_name),
        }
    }

    /// Read the source's raw bytes.
    pub fn read_bytes(&self) -> AssetResult<Vec<u8>> {
        match &self.data {
            SourceData::Disk { path } => std::fs::read(path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AssetError::NotFound {
                        path: path.display().to_string(),
                    }
                } else {
                    AssetError::Io {
                        path: path.clone(),
                        source: e,
                    }
                }
            }),
            SourceData::Bytes { data } => Ok(data.to_vec()),
        }
    }

    /// Attach a unit to this source.
    pub fn add_unit(&self, unit: Arc<dyn AssetUnit>) {
        self.units.lock().push(unit);
    }

    /// Snapshot of the units owned by this source.
    pub fn units(&self) -> Vec<Arc<dyn AssetUnit>> {
        self.units.lock().clone()
    }

    /// Number of units owned by this source.
    pub fn unit_count(&self) -> usize {
        self.units.lock().len()
    }

    /// Find the first owned unit of a concrete type.
    pub fn find_unit<T: AssetUnit>(&self) -> Option<Arc<T>> {
        self.units
            .lock()
            .iter()
            .find_map(|unit| unit.clone().as_any().downcast::<T>().ok())
    }

    /// Detach every owned unit: force-unload each (`unload_now`) and
    /// unregister it from `registry`. Called when the source is removed.
    pub fn remove_units(&self, registry: &AssetUnitRegistry) {
        let units = std::mem::take(&mut *self.units.lock());
        for unit in units {
            unit.unload_now();
            if let Some(id) = unit.id() {
                registry.unregister_unit(id);
            }
        }
    }
}
