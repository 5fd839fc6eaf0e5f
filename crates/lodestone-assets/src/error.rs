//! Error types for the asset unit system.

use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while constructing or loading asset units.
#[derive(Debug)]
pub enum AssetError {
    /// The backing content for a source was not found.
    NotFound {
        /// The path or identifier of the content.
        path: String,
    },

    /// Failed to read bytes from a source.
    Io {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The unit's owning source has been destroyed.
    SourceGone {
        /// The name of the unit whose source is gone.
        unit: String,
    },

    /// The source bytes could not be decoded into the unit's payload.
    Decode {
        /// The source being decoded.
        path: String,
        /// Description of the error.
        message: String,
    },

    /// No processor is registered for a record's kind tag.
    UnknownKind {
        /// The kind tag.
        kind: String,
    },

    /// A processor declined to construct a unit from a record.
    ProcessorFailed {
        /// The kind tag the processor was registered for.
        kind: String,
    },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotFound { path } => {
                write!(f, "Asset content not found: {}", path)
            }
            AssetError::Io { path, source } => {
                write!(f, "IO error reading '{}': {}", path.display(), source)
            }
            AssetError::SourceGone { unit } => {
                write!(f, "Asset source for unit '{}' no longer exists", unit)
            }
            AssetError::Decode { path, message } => {
                write!(f, "Failed to decode '{}': {}", path, message)
            }
            AssetError::UnknownKind { kind } => {
                write!(f, "No asset unit processor registered for kind: {}", kind)
            }
            AssetError::ProcessorFailed { kind } => {
                write!(f, "Asset unit processor for kind '{}' returned no unit", kind)
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias for asset unit operations.
pub type AssetResult<T> = Result<T, AssetError>;
