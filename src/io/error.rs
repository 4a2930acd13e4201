//! Error types for mosaic generation

use std::fmt;
use std::path::PathBuf;

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// A candidate tile could not be decoded
    ///
    /// Absorbed inside tile ingestion; the file is treated as producing no tile.
    TileDecode {
        /// Path to the tile file
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// No tiles survived discovery, decoding and orientation filtering
    EmptyTileSet {
        /// Tile source pattern that was scanned
        source_pattern: String,
        /// Number of candidate files discovered before decoding
        discovered: usize,
    },

    /// Failed to load the target photo
    TargetDecode {
        /// Path to the target image
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Assignment refers to a tile the collection does not hold
    InvalidTileIndex {
        /// The invalid tile id
        index: usize,
        /// Number of tiles in the collection
        max_tiles: usize,
    },

    /// The tile loading worker pool could not be started
    WorkerPool {
        /// Description of the failure
        reason: String,
    },

    /// Failed to save the composed mosaic to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Settings file could not be parsed or written
    Settings {
        /// Path to the settings file
        path: PathBuf,
        /// Description of the failure
        reason: String,
    },

    /// Requested settings profile does not exist
    ProfileNotFound {
        /// Name of the missing profile
        profile: String,
    },
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TileDecode { path, source } => {
                write!(f, "Failed to decode tile '{}': {source}", path.display())
            }
            Self::EmptyTileSet {
                source_pattern,
                discovered,
            } => {
                write!(
                    f,
                    "No usable tiles in '{source_pattern}' ({discovered} candidate files discovered)"
                )
            }
            Self::TargetDecode { path, source } => {
                write!(
                    f,
                    "Failed to load target image '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidTileIndex { index, max_tiles } => {
                write!(f, "Tile id {index} is out of bounds ({max_tiles} tiles)")
            }
            Self::WorkerPool { reason } => {
                write!(f, "Failed to start tile loading workers: {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export mosaic to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Settings { path, reason } => {
                write!(f, "Settings file '{}': {reason}", path.display())
            }
            Self::ProfileNotFound { profile } => {
                write!(f, "No saved profile named '{profile}'")
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TileDecode { source, .. }
            | Self::TargetDecode { source, .. }
            | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

impl MosaicError {
    /// Whether the error aborts a whole run rather than a single tile
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::TileDecode { .. })
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
