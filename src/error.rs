//! Error type shared by loading and rendering.

use std::{error, fmt, io, path::PathBuf};

/// Error type for map loading and rendering.
#[derive(Debug)]
pub enum MapError {
    /// Reading a map or tileset file failed
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
    /// A file did not contain the expected JSON
    Json {
        /// File that failed to parse
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },
    /// Structurally unusable map data
    InvalidMap(String),
    /// An atlas image could not be loaded as a texture
    Texture {
        /// Image path handed to the texture loader
        path: String,
        /// Loader diagnostic
        message: String,
    },
    /// A layer name was requested that the map does not contain
    UnknownLayer(String),
    /// A tileset references an atlas missing from the registry
    UnknownAtlas(String),
    /// An animation has no frames or its durations sum to zero
    DegenerateAnimation {
        /// First gid of the owning tileset, if known
        tileset: Option<u32>,
        /// Local index of the animated tile, if known
        tile: Option<u32>,
    },
    /// Column derivation for an atlas produced zero columns
    InvalidAtlasGeometry {
        /// Atlas identifier
        atlas: String,
        /// Atlas pixel width
        width: u32,
        /// Tileset margin
        margin: u32,
        /// Tileset spacing
        spacing: u32,
        /// Tileset tile width
        tile_width: u32,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Io { path, source } => {
                write!(f, "I/O error reading {}: {}", path.display(), source)
            }
            MapError::Json { path, source } => {
                write!(f, "Failed to parse JSON in {}: {}", path.display(), source)
            }
            MapError::InvalidMap(msg) => write!(f, "Invalid map: {}", msg),
            MapError::Texture { path, message } => {
                write!(f, "Failed to load texture {}: {}", path, message)
            }
            MapError::UnknownLayer(name) => write!(f, "No layer named '{}' in map", name),
            MapError::UnknownAtlas(id) => write!(f, "No atlas loaded for image '{}'", id),
            MapError::DegenerateAnimation { tileset, tile } => match (tileset, tile) {
                (Some(ts), Some(tile)) => write!(
                    f,
                    "Animation of tile {} in tileset with first gid {} has zero total duration",
                    tile, ts
                ),
                _ => write!(f, "Animation has no frames or zero total duration"),
            },
            MapError::InvalidAtlasGeometry {
                atlas,
                width,
                margin,
                spacing,
                tile_width,
            } => write!(
                f,
                "Atlas '{}' ({}px wide, margin {}, spacing {}) holds no column of {}px tiles",
                atlas, width, margin, spacing, tile_width
            ),
        }
    }
}

impl error::Error for MapError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            MapError::Io { source, .. } => Some(source),
            MapError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}
