//! Error types for the editing engine.
//!
//! Malformed path data and empty gestures are not errors; they degrade to
//! no-ops. Only failures of the external drawing surface and bad configuration
//! surface here.

use thiserror::Error;

/// A call into the drawing surface failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("exportPaths failed: {0}")]
    Export(String),

    #[error("loadPaths failed: {0}")]
    Load(String),

    #[error("clearCanvas failed: {0}")]
    Clear(String),

    /// The surface answered with something that is not a path list.
    #[error("could not decode exported paths: {0}")]
    Decode(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid editor config JSON: {0}")]
    Parse(String),

    #[error("invalid editor config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}
