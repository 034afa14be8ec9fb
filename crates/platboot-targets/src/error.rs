//! Error types for platform and media resolution.

use std::path::PathBuf;

/// Errors that can occur while resolving pipeline configuration inputs.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// Platform name not recognized.
    #[error("unsupported platform: {name}")]
    UnknownPlatform {
        /// The name that failed to resolve.
        name: String,
    },

    /// Build target name not recognized.
    #[error("unsupported build target: {name} (expected DEBUG or RELEASE)")]
    UnknownProfile {
        /// The name that failed to resolve.
        name: String,
    },

    /// Boot media file extension not recognized.
    #[error("unknown boot media file type: {}", path.display())]
    UnsupportedMedia {
        /// The media path whose extension is not supported.
        path: PathBuf,
    },
}

/// Result type for target resolution.
pub type Result<T> = std::result::Result<T, TargetError>;
