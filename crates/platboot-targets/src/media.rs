//! Boot media container format recognition.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// Container format of a boot media image, inferred from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaFormat {
    /// Raw disk image (`.vhd`).
    Raw,
    /// QCOW2 disk image (`.qcow2`).
    Qcow2,
    /// Optical disc image (`.iso`).
    Iso,
}

impl MediaFormat {
    /// Infer the format from a media path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("vhd") => Ok(MediaFormat::Raw),
            Some("qcow2") => Ok(MediaFormat::Qcow2),
            Some("iso") => Ok(MediaFormat::Iso),
            _ => Err(TargetError::UnsupportedMedia {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Format name the emulator expects in `-drive format=`.
    pub fn drive_format(&self) -> &'static str {
        match self {
            MediaFormat::Raw => "raw",
            MediaFormat::Qcow2 => "qcow2",
            MediaFormat::Iso => "iso",
        }
    }

    /// Whether the media attaches as an optical disc rather than a disk.
    pub fn is_optical(&self) -> bool {
        matches!(self, MediaFormat::Iso)
    }
}
