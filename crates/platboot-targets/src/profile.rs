//! Build profile model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// Firmware module build profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    /// Parse a build target name (case-insensitive).
    pub fn parse(name: &str) -> Result<Self> {
        if name.eq_ignore_ascii_case("debug") {
            Ok(BuildProfile::Debug)
        } else if name.eq_ignore_ascii_case("release") {
            Ok(BuildProfile::Release)
        } else {
            Err(TargetError::UnknownProfile {
                name: name.to_string(),
            })
        }
    }

    /// Canonical name as it appears in firmware build directory names.
    pub fn name(&self) -> &'static str {
        match self {
            BuildProfile::Debug => "DEBUG",
            BuildProfile::Release => "RELEASE",
        }
    }

    /// Cargo artifact directory under `target/<triple>/`.
    pub fn artifact_dir(&self) -> &'static str {
        match self {
            BuildProfile::Debug => "debug",
            BuildProfile::Release => "release",
        }
    }

    pub fn is_release(&self) -> bool {
        matches!(self, BuildProfile::Release)
    }
}

impl fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_names() {
        assert_eq!(BuildProfile::parse("DEBUG").unwrap(), BuildProfile::Debug);
        assert_eq!(BuildProfile::parse("debug").unwrap(), BuildProfile::Debug);
        assert_eq!(
            BuildProfile::parse("RELEASE").unwrap(),
            BuildProfile::Release
        );
        assert_eq!(
            BuildProfile::parse("Release").unwrap(),
            BuildProfile::Release
        );
    }

    #[test]
    fn parse_unknown_name() {
        let err = BuildProfile::parse("PROFILE").unwrap_err();
        assert!(matches!(err, TargetError::UnknownProfile { name } if name == "PROFILE"));
    }

    #[test]
    fn directory_names() {
        assert_eq!(BuildProfile::Debug.name(), "DEBUG");
        assert_eq!(BuildProfile::Debug.artifact_dir(), "debug");
        assert_eq!(BuildProfile::Release.name(), "RELEASE");
        assert_eq!(BuildProfile::Release.artifact_dir(), "release");
        assert!(BuildProfile::Release.is_release());
        assert!(!BuildProfile::Debug.is_release());
    }
}
