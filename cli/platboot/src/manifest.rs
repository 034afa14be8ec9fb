//! `platboot.toml` manifest parsing.
//!
//! The manifest is optional; it carries repo roots and default run settings
//! so day-to-day invocations don't need the full flag set. Flags beat
//! manifest entries; manifest entries beat built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The top-level `platboot.toml` structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatbootManifest {
    /// Repository root overrides.
    #[serde(default)]
    pub repos: Option<ReposConfig>,
    /// Default run settings.
    #[serde(default)]
    pub defaults: Option<DefaultsConfig>,
}

/// The `[repos]` section.
///
/// Relative paths are taken relative to the manifest's own directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReposConfig {
    /// Platform firmware repository root.
    #[serde(default)]
    pub firmware: Option<PathBuf>,
    /// Firmware module repository root.
    #[serde(default)]
    pub module: Option<PathBuf>,
    /// Patch tool repository root.
    #[serde(default)]
    pub patcher: Option<PathBuf>,
}

/// The `[defaults]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DefaultsConfig {
    /// Default platform name.
    #[serde(default)]
    pub platform: Option<String>,
    /// Default build target name.
    #[serde(default)]
    pub build_target: Option<String>,
    /// Default toolchain.
    #[serde(default)]
    pub toolchain: Option<String>,
}

impl PlatbootManifest {
    /// Search for `platboot.toml` from `start_dir` upward and load the
    /// first one found. Returns the manifest and the directory holding it.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join("platboot.toml");
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: PlatbootManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing platboot.toml")
    }

    pub fn firmware_repo(&self) -> Option<&Path> {
        self.repos.as_ref().and_then(|r| r.firmware.as_deref())
    }

    pub fn module_repo(&self) -> Option<&Path> {
        self.repos.as_ref().and_then(|r| r.module.as_deref())
    }

    pub fn patcher_repo(&self) -> Option<&Path> {
        self.repos.as_ref().and_then(|r| r.patcher.as_deref())
    }

    pub fn default_platform(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.platform.as_deref())
    }

    pub fn default_build_target(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.build_target.as_deref())
    }

    pub fn default_toolchain(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.toolchain.as_deref())
    }
}
