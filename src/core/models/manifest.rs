use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{FlexPluginsError, Result};

/// Name of the build-scripts package a plugin must depend on.
pub const SCRIPTS_PACKAGE: &str = "flex-plugin-scripts";

/// The subset of a plugin's `package.json` the CLI cares about.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: String,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageManifest {
    /// Read and parse `{dir}/package.json`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join("package.json");
        let content = std::fs::read_to_string(&path).map_err(|e| FlexPluginsError::ManifestError {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| FlexPluginsError::ManifestError {
            path,
            detail: e.to_string(),
        })
    }

    /// Declared requirement on a package, from either dependency table.
    pub fn dependency(&self, name: &str) -> Option<&str> {
        self.dependencies
            .get(name)
            .or_else(|| self.dev_dependencies.get(name))
            .map(String::as_str)
    }
}

/// One entry of the local plugins manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalPlugin {
    pub name: String,
    pub dir: PathBuf,
}

/// The local plugins manifest (`plugins.json`) listing plugins that can be
/// started from this machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginsConfig {
    #[serde(default)]
    pub plugins: Vec<LocalPlugin>,
}

impl PluginsConfig {
    /// Read the manifest at `path`. A missing file is an empty manifest.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| FlexPluginsError::ManifestError {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    pub fn find(&self, name: &str) -> Option<&LocalPlugin> {
        self.plugins.iter().find(|p| p.name == name)
    }
}

/// Whether `dir` holds a Flex plugin: a `package.json` that depends on the
/// build-scripts package.
pub fn is_plugin_folder(dir: &Path) -> bool {
    PackageManifest::load(dir)
        .map(|pkg| pkg.dependency(SCRIPTS_PACKAGE).is_some())
        .unwrap_or(false)
}
