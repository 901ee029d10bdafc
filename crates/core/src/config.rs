//! Analysis settings.
//!
//! Every field has a default so a partial JSON file (or none at all) is valid.

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Also record plain (non-property) parameters as graph nodes.
    pub track_parameters: bool,
    /// Module specifiers whose namespace import aliases the UI framework runtime.
    pub framework_modules: Vec<String>,
    /// Alias name that marks a namespace import as the framework runtime.
    pub framework_namespace: String,
    /// `nodeSize` reported for declarations that fit on a single line.
    pub base_node_size: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            track_parameters: false,
            framework_modules: vec!["react".to_string(), "react/addons".to_string()],
            framework_namespace: "React".to_string(),
            base_node_size: 30,
        }
    }
}

impl GraphConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
            .map_err(|e| GraphError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn is_framework_module(&self, specifier: &str) -> bool {
        self.framework_modules.iter().any(|m| m == specifier)
    }

    /// Cosmetic size grows with the log of the line count.
    pub fn node_size(&self, line_count: usize) -> u32 {
        if line_count == 0 {
            return self.base_node_size;
        }
        let log2 = (line_count as f64).log2().ceil() as u32;
        25 + log2 * 5
    }
}
