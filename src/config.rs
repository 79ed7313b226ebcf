//! Report configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Where figures are expected to live and how they are labelled.
///
/// Stored as a JSON object on disk; every key is optional:
/// ```json
/// {
///   "reports_dir": "reports",
///   "images_dir": "docs/images",
///   "label_prefix": "fig:"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub reports_dir: String,
    pub images_dir: String,
    pub label_prefix: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            reports_dir: "reports".to_string(),
            images_dir: "docs/images".to_string(),
            label_prefix: "fig:".to_string(),
        }
    }
}

impl ReportConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Path of an image as referenced from the report document.
    pub fn image_path(&self, file_name: &str) -> String {
        format!("{}/{}/{}", self.reports_dir, self.images_dir, file_name)
    }
}
