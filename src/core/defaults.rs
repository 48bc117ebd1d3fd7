use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::layout::{
    HeaderPolicy, Rules, Separator, SourceLayout, DEFAULT_EXCLUDED_HEADERS, DEFAULT_HEADER_DIR,
};
use crate::utils::io;

pub const CONFIG_FILE_NAME: &str = "relayout.json";

/// Root configuration structure for relayout.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayoutConfig {
    /// Project files to migrate, in order, relative to the working directory.
    #[serde(default = "default_project_files")]
    pub project_files: Vec<String>,

    #[serde(default = "default_separator")]
    pub separator: String,

    #[serde(default = "default_header_dir")]
    pub header_dir: String,

    #[serde(default = "default_excluded_headers")]
    pub excluded_headers: Vec<String>,

    /// Extra or overriding filename→directory entries for compiled sources.
    #[serde(default)]
    pub sources: BTreeMap<String, String>,
}

impl Default for RelayoutConfig {
    fn default() -> Self {
        Self {
            project_files: default_project_files(),
            separator: default_separator(),
            header_dir: default_header_dir(),
            excluded_headers: default_excluded_headers(),
            sources: BTreeMap::new(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_project_files() -> Vec<String> {
    vec![
        "cryptlib.vcxproj".to_string(),
        "cryptest.vcxproj".to_string(),
        "cryptdll.vcxproj".to_string(),
        "dlltest.vcxproj".to_string(),
    ]
}

fn default_separator() -> String {
    "/".to_string()
}

fn default_header_dir() -> String {
    DEFAULT_HEADER_DIR.to_string()
}

fn default_excluded_headers() -> Vec<String> {
    DEFAULT_EXCLUDED_HEADERS.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Loading
// =============================================================================

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Load relayout.json from `root`, falling back to built-in defaults when absent.
pub fn load_config(root: &Path) -> Result<RelayoutConfig> {
    let path = config_path(root);

    let content = match io::read_file(&path, &format!("read {}", path.display())) {
        Ok(content) => content,
        Err(err) if err.is_not_found() => return Ok(RelayoutConfig::default()),
        Err(err) => return Err(err),
    };

    let config: RelayoutConfig = serde_json::from_str(&content).map_err(|e| {
        Error::config_invalid_json(path.display().to_string(), e)
            .with_hint(format!("Fix or remove {} to use the built-in layout", CONFIG_FILE_NAME))
    })?;

    Ok(config)
}

impl RelayoutConfig {
    /// Validate and build the rewrite rules for a run.
    pub fn rules(&self) -> Result<Rules> {
        let separator = Separator::from_str(&self.separator)?;
        let header_dir = normalize_dir("header_dir", &self.header_dir)?;

        let mut sources = SourceLayout::builtin();
        for (filename, dir) in &self.sources {
            if filename.is_empty() || filename.contains(['/', '\\']) {
                return Err(Error::config_invalid_value(
                    "sources",
                    Some(filename.clone()),
                    format!("Source key '{}' must be a bare filename", filename),
                ));
            }
            let dir = normalize_dir(&format!("sources.{}", filename), dir)?;
            if dir.split('/').count() > 2 {
                return Err(Error::config_invalid_value(
                    format!("sources.{}", filename),
                    Some(dir),
                    "Source directories have one or two segments",
                ));
            }
            sources.insert(filename.clone(), dir);
        }

        Ok(Rules {
            sources,
            headers: HeaderPolicy {
                header_dir,
                excluded: self.excluded_headers.clone(),
            },
            separator,
        })
    }
}

/// Accept either separator in config and store the `/` form without edge separators.
fn normalize_dir(key: &str, dir: &str) -> Result<String> {
    let normalized = dir.replace('\\', "/").trim_matches('/').to_string();
    if normalized.is_empty() || normalized.split('/').any(str::is_empty) {
        return Err(Error::config_invalid_value(
            key,
            Some(dir.to_string()),
            format!("Directory '{}' is empty or has an empty segment", dir),
        ));
    }
    Ok(normalized)
}
