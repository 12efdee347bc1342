use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::format::UnsetDescription;

pub const CONFIG_FILE_NAME: &str = "tfvar.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tfvars,
    Env,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TfvarConfig {
    pub header: Option<String>,
    #[serde(rename = "includeDescriptions")]
    pub include_descriptions: Option<bool>,
    #[serde(rename = "unsetDescriptions")]
    pub unset_descriptions: Option<UnsetDescription>,
    pub format: Option<OutputFormat>,
    #[serde(rename = "autoAssign")]
    pub auto_assign: Option<bool>,
    #[serde(rename = "ignoreDefault")]
    pub ignore_default: Option<bool>,
    #[serde(rename = "varFiles")]
    pub var_files: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TfvarConfig,
    pub path: PathBuf,
    pub dir: PathBuf,
}

impl LoadedConfig {
    /// `varFiles` entries, resolved against the config file's directory.
    pub fn var_files(&self) -> Vec<PathBuf> {
        self.config
            .var_files
            .iter()
            .map(|file| self.dir.join(file))
            .collect()
    }
}

/// Loads `tfvar.json` from `target`, which is either the file itself or a
/// directory containing it. A missing file is not an error.
pub fn load_config(target: &Path) -> Result<Option<LoadedConfig>> {
    let resolved = if target.is_absolute() {
        target.to_path_buf()
    } else {
        std::env::current_dir()?.join(target)
    };

    let (file_path, dir) = if resolved.is_dir() {
        (resolved.join(CONFIG_FILE_NAME), resolved)
    } else {
        let dir = resolved
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| resolved.clone());
        (resolved, dir)
    };

    if !file_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&file_path)
        .with_context(|| format!("reading config {}", file_path.display()))?;

    let config: TfvarConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config {}", file_path.display()))?;

    Ok(Some(LoadedConfig {
        config,
        path: file_path,
        dir,
    }))
}
