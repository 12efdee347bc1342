use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Diagnostic;

#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct ConfigFiles {
    pub primary: Vec<PathBuf>,
    pub overrides: Vec<PathBuf>,
}

/// Lists the configuration files directly inside `dir`, sorted by name.
pub(super) fn config_files(dir: &Path) -> Result<ConfigFiles, Diagnostic> {
    if !dir.is_dir() {
        return Err(Diagnostic::new(
            dir,
            "Failed to read module directory: does not exist or is not a directory",
        ));
    }

    let mut files = ConfigFiles::default();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry
            .map_err(|err| Diagnostic::new(dir, format!("Failed to read module directory: {err}")))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if is_ignored(&name) {
            continue;
        }
        let Some(stem) = config_stem(&name) else {
            continue;
        };

        if stem == "override" || stem.ends_with("_override") {
            files.overrides.push(entry.into_path());
        } else {
            files.primary.push(entry.into_path());
        }
    }

    Ok(files)
}

pub(super) fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

fn config_stem(name: &str) -> Option<&str> {
    name.strip_suffix(".tf.json")
        .or_else(|| name.strip_suffix(".tf"))
}

// Hidden files and editor backup/lock files.
fn is_ignored(name: &str) -> bool {
    name.starts_with('.') || name.ends_with('~') || (name.starts_with('#') && name.ends_with('#'))
}
