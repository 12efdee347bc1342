use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{TfvarError, TfvarResult};
use crate::value::{evaluate, Literal};

use super::{Lookup, RawValue, SourcedValue, ValueSource};

const DEFAULT_VAR_FILES: &[&str] = &["terraform.tfvars", "terraform.tfvars.json"];

/// Reads a variable definitions file; `.json` files use the JSON syntax.
pub fn collect_from_file(path: &Path) -> TfvarResult<Lookup> {
    let content = fs::read_to_string(path).map_err(|source| TfvarError::ReadSource {
        path: path.to_path_buf(),
        source,
    })?;

    let values = if path.extension().is_some_and(|ext| ext == "json") {
        parse_json(path, &content)?
    } else {
        parse_native(path, &content)?
    };

    let mut lookup = Lookup::new();
    for (name, value) in values {
        lookup.insert(
            name,
            SourcedValue {
                raw: RawValue::Parsed(value),
                source: ValueSource::File(path.to_path_buf()),
            },
        );
    }
    debug!(path = %path.display(), values = lookup.len(), "read variable definitions");
    Ok(lookup)
}

/// Collects the definitions files Terraform loads without being asked:
/// `terraform.tfvars`, `terraform.tfvars.json`, then every `*.auto.tfvars`
/// and `*.auto.tfvars.json` in lexical order.
pub fn collect_auto(dir: &Path) -> TfvarResult<Lookup> {
    let mut lookup = Lookup::new();

    for name in DEFAULT_VAR_FILES {
        let path = dir.join(name);
        if path.is_file() {
            lookup.merge(collect_from_file(&path)?);
        }
    }

    for path in auto_var_files(dir)? {
        lookup.merge(collect_from_file(&path)?);
    }

    Ok(lookup)
}

fn auto_var_files(dir: &Path) -> TfvarResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| TfvarError::ReadSource {
            path: dir.to_path_buf(),
            source: io::Error::from(err),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(".auto.tfvars") || name.ends_with(".auto.tfvars.json") {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

fn parse_native(path: &Path, content: &str) -> TfvarResult<Vec<(String, Literal)>> {
    let body = hcl::parse(content).map_err(|err| invalid_source(path, err.to_string()))?;

    if let Some(block) = body.blocks().next() {
        return Err(invalid_source(
            path,
            format!(
                "unexpected \"{}\" block; only attribute definitions are allowed",
                block.identifier()
            ),
        ));
    }

    let mut values = Vec::new();
    for attr in body.attributes() {
        let value = evaluate(attr.expr()).map_err(|message| TfvarError::InvalidValue {
            name: attr.key().to_string(),
            message: format!("{message} (from {})", path.display()),
        })?;
        values.push((attr.key().to_string(), value));
    }
    Ok(values)
}

fn parse_json(path: &Path, content: &str) -> TfvarResult<Vec<(String, Literal)>> {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(entries)) => Ok(entries
            .into_iter()
            .map(|(name, value)| (name, Literal::from(value)))
            .collect()),
        Ok(_) => Err(invalid_source(path, "root must be an object")),
        Err(err) => Err(invalid_source(path, err.to_string())),
    }
}

fn invalid_source(path: &Path, message: impl Into<String>) -> TfvarError {
    TfvarError::InvalidSource {
        path: path.to_path_buf(),
        message: message.into(),
    }
}
