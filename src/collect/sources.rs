#[cfg(feature = "cli")]
use std::{fs, io::Cursor, path::Path};

use crate::error::{TfvarError, TfvarResult};
use crate::format::VAR_ENV_PREFIX;

use super::{Lookup, RawValue, SourcedValue, ValueSource};

/// Picks the `TF_VAR_` entries out of an environment listing.
pub fn collect_from_env_vars<I, K, V>(vars: I) -> Lookup
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut lookup = Lookup::new();
    for (key, value) in vars {
        if let Some(name) = key.as_ref().strip_prefix(VAR_ENV_PREFIX) {
            if name.is_empty() {
                continue;
            }
            lookup.insert(
                name,
                SourcedValue {
                    raw: RawValue::Text(value.into()),
                    source: ValueSource::EnvVar,
                },
            );
        }
    }
    lookup
}

/// Reads the `TF_VAR_` entries of a dotenv file.
#[cfg(feature = "cli")]
pub fn collect_from_env_file(path: &Path) -> TfvarResult<Lookup> {
    let content = fs::read_to_string(path).map_err(|source| TfvarError::ReadSource {
        path: path.to_path_buf(),
        source,
    })?;

    let mut lookup = Lookup::new();
    for item in dotenvy::from_read_iter(Cursor::new(content)) {
        let (key, value) = item.map_err(|err| TfvarError::InvalidSource {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        if let Some(name) = key.strip_prefix(VAR_ENV_PREFIX) {
            if name.is_empty() {
                continue;
            }
            lookup.insert(
                name,
                SourcedValue {
                    raw: RawValue::Text(value),
                    source: ValueSource::EnvFile(path.to_path_buf()),
                },
            );
        }
    }
    Ok(lookup)
}

/// Parses a `-var` style `NAME=VALUE` assignment.
pub fn collect_from_string(assignment: &str) -> TfvarResult<Lookup> {
    let Some((name, value)) = assignment.split_once('=') else {
        return Err(TfvarError::InvalidValue {
            name: assignment.to_string(),
            message: "expected NAME=VALUE".to_string(),
        });
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(TfvarError::InvalidValue {
            name: assignment.to_string(),
            message: "variable name is empty".to_string(),
        });
    }

    let mut lookup = Lookup::new();
    lookup.insert(
        name,
        SourcedValue {
            raw: RawValue::Text(value.to_string()),
            source: ValueSource::CommandLine,
        },
    );
    Ok(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_need_the_prefix() {
        let lookup = collect_from_env_vars(vec![
            ("TF_VAR_region", "eu-west-1"),
            ("TF_VAR_", "nameless"),
            ("HOME", "/root"),
            ("tf_var_lower", "nope"),
        ]);

        assert_eq!(lookup.len(), 1);
        let value = lookup.get("region").unwrap();
        assert_eq!(value.raw, RawValue::Text("eu-west-1".to_string()));
        assert_eq!(value.source, ValueSource::EnvVar);
    }

    #[test]
    fn string_assignments_split_on_first_equals() {
        let lookup = collect_from_string("filter=a=b").unwrap();
        assert_eq!(
            lookup.get("filter").map(|v| &v.raw),
            Some(&RawValue::Text("a=b".to_string()))
        );
    }

    #[test]
    fn string_assignments_require_a_name() {
        let err = collect_from_string("novalue").unwrap_err();
        assert!(err.to_string().contains("expected NAME=VALUE"));
        let err = collect_from_string("=value").unwrap_err();
        assert!(err.to_string().contains("variable name is empty"));
    }

    #[cfg(feature = "cli")]
    #[test]
    fn env_files_keep_prefixed_entries() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let env_path = temp.path().join("vars.env");
        fs::write(&env_path, "TF_VAR_region=eu-west-1\nOTHER=1\n")?;

        let lookup = collect_from_env_file(&env_path)?;
        assert_eq!(lookup.len(), 1);
        assert_eq!(
            lookup.get("region").map(|v| &v.source),
            Some(&ValueSource::EnvFile(env_path.clone()))
        );
        Ok(())
    }

    #[cfg(feature = "cli")]
    #[test]
    fn env_files_propagate_io_errors() {
        let err = collect_from_env_file(Path::new("does-not-exist.env")).unwrap_err();
        assert!(err.to_string().contains("reading does-not-exist.env"));
    }
}
