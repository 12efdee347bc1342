mod files;
mod json;
mod model;
mod native;

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::{Diagnostic, Diagnostics, TfvarError, TfvarResult};
use crate::value::is_identifier;

use self::model::Declaration;

pub use model::{ParsingMode, Variable};

const RESERVED_NAMES: &[&str] = &[
    "source",
    "version",
    "providers",
    "count",
    "for_each",
    "lifecycle",
    "depends_on",
    "locals",
];

/// Extracts all input variables declared in the Terraform configuration
/// files located directly in `dir`.
///
/// Either every variable is returned or, if any file has a problem, none
/// are. The order of the returned variables is unspecified.
pub fn load(dir: impl AsRef<Path>) -> TfvarResult<Vec<Variable>> {
    let dir = dir.as_ref();
    let mut diagnostics = Diagnostics::default();

    let files = match files::config_files(dir) {
        Ok(files) => files,
        Err(diagnostic) => {
            diagnostics.push(diagnostic);
            return Err(config_load_error(dir, diagnostics));
        }
    };

    let mut declared: Vec<(PathBuf, Declaration)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for path in &files.primary {
        for decl in read_declarations(path, &mut diagnostics) {
            if let Some(&existing) = index.get(&decl.name) {
                diagnostics.push(Diagnostic::new(
                    path,
                    format!(
                        "Duplicate variable declaration: a variable named \"{}\" was already declared at {}",
                        decl.name,
                        declared[existing].0.display()
                    ),
                ));
                continue;
            }
            index.insert(decl.name.clone(), declared.len());
            declared.push((path.clone(), decl));
        }
    }

    for path in &files.overrides {
        for decl in read_declarations(path, &mut diagnostics) {
            match index.get(&decl.name) {
                Some(&existing) => declared[existing].1.apply_override(decl),
                None => diagnostics.push(Diagnostic::new(
                    path,
                    format!(
                        "Missing base variable declaration to override: there is no variable named \"{}\"",
                        decl.name
                    ),
                )),
            }
        }
    }

    if !diagnostics.is_empty() {
        return Err(config_load_error(dir, diagnostics));
    }

    let variables: Vec<Variable> = declared
        .into_iter()
        .map(|(_, decl)| decl.into_variable())
        .collect();
    debug!(dir = %dir.display(), count = variables.len(), "loaded variables");
    Ok(variables)
}

fn read_declarations(path: &Path, diagnostics: &mut Diagnostics) -> Vec<Declaration> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            diagnostics.push(Diagnostic::new(path, format!("Failed to read file: {err}")));
            return Vec::new();
        }
    };

    let decls = if files::is_json(path) {
        json::decode_file(path, &source, diagnostics)
    } else {
        native::decode_file(path, &source, diagnostics)
    };
    debug!(path = %path.display(), variables = decls.len(), "parsed configuration file");
    decls
}

fn validate_name(name: &str) -> Result<(), String> {
    if !is_identifier(name) {
        return Err(format!(
            "Invalid variable name \"{name}\": a name must start with a letter or underscore and may contain only letters, digits, underscores, and dashes"
        ));
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(format!(
            "Invalid variable name \"{name}\": the name is reserved for use in a future version"
        ));
    }
    Ok(())
}

fn config_load_error(dir: &Path, diagnostics: Diagnostics) -> TfvarError {
    TfvarError::ConfigLoad {
        dir: dir.to_path_buf(),
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Literal;
    use anyhow::Result;
    use tempfile::tempdir;

    fn sorted(mut vars: Vec<Variable>) -> Vec<Variable> {
        vars.sort_by(|a, b| a.name().cmp(b.name()));
        vars
    }

    #[test]
    fn merges_native_and_json_files() -> Result<()> {
        let temp = tempdir()?;
        fs::write(
            temp.path().join("variables.tf"),
            "variable \"region\" {}\n",
        )?;
        fs::write(
            temp.path().join("extra.tf.json"),
            r#"{"variable": {"instance_name": {"default": "my-instance"}}}"#,
        )?;

        let vars = sorted(load(temp.path())?);
        assert_eq!(
            vars,
            vec![
                Variable::new("instance_name", Literal::from("my-instance")),
                Variable::new("region", Literal::Null),
            ]
        );
        Ok(())
    }

    #[test]
    fn override_files_patch_declarations() -> Result<()> {
        let temp = tempdir()?;
        fs::write(
            temp.path().join("main.tf"),
            "variable \"region\" {\n  default     = \"us-east-1\"\n  description = \"Region\"\n}\n",
        )?;
        fs::write(
            temp.path().join("override.tf"),
            "variable \"region\" {\n  default = \"eu-west-1\"\n}\n",
        )?;

        let vars = load(temp.path())?;
        assert_eq!(
            vars,
            vec![Variable::new("region", Literal::from("eu-west-1")).with_description("Region")]
        );
        Ok(())
    }

    #[test]
    fn override_without_base_fails() -> Result<()> {
        let temp = tempdir()?;
        fs::write(temp.path().join("main.tf"), "")?;
        fs::write(
            temp.path().join("dev_override.tf"),
            "variable \"ghost\" {\n  default = 1\n}\n",
        )?;

        let err = load(temp.path()).unwrap_err();
        assert!(err.to_string().contains("Missing base variable declaration"));
        Ok(())
    }

    #[test]
    fn duplicates_across_files_fail() -> Result<()> {
        let temp = tempdir()?;
        fs::write(temp.path().join("a.tf"), "variable \"region\" {}\n")?;
        fs::write(temp.path().join("b.tf"), "variable \"region\" {}\n")?;

        let err = load(temp.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Duplicate variable declaration"), "{message}");
        assert!(message.contains("a.tf"), "{message}");
        Ok(())
    }

    #[test]
    fn empty_directory_has_no_variables() -> Result<()> {
        let temp = tempdir()?;
        assert!(load(temp.path())?.is_empty());
        Ok(())
    }

    #[test]
    fn missing_directory_is_a_config_load_error() {
        let err = load("definitely/not/here").unwrap_err();
        assert!(matches!(err, TfvarError::ConfigLoad { .. }));
    }

    #[test]
    fn unicode_variable_names_load() -> Result<()> {
        let temp = tempdir()?;
        fs::write(temp.path().join("main.tf"), "variable \"région\" {}\n")?;

        let vars = load(temp.path())?;
        assert_eq!(vars, vec![Variable::new("région", Literal::Null)]);
        Ok(())
    }

    #[test]
    fn reserved_names_are_rejected() {
        assert!(validate_name("region").is_ok());
        assert!(validate_name("for_each").unwrap_err().contains("reserved"));
        assert!(validate_name("9lives").unwrap_err().contains("Invalid variable name"));
    }
}
