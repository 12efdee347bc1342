//! Values for declared variables, gathered from the same sources Terraform
//! reads: `TF_VAR_` environment variables, definitions files and `-var`
//! assignments.

mod files;
mod sources;

use std::{
    collections::{btree_map, BTreeMap},
    fmt,
    path::PathBuf,
};

use tracing::{debug, warn};

use crate::error::{TfvarError, TfvarResult};
use crate::loader::{ParsingMode, Variable};
use crate::value::{evaluate, parse_expression, Literal};

pub use files::{collect_auto, collect_from_file};
#[cfg(feature = "cli")]
pub use sources::collect_from_env_file;
pub use sources::{collect_from_env_vars, collect_from_string};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    EnvVar,
    EnvFile(PathBuf),
    File(PathBuf),
    CommandLine,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::EnvVar => f.write_str("environment variable"),
            ValueSource::EnvFile(path) => write!(f, "env file {}", path.display()),
            ValueSource::File(path) => write!(f, "file {}", path.display()),
            ValueSource::CommandLine => f.write_str("command line"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Text whose meaning depends on the variable's parsing mode.
    Text(String),
    /// A value that was already typed by its source.
    Parsed(Literal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourcedValue {
    pub raw: RawValue,
    pub source: ValueSource,
}

impl SourcedValue {
    pub fn resolve(&self, name: &str, mode: ParsingMode) -> TfvarResult<Literal> {
        match (&self.raw, mode) {
            (RawValue::Parsed(value), _) => Ok(value.clone()),
            (RawValue::Text(text), ParsingMode::Literal) => Ok(Literal::String(text.clone())),
            (RawValue::Text(text), ParsingMode::Hcl) => parse_expression(text)
                .and_then(|expr| evaluate(&expr))
                .map_err(|message| TfvarError::InvalidValue {
                    name: name.to_string(),
                    message: format!("{message} (from {})", self.source),
                }),
        }
    }
}

/// Raw values by variable name. Later insertions win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lookup(BTreeMap<String, SourcedValue>);

impl Lookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: SourcedValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&SourcedValue> {
        self.0.get(name)
    }

    pub fn merge(&mut self, other: Lookup) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, SourcedValue> {
        self.0.iter()
    }
}

/// Replaces the value of every variable found in `lookup`. If any value
/// fails to resolve, `vars` is left untouched.
pub fn assign(vars: &mut [Variable], lookup: &Lookup) -> TfvarResult<()> {
    for (name, value) in lookup.iter() {
        if !vars.iter().any(|v| v.name() == name) {
            warn!(variable = %name, source = %value.source, "value for undeclared variable");
        }
    }

    let mut resolved = Vec::new();
    for (index, var) in vars.iter().enumerate() {
        if let Some(value) = lookup.get(var.name()) {
            let literal = value.resolve(var.name(), var.parsing_mode())?;
            resolved.push((index, literal, &value.source));
        }
    }

    for (index, value, source) in resolved {
        let var = &mut vars[index];
        var.value = value;
        debug!(variable = %var.name(), source = %source, "assigned value");
    }

    Ok(())
}
