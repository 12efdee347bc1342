use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// A single problem reported while loading a configuration directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub message: String,
}

impl Diagnostic {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(pub Vec<Diagnostic>);

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum TfvarError {
    #[error("tfvar: loading config from {}: {diagnostics}", dir.display())]
    ConfigLoad {
        dir: PathBuf,
        diagnostics: Diagnostics,
    },
    #[error("tfvar: failed to write as {target}")]
    Write {
        target: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("tfvar: reading {}", path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("tfvar: parsing {}: {message}", path.display())]
    InvalidSource { path: PathBuf, message: String },
    #[error("tfvar: invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

pub type TfvarResult<T> = Result<T, TfvarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_load_lists_every_diagnostic() {
        let err = TfvarError::ConfigLoad {
            dir: PathBuf::from("infra"),
            diagnostics: Diagnostics(vec![
                Diagnostic::new("infra/main.tf", "Duplicate variable declaration \"region\""),
                Diagnostic::new("infra/vars.tf", "Unsupported argument \"foo\""),
            ]),
        };
        let message = err.to_string();
        assert!(message.starts_with("tfvar: loading config from infra: "));
        assert!(message.contains("infra/main.tf: Duplicate variable declaration"));
        assert!(message.contains("; infra/vars.tf: Unsupported argument"));
    }

    #[test]
    fn write_error_keeps_io_source() {
        let err = TfvarError::Write {
            target: "env vars",
            source: io::Error::new(io::ErrorKind::BrokenPipe, "closed"),
        };
        assert_eq!(err.to_string(), "tfvar: failed to write as env vars");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("closed"));
    }
}
