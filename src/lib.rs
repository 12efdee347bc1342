//! Extract input variables from Terraform configurations, collect values for
//! them from the usual sources, and write them back out as `.tfvars` or as
//! `TF_VAR_` environment exports.

pub mod collect;
#[cfg(feature = "cli")]
pub mod config;
pub mod error;
pub mod format;
pub mod loader;
pub mod value;

pub use error::{Diagnostic, Diagnostics, TfvarError, TfvarResult};
pub use format::{
    write_as_env_vars, write_as_env_vars_with, write_as_tfvars, write_as_tfvars_with,
    FormatOptions, UnsetDescription,
};
pub use loader::{load, ParsingMode, Variable};
pub use value::Literal;
