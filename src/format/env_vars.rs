use std::io::{self, Write};

use crate::error::{TfvarError, TfvarResult};
use crate::loader::Variable;
use crate::value::{to_hcl, Literal};

use super::{description_comment, FormatOptions, UnsetDescription};

pub const VAR_ENV_PREFIX: &str = "TF_VAR_";

/// Outputs the given vars in environment variables format, e.g.
///
/// ```text
/// export TF_VAR_region='ap-northeast-1'
/// ```
pub fn write_as_env_vars<W: Write>(
    w: W,
    vars: &[Variable],
    header: &str,
    include_descriptions: bool,
) -> TfvarResult<()> {
    write_as_env_vars_with(w, vars, &FormatOptions::new(header, include_descriptions))
}

pub fn write_as_env_vars_with<W: Write>(
    mut w: W,
    vars: &[Variable],
    options: &FormatOptions,
) -> TfvarResult<()> {
    let unset = options.unset_description.unwrap_or(UnsetDescription::Blank);

    if !options.header.is_empty() {
        write!(w, "{}\n\n", options.header).map_err(write_error)?;
    }

    for v in vars {
        if options.include_descriptions && (v.description_set || unset == UnsetDescription::Blank) {
            w.write_all(description_comment(&v.description).as_bytes())
                .map_err(write_error)?;
        }
        let value = env_value(&v.value).map_err(write_error)?;
        writeln!(w, "export {VAR_ENV_PREFIX}{}='{value}'", v.name()).map_err(write_error)?;
    }

    Ok(())
}

// The shell wraps the value in single quotes, so the quotes of a rendered
// string are dropped.
fn env_value(value: &Literal) -> io::Result<String> {
    let rendered = match value {
        Literal::Null => to_hcl(&Literal::String(String::new()))?,
        other => to_hcl(other)?,
    };
    let trimmed = rendered.strip_prefix('"').unwrap_or(&rendered);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    Ok(trimmed.to_string())
}

fn write_error(source: io::Error) -> TfvarError {
    TfvarError::Write {
        target: "env vars",
        source,
    }
}
