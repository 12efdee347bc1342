mod env_vars;
mod tfvars;

use std::str::FromStr;

use serde::Deserialize;

pub use env_vars::{write_as_env_vars, write_as_env_vars_with, VAR_ENV_PREFIX};
pub use tfvars::{write_as_tfvars, write_as_tfvars_with, Document};

/// What a description annotation looks like for a variable whose
/// `description` attribute was never set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsetDescription {
    /// Emit the comment line anyway, with empty text.
    Blank,
    /// Emit no description line.
    Omit,
}

impl FromStr for UnsetDescription {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blank" => Ok(Self::Blank),
            "omit" => Ok(Self::Omit),
            other => Err(format!("unknown unset-description mode: {other} (expected blank or omit)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Written verbatim before the variables, followed by a blank line.
    pub header: String,
    pub include_descriptions: bool,
    /// `None` keeps each formatter's own behavior: the environment
    /// formatter emits blank comments, the definitions formatter omits them.
    pub unset_description: Option<UnsetDescription>,
}

impl FormatOptions {
    pub fn new(header: impl Into<String>, include_descriptions: bool) -> Self {
        Self {
            header: header.into(),
            include_descriptions,
            unset_description: None,
        }
    }
}

/// `# ` prefixed comment lines for a description, one per line of text.
fn description_comment(description: &str) -> String {
    if description.is_empty() {
        return "# \n".to_string();
    }
    description
        .lines()
        .map(|line| format!("# {line}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unset_description_modes() {
        assert_eq!("blank".parse::<UnsetDescription>(), Ok(UnsetDescription::Blank));
        assert_eq!("omit".parse::<UnsetDescription>(), Ok(UnsetDescription::Omit));
        assert!("sometimes".parse::<UnsetDescription>().is_err());
    }

    #[test]
    fn multi_line_descriptions_stay_commented() {
        assert_eq!(description_comment(""), "# \n");
        assert_eq!(description_comment("Region"), "# Region\n");
        assert_eq!(
            description_comment("First line\nSecond line\n"),
            "# First line\n# Second line\n"
        );
    }
}
