use std::path::Path;

use hcl::{Block, Expression, Structure};

use crate::error::{Diagnostic, Diagnostics};
use crate::value::{evaluate, Literal};

use super::model::{parsing_mode_for_type, Declaration};
use super::validate_name;

/// Decodes the `variable` blocks of a native syntax file.
pub(super) fn decode_file(path: &Path, source: &str, diags: &mut Diagnostics) -> Vec<Declaration> {
    let body = match hcl::parse(source) {
        Ok(body) => body,
        Err(err) => {
            diags.push(Diagnostic::new(path, format!("Invalid syntax: {err}")));
            return Vec::new();
        }
    };

    body.into_iter()
        .filter_map(|structure| match structure {
            Structure::Block(block) if block.identifier() == "variable" => {
                decode_variable(path, &block, diags)
            }
            _ => None,
        })
        .collect()
}

fn decode_variable(path: &Path, block: &Block, diags: &mut Diagnostics) -> Option<Declaration> {
    let name = match block.labels() {
        [label] => label.as_str(),
        [] => {
            diags.push(Diagnostic::new(
                path,
                "Missing name for variable: all variable blocks must have 1 label",
            ));
            return None;
        }
        [label, ..] => {
            diags.push(Diagnostic::new(
                path,
                format!(
                    "Extraneous label for variable \"{}\": only 1 label is expected",
                    label.as_str()
                ),
            ));
            return None;
        }
    };
    if let Err(message) = validate_name(name) {
        diags.push(Diagnostic::new(path, message));
        return None;
    }

    let mut decl = Declaration::named(name);

    for attr in block.body().attributes() {
        match attr.key() {
            "type" => decl.parsing_mode = Some(parsing_mode_for_type(type_keyword(attr.expr()))),
            "default" => match evaluate(attr.expr()) {
                Ok(value) => decl.default = Some(value),
                Err(err) => diags.push(Diagnostic::new(
                    path,
                    format!("Invalid default value for variable \"{name}\": {err}"),
                )),
            },
            "description" => match evaluate(attr.expr()) {
                Ok(Literal::String(text)) => decl.description = Some(text),
                Ok(_) => diags.push(Diagnostic::new(
                    path,
                    format!("Unsuitable value type: description of \"{name}\" must be a string"),
                )),
                Err(err) => diags.push(Diagnostic::new(
                    path,
                    format!("Invalid description for variable \"{name}\": {err}"),
                )),
            },
            "sensitive" | "nullable" | "ephemeral" => {}
            other => diags.push(Diagnostic::new(
                path,
                format!("Unsupported argument \"{other}\" in variable \"{name}\""),
            )),
        }
    }

    for nested in block.body().blocks() {
        if nested.identifier() != "validation" {
            diags.push(Diagnostic::new(
                path,
                format!(
                    "Unsupported block type \"{}\" in variable \"{name}\"",
                    nested.identifier()
                ),
            ));
        }
    }

    Some(decl)
}

// `type = string` is a bare variable expression; `list(string)` and friends
// are function calls, which never take overrides literally.
fn type_keyword(expr: &Expression) -> Option<&str> {
    match expr {
        Expression::Variable(var) => Some(var.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ParsingMode;

    fn decode(source: &str) -> (Vec<Declaration>, Diagnostics) {
        let mut diags = Diagnostics::default();
        let decls = decode_file(Path::new("main.tf"), source, &mut diags);
        (decls, diags)
    }

    #[test]
    fn decodes_defaults_descriptions_and_types() {
        let (decls, diags) = decode(
            r#"
variable "availability_zone_names" {
  type        = list(string)
  default     = ["us-west-1a"]
  description = "Zones to spread instances over"
}

variable "region" {
  type = string
}

resource "aws_instance" "web" {
  ami = "ami-123"
}
"#,
        );

        assert!(diags.is_empty(), "{diags}");
        assert_eq!(
            decls,
            vec![
                Declaration {
                    name: "availability_zone_names".to_string(),
                    default: Some(Literal::from(vec!["us-west-1a"])),
                    description: Some("Zones to spread instances over".to_string()),
                    parsing_mode: Some(ParsingMode::Hcl),
                },
                Declaration {
                    name: "region".to_string(),
                    default: None,
                    description: None,
                    parsing_mode: Some(ParsingMode::Literal),
                },
            ]
        );
    }

    #[test]
    fn explicit_null_default_is_kept() {
        let (decls, diags) = decode("variable \"x\" {\n  default = null\n}\n");
        assert!(diags.is_empty());
        assert_eq!(decls[0].default, Some(Literal::Null));
    }

    #[test]
    fn validation_blocks_and_flags_are_accepted() {
        let (_, diags) = decode(
            r#"
variable "port" {
  type      = number
  sensitive = false
  nullable  = true
  validation {
    condition     = var.port > 0
    error_message = "Port must be positive."
  }
}
"#,
        );
        assert!(diags.is_empty(), "{diags}");
    }

    #[test]
    fn reports_unsupported_attributes() {
        let (decls, diags) = decode("variable \"x\" {\n  default = 1\n  color   = \"red\"\n}\n");
        assert_eq!(decls.len(), 1);
        let text = diags.to_string();
        assert!(text.contains("Unsupported argument \"color\" in variable \"x\""), "{text}");
    }

    #[test]
    fn redefined_attributes_are_syntax_errors() {
        let (decls, diags) = decode("variable \"x\" {\n  default = 1\n  default = 2\n}\n");
        assert!(decls.is_empty());
        let text = diags.to_string();
        assert!(text.contains("Invalid syntax"), "{text}");
    }

    #[test]
    fn reports_non_constant_defaults() {
        let (_, diags) = decode("variable \"x\" {\n  default = var.y\n}\n");
        assert!(diags.to_string().contains("Invalid default value for variable \"x\""));
    }

    #[test]
    fn reports_syntax_errors() {
        let (decls, diags) = decode("variable \"x\" {\n  default = \n");
        assert!(decls.is_empty());
        assert!(diags.to_string().contains("Invalid syntax"));
    }

    #[test]
    fn reports_label_problems() {
        let (decls, diags) = decode("variable {\n}\nvariable \"a\" \"b\" {\n}\nvariable \"count\" {\n}\n");
        assert!(decls.is_empty());
        let text = diags.to_string();
        assert!(text.contains("Missing name for variable"), "{text}");
        assert!(text.contains("Extraneous label"), "{text}");
        assert!(text.contains("reserved"), "{text}");
    }
}
