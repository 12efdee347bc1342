use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Diagnostic, Diagnostics};
use crate::value::Literal;

use super::model::{parsing_mode_for_type, Declaration};
use super::validate_name;

/// Decodes the `variable` object of a JSON syntax file.
pub(super) fn decode_file(path: &Path, source: &str, diags: &mut Diagnostics) -> Vec<Declaration> {
    let root: Value = match serde_json::from_str(source) {
        Ok(root) => root,
        Err(err) => {
            diags.push(Diagnostic::new(path, format!("Invalid JSON syntax: {err}")));
            return Vec::new();
        }
    };
    let Value::Object(mut root) = root else {
        diags.push(Diagnostic::new(path, "Invalid JSON syntax: root must be an object"));
        return Vec::new();
    };

    match root.remove("variable") {
        None => Vec::new(),
        Some(Value::Object(variables)) => variables
            .into_iter()
            .filter_map(|(name, body)| decode_variable(path, name, body, diags))
            .collect(),
        Some(_) => {
            diags.push(Diagnostic::new(
                path,
                "Invalid variable block: \"variable\" must be an object of variable names",
            ));
            Vec::new()
        }
    }
}

fn decode_variable(
    path: &Path,
    name: String,
    body: Value,
    diags: &mut Diagnostics,
) -> Option<Declaration> {
    if let Err(message) = validate_name(&name) {
        diags.push(Diagnostic::new(path, message));
        return None;
    }
    let attrs: Map<String, Value> = match body {
        Value::Object(attrs) => attrs,
        _ => {
            diags.push(Diagnostic::new(
                path,
                format!("Invalid variable block: \"{name}\" must be an object"),
            ));
            return None;
        }
    };

    let mut decl = Declaration::named(name.clone());
    for (key, value) in attrs {
        match key.as_str() {
            "type" => match value {
                Value::String(ty) => decl.parsing_mode = Some(parsing_mode_for_type(Some(ty.trim()))),
                _ => diags.push(Diagnostic::new(
                    path,
                    format!("Invalid type specification for \"{name}\": must be a string"),
                )),
            },
            "default" => decl.default = Some(Literal::from(value)),
            "description" => match value {
                Value::String(text) => decl.description = Some(text),
                _ => diags.push(Diagnostic::new(
                    path,
                    format!("Unsuitable value type: description of \"{name}\" must be a string"),
                )),
            },
            "sensitive" | "nullable" | "ephemeral" | "validation" | "//" => {}
            other => diags.push(Diagnostic::new(
                path,
                format!("Unsupported argument \"{other}\" in variable \"{name}\""),
            )),
        }
    }

    Some(decl)
}
