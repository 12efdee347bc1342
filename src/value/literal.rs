use std::collections::BTreeMap;

use hcl::eval::{Context, Evaluate};
use hcl::{Expression, Number, Structure};

/// A typed constant as it appears in a variable default or a definitions file.
///
/// `Null` doubles as "no default declared": Terraform does not distinguish an
/// omitted `default` from `default = null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Literal {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Literal>),
    Map(BTreeMap<String, Literal>),
}

impl Literal {
    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Number(Number::from(value))
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(values: Vec<T>) -> Self {
        Literal::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<hcl::Value> for Literal {
    fn from(value: hcl::Value) -> Self {
        match value {
            hcl::Value::Null => Literal::Null,
            hcl::Value::Bool(b) => Literal::Bool(b),
            hcl::Value::Number(n) => Literal::Number(n),
            hcl::Value::String(s) => Literal::String(s),
            hcl::Value::Array(items) => Literal::List(items.into_iter().map(Into::into).collect()),
            hcl::Value::Object(entries) => Literal::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Literal {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Literal::Null,
            serde_json::Value::Bool(b) => Literal::Bool(b),
            serde_json::Value::Number(n) => json_number(&n),
            serde_json::Value::String(s) => Literal::String(s),
            serde_json::Value::Array(items) => {
                Literal::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(entries) => Literal::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

fn json_number(n: &serde_json::Number) -> Literal {
    if let Some(i) = n.as_i64() {
        Literal::Number(Number::from(i))
    } else if let Some(u) = n.as_u64() {
        Literal::Number(Number::from(u))
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Literal::Number)
            .unwrap_or(Literal::Null)
    }
}

/// Evaluates a constant expression. Variable references and function calls
/// are rejected because the context is empty.
pub(crate) fn evaluate(expr: &Expression) -> Result<Literal, String> {
    let ctx = Context::new();
    expr.evaluate(&ctx)
        .map(Literal::from)
        .map_err(|err| err.to_string())
}

/// Parses `text` as a single standalone expression.
pub(crate) fn parse_expression(text: &str) -> Result<Expression, String> {
    let body = hcl::parse(&format!("value = {text}\n")).map_err(|err| err.to_string())?;
    let mut structures = body.into_iter();
    match (structures.next(), structures.next()) {
        (Some(Structure::Attribute(attr)), None) if attr.key() == "value" => Ok(attr.expr),
        _ => Err(format!("{text:?} is not a single expression")),
    }
}
