use std::io;

use hcl::Expression;

use super::{is_identifier, Literal};

const INDENT: &str = "  ";

/// Renders a literal in the native syntax. Scalars and map keys go through
/// `hcl::format`; lists stay on one line and maps are laid out one entry per
/// line with their `=` aligned.
pub fn to_hcl(literal: &Literal) -> io::Result<String> {
    let mut out = String::new();
    write_literal(&mut out, literal, 0)?;
    Ok(out)
}

fn write_literal(out: &mut String, literal: &Literal, depth: usize) -> io::Result<()> {
    match literal {
        Literal::Null => out.push_str(&format_expr(&Expression::Null)?),
        Literal::Bool(b) => out.push_str(&format_expr(&Expression::Bool(*b))?),
        Literal::Number(n) => out.push_str(&format_expr(&Expression::Number(n.clone()))?),
        Literal::String(s) => out.push_str(&format_expr(&Expression::String(s.clone()))?),
        Literal::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_literal(out, item, depth)?;
            }
            out.push(']');
        }
        Literal::Map(entries) if entries.is_empty() => out.push_str("{}"),
        Literal::Map(entries) => {
            let mut lines = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                let mut rendered = String::new();
                write_literal(&mut rendered, value, depth + 1)?;
                lines.push(Line::Assign {
                    lead: render_key(key)?,
                    value: rendered,
                });
            }

            out.push_str("{\n");
            write_lines(out, &lines, &INDENT.repeat(depth + 1));
            out.push_str(&INDENT.repeat(depth));
            out.push('}');
        }
    }
    Ok(())
}

fn format_expr(expr: &Expression) -> io::Result<String> {
    hcl::format::to_string(expr)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
}

fn render_key(key: &str) -> io::Result<String> {
    if is_identifier(key) {
        Ok(key.to_string())
    } else {
        format_expr(&Expression::String(key.to_string()))
    }
}

/// One output line of a rendered body.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Line {
    Text(String),
    Assign { lead: String, value: String },
}

/// Writes `lines`, each prefixed with `indent` and terminated by a newline.
///
/// Runs of consecutive single-line assignments share one `=` column. Text
/// lines and assignments whose value spans several lines end a run.
pub(crate) fn write_lines(out: &mut String, lines: &[Line], indent: &str) {
    let mut start = 0;
    while start < lines.len() {
        let end = start
            + lines[start..]
                .iter()
                .take_while(|line| is_alignable(line))
                .count();

        if end == start {
            write_line(out, &lines[start], indent, 0);
            start += 1;
            continue;
        }

        let width = lines[start..end]
            .iter()
            .map(|line| match line {
                Line::Assign { lead, .. } => lead.chars().count(),
                Line::Text(_) => 0,
            })
            .max()
            .unwrap_or(0);
        for line in &lines[start..end] {
            write_line(out, line, indent, width);
        }
        start = end;
    }
}

fn is_alignable(line: &Line) -> bool {
    matches!(line, Line::Assign { value, .. } if !value.contains('\n'))
}

fn write_line(out: &mut String, line: &Line, indent: &str, width: usize) {
    match line {
        Line::Text(text) if text.is_empty() => {}
        Line::Text(text) => {
            out.push_str(indent);
            out.push_str(text);
        }
        Line::Assign { lead, value } => {
            let padding = width.saturating_sub(lead.chars().count());
            out.push_str(indent);
            out.push_str(lead);
            out.push_str(&" ".repeat(padding));
            out.push_str(" = ");
            out.push_str(value);
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl::Number;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn render(literal: Literal) -> String {
        to_hcl(&literal).unwrap()
    }

    #[test]
    fn renders_scalars() {
        assert_eq!(render(Literal::Null), "null");
        assert_eq!(render(Literal::from(true)), "true");
        assert_eq!(render(Literal::from(42i64)), "42");
        assert_eq!(render(Literal::Number(Number::from_f64(1.5).unwrap())), "1.5");
        assert_eq!(render(Literal::from("my-instance")), "\"my-instance\"");
    }

    #[test]
    fn escapes_template_markers() {
        assert_eq!(render(Literal::from("a${b}")), r#""a$${b}""#);
        assert_eq!(render(Literal::from("x%{y}")), r#""x%%{y}""#);
        assert_eq!(render(Literal::from("say \"hi\"")), r#""say \"hi\"""#);
    }

    #[test]
    fn renders_lists_inline() {
        assert_eq!(render(Literal::from(vec!["us-west-1a"])), r#"["us-west-1a"]"#);
        assert_eq!(
            render(Literal::List(vec![Literal::from(1i64), Literal::from(2i64)])),
            "[1, 2]"
        );
        assert_eq!(render(Literal::List(Vec::new())), "[]");
    }

    #[test]
    fn renders_maps_with_aligned_keys() {
        let mut inner = BTreeMap::new();
        inner.insert("enabled".to_string(), Literal::from(true));

        let mut entries = BTreeMap::new();
        entries.insert("Name".to_string(), Literal::from("web"));
        entries.insert("Environment".to_string(), Literal::from("prod"));
        entries.insert("nested".to_string(), Literal::Map(inner));
        entries.insert("not an ident".to_string(), Literal::from(1i64));

        let expected = r#"{
  Environment = "prod"
  Name        = "web"
  nested = {
    enabled = true
  }
  "not an ident" = 1
}"#;
        assert_eq!(render(Literal::Map(entries)), expected);
        assert_eq!(render(Literal::Map(BTreeMap::new())), "{}");
    }

    #[test]
    fn unicode_keys_stay_bare() {
        let mut entries = BTreeMap::new();
        entries.insert("région".to_string(), Literal::from("eu"));
        assert_eq!(render(Literal::Map(entries)), "{\n  région = \"eu\"\n}");
    }

    #[test]
    fn write_lines_breaks_runs_on_text() {
        let lines = vec![
            Line::Assign {
                lead: "a".to_string(),
                value: "1".to_string(),
            },
            Line::Assign {
                lead: "long_name".to_string(),
                value: "2".to_string(),
            },
            Line::Text("# comment".to_string()),
            Line::Assign {
                lead: "b".to_string(),
                value: "3".to_string(),
            },
            Line::Text(String::new()),
        ];
        let mut out = String::new();
        write_lines(&mut out, &lines, "");
        assert_eq!(out, "a         = 1\nlong_name = 2\n# comment\nb = 3\n\n");
    }
}
