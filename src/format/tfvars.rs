use std::io::{self, Write};

use crate::error::{TfvarError, TfvarResult};
use crate::loader::Variable;
use crate::value::{to_hcl, write_lines, Line, Literal};

use super::{description_comment, FormatOptions, UnsetDescription};

#[derive(Debug, Clone, PartialEq)]
enum Item {
    /// Raw comment text. Text after its last newline continues onto the
    /// line of whatever item follows.
    Comment(String),
    Attribute { name: String, value: Literal },
    Newline,
}

/// An in-memory variable definitions file, rendered in one pass so that
/// attribute alignment is computed over the whole document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    items: Vec<Item>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_comment(&mut self, text: impl Into<String>) {
        self.items.push(Item::Comment(text.into()));
    }

    pub fn append_attribute(&mut self, name: impl Into<String>, value: Literal) {
        self.items.push(Item::Attribute {
            name: name.into(),
            value,
        });
    }

    pub fn append_newline(&mut self) {
        self.items.push(Item::Newline);
    }

    pub fn render(&self) -> io::Result<String> {
        let mut lines = Vec::new();
        let mut pending = String::new();

        for item in &self.items {
            match item {
                Item::Comment(text) => {
                    pending.push_str(text);
                    while let Some(pos) = pending.find('\n') {
                        let rest = pending.split_off(pos + 1);
                        pending.pop();
                        lines.push(Line::Text(std::mem::replace(&mut pending, rest)));
                    }
                }
                Item::Attribute { name, value } => {
                    let mut lead = std::mem::take(&mut pending);
                    lead.push_str(name);
                    lines.push(Line::Assign {
                        lead,
                        value: to_hcl(value)?,
                    });
                }
                Item::Newline => lines.push(Line::Text(std::mem::take(&mut pending))),
            }
        }

        let mut out = String::new();
        write_lines(&mut out, &lines, "");
        out.push_str(&pending);
        Ok(out)
    }

    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        w.write_all(self.render()?.as_bytes())
    }
}

/// Outputs the given vars in Terraform's variable definitions format, e.g.
///
/// ```text
/// region = "ap-northeast-1"
/// ```
pub fn write_as_tfvars<W: Write>(
    w: W,
    vars: &[Variable],
    header: &str,
    include_descriptions: bool,
) -> TfvarResult<()> {
    write_as_tfvars_with(w, vars, &FormatOptions::new(header, include_descriptions))
}

pub fn write_as_tfvars_with<W: Write>(
    w: W,
    vars: &[Variable],
    options: &FormatOptions,
) -> TfvarResult<()> {
    let unset = options.unset_description.unwrap_or(UnsetDescription::Omit);
    let mut doc = Document::new();

    if !options.header.is_empty() {
        doc.append_comment(format!("{}\n\n", options.header));
    }

    for v in vars {
        if options.include_descriptions {
            let mut comment = String::new();
            comment.push_str(if v.value.is_null() {
                "## REQUIRED\n"
            } else {
                "## OPTIONAL\n"
            });
            if v.description_set || unset == UnsetDescription::Blank {
                comment.push_str(&description_comment(&v.description));
            }
            // A commented-out assignment carries the default.
            if !v.value.is_null() {
                comment.push('#');
            }

            doc.append_comment(comment);
            doc.append_attribute(v.name(), v.value.clone());
            doc.append_newline();
        } else {
            doc.append_attribute(v.name(), v.value.clone());
        }
    }

    doc.write_to(w).map_err(|source| TfvarError::Write {
        target: "tfvars",
        source,
    })
}
