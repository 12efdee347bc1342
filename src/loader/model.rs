use crate::value::Literal;

/// How a textual override for a variable is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsingMode {
    /// The raw text is the value, as a string.
    #[default]
    Literal,
    /// The raw text is an expression in the native syntax.
    Hcl,
}

/// A simplified Terraform input variable, e.g.
///
/// ```hcl
/// variable "image_id" {
///   type = string
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    pub value: Literal,
    pub description: String,
    pub description_set: bool,
    parsing_mode: ParsingMode,
}

impl Variable {
    pub fn new(name: impl Into<String>, value: Literal) -> Self {
        Self {
            name: name.into(),
            value,
            description: String::new(),
            description_set: false,
            parsing_mode: ParsingMode::Literal,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self.description_set = true;
        self
    }

    pub fn with_parsing_mode(mut self, mode: ParsingMode) -> Self {
        self.parsing_mode = mode;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parsing_mode(&self) -> ParsingMode {
        self.parsing_mode
    }
}

/// One `variable` block as written in a single file. Unset fields stay
/// `None` so that override files only replace what they mention.
#[derive(Debug, Clone, PartialEq, Default)]
pub(super) struct Declaration {
    pub name: String,
    pub default: Option<Literal>,
    pub description: Option<String>,
    pub parsing_mode: Option<ParsingMode>,
}

impl Declaration {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn apply_override(&mut self, other: Declaration) {
        if other.default.is_some() {
            self.default = other.default;
        }
        if other.description.is_some() {
            self.description = other.description;
        }
        if other.parsing_mode.is_some() {
            self.parsing_mode = other.parsing_mode;
        }
    }

    pub fn into_variable(self) -> Variable {
        Variable {
            name: self.name,
            value: self.default.unwrap_or_default(),
            description_set: self.description.is_some(),
            description: self.description.unwrap_or_default(),
            parsing_mode: self.parsing_mode.unwrap_or_default(),
        }
    }
}

/// Parsing mode implied by a `type` constraint: primitive types take
/// overrides literally, everything else is parsed as an expression.
/// `None` is a constraint that is not a bare keyword, e.g. `list(string)`.
pub(super) fn parsing_mode_for_type(keyword: Option<&str>) -> ParsingMode {
    match keyword {
        Some("string" | "number" | "bool") => ParsingMode::Literal,
        _ => ParsingMode::Hcl,
    }
}
