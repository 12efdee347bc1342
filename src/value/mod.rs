mod literal;
mod render;

use hcl::Identifier;

pub use literal::Literal;
pub use render::to_hcl;

pub(crate) use literal::{evaluate, parse_expression};
pub(crate) use render::{write_lines, Line};

/// Whether `name` can be written as a bare identifier in the native syntax.
pub fn is_identifier(name: &str) -> bool {
    Identifier::new(name).is_ok()
}
