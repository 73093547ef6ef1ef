//! Recursive-descent builders for Java grammar productions
//!
//! Every builder takes `&mut dyn Parser` so the same productions run over
//! the real parser and over test doubles. Modules depend on each other
//! freely; `atomic` holds the shared token-level helpers.

pub mod atomic;
pub mod declarations;
pub mod expressions;
pub mod helpers;
pub mod statements;
pub mod types;

pub use atomic::Parser;
pub use declarations::{
    parse_annotation, parse_annotations, parse_class_body, parse_compilation_unit,
    parse_formal_parameters, parse_modifiers, parse_type_declaration,
};
pub use expressions::{parse_expression, parse_pattern, parse_switch};
pub use helpers::{classify_paren, ParenKind};
pub use statements::{parse_block, parse_statement};
pub use types::{parse_type, parse_type_arguments, parse_type_parameters};
