//! Java grammar: AST node definitions, keyword tables and the builders
//! that construct nodes from tokens

pub mod ast;
pub mod builders;
pub mod keywords;

pub use ast::{Node, NodeCategory, NodeKind, Syntax};
pub use builders::{classify_paren, ParenKind, Parser};
pub use keywords::{is_contextual_keyword, is_reserved_word, Keyword};
