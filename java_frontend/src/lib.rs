//! Lossless Java front end
//!
//! Source text goes through a table-driven lexer into tokens that keep their
//! whitespace and comments, then through a recursive-descent parser into a
//! typed AST. Every node can regenerate canonical Java source.
//!
//! ```no_run
//! use java_frontend::{parse, Node, ParseMode};
//!
//! let tree = parse("a -> a + 1", ParseMode::Expression)?;
//! println!("{}", tree.generate());
//! # Ok::<(), java_frontend::PipelineError>(())
//! ```

pub mod config;
pub mod file_processor;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

pub use grammar::{Node, NodeKind, ParenKind, Syntax};
pub use lexical::{tokenize, LexerError};
pub use pipeline::{
    check_round_trip, classify_parenthesized, parse, parse_compilation_unit, parse_expression,
    parse_file, parse_statement, parse_type, ParseMode, ParsedNode, PipelineError,
    RoundTripReport,
};
pub use syntax::SyntaxError;
pub use tokens::{Token, TokenKind};
