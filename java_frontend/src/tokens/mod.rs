//! Token model and token stream
//!
//! - [`Token`] holds a kind, its span, the verbatim source text, the
//!   whitespace and comments that precede it, and for literals a decoded
//!   value.
//! - [`TokenStream`] pulls tokens from the lexer on demand and supports
//!   checkpoint/restore for the parser's speculative scans.
//!
//! Concatenating [`Token::full_text`] over a whole token sequence, end of
//! file included, reproduces the input byte for byte.

pub mod token;
pub mod token_stream;

pub use token::{
    reconstruct, Affiliation, AffiliationStyle, LiteralValue, Radix, Token, TokenError, TokenKind,
};
pub use token_stream::TokenStream;

pub use crate::utils::{Position, SourceMap, Span, Spanned};
