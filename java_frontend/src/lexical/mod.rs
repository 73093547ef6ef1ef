//! Lexical analysis for Java source text
//!
//! A table-driven automaton ([`transitions`]) over character classes
//! ([`classes`]) produces tokens that carry their preceding whitespace and
//! comments. Literal values are decoded when a token is reduced
//! ([`literal`]).

pub mod analyzer;
pub mod classes;
pub mod literal;
pub mod transitions;

use crate::config::compile_time::lexical::*;

pub use analyzer::{
    tokenize, tokenize_with_preferences, LexerError, LexicalAnalyzer, LexicalMetrics,
};

/// Compile-time lexical limits, for reporting
#[derive(Debug, Clone, serde::Serialize)]
pub struct LexicalLimits {
    pub max_string_size: usize,
    pub max_identifier_length: usize,
    pub max_comment_length: usize,
    pub max_token_count: usize,
}

pub fn get_lexical_limits() -> LexicalLimits {
    LexicalLimits {
        max_string_size: MAX_STRING_SIZE,
        max_identifier_length: MAX_IDENTIFIER_LENGTH,
        max_comment_length: MAX_COMMENT_LENGTH,
        max_token_count: MAX_TOKEN_COUNT,
    }
}

/// Check that every lexical error code is registered (used at startup)
pub fn validate_lexical_codes() -> Result<(), String> {
    use crate::logging::codes::{self, lexical};

    let lexical_codes = [
        lexical::INVALID_CHARACTER,
        lexical::UNTERMINATED_STRING,
        lexical::INVALID_NUMBER,
        lexical::IDENTIFIER_TOO_LONG,
        lexical::STRING_TOO_LARGE,
        lexical::COMMENT_TOO_LONG,
        lexical::TOO_MANY_TOKENS,
        lexical::UNTERMINATED_CHAR,
        lexical::UNTERMINATED_TEXT_BLOCK,
        lexical::UNTERMINATED_COMMENT,
        lexical::INVALID_ESCAPE,
        lexical::INVALID_CHAR_LITERAL,
        lexical::INVALID_TEXT_BLOCK_OPENING,
        lexical::UNEXPECTED_END_OF_INPUT,
    ];

    for code in &lexical_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical_codes_registered() {
        assert!(validate_lexical_codes().is_ok());
    }

    #[test]
    fn test_limits_match_generated_constants() {
        let limits = get_lexical_limits();
        assert_eq!(limits.max_token_count, MAX_TOKEN_COUNT);
        assert!(limits.max_identifier_length > 0);
    }
}
