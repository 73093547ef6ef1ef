//! Syntax analysis: token stream to AST
//!
//! [`JavaParser`] drives the grammar builders over a lazily lexed token
//! stream. Each entry point parses one production, requires end of input
//! and logs the outcome through the global logging service.

mod error;
mod parser;

pub use error::{SyntaxError, SyntaxResult};
pub use parser::{JavaParser, ParserCheckpoint};

use crate::config::compile_time::syntax::*;
use crate::logging::codes;

/// Compile-time parser limits, for reporting
#[derive(Debug, Clone, serde::Serialize)]
pub struct SyntaxLimits {
    pub max_parse_depth: usize,
    pub max_error_history: usize,
    pub max_context_stack_depth: usize,
    pub max_lookahead_tokens: usize,
}

pub fn get_syntax_limits() -> SyntaxLimits {
    SyntaxLimits {
        max_parse_depth: MAX_PARSE_DEPTH,
        max_error_history: MAX_ERROR_HISTORY,
        max_context_stack_depth: MAX_CONTEXT_STACK_DEPTH,
        max_lookahead_tokens: MAX_LOOKAHEAD_TOKENS,
    }
}

/// Check that every syntax error code is registered (used at startup)
pub fn validate_syntax_codes() -> Result<(), String> {
    let syntax_codes = [
        codes::syntax::UNEXPECTED_TOKEN,
        codes::syntax::CONTEXTUAL_KEYWORD,
        codes::syntax::UNEXPECTED_EOF,
        codes::syntax::GRAMMAR_VIOLATION,
        codes::syntax::MAX_RECURSION_DEPTH,
    ];

    for code in &syntax_codes {
        if codes::get_description(code.as_str()) == "Unknown error" {
            return Err(format!(
                "Syntax error code {} has no description",
                code.as_str()
            ));
        }
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Syntax error code {} not found in metadata registry",
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
    fn test_syntax_codes_registered() {
        assert!(validate_syntax_codes().is_ok());
    }

    #[test]
    fn test_limits_match_generated_constants() {
        let limits = get_syntax_limits();
        assert_eq!(limits.max_parse_depth, MAX_PARSE_DEPTH);
        assert!(limits.max_lookahead_tokens >= 4);
    }

    #[test]
    fn test_error_codes_resolve_in_registry() {
        let mut parser = JavaParser::new("int x = ;");
        let error = parser.parse_statement().unwrap_err();
        assert_ne!(codes::get_description(error.error_code().as_str()), "Unknown error");
        assert_eq!(codes::get_category(error.error_code().as_str()), "Syntax");
    }
}
