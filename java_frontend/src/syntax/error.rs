//! Syntax errors raised while building the AST
//!
//! Every variant names the offending token's source text and byte offset.
//! Lexer failures met while the parser pulls tokens are wrapped unchanged.

use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::tokens::Token;
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unexpected token: expected {expected}, found '{found}' at offset {offset}")]
    UnexpectedToken {
        expected: String,
        found: String,
        offset: usize,
        span: Span,
    },

    #[error("'{word}' is a restricted identifier and cannot name a type (offset {offset})")]
    ContextualKeyword {
        word: String,
        offset: usize,
        span: Span,
    },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEndOfInput { expected: String, offset: usize },

    #[error("Grammar violation: {message} at '{found}' (offset {offset})")]
    GrammarViolation {
        message: String,
        found: String,
        offset: usize,
        span: Span,
    },

    #[error("Maximum parse depth exceeded at '{found}' (offset {offset})")]
    MaxRecursionDepth {
        found: String,
        offset: usize,
        span: Span,
    },

    #[error(transparent)]
    Lexical(#[from] LexerError),
}

impl SyntaxError {
    /// The current token cannot start or continue `expected`
    pub fn unexpected_token(expected: &str, found: &Token) -> Self {
        if found.is_eof() {
            return Self::unexpected_end_of_input(expected, found.offset());
        }
        Self::UnexpectedToken {
            expected: expected.to_string(),
            found: found.source.clone(),
            offset: found.offset(),
            span: found.span,
        }
    }

    pub fn unexpected_end_of_input(expected: &str, offset: usize) -> Self {
        Self::UnexpectedEndOfInput {
            expected: expected.to_string(),
            offset,
        }
    }

    pub fn contextual_keyword(token: &Token) -> Self {
        Self::ContextualKeyword {
            word: token.source.clone(),
            offset: token.offset(),
            span: token.span,
        }
    }

    pub fn grammar_violation(message: &str, token: &Token) -> Self {
        Self::GrammarViolation {
            message: message.to_string(),
            found: token.to_string(),
            offset: token.offset(),
            span: token.span,
        }
    }

    pub fn max_recursion_depth(token: &Token) -> Self {
        Self::MaxRecursionDepth {
            found: token.to_string(),
            offset: token.offset(),
            span: token.span,
        }
    }

    /// Source text of the offending token (empty at end of input)
    pub fn found(&self) -> &str {
        match self {
            Self::UnexpectedToken { found, .. }
            | Self::GrammarViolation { found, .. }
            | Self::MaxRecursionDepth { found, .. } => found,
            Self::ContextualKeyword { word, .. } => word,
            Self::UnexpectedEndOfInput { .. } => "",
            Self::Lexical(error) => error.text(),
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            Self::UnexpectedToken { offset, .. }
            | Self::ContextualKeyword { offset, .. }
            | Self::UnexpectedEndOfInput { offset, .. }
            | Self::GrammarViolation { offset, .. }
            | Self::MaxRecursionDepth { offset, .. } => *offset,
            Self::Lexical(error) => error.offset(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::ContextualKeyword { span, .. }
            | Self::GrammarViolation { span, .. }
            | Self::MaxRecursionDepth { span, .. } => Some(*span),
            Self::UnexpectedEndOfInput { .. } | Self::Lexical(_) => None,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::ContextualKeyword { .. } => codes::syntax::CONTEXTUAL_KEYWORD,
            Self::UnexpectedEndOfInput { .. } => codes::syntax::UNEXPECTED_EOF,
            Self::GrammarViolation { .. } => codes::syntax::GRAMMAR_VIOLATION,
            Self::MaxRecursionDepth { .. } => codes::syntax::MAX_RECURSION_DEPTH,
            Self::Lexical(error) => error.error_code(),
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self, Self::Lexical(_))
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }

    /// Message followed by the registry's recommended action
    pub fn enhanced_message(&self) -> String {
        match self {
            Self::UnexpectedToken {
                expected, found, ..
            } => format!(
                "Expected {} but found '{}'. {}",
                expected,
                found,
                self.recommended_action()
            ),
            Self::UnexpectedEndOfInput { expected, .. } => format!(
                "Unexpected end of input while expecting {}. {}",
                expected,
                self.recommended_action()
            ),
            other => format!("{}. {}", other, other.recommended_action()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;
    use crate::utils::Position;
    use assert_matches::assert_matches;

    fn token(kind: TokenKind, source: &str, offset: usize) -> Token {
        let start = Position::new(offset, 1, offset as u32 + 1);
        Token::new(
            kind,
            Span::new(start, start.advance_str(source)),
            source.to_string(),
        )
    }

    #[test]
    fn test_unexpected_token_names_text_and_offset() {
        let error = SyntaxError::unexpected_token("';'", &token(TokenKind::RBrace, "}", 7));
        assert_eq!(error.found(), "}");
        assert_eq!(error.offset(), 7);
        assert_eq!(error.error_code(), codes::syntax::UNEXPECTED_TOKEN);
        assert!(error.to_string().contains("expected ';'"));
    }

    #[test]
    fn test_unexpected_eof_token_becomes_end_of_input() {
        let error = SyntaxError::unexpected_token("expression", &token(TokenKind::Eof, "", 3));
        assert_matches!(error, SyntaxError::UnexpectedEndOfInput { offset: 3, .. });
        assert_eq!(error.found(), "");
        assert_eq!(error.error_code().as_str(), "E052");
    }

    #[test]
    fn test_contextual_keyword() {
        let error = SyntaxError::contextual_keyword(&token(TokenKind::Identifier, "permits", 0));
        assert_eq!(error.found(), "permits");
        assert_eq!(error.category(), "Syntax");
        assert!(error.recommended_action().contains("restricted"));
    }

    #[test]
    fn test_lexical_errors_keep_their_code() {
        let lexer_error = LexerError::InvalidCharacter {
            text: "#".to_string(),
            offset: 4,
        };
        let error: SyntaxError = lexer_error.clone().into();
        assert!(error.is_lexical());
        assert_eq!(error.error_code(), lexer_error.error_code());
        assert_eq!(error.offset(), 4);
        assert_eq!(error.span(), None);
    }

    #[test]
    fn test_enhanced_message_appends_action() {
        let error = SyntaxError::grammar_violation(
            "try statement requires a catch, finally or resource",
            &token(TokenKind::Keyword(crate::grammar::keywords::Keyword::Try), "try", 0),
        );
        assert!(error.enhanced_message().contains("Fix the construct"));
        assert_eq!(error.severity(), "High");
    }
}
