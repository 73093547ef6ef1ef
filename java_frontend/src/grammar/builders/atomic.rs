//! Parser trait and atomic builders
//!
//! Builders are free functions over `&mut dyn Parser`. The trait exposes the
//! rewindable token cursor and parser state; the provided methods implement
//! token expectations on top of it so every implementation reports errors
//! the same way.

use crate::config::runtime::SyntaxPreferences;
use crate::grammar::ast::{Identifier, Literal, LiteralKind, Syntax};
use crate::grammar::keywords::{is_restricted_type_name, Keyword};
use crate::lexical::literal::is_negation_only;
use crate::syntax::{SyntaxError, SyntaxResult};
use crate::tokens::{Token, TokenKind};
use crate::utils::Span;

/// Interface the grammar builders parse through
pub trait Parser {
    // === TOKEN ACCESS ===
    fn peek(&mut self, n: usize) -> SyntaxResult<&Token>;
    /// Consume the current token. End of file is never consumed.
    fn advance(&mut self) -> SyntaxResult<Token>;

    // === BACKTRACKING ===
    fn save_position(&self) -> usize;
    fn restore_position(&mut self, position: usize);
    /// Split a `>>`-family token so its first `>` can close type arguments
    fn split_greater(&mut self) -> SyntaxResult<bool>;

    // === SPANS ===
    fn span_from(&self, start: usize) -> Span;
    fn source_text(&self, span: &Span) -> &str;

    // === STATE ===
    /// Enter a nested production, failing past the depth limit
    fn enter(&mut self, context: &'static str) -> SyntaxResult<()>;
    fn exit(&mut self);
    /// Whether `ident ->` starts a lambda. Off inside `case` labels.
    fn lambdas_allowed(&self) -> bool;
    /// Returns the previous setting
    fn set_lambdas_allowed(&mut self, allowed: bool) -> bool;
    fn preferences(&self) -> &SyntaxPreferences;

    // === PROVIDED LOOKAHEAD ===

    fn current_kind(&mut self) -> SyntaxResult<TokenKind> {
        Ok(self.peek(0)?.kind)
    }

    fn peek_kind(&mut self, n: usize) -> SyntaxResult<TokenKind> {
        Ok(self.peek(n)?.kind)
    }

    fn check(&mut self, kind: TokenKind) -> SyntaxResult<bool> {
        Ok(self.current_kind()? == kind)
    }

    fn check_keyword(&mut self, keyword: Keyword) -> SyntaxResult<bool> {
        self.check(TokenKind::Keyword(keyword))
    }

    /// Current token is the identifier `word`
    fn check_word(&mut self, word: &str) -> SyntaxResult<bool> {
        self.peek_is_word(0, word)
    }

    fn peek_is_word(&mut self, n: usize, word: &str) -> SyntaxResult<bool> {
        Ok(self.peek(n)?.is_word(word))
    }

    /// Consume the current token if it has `kind`
    fn eat(&mut self, kind: TokenKind) -> SyntaxResult<bool> {
        if self.check(kind)? {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // === PROVIDED EXPECTATIONS ===

    /// Error for the current token not matching `expected`
    fn unexpected(&mut self, expected: &str) -> SyntaxError {
        match self.peek(0) {
            Ok(token) => SyntaxError::unexpected_token(expected, token),
            Err(error) => error,
        }
    }

    fn expect(&mut self, kind: TokenKind) -> SyntaxResult<Token> {
        if self.check(kind)? {
            self.advance()
        } else {
            Err(self.unexpected(&kind.describe()))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> SyntaxResult<Token> {
        self.expect(TokenKind::Keyword(keyword))
    }

    /// Any identifier, contextual keywords included
    fn expect_identifier(&mut self) -> SyntaxResult<Identifier> {
        if self.check(TokenKind::Identifier)? {
            Ok(self.advance()?.source)
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    /// Identifier that may name a type
    fn expect_type_identifier(&mut self) -> SyntaxResult<Identifier> {
        let token = self.peek(0)?;
        if token.kind == TokenKind::Identifier && is_restricted_type_name(&token.source) {
            return Err(SyntaxError::contextual_keyword(token));
        }
        self.expect_identifier()
    }

    /// The contextual keyword `word`
    fn expect_word(&mut self, word: &str) -> SyntaxResult<Token> {
        if self.check_word(word)? {
            self.advance()
        } else {
            Err(self.unexpected(&format!("'{}'", word)))
        }
    }
}

// === NODE CONSTRUCTION ===

/// Wrap `value` with the span and source consumed since `start`
pub fn node<T>(parser: &dyn Parser, start: usize, value: T) -> Syntax<T> {
    let span = parser.span_from(start);
    let source = parser.source_text(&span).to_string();
    Syntax::new(value, span, source)
}

/// Run `production` one nesting level deeper
pub fn guarded<T>(
    parser: &mut dyn Parser,
    context: &'static str,
    production: impl FnOnce(&mut dyn Parser) -> SyntaxResult<T>,
) -> SyntaxResult<T> {
    parser.enter(context)?;
    let result = production(&mut *parser);
    parser.exit();
    result
}

/// Run `production` with lambda recognition switched on or off
pub fn with_lambdas<T>(
    parser: &mut dyn Parser,
    allowed: bool,
    production: impl FnOnce(&mut dyn Parser) -> SyntaxResult<T>,
) -> SyntaxResult<T> {
    let previous = parser.set_lambdas_allowed(allowed);
    let result = production(&mut *parser);
    parser.set_lambdas_allowed(previous);
    result
}

// === ATOMIC BUILDERS ===

/// qualified_name ::= identifier ("." identifier)*
pub fn parse_qualified_name(parser: &mut dyn Parser) -> SyntaxResult<Vec<Identifier>> {
    let mut names = vec![parser.expect_identifier()?];
    while parser.check(TokenKind::Dot)? && parser.peek_kind(1)? == TokenKind::Identifier {
        parser.advance()?;
        names.push(parser.expect_identifier()?);
    }
    Ok(names)
}

/// Comma-separated identifiers
pub fn parse_identifier_list(parser: &mut dyn Parser) -> SyntaxResult<Vec<Identifier>> {
    let mut names = vec![parser.expect_identifier()?];
    while parser.eat(TokenKind::Comma)? {
        names.push(parser.expect_identifier()?);
    }
    Ok(names)
}

/// Literal token. Decimal `2147483648` and `9223372036854775808L` are only
/// accepted when `negated`.
pub fn parse_literal(parser: &mut dyn Parser, negated: bool) -> SyntaxResult<Literal> {
    let kind = parser.current_kind()?;
    let Some(literal_kind) = LiteralKind::from_token(kind) else {
        return Err(parser.unexpected("literal"));
    };

    let token = parser.peek(0)?;
    if let Some(value) = &token.value {
        let long = kind == TokenKind::LongLiteral;
        let integral = matches!(kind, TokenKind::IntLiteral | TokenKind::LongLiteral);
        if integral && !negated && is_negation_only(value, long) {
            return Err(SyntaxError::grammar_violation(
                "integer literal is too large unless negated",
                token,
            ));
        }
    }

    let token = parser.advance()?;
    Ok(Literal {
        kind: literal_kind,
        value: token.value,
        text: token.source,
    })
}

/// Count `[]` pairs
pub fn parse_empty_dimensions(parser: &mut dyn Parser) -> SyntaxResult<usize> {
    let mut count = 0;
    while parser.check(TokenKind::LBracket)? && parser.peek_kind(1)? == TokenKind::RBracket {
        parser.advance()?;
        parser.advance()?;
        count += 1;
    }
    Ok(count)
}

/// Consume a single `>`, splitting `>>` and `>>>` when needed
pub fn expect_closing_angle(parser: &mut dyn Parser) -> SyntaxResult<()> {
    if parser.split_greater()? {
        parser.advance()?;
        Ok(())
    } else {
        Err(parser.unexpected("'>'"))
    }
}

/// `non-sealed`, which lexes as three adjacent tokens
pub fn at_non_sealed(parser: &mut dyn Parser) -> SyntaxResult<bool> {
    if !parser.check_word("non")? || parser.peek_kind(1)? != TokenKind::Minus {
        return Ok(false);
    }
    if !parser.peek_is_word(2, "sealed")? {
        return Ok(false);
    }
    let non_end = parser.peek(0)?.span.end.offset;
    let minus = parser.peek(1)?.span;
    let sealed_start = parser.peek(2)?.span.start.offset;
    Ok(non_end == minus.start.offset && minus.end.offset == sealed_start)
}
