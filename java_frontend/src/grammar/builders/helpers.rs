//! Lookahead helpers for the grammar's ambiguous positions
//!
//! A [`Scanner`] walks the token cursor by kind only and rewinds it when
//! dropped, so none of these checks consume input or build nodes. Scans are
//! capped at `MAX_LOOKAHEAD_TOKENS` tokens; a scan that runs out of budget
//! answers "no".

use crate::config::compile_time::syntax::MAX_LOOKAHEAD_TOKENS;
use crate::grammar::builders::atomic::Parser;
use crate::grammar::keywords::Keyword;
use crate::log_debug;
use crate::syntax::SyntaxResult;
use crate::tokens::TokenKind;
use serde::Serialize;
use std::fmt;

/// What a `(` opens in expression position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParenKind {
    Parenthesized,
    Cast,
    /// `(int a, String b) -> ...`
    ExplicitLambda,
    /// `(a, b) -> ...`
    ImplicitLambda,
}

impl ParenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParenKind::Parenthesized => "parenthesized",
            ParenKind::Cast => "cast",
            ParenKind::ExplicitLambda => "explicit_lambda",
            ParenKind::ImplicitLambda => "implicit_lambda",
        }
    }

    pub fn is_lambda(&self) -> bool {
        matches!(self, ParenKind::ExplicitLambda | ParenKind::ImplicitLambda)
    }
}

impl fmt::Display for ParenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary expressions that have to be parsed as a type first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePrimary {
    /// `List<String>::size`, `String[]::new`
    MethodReference,
    /// `String[].class`
    ClassLiteral,
}

/// Kind-level cursor over the parser's tokens
pub struct Scanner<'p> {
    parser: &'p mut dyn Parser,
    start: usize,
    consumed: usize,
    /// `>` left over from a partially consumed `>>` or `>>>`
    pending_gt: usize,
    saw_type_arguments: bool,
    saw_dimensions: bool,
}

impl<'p> Scanner<'p> {
    pub fn new(parser: &'p mut dyn Parser) -> Self {
        let start = parser.save_position();
        Self {
            parser,
            start,
            consumed: 0,
            pending_gt: 0,
            saw_type_arguments: false,
            saw_dimensions: false,
        }
    }

    fn kind(&mut self, n: usize) -> SyntaxResult<TokenKind> {
        if self.pending_gt == 0 {
            return self.parser.peek_kind(n);
        }
        if n < self.pending_gt {
            Ok(TokenKind::Gt)
        } else {
            self.parser.peek_kind(n - self.pending_gt + 1)
        }
    }

    fn bump(&mut self) -> SyntaxResult<()> {
        self.consumed += 1;
        if self.pending_gt > 0 {
            self.pending_gt -= 1;
            if self.pending_gt == 0 {
                self.parser.advance()?;
            }
            return Ok(());
        }
        self.parser.advance()?;
        Ok(())
    }

    /// Consume one `>` out of `>`, `>>` or `>>>`
    fn bump_closing_angle(&mut self) -> SyntaxResult<bool> {
        if self.pending_gt > 0 {
            self.bump()?;
            return Ok(true);
        }
        match self.parser.current_kind()? {
            TokenKind::Gt => self.bump()?,
            TokenKind::Shr => {
                self.consumed += 1;
                self.pending_gt = 1;
            }
            TokenKind::UShr => {
                self.consumed += 1;
                self.pending_gt = 2;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn exhausted(&self) -> bool {
        self.consumed > MAX_LOOKAHEAD_TOKENS
    }

    fn rewind(&mut self, position: usize) {
        self.parser.restore_position(position);
        self.consumed = 0;
        self.pending_gt = 0;
        self.saw_type_arguments = false;
        self.saw_dimensions = false;
    }

    /// Skip a bracketed group opened by the current token
    fn skip_balanced(&mut self) -> SyntaxResult<bool> {
        let mut depth = 0usize;
        loop {
            if self.exhausted() {
                return Ok(false);
            }
            match self.kind(0)? {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.bump()?;
                        return Ok(true);
                    }
                }
                TokenKind::Eof => return Ok(false),
                _ => {}
            }
            self.bump()?;
        }
    }

    fn skip_qualified_name(&mut self) -> SyntaxResult<bool> {
        if self.kind(0)? != TokenKind::Identifier {
            return Ok(false);
        }
        self.bump()?;
        while self.kind(0)? == TokenKind::Dot && self.kind(1)? == TokenKind::Identifier {
            self.bump()?;
            self.bump()?;
        }
        Ok(true)
    }

    fn at_annotation(&mut self) -> SyntaxResult<bool> {
        Ok(self.kind(0)? == TokenKind::At
            && self.kind(1)? != TokenKind::Keyword(Keyword::Interface))
    }

    fn skip_annotation(&mut self) -> SyntaxResult<bool> {
        self.bump()?;
        if !self.skip_qualified_name()? {
            return Ok(false);
        }
        if self.kind(0)? == TokenKind::LParen {
            return self.skip_balanced();
        }
        Ok(true)
    }

    fn skip_annotations(&mut self) -> SyntaxResult<bool> {
        while self.at_annotation()? {
            if !self.skip_annotation()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Skip `final` and annotations; true if any were present
    fn skip_modifiers(&mut self) -> SyntaxResult<bool> {
        let mut any = false;
        loop {
            if self.kind(0)? == TokenKind::Keyword(Keyword::Final) {
                self.bump()?;
            } else if self.at_annotation()? {
                if !self.skip_annotation()? {
                    return Ok(any);
                }
            } else {
                return Ok(any);
            }
            any = true;
        }
    }

    fn skip_type_arguments(&mut self) -> SyntaxResult<bool> {
        self.bump()?;
        self.saw_type_arguments = true;
        if self.bump_closing_angle()? {
            return Ok(true);
        }
        loop {
            if self.exhausted() || !self.skip_annotations()? {
                return Ok(false);
            }
            if self.kind(0)? == TokenKind::Question {
                self.bump()?;
                if matches!(
                    self.kind(0)?,
                    TokenKind::Keyword(Keyword::Extends) | TokenKind::Keyword(Keyword::Super)
                ) {
                    self.bump()?;
                    if !self.skip_type()? {
                        return Ok(false);
                    }
                }
            } else if !self.skip_type()? {
                return Ok(false);
            }
            if self.kind(0)? == TokenKind::Comma {
                self.bump()?;
                continue;
            }
            return self.bump_closing_angle();
        }
    }

    fn skip_type(&mut self) -> SyntaxResult<bool> {
        if !self.skip_annotations()? {
            return Ok(false);
        }
        match self.kind(0)? {
            TokenKind::Keyword(keyword) if keyword.is_primitive_type() => self.bump()?,
            TokenKind::Identifier => {
                self.bump()?;
                if self.kind(0)? == TokenKind::Lt && !self.skip_type_arguments()? {
                    return Ok(false);
                }
                while self.kind(0)? == TokenKind::Dot
                    && matches!(self.kind(1)?, TokenKind::Identifier | TokenKind::At)
                {
                    self.bump()?;
                    if !self.skip_annotations()? || self.kind(0)? != TokenKind::Identifier {
                        return Ok(false);
                    }
                    self.bump()?;
                    if self.kind(0)? == TokenKind::Lt && !self.skip_type_arguments()? {
                        return Ok(false);
                    }
                }
            }
            _ => return Ok(false),
        }
        while self.kind(0)? == TokenKind::LBracket && self.kind(1)? == TokenKind::RBracket {
            self.bump()?;
            self.bump()?;
            self.saw_dimensions = true;
        }
        Ok(true)
    }

    /// Number of identifiers in `a, b, c`, or `None` if anything else appears
    fn skip_identifier_list(&mut self) -> SyntaxResult<Option<usize>> {
        let mut count = 0;
        loop {
            if self.exhausted() || self.kind(0)? != TokenKind::Identifier {
                return Ok(None);
            }
            self.bump()?;
            count += 1;
            if self.kind(0)? != TokenKind::Comma {
                return Ok(Some(count));
            }
            self.bump()?;
        }
    }

    /// `[modifiers] Type [...] name[]` entries separated by commas
    fn skip_formal_parameters(&mut self) -> SyntaxResult<bool> {
        loop {
            if self.exhausted() {
                return Ok(false);
            }
            self.skip_modifiers()?;
            if !self.skip_type()? {
                return Ok(false);
            }
            if self.kind(0)? == TokenKind::Ellipsis {
                self.bump()?;
            }
            if self.kind(0)? != TokenKind::Identifier {
                return Ok(false);
            }
            self.bump()?;
            while self.kind(0)? == TokenKind::LBracket && self.kind(1)? == TokenKind::RBracket {
                self.bump()?;
                self.bump()?;
            }
            if self.kind(0)? != TokenKind::Comma {
                return Ok(true);
            }
            self.bump()?;
        }
    }

    /// A cast target, `&` intersections included. `Some(true)` for a
    /// primitive type.
    fn skip_cast_type(&mut self) -> SyntaxResult<Option<bool>> {
        if !self.skip_annotations()? {
            return Ok(None);
        }
        let primitive = matches!(self.kind(0)?, TokenKind::Keyword(k) if k.is_primitive_type());
        if !self.skip_type()? {
            return Ok(None);
        }
        let mut intersection = false;
        while self.kind(0)? == TokenKind::Amp {
            self.bump()?;
            if !self.skip_type()? {
                return Ok(None);
            }
            intersection = true;
        }
        Ok(Some(primitive && !intersection))
    }

    /// Classify the group opened by the current `(`
    pub fn classify_paren(&mut self) -> SyntaxResult<ParenKind> {
        let open = self.parser.save_position();

        // Followed by `->`: a lambda either way
        if self.skip_balanced()? && self.kind(0)? == TokenKind::Arrow {
            self.rewind(open);
            self.bump()?;
            if self.kind(0)? == TokenKind::RParen {
                return Ok(ParenKind::ImplicitLambda);
            }
            let names = self.skip_identifier_list()?;
            if names.is_some() && self.kind(0)? == TokenKind::RParen {
                return Ok(ParenKind::ImplicitLambda);
            }
            return Ok(ParenKind::ExplicitLambda);
        }

        self.rewind(open);
        self.bump()?;
        if let Some(count) = self.skip_identifier_list()? {
            if count >= 2 && self.kind(0)? == TokenKind::RParen {
                return Ok(ParenKind::ImplicitLambda);
            }
        }

        self.rewind(open);
        self.bump()?;
        if self.skip_formal_parameters()? && self.kind(0)? == TokenKind::RParen {
            return Ok(ParenKind::ExplicitLambda);
        }

        self.rewind(open);
        self.bump()?;
        if let Some(primitive) = self.skip_cast_type()? {
            if self.kind(0)? == TokenKind::RParen {
                self.bump()?;
                if primitive || starts_cast_operand(self.kind(0)?) {
                    return Ok(ParenKind::Cast);
                }
            }
        }

        Ok(ParenKind::Parenthesized)
    }
}

impl Drop for Scanner<'_> {
    fn drop(&mut self) {
        self.parser.restore_position(self.start);
    }
}

/// Tokens that can start the operand of a reference cast but cannot
/// continue an infix expression
fn starts_cast_operand(kind: TokenKind) -> bool {
    match kind {
        TokenKind::Identifier | TokenKind::LParen | TokenKind::Bang | TokenKind::Tilde => true,
        TokenKind::Keyword(keyword) => {
            keyword.is_primitive_type()
                || matches!(
                    keyword,
                    Keyword::This | Keyword::Super | Keyword::New | Keyword::Switch | Keyword::Void
                )
        }
        other => other.is_literal(),
    }
}

// === PREDICATES ===

/// Classify the `(` at the cursor without consuming anything
pub fn classify_paren(parser: &mut dyn Parser) -> SyntaxResult<ParenKind> {
    let offset = parser.peek(0)?.offset();
    let kind = Scanner::new(parser).classify_paren()?;
    if parser.preferences().log_paren_classification {
        log_debug!("Parenthesis classified", "kind" => kind, "offset" => offset);
    }
    Ok(kind)
}

/// `Type name` at the cursor
pub fn is_local_variable_declaration(parser: &mut dyn Parser) -> SyntaxResult<bool> {
    let mut scanner = Scanner::new(parser);
    Ok(scanner.skip_type()? && scanner.kind(0)? == TokenKind::Identifier)
}

/// `[final] Type name :` just inside a `for (`
pub fn is_enhanced_for(parser: &mut dyn Parser) -> SyntaxResult<bool> {
    let mut scanner = Scanner::new(parser);
    scanner.skip_modifiers()?;
    Ok(scanner.skip_type()?
        && scanner.kind(0)? == TokenKind::Identifier
        && scanner.kind(1)? == TokenKind::Colon)
}

/// A type or record pattern rather than a constant in a `case` label
pub fn is_pattern_start(parser: &mut dyn Parser) -> SyntaxResult<bool> {
    let mut scanner = Scanner::new(parser);
    if scanner.skip_modifiers()? {
        return Ok(true);
    }
    Ok(scanner.skip_type()?
        && matches!(scanner.kind(0)?, TokenKind::Identifier | TokenKind::LParen))
}

/// Generic or array types in primary position
pub fn type_primary(parser: &mut dyn Parser) -> SyntaxResult<Option<TypePrimary>> {
    let mut scanner = Scanner::new(parser);
    if !scanner.skip_type()? || !(scanner.saw_type_arguments || scanner.saw_dimensions) {
        return Ok(None);
    }
    let primary = match (scanner.kind(0)?, scanner.kind(1)?) {
        (TokenKind::ColonColon, _) => Some(TypePrimary::MethodReference),
        (TokenKind::Dot, TokenKind::Keyword(Keyword::Class)) if scanner.saw_dimensions => {
            Some(TypePrimary::ClassLiteral)
        }
        _ => None,
    };
    Ok(primary)
}

/// `yield` starting a yield statement rather than naming a variable
pub fn is_yield_statement(parser: &mut dyn Parser) -> SyntaxResult<bool> {
    if !parser.check_word("yield")? {
        return Ok(false);
    }
    let next = parser.peek_kind(1)?;
    if matches!(next, TokenKind::PlusPlus | TokenKind::MinusMinus) {
        // `yield++;` updates a variable, `yield ++x;` yields
        return Ok(parser.peek_kind(2)? != TokenKind::Semicolon);
    }
    Ok(!(next.is_assignment_operator()
        || matches!(
            next,
            TokenKind::Dot
                | TokenKind::LBracket
                | TokenKind::ColonColon
                | TokenKind::Arrow
                | TokenKind::Semicolon
        )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::JavaParser;

    fn classify(text: &str) -> ParenKind {
        let mut parser = JavaParser::new(text);
        let kind = classify_paren(&mut parser).unwrap();
        assert_eq!(parser.save_position(), 0, "scan must rewind");
        kind
    }

    #[test]
    fn test_parenthesized() {
        assert_eq!(classify("(1 + 2)"), ParenKind::Parenthesized);
        assert_eq!(classify("(a)"), ParenKind::Parenthesized);
        assert_eq!(classify("(a) + b"), ParenKind::Parenthesized);
        assert_eq!(classify("(a) - b"), ParenKind::Parenthesized);
        assert_eq!(classify("(a < b)"), ParenKind::Parenthesized);
    }

    #[test]
    fn test_casts() {
        assert_eq!(classify("(int)"), ParenKind::Cast);
        assert_eq!(classify("(int[]) -x"), ParenKind::Cast);
        assert_eq!(classify("(String) b"), ParenKind::Cast);
        assert_eq!(classify("(String) !x"), ParenKind::Cast);
        assert_eq!(classify("(List<Map<K, V>>) raw"), ParenKind::Cast);
        assert_eq!(classify("(Runnable & Serializable) () -> {}"), ParenKind::Cast);
    }

    #[test]
    fn test_lambdas() {
        assert_eq!(classify("(a, b)"), ParenKind::ImplicitLambda);
        assert_eq!(classify("() -> 1"), ParenKind::ImplicitLambda);
        assert_eq!(classify("(x) -> x"), ParenKind::ImplicitLambda);
        assert_eq!(classify("(Integer i)"), ParenKind::ExplicitLambda);
        assert_eq!(classify("(final int a, String... rest) -> a"), ParenKind::ExplicitLambda);
    }

    #[test]
    fn test_shift_tokens_inside_type_arguments() {
        let mut parser = JavaParser::new("List<List<String>> names");
        assert!(is_local_variable_declaration(&mut parser).unwrap());
        assert_eq!(parser.current_kind().unwrap(), TokenKind::Identifier);

        let mut parser = JavaParser::new("a >> b");
        assert!(!is_local_variable_declaration(&mut parser).unwrap());
    }

    #[test]
    fn test_statement_predicates() {
        let mut parser = JavaParser::new("final String s : names");
        assert!(is_enhanced_for(&mut parser).unwrap());

        let mut parser = JavaParser::new("Point(int x, int y) ->");
        assert!(is_pattern_start(&mut parser).unwrap());
        let mut parser = JavaParser::new("Color.RED ->");
        assert!(!is_pattern_start(&mut parser).unwrap());

        let mut parser = JavaParser::new("yield value;");
        assert!(is_yield_statement(&mut parser).unwrap());
        let mut parser = JavaParser::new("yield = 3;");
        assert!(!is_yield_statement(&mut parser).unwrap());
    }

    #[test]
    fn test_type_primary() {
        let mut parser = JavaParser::new("String[]::new");
        assert_eq!(type_primary(&mut parser).unwrap(), Some(TypePrimary::MethodReference));
        let mut parser = JavaParser::new("String[].class");
        assert_eq!(type_primary(&mut parser).unwrap(), Some(TypePrimary::ClassLiteral));
        let mut parser = JavaParser::new("list::size");
        assert_eq!(type_primary(&mut parser).unwrap(), None);
    }
}
