//! Parser state over a pull-based token stream
//!
//! `JavaParser` owns the token cursor and the bookkeeping the grammar
//! builders rely on: the context stack, the recursion guard, the lambda
//! switch and a bounded history of failed parses.

use crate::config::compile_time::syntax::*;
use crate::config::runtime::{LexicalPreferences, SyntaxPreferences};
use crate::grammar::ast::{CompilationUnitNode, ExpressionNode, StatementNode, TypeNode};
use crate::grammar::builders::{self, helpers, ParenKind, Parser};
use crate::logging::codes;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::{Token, TokenStream};
use crate::utils::Span;
use crate::{log_debug, log_error, log_success, log_warning};
use std::collections::VecDeque;

/// Parser checkpoint for backtracking
#[derive(Debug, Clone)]
pub struct ParserCheckpoint {
    /// Position in token stream
    pub position: usize,
    /// Context stack snapshot
    pub context_stack: Vec<String>,
    pub parse_depth: usize,
    pub lambdas_allowed: bool,
}

pub struct JavaParser<'src> {
    tokens: TokenStream<'src>,
    context_stack: Vec<String>,
    error_history: VecDeque<SyntaxError>,
    parse_depth: usize,
    lambdas_allowed: bool,
    preferences: SyntaxPreferences,
}

impl<'src> JavaParser<'src> {
    pub fn new(text: &'src str) -> Self {
        Self::with_preferences(text, LexicalPreferences::default(), SyntaxPreferences::default())
    }

    pub fn with_preferences(
        text: &'src str,
        lexical: LexicalPreferences,
        preferences: SyntaxPreferences,
    ) -> Self {
        log_debug!("Creating Java parser", "bytes" => text.len());

        Self {
            tokens: TokenStream::with_preferences(text, lexical),
            context_stack: Vec::new(),
            error_history: VecDeque::new(),
            parse_depth: 0,
            lambdas_allowed: true,
            preferences,
        }
    }

    pub fn tokens(&self) -> &TokenStream<'src> {
        &self.tokens
    }

    // === ENTRY POINTS ===

    /// Parse a whole source file
    pub fn parse_compilation_unit(&mut self) -> SyntaxResult<CompilationUnitNode> {
        self.run("compilation unit", builders::parse_compilation_unit)
    }

    /// Parse exactly one statement followed by end of input
    pub fn parse_statement(&mut self) -> SyntaxResult<StatementNode> {
        self.run("statement", builders::parse_statement)
    }

    /// Parse exactly one expression followed by end of input
    pub fn parse_expression(&mut self) -> SyntaxResult<ExpressionNode> {
        self.run("expression", builders::parse_expression)
    }

    /// Parse exactly one type followed by end of input
    pub fn parse_type(&mut self) -> SyntaxResult<TypeNode> {
        self.run("type", builders::parse_type)
    }

    /// Classify the parenthesized prefix at the cursor without consuming it
    pub fn classify_paren(&mut self) -> SyntaxResult<ParenKind> {
        helpers::classify_paren(self)
    }

    /// Run an entry production, require end of input, then log the outcome
    fn run<T>(
        &mut self,
        production: &'static str,
        build: fn(&mut dyn Parser) -> SyntaxResult<T>,
    ) -> SyntaxResult<T> {
        self.push_context(production);
        let result = build(self).and_then(|value| {
            self.expect_end()?;
            Ok(value)
        });

        match &result {
            Ok(_) => {
                if self.preferences.log_parse_summary {
                    log_success!(
                        codes::success::AST_CONSTRUCTION_COMPLETE,
                        "Parse completed",
                        "production" => production,
                        "tokens" => self.tokens.buffered_count()
                    );
                }
            }
            Err(error) => {
                self.record_error(error.clone());
                match error.span() {
                    Some(span) => log_error!(error.error_code(), "Parse failed",
                        span = span,
                        "production" => production,
                        "context" => self.current_context(),
                        "error" => error.to_string()
                    ),
                    None => log_error!(error.error_code(), "Parse failed",
                        "production" => production,
                        "context" => self.current_context(),
                        "error" => error.to_string()
                    ),
                }
            }
        }

        // Builders may fail while nested; entry points always leave a clean state
        self.context_stack.clear();
        self.parse_depth = 0;
        self.lambdas_allowed = true;
        result
    }

    /// Fail unless only end of input remains
    pub fn expect_end(&mut self) -> SyntaxResult<()> {
        if self.tokens.is_at_end()? {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    // === ERROR HISTORY ===

    fn record_error(&mut self, error: SyntaxError) {
        if !self.preferences.record_error_history {
            return;
        }
        if self.error_history.len() >= MAX_ERROR_HISTORY {
            self.error_history.pop_front();
        }
        self.error_history.push_back(error);
    }

    /// Recent failures, oldest first
    pub fn error_history(&self) -> Vec<&SyntaxError> {
        self.error_history.iter().collect()
    }

    // === BACKTRACKING SUPPORT ===

    pub fn save_checkpoint(&self) -> ParserCheckpoint {
        ParserCheckpoint {
            position: self.tokens.save_position(),
            context_stack: self.context_stack.clone(),
            parse_depth: self.parse_depth,
            lambdas_allowed: self.lambdas_allowed,
        }
    }

    pub fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint) {
        log_debug!("Restoring parser checkpoint",
            "position" => checkpoint.position,
            "context" => checkpoint.context_stack.join(" -> ")
        );
        self.tokens.restore_position(checkpoint.position);
        self.context_stack = checkpoint.context_stack;
        self.parse_depth = checkpoint.parse_depth;
        self.lambdas_allowed = checkpoint.lambdas_allowed;
    }

    /// Try a production, rewinding everything it consumed on failure
    pub fn try_parse<T, F>(&mut self, parse_fn: F) -> Option<T>
    where
        F: FnOnce(&mut Self) -> SyntaxResult<T>,
    {
        let checkpoint = self.save_checkpoint();
        match parse_fn(self) {
            Ok(result) => Some(result),
            Err(error) => {
                log_debug!("Speculative parse failed, restoring checkpoint",
                    "error" => error.to_string()
                );
                self.restore_checkpoint(checkpoint);
                None
            }
        }
    }

    // === CONTEXT TRACKING ===

    /// Push a parsing context, dropping the oldest past the stack limit
    pub fn push_context(&mut self, context: &str) {
        if self.context_stack.len() >= MAX_CONTEXT_STACK_DEPTH {
            log_warning!("Context stack depth limit reached, dropping oldest context");
            self.context_stack.remove(0);
        }
        self.context_stack.push(context.to_string());
    }

    pub fn pop_context(&mut self) {
        self.context_stack.pop();
    }

    pub fn current_context(&self) -> String {
        self.context_stack.join(" -> ")
    }

    pub fn parse_depth(&self) -> usize {
        self.parse_depth
    }

    // === DIAGNOSTICS ===

    pub fn diagnostic_info(&self) -> String {
        format!(
            "Parser State:\n{}\nContext: {}\nError History: {}\nParse Depth: {}/{}",
            self.tokens.diagnostic(),
            self.current_context(),
            self.error_history.len(),
            self.parse_depth,
            MAX_PARSE_DEPTH
        )
    }

    /// Render `error` against the source with a caret underline
    pub fn format_error(&self, error: &SyntaxError) -> String {
        let span = error
            .span()
            .unwrap_or_else(|| Span::at(self.tokens.source_map().position_at(error.offset())));
        self.tokens.format_error(span, &error.to_string())
    }

    pub fn validate_state(&self) -> Result<(), String> {
        if self.context_stack.len() > MAX_CONTEXT_STACK_DEPTH {
            return Err(format!(
                "Context stack depth {} exceeds maximum {}",
                self.context_stack.len(),
                MAX_CONTEXT_STACK_DEPTH
            ));
        }
        if self.parse_depth > MAX_PARSE_DEPTH {
            return Err(format!(
                "Parse depth {} exceeds maximum {}",
                self.parse_depth, MAX_PARSE_DEPTH
            ));
        }
        if self.error_history.len() > MAX_ERROR_HISTORY {
            return Err(format!(
                "Error history {} exceeds maximum {}",
                self.error_history.len(),
                MAX_ERROR_HISTORY
            ));
        }
        Ok(())
    }
}

impl Parser for JavaParser<'_> {
    fn peek(&mut self, n: usize) -> SyntaxResult<&Token> {
        Ok(self.tokens.peek_ahead(n)?)
    }

    fn advance(&mut self) -> SyntaxResult<Token> {
        Ok(self.tokens.advance()?)
    }

    fn save_position(&self) -> usize {
        self.tokens.save_position()
    }

    fn restore_position(&mut self, position: usize) {
        self.tokens.restore_position(position);
    }

    fn split_greater(&mut self) -> SyntaxResult<bool> {
        Ok(self.tokens.split_greater()?)
    }

    fn span_from(&self, start: usize) -> Span {
        self.tokens.span_from(start)
    }

    fn source_text(&self, span: &Span) -> &str {
        self.tokens.source_text(span)
    }

    fn enter(&mut self, context: &'static str) -> SyntaxResult<()> {
        if self.parse_depth >= MAX_PARSE_DEPTH {
            let token = self.tokens.current()?.clone();
            log_debug!("Parse depth limit reached",
                "depth" => self.parse_depth,
                "context" => context
            );
            return Err(SyntaxError::max_recursion_depth(&token));
        }
        self.parse_depth += 1;
        self.push_context(context);
        Ok(())
    }

    fn exit(&mut self) {
        self.parse_depth = self.parse_depth.saturating_sub(1);
        self.pop_context();
    }

    fn lambdas_allowed(&self) -> bool {
        self.lambdas_allowed
    }

    fn set_lambdas_allowed(&mut self, allowed: bool) -> bool {
        std::mem::replace(&mut self.lambdas_allowed, allowed)
    }

    fn preferences(&self) -> &SyntaxPreferences {
        &self.preferences
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::{Expression, Node, Statement};
    use crate::tokens::TokenKind;
    use assert_matches::assert_matches;

    #[test]
    fn test_context_management() {
        let mut parser = JavaParser::new("");
        assert_eq!(parser.current_context(), "");
        parser.push_context("test");
        assert_eq!(parser.current_context(), "test");
        parser.push_context("nested");
        assert_eq!(parser.current_context(), "test -> nested");
        parser.pop_context();
        assert_eq!(parser.current_context(), "test");
        parser.pop_context();
        assert_eq!(parser.current_context(), "");
    }

    #[test]
    fn test_context_depth_limiting() {
        let mut parser = JavaParser::new("");
        for i in 0..(MAX_CONTEXT_STACK_DEPTH + 5) {
            parser.push_context(&format!("context_{}", i));
        }
        assert!(parser.context_stack.len() <= MAX_CONTEXT_STACK_DEPTH);
        assert!(parser.current_context().ends_with(&format!(
            "context_{}",
            MAX_CONTEXT_STACK_DEPTH + 4
        )));
    }

    #[test]
    fn test_failed_parses_are_recorded() {
        let mut parser = JavaParser::new("a +");
        assert!(parser.parse_expression().is_err());
        let history = parser.error_history();
        assert_eq!(history.len(), 1);
        assert_matches!(history[0], SyntaxError::UnexpectedEndOfInput { offset: 3, .. });
    }

    #[test]
    fn test_error_history_limiting() {
        let mut parser = JavaParser::new("?");
        for _ in 0..(MAX_ERROR_HISTORY + 5) {
            assert!(parser.parse_expression().is_err());
        }
        assert!(parser.error_history.len() <= MAX_ERROR_HISTORY);
        assert!(parser.validate_state().is_ok());
    }

    #[test]
    fn test_checkpoint_system() {
        let mut parser = JavaParser::new("x y z");
        parser.push_context("test_context");
        let checkpoint = parser.save_checkpoint();
        parser.push_context("modified_context");
        parser.advance().unwrap();
        parser.set_lambdas_allowed(false);
        assert!(parser.current_context().contains("modified_context"));

        parser.restore_checkpoint(checkpoint);
        assert_eq!(parser.current_context(), "test_context");
        assert_eq!(parser.peek(0).unwrap().source, "x");
        assert!(parser.lambdas_allowed());
    }

    #[test]
    fn test_try_parse_rewinds_on_failure() {
        let mut parser = JavaParser::new("List<String> x");
        let parsed = parser.try_parse(|p| {
            builders::parse_expression(p)?;
            p.expect(TokenKind::Semicolon)
        });
        assert!(parsed.is_none());
        assert_eq!(parser.save_position(), 0);

        let parsed = parser.try_parse(|p| builders::parse_type(p));
        assert_eq!(parsed.unwrap().generate(), "List<String>");
        assert_eq!(parser.peek(0).unwrap().source, "x");
    }

    #[test]
    fn test_entry_points_require_end_of_input() {
        let mut parser = JavaParser::new("a + b c");
        let error = parser.parse_expression().unwrap_err();
        assert_eq!(error.found(), "c");
        assert_eq!(error.offset(), 6);

        let mut parser = JavaParser::new("return x;");
        assert_matches!(
            parser.parse_statement().unwrap().node,
            Statement::Return { value: Some(_) }
        );
    }

    #[test]
    fn test_depth_limit_is_an_error() {
        // Debug builds need more than the default test thread stack
        let handle = std::thread::Builder::new()
            .stack_size(64 << 20)
            .spawn(|| {
                let depth = MAX_PARSE_DEPTH + 1;
                let text = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
                let mut parser = JavaParser::new(&text);
                assert_matches!(
                    parser.parse_expression(),
                    Err(SyntaxError::MaxRecursionDepth { .. })
                );
                assert_eq!(parser.parse_depth(), 0);
                assert!(parser.validate_state().is_ok());
            })
            .unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_state_resets_between_entry_points() {
        let mut parser = JavaParser::new("switch (x) { case 1 -> y; }");
        assert_matches!(
            parser.parse_expression().unwrap().node,
            Expression::Switch { .. }
        );
        assert!(parser.lambdas_allowed());
        assert_eq!(parser.current_context(), "");
        assert_eq!(parser.parse_depth(), 0);
    }

    #[test]
    fn test_classify_paren_leaves_cursor() {
        let mut parser = JavaParser::new("(String) b");
        assert_eq!(parser.classify_paren().unwrap(), ParenKind::Cast);
        assert_eq!(parser.save_position(), 0);
    }

    #[test]
    fn test_format_error_underlines_offending_token() {
        let mut parser = JavaParser::new("int x = ;");
        let error = parser.parse_statement().unwrap_err();
        let rendered = parser.format_error(&error);
        assert!(rendered.contains("int x = ;"));
        assert!(rendered.contains('^'));
    }

    #[test]
    fn test_diagnostic_info() {
        let parser = JavaParser::new("");
        let diagnostic = parser.diagnostic_info();
        assert!(diagnostic.contains("Parser State:"));
        assert!(diagnostic.contains("Context:"));
        assert!(diagnostic.contains("Error History:"));
        assert!(diagnostic.contains("Parse Depth:"));
    }
}
