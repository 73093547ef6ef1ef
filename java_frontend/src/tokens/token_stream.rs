//! Pull-based, rewindable token cursor over the lexer
//!
//! Tokens are lexed on demand into a buffer, so a checkpoint is just a
//! buffer index. Splitting a `>>`-family token when closing type arguments
//! is logged and undone by `restore_position`, which keeps speculative
//! parses from leaking split tokens into the retry.

use crate::config::runtime::LexicalPreferences;
use crate::lexical::{LexerError, LexicalAnalyzer, LexicalMetrics};
use crate::tokens::token::{Token, TokenKind};
use crate::utils::{Position, SourceMap, Span};

pub struct TokenStream<'src> {
    lexer: LexicalAnalyzer<'src>,
    /// Every token lexed so far, in order
    buffer: Vec<Token>,
    /// Index of the current token in `buffer`
    position: usize,
    /// Buffer index and original token of every active `>` split
    splits: Vec<(usize, Token)>,
    source_map: SourceMap,
}

impl<'src> TokenStream<'src> {
    pub fn new(text: &'src str) -> Self {
        Self::with_preferences(text, LexicalPreferences::default())
    }

    pub fn with_preferences(text: &'src str, preferences: LexicalPreferences) -> Self {
        Self {
            lexer: LexicalAnalyzer::with_preferences(text, preferences),
            buffer: Vec::new(),
            position: 0,
            splits: Vec::new(),
            source_map: SourceMap::new(text.to_string()),
        }
    }

    pub fn text(&self) -> &'src str {
        self.lexer.source()
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        self.lexer.metrics()
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Lex until `index` is buffered or end of file is reached
    fn fill(&mut self, index: usize) -> Result<(), LexerError> {
        while self.buffer.len() <= index {
            if self.buffer.last().is_some_and(Token::is_eof) {
                break;
            }
            let token = self.lexer.lex()?;
            self.buffer.push(token);
        }
        Ok(())
    }

    /// Token `n` places ahead of the cursor. Past the end this is the
    /// end-of-file token.
    pub fn peek_ahead(&mut self, n: usize) -> Result<&Token, LexerError> {
        let index = self.position + n;
        self.fill(index)?;
        let index = index.min(self.buffer.len() - 1);
        Ok(&self.buffer[index])
    }

    pub fn current(&mut self) -> Result<&Token, LexerError> {
        self.peek_ahead(0)
    }

    pub fn current_kind(&mut self) -> Result<TokenKind, LexerError> {
        Ok(self.current()?.kind)
    }

    pub fn peek_kind(&mut self, n: usize) -> Result<TokenKind, LexerError> {
        Ok(self.peek_ahead(n)?.kind)
    }

    /// Consume and return the current token. End of file is never consumed.
    pub fn advance(&mut self) -> Result<Token, LexerError> {
        let token = self.current()?.clone();
        if !token.is_eof() {
            self.position += 1;
        }
        Ok(token)
    }

    /// Most recently consumed token
    pub fn previous(&self) -> Option<&Token> {
        self.position
            .checked_sub(1)
            .and_then(|index| self.buffer.get(index))
    }

    pub fn is_at_end(&mut self) -> Result<bool, LexerError> {
        Ok(self.current()?.is_eof())
    }

    pub fn save_position(&self) -> usize {
        self.position
    }

    /// Rewind to a saved position, undoing splits made after it
    pub fn restore_position(&mut self, saved_position: usize) {
        while let Some((index, _)) = self.splits.last() {
            if *index < saved_position {
                break;
            }
            if let Some((index, original)) = self.splits.pop() {
                self.buffer.remove(index + 1);
                self.buffer[index] = original;
            }
        }
        self.position = saved_position;
    }

    /// Split a leading `>` off the current token when it is `>>`, `>>>`,
    /// `>=`, `>>=` or `>>>=`. Returns whether the current token is now `>`.
    pub fn split_greater(&mut self) -> Result<bool, LexerError> {
        let remainder = match self.current_kind()? {
            TokenKind::Gt => return Ok(true),
            TokenKind::Shr => TokenKind::Gt,
            TokenKind::UShr => TokenKind::Shr,
            TokenKind::GtEq => TokenKind::Assign,
            TokenKind::ShrEq => TokenKind::GtEq,
            TokenKind::UShrEq => TokenKind::ShrEq,
            _ => return Ok(false),
        };

        let index = self.position;
        let original = self.buffer[index].clone();
        let middle = Position::new(
            original.span.start.offset + 1,
            original.span.start.line,
            original.span.start.column + 1,
        );

        let head = Token::new(
            TokenKind::Gt,
            Span::new(original.span.start, middle),
            ">".to_string(),
        )
        .with_affiliations(original.affiliations.clone());
        let tail = Token::new(
            remainder,
            Span::new(middle, original.span.end),
            original.source[1..].to_string(),
        );

        self.buffer[index] = head;
        self.buffer.insert(index + 1, tail);
        self.splits.push((index, original));
        Ok(true)
    }

    /// Span from the token at `start_position` to the last consumed token
    pub fn span_from(&self, start_position: usize) -> Span {
        let start = self
            .buffer
            .get(start_position)
            .map(|t| t.span.start)
            .unwrap_or_default();
        match self.previous() {
            Some(last) if self.position > start_position => Span::new(start, last.span.end),
            _ => Span::at(start),
        }
    }

    /// Tokens consumed between two saved positions
    pub fn tokens_between(&self, start_position: usize, end_position: usize) -> &[Token] {
        let end = end_position.min(self.buffer.len());
        let start = start_position.min(end);
        &self.buffer[start..end]
    }

    pub fn source_text(&self, span: &Span) -> &'src str {
        span.slice(self.text())
    }

    pub fn format_error(&self, span: Span, message: &str) -> String {
        self.source_map.format_error(&span, message)
    }

    pub fn buffered_count(&self) -> usize {
        self.buffer.len()
    }

    pub fn diagnostic(&self) -> String {
        let current = self
            .buffer
            .get(self.position)
            .map(|t| format!("{:?} '{}' at {}", t.kind, t, t.span.start))
            .unwrap_or_else(|| "<not yet lexed>".to_string());
        format!(
            "TokenStream: position {}/{} buffered, {} active splits, current {}",
            self.position,
            self.buffer.len(),
            self.splits.len(),
            current
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::reconstruct;

    #[test]
    fn test_lazy_lexing() {
        let mut stream = TokenStream::new("a b c");
        assert_eq!(stream.buffered_count(), 0);
        assert_eq!(stream.current().unwrap().source, "a");
        assert_eq!(stream.buffered_count(), 1);
        assert_eq!(stream.peek_ahead(2).unwrap().source, "c");
        assert_eq!(stream.buffered_count(), 3);
    }

    #[test]
    fn test_peek_past_end_is_eof() {
        let mut stream = TokenStream::new("x");
        assert!(stream.peek_ahead(10).unwrap().is_eof());
        stream.advance().unwrap();
        assert!(stream.advance().unwrap().is_eof());
        assert!(stream.is_at_end().unwrap());
        assert_eq!(stream.save_position(), 1);
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut stream = TokenStream::new("f ( x )");
        let saved = stream.save_position();
        stream.advance().unwrap();
        stream.advance().unwrap();
        assert_eq!(stream.current().unwrap().source, "x");
        stream.restore_position(saved);
        assert_eq!(stream.current().unwrap().source, "f");
    }

    #[test]
    fn test_split_greater_variants() {
        let mut stream = TokenStream::new("a >>>= b");
        stream.advance().unwrap();
        assert!(stream.split_greater().unwrap());
        let head = stream.advance().unwrap();
        assert_eq!(head.kind, TokenKind::Gt);
        assert_eq!(head.affiliations.len(), 1);
        assert_eq!(stream.current_kind().unwrap(), TokenKind::ShrEq);
        assert_eq!(stream.current().unwrap().span.start.offset, 3);

        let mut stream = TokenStream::new("x + y");
        stream.advance().unwrap();
        assert!(!stream.split_greater().unwrap());
    }

    #[test]
    fn test_restore_undoes_split() {
        let mut stream = TokenStream::new("a >> b");
        stream.advance().unwrap();
        let saved = stream.save_position();
        stream.split_greater().unwrap();
        stream.advance().unwrap();
        stream.split_greater().unwrap();
        stream.advance().unwrap();
        assert_eq!(stream.current().unwrap().source, "b");

        stream.restore_position(saved);
        assert_eq!(stream.current_kind().unwrap(), TokenKind::Shr);
        stream.advance().unwrap();
        stream.advance().unwrap();
        let tokens = stream.tokens_between(0, stream.buffered_count());
        assert_eq!(reconstruct(tokens), "a >> b");
    }

    #[test]
    fn test_span_from() {
        let mut stream = TokenStream::new("  foo . bar");
        let start = stream.save_position();
        stream.advance().unwrap();
        stream.advance().unwrap();
        stream.advance().unwrap();
        let span = stream.span_from(start);
        assert_eq!(stream.source_text(&span), "foo . bar");
        assert!(stream.diagnostic().contains("position 3"));
    }

    #[test]
    fn test_lexer_errors_surface_on_demand() {
        let mut stream = TokenStream::new("a # b");
        assert!(stream.current().is_ok());
        stream.advance().unwrap();
        assert!(stream.current().is_err());
    }
}
