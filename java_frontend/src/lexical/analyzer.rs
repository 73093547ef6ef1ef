//! Table-driven lexical analyzer
//!
//! Each `lex()` call runs the automaton from `LexState::Initial` until it
//! reduces one token. Whitespace and comments reduce to affiliations that
//! queue up and are flushed onto the next token, so no input byte is lost.

use super::classes::classify;
use super::literal::{self, LiteralFault};
use super::transitions::{action, Action, LexFault, LexState};
use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::grammar::keywords::classify_word;
use crate::logging::codes::{self, Code};
use crate::tokens::{Affiliation, AffiliationStyle, Token, TokenKind};
use crate::utils::{Position, Span};
use crate::{log_debug, log_error, log_success};

/// Longest excerpt of source kept in an error
const ERROR_TEXT_PREVIEW: usize = 64;

/// Lexical analysis errors. Every variant carries the offending text and
/// the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid character '{text}' at offset {offset}")]
    InvalidCharacter { text: String, offset: usize },

    #[error("Unterminated string literal {text} at offset {offset}")]
    UnterminatedString { text: String, offset: usize },

    #[error("Unterminated character literal {text} at offset {offset}")]
    UnterminatedChar { text: String, offset: usize },

    #[error("Unterminated text block at offset {offset}")]
    UnterminatedTextBlock { text: String, offset: usize },

    #[error("Unterminated block comment at offset {offset}")]
    UnterminatedComment { text: String, offset: usize },

    #[error("Invalid number '{text}' at offset {offset}: {reason}")]
    InvalidNumber {
        text: String,
        offset: usize,
        reason: &'static str,
    },

    #[error("Invalid escape sequence in {text} at offset {offset}")]
    InvalidEscape { text: String, offset: usize },

    #[error("Invalid character literal {text} at offset {offset}")]
    InvalidCharLiteral { text: String, offset: usize },

    #[error("Text block opening {text} at offset {offset} must end its line")]
    InvalidTextBlockOpening { text: String, offset: usize },

    #[error("Input ended inside '{text}' at offset {offset}")]
    UnexpectedEndOfInput { text: String, offset: usize },

    #[error("Identifier too long: {length} characters (max {MAX_IDENTIFIER_LENGTH}) at offset {offset}")]
    IdentifierTooLong {
        text: String,
        offset: usize,
        length: usize,
    },

    #[error("String too large: {size} bytes (max {MAX_STRING_SIZE}) at offset {offset}")]
    StringTooLarge {
        text: String,
        offset: usize,
        size: usize,
    },

    #[error("Comment too long: {length} bytes (max {MAX_COMMENT_LENGTH}) at offset {offset}")]
    CommentTooLong {
        text: String,
        offset: usize,
        length: usize,
    },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT}) at offset {offset}")]
    TooManyTokens {
        text: String,
        offset: usize,
        count: usize,
    },
}

impl LexerError {
    pub fn error_code(&self) -> Code {
        match self {
            LexerError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            LexerError::UnterminatedChar { .. } => codes::lexical::UNTERMINATED_CHAR,
            LexerError::UnterminatedTextBlock { .. } => codes::lexical::UNTERMINATED_TEXT_BLOCK,
            LexerError::UnterminatedComment { .. } => codes::lexical::UNTERMINATED_COMMENT,
            LexerError::InvalidNumber { .. } => codes::lexical::INVALID_NUMBER,
            LexerError::InvalidEscape { .. } => codes::lexical::INVALID_ESCAPE,
            LexerError::InvalidCharLiteral { .. } => codes::lexical::INVALID_CHAR_LITERAL,
            LexerError::InvalidTextBlockOpening { .. } => {
                codes::lexical::INVALID_TEXT_BLOCK_OPENING
            }
            LexerError::UnexpectedEndOfInput { .. } => codes::lexical::UNEXPECTED_END_OF_INPUT,
            LexerError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            LexerError::StringTooLarge { .. } => codes::lexical::STRING_TOO_LARGE,
            LexerError::CommentTooLong { .. } => codes::lexical::COMMENT_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    /// Offending source text, truncated for very long tokens
    pub fn text(&self) -> &str {
        match self {
            LexerError::InvalidCharacter { text, .. }
            | LexerError::UnterminatedString { text, .. }
            | LexerError::UnterminatedChar { text, .. }
            | LexerError::UnterminatedTextBlock { text, .. }
            | LexerError::UnterminatedComment { text, .. }
            | LexerError::InvalidNumber { text, .. }
            | LexerError::InvalidEscape { text, .. }
            | LexerError::InvalidCharLiteral { text, .. }
            | LexerError::InvalidTextBlockOpening { text, .. }
            | LexerError::UnexpectedEndOfInput { text, .. }
            | LexerError::IdentifierTooLong { text, .. }
            | LexerError::StringTooLarge { text, .. }
            | LexerError::CommentTooLong { text, .. }
            | LexerError::TooManyTokens { text, .. } => text,
        }
    }

    /// Byte offset of the offending text
    pub fn offset(&self) -> usize {
        match self {
            LexerError::InvalidCharacter { offset, .. }
            | LexerError::UnterminatedString { offset, .. }
            | LexerError::UnterminatedChar { offset, .. }
            | LexerError::UnterminatedTextBlock { offset, .. }
            | LexerError::UnterminatedComment { offset, .. }
            | LexerError::InvalidNumber { offset, .. }
            | LexerError::InvalidEscape { offset, .. }
            | LexerError::InvalidCharLiteral { offset, .. }
            | LexerError::InvalidTextBlockOpening { offset, .. }
            | LexerError::UnexpectedEndOfInput { offset, .. }
            | LexerError::IdentifierTooLong { offset, .. }
            | LexerError::StringTooLarge { offset, .. }
            | LexerError::CommentTooLong { offset, .. }
            | LexerError::TooManyTokens { offset, .. } => *offset,
        }
    }

    pub fn severity(&self) -> codes::Severity {
        codes::get_severity(self.error_code().as_str())
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
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(ERROR_TEXT_PREVIEW) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Lexical analysis metrics gated by runtime preferences
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub operator_tokens: usize,
    pub literal_tokens: usize,
    pub affiliation_count: usize,
    pub comment_count: usize,
    pub max_string_length: usize,
    pub max_comment_length: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;

        if preferences.collect_detailed_metrics {
            if token.is_keyword() {
                self.keyword_tokens += 1;
            } else if token.kind == TokenKind::Identifier {
                self.identifier_tokens += 1;
            } else if token.is_operator() {
                self.operator_tokens += 1;
            } else if token.is_literal() {
                self.literal_tokens += 1;
            }
        }

        if preferences.track_length_statistics
            && matches!(token.kind, TokenKind::StringLiteral | TokenKind::TextBlock)
        {
            self.max_string_length = self.max_string_length.max(token.source.len());
        }
    }

    pub(crate) fn record_affiliation(
        &mut self,
        affiliation: &Affiliation,
        preferences: &LexicalPreferences,
    ) {
        if preferences.count_affiliations {
            self.affiliation_count += 1;
        }
        if affiliation.style.is_comment() {
            self.comment_count += 1;
            if preferences.track_length_statistics {
                self.max_comment_length = self.max_comment_length.max(affiliation.text.len());
            }
        }
    }
}

/// Table-driven lexer over one source text
pub struct LexicalAnalyzer<'src> {
    text: &'src str,
    position: Position,
    token_start: Position,
    state: LexState,
    pending: Vec<Affiliation>,
    after_carriage_return: bool,
    finished: bool,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl<'src> LexicalAnalyzer<'src> {
    pub fn new(text: &'src str) -> Self {
        Self::with_preferences(text, LexicalPreferences::default())
    }

    pub fn with_preferences(text: &'src str, preferences: LexicalPreferences) -> Self {
        Self {
            text,
            position: Position::start(),
            token_start: Position::start(),
            state: LexState::Initial,
            pending: Vec::new(),
            after_carriage_return: false,
            finished: false,
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    pub fn source(&self) -> &'src str {
        self.text
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    /// Produce the next token. After the input is exhausted every call
    /// returns an end-of-file token; only the first carries trailing trivia.
    pub fn lex(&mut self) -> Result<Token, LexerError> {
        loop {
            let ch = self.peek_char();
            match action(self.state, classify(ch)) {
                Action::Advance => self.bump(),
                Action::Shift(next) => {
                    self.bump();
                    self.state = next;
                }
                Action::Emit(kind) => return self.reduce(kind),
                Action::Include(kind) => {
                    self.bump();
                    return self.reduce(kind);
                }
                Action::Affiliate(style) => self.reduce_affiliation(style)?,
                Action::IncludeAffiliate(style) => {
                    self.bump();
                    self.reduce_affiliation(style)?;
                }
                Action::Finish => return Ok(self.finish()),
                Action::Fail(fault) => return Err(self.fail(fault, ch)),
            }
        }
    }

    /// Tokenize the remaining input, ending with the end-of-file token
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.lex()?;
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.text
            .get(self.position.offset..)
            .and_then(|rest| rest.chars().next())
    }

    fn bump(&mut self) {
        let Some(ch) = self.peek_char() else {
            return;
        };
        // `\r\n` ends a single line
        self.position = if ch == '\n' && self.after_carriage_return {
            Position::new(self.position.offset + 1, self.position.line, self.position.column)
        } else {
            self.position.advance(ch)
        };
        self.after_carriage_return = ch == '\r';
    }

    fn pending_span(&self) -> Span {
        Span::new(self.token_start, self.position)
    }

    fn reset(&mut self) {
        self.state = LexState::Initial;
        self.token_start = self.position;
    }

    fn reduce(&mut self, kind: TokenKind) -> Result<Token, LexerError> {
        let span = self.pending_span();
        let source = span.slice(self.text);
        let offset = span.start.offset;
        self.reset();

        if self.metrics.total_tokens >= MAX_TOKEN_COUNT {
            return Err(self.report(LexerError::TooManyTokens {
                text: preview(source),
                offset,
                count: self.metrics.total_tokens + 1,
            }, span));
        }

        let kind = match kind {
            TokenKind::Identifier => {
                let length = source.chars().count();
                if length > MAX_IDENTIFIER_LENGTH {
                    return Err(self.report(LexerError::IdentifierTooLong {
                        text: preview(source),
                        offset,
                        length,
                    }, span));
                }
                classify_word(source)
            }
            TokenKind::StringLiteral | TokenKind::TextBlock if source.len() > MAX_STRING_SIZE => {
                return Err(self.report(LexerError::StringTooLarge {
                    text: preview(source),
                    offset,
                    size: source.len(),
                }, span));
            }
            other => other,
        };

        let value = literal::decode(kind, source)
            .map_err(|fault| self.report(literal_error(fault, source, offset), span))?;

        let mut token = Token::new(kind, span, source.to_string())
            .with_affiliations(std::mem::take(&mut self.pending));
        token.value = value;

        self.metrics.record_token(&token, &self.preferences);
        Ok(token)
    }

    fn reduce_affiliation(&mut self, style: AffiliationStyle) -> Result<(), LexerError> {
        let span = self.pending_span();
        let text = span.slice(self.text);
        self.reset();

        let style = match style {
            AffiliationStyle::BlockComment if text.starts_with("/**") && text.len() > 4 => {
                AffiliationStyle::DocComment
            }
            other => other,
        };

        if style.is_comment() && text.len() > MAX_COMMENT_LENGTH {
            return Err(self.report(LexerError::CommentTooLong {
                text: preview(text),
                offset: span.start.offset,
                length: text.len(),
            }, span));
        }

        let affiliation = Affiliation {
            style,
            text: text.to_string(),
            span,
        };
        self.metrics.record_affiliation(&affiliation, &self.preferences);
        self.pending.push(affiliation);
        Ok(())
    }

    fn finish(&mut self) -> Token {
        let span = Span::at(self.position);
        let token = Token::new(TokenKind::Eof, span, String::new())
            .with_affiliations(std::mem::take(&mut self.pending));

        if !self.finished {
            self.finished = true;
            log_debug!("Lexical analysis reached end of input",
                "tokens" => self.metrics.total_tokens,
                "affiliations" => self.metrics.affiliation_count,
                "bytes" => self.text.len()
            );
        }
        token
    }

    fn fail(&mut self, fault: LexFault, ch: Option<char>) -> LexerError {
        let start = self.token_start.offset;
        let mut text = self.pending_span().slice(self.text).to_string();
        if let Some(ch) = ch {
            text.push(ch);
        }
        let text = preview(&text);
        let offset = match fault {
            LexFault::InvalidCharacter if self.state == LexState::Initial => self.position.offset,
            _ => start,
        };

        let error = match fault {
            LexFault::InvalidCharacter => LexerError::InvalidCharacter { text, offset },
            LexFault::InvalidNumber => LexerError::InvalidNumber {
                text,
                offset,
                reason: "malformed numeric literal",
            },
            LexFault::UnterminatedString => LexerError::UnterminatedString { text, offset },
            LexFault::UnterminatedChar => LexerError::UnterminatedChar { text, offset },
            LexFault::UnterminatedTextBlock => LexerError::UnterminatedTextBlock { text, offset },
            LexFault::UnterminatedComment => LexerError::UnterminatedComment { text, offset },
            LexFault::InvalidCharLiteral => LexerError::InvalidCharLiteral { text, offset },
            LexFault::InvalidTextBlockOpening => {
                LexerError::InvalidTextBlockOpening { text, offset }
            }
            LexFault::UnexpectedEnd => LexerError::UnexpectedEndOfInput { text, offset },
        };
        let span = Span::new(self.token_start, self.position);
        self.report(error, span)
    }

    fn report(&self, error: LexerError, span: Span) -> LexerError {
        if self.preferences.include_position_in_errors {
            log_error!(error.error_code(), &error.to_string(),
                span = span,
                "line" => span.start.line,
                "column" => span.start.column
            );
        } else {
            log_error!(error.error_code(), &error.to_string());
        }
        error
    }
}

fn literal_error(fault: LiteralFault, source: &str, offset: usize) -> LexerError {
    let text = preview(source);
    match fault {
        LiteralFault::InvalidNumber(reason) => LexerError::InvalidNumber {
            text,
            offset,
            reason,
        },
        LiteralFault::InvalidEscape(within) => LexerError::InvalidEscape {
            text,
            offset: offset + within,
        },
        LiteralFault::InvalidCharLiteral => LexerError::InvalidCharLiteral { text, offset },
    }
}

/// Tokenize a whole text, logging a completion event
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexerError> {
    tokenize_with_preferences(text, LexicalPreferences::default())
}

pub fn tokenize_with_preferences(
    text: &str,
    preferences: LexicalPreferences,
) -> Result<Vec<Token>, LexerError> {
    let mut analyzer = LexicalAnalyzer::with_preferences(text, preferences);
    let tokens = analyzer.tokenize()?;
    let metrics = analyzer.metrics();
    log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
        "tokens" => metrics.total_tokens,
        "keywords" => metrics.keyword_tokens,
        "identifiers" => metrics.identifier_tokens,
        "comments" => metrics.comment_count
    );
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{reconstruct, LiteralValue, Radix};
    use assert_matches::assert_matches;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text)
            .unwrap()
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    fn single(text: &str) -> Token {
        let tokens = tokenize(text).unwrap();
        assert_eq!(tokens.len(), 2, "{:?}", tokens);
        tokens.into_iter().next().unwrap()
    }

    #[test]
    fn test_numeric_literal_decoding() {
        let octal = single("010");
        assert_eq!(octal.kind, TokenKind::IntLiteral);
        assert_eq!(octal.radix(), Ok(Radix::Octal));
        assert_eq!(octal.int_value(), Ok(8));

        let hex = single("0xFF");
        assert_eq!(hex.radix(), Ok(Radix::Hexadecimal));
        assert_eq!(hex.int_value(), Ok(255));

        let long = single("1L");
        assert_eq!(long.kind, TokenKind::LongLiteral);
        assert_eq!(long.radix(), Ok(Radix::Decimal));
        assert_eq!(long.int_value(), Ok(1));

        let double = single("3.14e-1");
        assert_eq!(double.kind, TokenKind::DoubleLiteral);
        assert!((double.float_value().unwrap() - 0.314).abs() < 1e-12);
    }

    #[test]
    fn test_numeric_kinds_from_suffixes() {
        assert_eq!(single("1f").kind, TokenKind::FloatLiteral);
        assert_eq!(single("1d").kind, TokenKind::DoubleLiteral);
        assert_eq!(single("1.").kind, TokenKind::DoubleLiteral);
        assert_eq!(single(".5").kind, TokenKind::DoubleLiteral);
        assert_eq!(single("0x1p-2f").kind, TokenKind::FloatLiteral);
        assert_eq!(single("0b11L").kind, TokenKind::LongLiteral);
        assert_eq!(single("0xCAFE_BABEL").int_value(), Ok(0xCAFE_BABE));
    }

    #[test]
    fn test_comments_are_affiliations() {
        let tokens = tokenize("1//c\n2").unwrap();
        let literals: Vec<_> = tokens.iter().filter(|t| !t.is_eof()).collect();
        assert_eq!(literals.len(), 2);
        assert_eq!(literals[1].affiliations.len(), 2);
        assert_eq!(literals[1].affiliations[0].style, AffiliationStyle::LineComment);
        assert_eq!(literals[1].affiliations[0].text, "//c");
        assert_eq!(literals[1].affiliations[1].style, AffiliationStyle::Newline);

        let tokens = tokenize("1 /* c */ 2").unwrap();
        let literals: Vec<_> = tokens.iter().filter(|t| !t.is_eof()).collect();
        assert_eq!(literals.len(), 2);
        let styles: Vec<_> = literals[1].affiliations.iter().map(|a| a.style).collect();
        assert_eq!(
            styles,
            vec![
                AffiliationStyle::Space,
                AffiliationStyle::BlockComment,
                AffiliationStyle::Space
            ]
        );
    }

    #[test]
    fn test_doc_comment_style() {
        let token = single("/** docs */ class");
        assert_eq!(token.affiliations[0].style, AffiliationStyle::DocComment);
        let token = single("/**/ x");
        assert_eq!(token.affiliations[0].style, AffiliationStyle::BlockComment);
        let token = single("/***/ x");
        assert_eq!(token.affiliations[0].style, AffiliationStyle::DocComment);
    }

    #[test]
    fn test_trailing_trivia_on_eof() {
        let mut analyzer = LexicalAnalyzer::new("x // done\n");
        assert_eq!(analyzer.lex().unwrap().kind, TokenKind::Identifier);
        let eof = analyzer.lex().unwrap();
        assert!(eof.is_eof());
        assert_eq!(eof.affiliations.len(), 3);
        let again = analyzer.lex().unwrap();
        assert!(again.is_eof());
        assert!(again.affiliations.is_empty());
    }

    #[test]
    fn test_round_trip_fixed_samples() {
        let samples = [
            "",
            "   ",
            "class A { int x = 010; }\r\n",
            "a >>>= b >> 2; c->d; e::f; g...h",
            "/** doc */\n@Override\npublic void m() { /* x */ }\r",
            "String s = \"\\\"q\\\"\"; char c = '\\'';",
            "String t = \"\"\"\n    hi\n    \"\"\";",
            "x\u{0C}y\t//tail",
        ];
        for sample in samples {
            let tokens = tokenize(sample).unwrap();
            assert_eq!(reconstruct(&tokens), sample);
        }
    }

    #[test]
    fn test_operators_extend_greedily() {
        use TokenKind::*;
        assert_eq!(
            kinds("a>>>=b>>=c>=d>>e"),
            vec![Identifier, UShrEq, Identifier, ShrEq, Identifier, GtEq, Identifier, Shr, Identifier, Eof]
        );
        assert_eq!(kinds("<<= -> :: ..."), vec![ShlEq, Arrow, ColonColon, Ellipsis, Eof]);
        assert_eq!(kinds("a/b/=c"), vec![Identifier, Slash, Identifier, SlashEq, Identifier, Eof]);
    }

    #[test]
    fn test_keywords_and_contextual_words() {
        use crate::grammar::keywords::Keyword;
        assert_eq!(
            kinds("class var record true"),
            vec![
                TokenKind::Keyword(Keyword::Class),
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::True,
                TokenKind::Eof
            ]
        );
        assert_eq!(single("_").kind, TokenKind::Identifier);
        assert_eq!(single("$x").kind, TokenKind::Identifier);
        assert_eq!(single("naïve").kind, TokenKind::Identifier);
    }

    #[test]
    fn test_string_and_text_block_values() {
        let s = single("\"a\\tb\"");
        assert_eq!(s.string_value(), Ok("a\tb"));
        assert_eq!(single("\"\"").string_value(), Ok(""));
        let block = single("\"\"\"\n  x\n  \"\"\"");
        assert_eq!(block.kind, TokenKind::TextBlock);
        assert_eq!(block.value, Some(LiteralValue::Str("x\n".to_string())));
        assert_eq!(single("'x'").char_value(), Ok('x'));
    }

    #[test]
    fn test_positions_track_lines() {
        let tokens = tokenize("a\r\nb\nc").unwrap();
        assert_eq!(tokens[1].span.start.line, 2);
        assert_eq!(tokens[1].span.start.column, 1);
        assert_eq!(tokens[2].span.start.line, 3);
        assert_eq!(tokens[2].offset(), 5);
    }

    #[test]
    fn test_lexical_errors() {
        assert_matches!(
            tokenize("a # b"),
            Err(LexerError::InvalidCharacter { ref text, offset: 2 }) if text == "#"
        );
        assert_matches!(tokenize("\"abc\n\""), Err(LexerError::UnterminatedString { offset: 0, .. }));
        assert_matches!(tokenize("x /* open"), Err(LexerError::UnterminatedComment { offset: 2, .. }));
        assert_matches!(tokenize("'a"), Err(LexerError::UnterminatedChar { .. }));
        assert_matches!(tokenize("''"), Err(LexerError::InvalidCharLiteral { .. }));
        assert_matches!(tokenize("'ab'"), Err(LexerError::InvalidCharLiteral { .. }));
        assert_matches!(tokenize("\"\"\"x\"\"\""), Err(LexerError::InvalidTextBlockOpening { .. }));
        assert_matches!(tokenize("\"\"\"\nabc"), Err(LexerError::UnterminatedTextBlock { .. }));
        assert_matches!(tokenize("12abc"), Err(LexerError::InvalidNumber { offset: 0, .. }));
        assert_matches!(tokenize("09"), Err(LexerError::InvalidNumber { .. }));
        assert_matches!(tokenize("0x"), Err(LexerError::InvalidNumber { .. }));
        assert_matches!(tokenize("x = \"\\q\""), Err(LexerError::InvalidEscape { offset: 5, .. }));
        assert_matches!(tokenize(".."), Err(LexerError::InvalidCharacter { .. }));
    }

    #[test]
    fn test_unicode_escapes_only_inside_literals() {
        assert!(tokenize("s = \"\\u0061\";").is_ok());
        assert!(tokenize("c = '\\u0041';").is_ok());
        assert_matches!(
            tokenize("\\u0061 = 1;"),
            Err(LexerError::InvalidCharacter { ref text, offset: 0 }) if text == "\\"
        );
    }

    #[test]
    fn test_error_metadata_lookups() {
        let error = tokenize("#").unwrap_err();
        assert_eq!(error.error_code(), codes::lexical::INVALID_CHARACTER);
        assert_eq!(error.category(), "Lexical");
        assert_eq!(error.offset(), 0);
        assert_eq!(error.text(), "#");
        assert!(!error.description().is_empty());
    }

    #[test]
    fn test_metrics_follow_preferences() {
        let preferences = LexicalPreferences {
            collect_detailed_metrics: true,
            count_affiliations: true,
            track_length_statistics: true,
            include_position_in_errors: false,
        };
        let mut analyzer =
            LexicalAnalyzer::with_preferences("int x = 1; // c\nx++;", preferences);
        analyzer.tokenize().unwrap();
        let metrics = analyzer.metrics();
        assert_eq!(metrics.keyword_tokens, 1);
        assert_eq!(metrics.identifier_tokens, 2);
        assert_eq!(metrics.literal_tokens, 1);
        assert_eq!(metrics.operator_tokens, 2);
        assert_eq!(metrics.comment_count, 1);
        assert_eq!(metrics.max_comment_length, 4);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::tokens::reconstruct;
    use proptest::prelude::*;

    fn fragment() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z_$][a-zA-Z0-9_$]{0,8}",
            "(0|[1-9][0-9]{0,6})",
            "0x[0-9a-fA-F]{1,6}L?",
            "[0-9]{1,4}\\.[0-9]{1,4}(e-?[0-9])?[fFdD]?",
            "\"[a-z \\\\n]{0,10}\"".prop_filter("escape must be complete", |s| {
                literal::decode(TokenKind::StringLiteral, s).is_ok()
            }),
            "'[a-z]'",
            "[ \t]{1,3}",
            "(\n|\r\n|\r)",
            "//[a-z ]{0,10}\n",
            "/\\*[a-z *\n]{0,12}\\*/",
            prop::sample::select(vec![
                "(", ")", "{", "}", "[", "]", ";", ",", ".", "...", "@", "::", "=", "==", "->",
                "<", "<=", "<<", "<<=", ">", ">=", "+", "++", "+=", "-", "--", "&&", "||",
                "?", ":", "!", "!=", "~", "*", "%=", "^", "|", "&",
            ])
            .prop_map(str::to_string),
        ]
    }

    proptest! {
        #[test]
        fn round_trip_reproduces_input(parts in prop::collection::vec(fragment(), 0..24)) {
            // A separating space keeps neighbours from merging into another token
            let text = parts.join(" ");
            let tokens = tokenize(&text).unwrap();
            prop_assert_eq!(reconstruct(&tokens), text);
            prop_assert!(tokens.last().is_some_and(Token::is_eof));
        }

        #[test]
        fn lexing_never_panics(text in "\\PC{0,64}") {
            if let Ok(tokens) = tokenize(&text) {
                prop_assert_eq!(reconstruct(&tokens), text);
            }
        }
    }
}
