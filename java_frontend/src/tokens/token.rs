//! Token model: kinds, affiliations and decoded literal values
//!
//! A token owns its verbatim source text and the whitespace/comment
//! affiliations that precede it, so concatenating `full_text()` over a token
//! sequence reproduces the input exactly.
use crate::grammar::keywords::Keyword;
use crate::logging::codes::{self, Code};
use crate::utils::Span;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Terminal kinds produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Identifier,
    Keyword(Keyword),

    // Literals
    IntLiteral,
    LongLiteral,
    FloatLiteral,
    DoubleLiteral,
    CharLiteral,
    StringLiteral,
    TextBlock,
    True,
    False,
    Null,

    // Separators
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    At,
    ColonColon,

    // Operators
    Assign,
    Gt,
    Lt,
    Bang,
    Tilde,
    Question,
    Colon,
    Arrow,
    EqEq,
    LtEq,
    GtEq,
    NotEq,
    AndAnd,
    OrOr,
    PlusPlus,
    MinusMinus,
    Plus,
    Minus,
    Star,
    Slash,
    Amp,
    Pipe,
    Caret,
    Percent,
    Shl,
    Shr,
    UShr,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    AmpEq,
    PipeEq,
    CaretEq,
    PercentEq,
    ShlEq,
    ShrEq,
    UShrEq,

    Eof,
}

impl TokenKind {
    /// Fixed spelling for punctuation, operators and keywords
    pub fn symbol(&self) -> Option<&'static str> {
        use TokenKind::*;
        let text = match self {
            Keyword(kw) => kw.as_str(),
            True => "true",
            False => "false",
            Null => "null",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Semicolon => ";",
            Comma => ",",
            Dot => ".",
            Ellipsis => "...",
            At => "@",
            ColonColon => "::",
            Assign => "=",
            Gt => ">",
            Lt => "<",
            Bang => "!",
            Tilde => "~",
            Question => "?",
            Colon => ":",
            Arrow => "->",
            EqEq => "==",
            LtEq => "<=",
            GtEq => ">=",
            NotEq => "!=",
            AndAnd => "&&",
            OrOr => "||",
            PlusPlus => "++",
            MinusMinus => "--",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Amp => "&",
            Pipe => "|",
            Caret => "^",
            Percent => "%",
            Shl => "<<",
            Shr => ">>",
            UShr => ">>>",
            PlusEq => "+=",
            MinusEq => "-=",
            StarEq => "*=",
            SlashEq => "/=",
            AmpEq => "&=",
            PipeEq => "|=",
            CaretEq => "^=",
            PercentEq => "%=",
            ShlEq => "<<=",
            ShrEq => ">>=",
            UShrEq => ">>>=",
            Identifier | IntLiteral | LongLiteral | FloatLiteral | DoubleLiteral
            | CharLiteral | StringLiteral | TextBlock | Eof => return None,
        };
        Some(text)
    }

    /// Short human-readable name used in "expected ..." messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Identifier => "identifier".to_string(),
            TokenKind::IntLiteral => "int literal".to_string(),
            TokenKind::LongLiteral => "long literal".to_string(),
            TokenKind::FloatLiteral => "float literal".to_string(),
            TokenKind::DoubleLiteral => "double literal".to_string(),
            TokenKind::CharLiteral => "char literal".to_string(),
            TokenKind::StringLiteral => "string literal".to_string(),
            TokenKind::TextBlock => "text block".to_string(),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("'{}'", other.symbol().unwrap_or("?")),
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(self, TokenKind::Keyword(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::IntLiteral
                | TokenKind::LongLiteral
                | TokenKind::FloatLiteral
                | TokenKind::DoubleLiteral
                | TokenKind::CharLiteral
                | TokenKind::StringLiteral
                | TokenKind::TextBlock
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    pub fn is_assignment_operator(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Assign
                | PlusEq
                | MinusEq
                | StarEq
                | SlashEq
                | AmpEq
                | PipeEq
                | CaretEq
                | PercentEq
                | ShlEq
                | ShrEq
                | UShrEq
        )
    }

    pub fn is_operator(&self) -> bool {
        use TokenKind::*;
        self.is_assignment_operator()
            || matches!(
                self,
                Gt | Lt
                    | Bang
                    | Tilde
                    | Question
                    | Colon
                    | Arrow
                    | EqEq
                    | LtEq
                    | GtEq
                    | NotEq
                    | AndAnd
                    | OrOr
                    | PlusPlus
                    | MinusMinus
                    | Plus
                    | Minus
                    | Star
                    | Slash
                    | Amp
                    | Pipe
                    | Caret
                    | Percent
                    | Shl
                    | Shr
                    | UShr
                    | ColonColon
            )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Style of a non-token span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AffiliationStyle {
    Space,
    Newline,
    LineComment,
    BlockComment,
    DocComment,
}

impl AffiliationStyle {
    pub fn is_comment(&self) -> bool {
        matches!(
            self,
            Self::LineComment | Self::BlockComment | Self::DocComment
        )
    }
}

/// Whitespace or comment text attached to the following token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Affiliation {
    pub style: AffiliationStyle,
    pub text: String,
    pub span: Span,
}

/// Radix of an integer literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Radix {
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
}

impl Radix {
    pub fn base(&self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }
}

/// Value decoded from a literal's source text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LiteralValue {
    /// Int values are stored sign-extended from 32 bits
    Integer { value: i64, radix: Radix },
    Floating(f64),
    Char(char),
    Str(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token '{text}' ({kind}) carries no {requested} value")]
    NoDecodedValue {
        kind: TokenKind,
        text: String,
        requested: &'static str,
    },
}

impl TokenError {
    pub fn error_code(&self) -> Code {
        codes::lexical::NO_DECODED_VALUE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub affiliations: Vec<Affiliation>,
    pub source: String,
    pub value: Option<LiteralValue>,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, source: String) -> Self {
        Self {
            kind,
            span,
            affiliations: Vec::new(),
            source,
            value: None,
        }
    }

    pub fn with_value(mut self, value: LiteralValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_affiliations(mut self, affiliations: Vec<Affiliation>) -> Self {
        self.affiliations = affiliations;
        self
    }

    /// Byte offset of the token's first character
    pub fn offset(&self) -> usize {
        self.span.start.offset
    }

    /// Affiliations followed by the token's own source
    pub fn full_text(&self) -> String {
        let mut text: String = self.affiliations.iter().map(|a| a.text.as_str()).collect();
        text.push_str(&self.source);
        text
    }

    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }

    pub fn is_literal(&self) -> bool {
        self.kind.is_literal()
    }

    pub fn is_operator(&self) -> bool {
        self.kind.is_operator()
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn has_comment(&self) -> bool {
        self.affiliations.iter().any(|a| a.style.is_comment())
    }

    /// Identifier token whose text is exactly `word`
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.source == word
    }

    fn no_value(&self, requested: &'static str) -> TokenError {
        TokenError::NoDecodedValue {
            kind: self.kind,
            text: self.source.clone(),
            requested,
        }
    }

    pub fn int_value(&self) -> Result<i64, TokenError> {
        match &self.value {
            Some(LiteralValue::Integer { value, .. }) => Ok(*value),
            _ => Err(self.no_value("integer")),
        }
    }

    pub fn radix(&self) -> Result<Radix, TokenError> {
        match &self.value {
            Some(LiteralValue::Integer { radix, .. }) => Ok(*radix),
            _ => Err(self.no_value("radix")),
        }
    }

    pub fn float_value(&self) -> Result<f64, TokenError> {
        match &self.value {
            Some(LiteralValue::Floating(v)) => Ok(*v),
            _ => Err(self.no_value("floating-point")),
        }
    }

    pub fn char_value(&self) -> Result<char, TokenError> {
        match &self.value {
            Some(LiteralValue::Char(c)) => Ok(*c),
            _ => Err(self.no_value("char")),
        }
    }

    pub fn string_value(&self) -> Result<&str, TokenError> {
        match &self.value {
            Some(LiteralValue::Str(s)) => Ok(s),
            _ => Err(self.no_value("string")),
        }
    }

    pub fn bool_value(&self) -> Result<bool, TokenError> {
        match &self.value {
            Some(LiteralValue::Bool(b)) => Ok(*b),
            _ => Err(self.no_value("boolean")),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("<EOF>"),
            _ => f.write_str(&self.source),
        }
    }
}

/// Concatenate the full text of every token
pub fn reconstruct(tokens: &[Token]) -> String {
    tokens.iter().map(Token::full_text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn int_token(source: &str, value: i64, radix: Radix) -> Token {
        Token::new(TokenKind::IntLiteral, Span::dummy(), source.to_string())
            .with_value(LiteralValue::Integer { value, radix })
    }

    #[test]
    fn test_accessors_on_matching_kind() {
        let token = int_token("0x1F", 31, Radix::Hexadecimal);
        assert_eq!(token.int_value(), Ok(31));
        assert_eq!(token.radix(), Ok(Radix::Hexadecimal));
        assert_eq!(token.radix().unwrap().base(), 16);
    }

    #[test]
    fn test_accessors_fail_fast_on_other_kinds() {
        let token = Token::new(TokenKind::Identifier, Span::dummy(), "x".to_string());
        assert_matches!(
            token.int_value(),
            Err(TokenError::NoDecodedValue { kind: TokenKind::Identifier, .. })
        );
        assert!(token.string_value().is_err());
        assert!(token.char_value().is_err());
        assert!(token.float_value().is_err());
        assert_eq!(
            token.int_value().unwrap_err().error_code(),
            codes::lexical::NO_DECODED_VALUE
        );
    }

    #[test]
    fn test_full_text_includes_affiliations() {
        let token = int_token("2", 2, Radix::Decimal).with_affiliations(vec![
            Affiliation {
                style: AffiliationStyle::Space,
                text: " ".to_string(),
                span: Span::from_offsets(1, 2),
            },
            Affiliation {
                style: AffiliationStyle::BlockComment,
                text: "/* c */".to_string(),
                span: Span::from_offsets(2, 9),
            },
        ]);
        assert_eq!(token.full_text(), " /* c */2");
        assert!(token.has_comment());
    }

    #[test]
    fn test_kind_classification() {
        assert!(TokenKind::Keyword(Keyword::Class).is_keyword());
        assert!(TokenKind::TextBlock.is_literal());
        assert!(TokenKind::Null.is_literal());
        assert!(TokenKind::UShrEq.is_assignment_operator());
        assert!(TokenKind::ColonColon.is_operator());
        assert!(!TokenKind::Semicolon.is_operator());
        assert_eq!(TokenKind::Arrow.describe(), "'->'");
        assert_eq!(TokenKind::Eof.describe(), "end of input");
    }
}
