//! Java reserved words and contextual keywords
//!
//! Reserved words are resolved at lexer reduce time through a perfect-hash
//! map. Contextual keywords (`var`, `record`, `sealed`, ...) stay identifiers
//! and are recognised by the parser where the grammar allows them.
use crate::tokens::TokenKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    Abstract,
    Assert,
    Boolean,
    Break,
    Byte,
    Case,
    Catch,
    Char,
    Class,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extends,
    Final,
    Finally,
    Float,
    For,
    Goto,
    If,
    Implements,
    Import,
    Instanceof,
    Int,
    Interface,
    Long,
    Native,
    New,
    Package,
    Private,
    Protected,
    Public,
    Return,
    Short,
    Static,
    Strictfp,
    Super,
    Switch,
    Synchronized,
    This,
    Throw,
    Throws,
    Transient,
    Try,
    Void,
    Volatile,
    While,
}

impl Keyword {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Abstract => "abstract",
            Self::Assert => "assert",
            Self::Boolean => "boolean",
            Self::Break => "break",
            Self::Byte => "byte",
            Self::Case => "case",
            Self::Catch => "catch",
            Self::Char => "char",
            Self::Class => "class",
            Self::Const => "const",
            Self::Continue => "continue",
            Self::Default => "default",
            Self::Do => "do",
            Self::Double => "double",
            Self::Else => "else",
            Self::Enum => "enum",
            Self::Extends => "extends",
            Self::Final => "final",
            Self::Finally => "finally",
            Self::Float => "float",
            Self::For => "for",
            Self::Goto => "goto",
            Self::If => "if",
            Self::Implements => "implements",
            Self::Import => "import",
            Self::Instanceof => "instanceof",
            Self::Int => "int",
            Self::Interface => "interface",
            Self::Long => "long",
            Self::Native => "native",
            Self::New => "new",
            Self::Package => "package",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Public => "public",
            Self::Return => "return",
            Self::Short => "short",
            Self::Static => "static",
            Self::Strictfp => "strictfp",
            Self::Super => "super",
            Self::Switch => "switch",
            Self::Synchronized => "synchronized",
            Self::This => "this",
            Self::Throw => "throw",
            Self::Throws => "throws",
            Self::Transient => "transient",
            Self::Try => "try",
            Self::Void => "void",
            Self::Volatile => "volatile",
            Self::While => "while",
        }
    }

    /// Primitive type keywords (`void` excluded)
    pub fn is_primitive_type(self) -> bool {
        matches!(
            self,
            Self::Boolean
                | Self::Byte
                | Self::Char
                | Self::Short
                | Self::Int
                | Self::Long
                | Self::Float
                | Self::Double
        )
    }

    /// Keywords that may appear in a modifier list
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::Public
                | Self::Protected
                | Self::Private
                | Self::Static
                | Self::Abstract
                | Self::Final
                | Self::Native
                | Self::Synchronized
                | Self::Transient
                | Self::Volatile
                | Self::Strictfp
                | Self::Default
        )
    }
}

/// Reserved words and the literal words `true`, `false`, `null`
static WORDS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "abstract" => TokenKind::Keyword(Keyword::Abstract),
    "assert" => TokenKind::Keyword(Keyword::Assert),
    "boolean" => TokenKind::Keyword(Keyword::Boolean),
    "break" => TokenKind::Keyword(Keyword::Break),
    "byte" => TokenKind::Keyword(Keyword::Byte),
    "case" => TokenKind::Keyword(Keyword::Case),
    "catch" => TokenKind::Keyword(Keyword::Catch),
    "char" => TokenKind::Keyword(Keyword::Char),
    "class" => TokenKind::Keyword(Keyword::Class),
    "const" => TokenKind::Keyword(Keyword::Const),
    "continue" => TokenKind::Keyword(Keyword::Continue),
    "default" => TokenKind::Keyword(Keyword::Default),
    "do" => TokenKind::Keyword(Keyword::Do),
    "double" => TokenKind::Keyword(Keyword::Double),
    "else" => TokenKind::Keyword(Keyword::Else),
    "enum" => TokenKind::Keyword(Keyword::Enum),
    "extends" => TokenKind::Keyword(Keyword::Extends),
    "final" => TokenKind::Keyword(Keyword::Final),
    "finally" => TokenKind::Keyword(Keyword::Finally),
    "float" => TokenKind::Keyword(Keyword::Float),
    "for" => TokenKind::Keyword(Keyword::For),
    "goto" => TokenKind::Keyword(Keyword::Goto),
    "if" => TokenKind::Keyword(Keyword::If),
    "implements" => TokenKind::Keyword(Keyword::Implements),
    "import" => TokenKind::Keyword(Keyword::Import),
    "instanceof" => TokenKind::Keyword(Keyword::Instanceof),
    "int" => TokenKind::Keyword(Keyword::Int),
    "interface" => TokenKind::Keyword(Keyword::Interface),
    "long" => TokenKind::Keyword(Keyword::Long),
    "native" => TokenKind::Keyword(Keyword::Native),
    "new" => TokenKind::Keyword(Keyword::New),
    "package" => TokenKind::Keyword(Keyword::Package),
    "private" => TokenKind::Keyword(Keyword::Private),
    "protected" => TokenKind::Keyword(Keyword::Protected),
    "public" => TokenKind::Keyword(Keyword::Public),
    "return" => TokenKind::Keyword(Keyword::Return),
    "short" => TokenKind::Keyword(Keyword::Short),
    "static" => TokenKind::Keyword(Keyword::Static),
    "strictfp" => TokenKind::Keyword(Keyword::Strictfp),
    "super" => TokenKind::Keyword(Keyword::Super),
    "switch" => TokenKind::Keyword(Keyword::Switch),
    "synchronized" => TokenKind::Keyword(Keyword::Synchronized),
    "this" => TokenKind::Keyword(Keyword::This),
    "throw" => TokenKind::Keyword(Keyword::Throw),
    "throws" => TokenKind::Keyword(Keyword::Throws),
    "transient" => TokenKind::Keyword(Keyword::Transient),
    "try" => TokenKind::Keyword(Keyword::Try),
    "void" => TokenKind::Keyword(Keyword::Void),
    "volatile" => TokenKind::Keyword(Keyword::Volatile),
    "while" => TokenKind::Keyword(Keyword::While),
    "true" => TokenKind::True,
    "false" => TokenKind::False,
    "null" => TokenKind::Null,
};

/// Kind for an identifier-shaped word
pub fn classify_word(word: &str) -> TokenKind {
    WORDS.get(word).copied().unwrap_or(TokenKind::Identifier)
}

pub fn is_reserved_word(word: &str) -> bool {
    WORDS.contains_key(word)
}

/// Words that cannot name a type
pub const RESTRICTED_TYPE_NAMES: &[&str] = &["permits", "record", "sealed", "var", "yield"];

/// Identifiers with grammar meaning in some positions
pub const CONTEXTUAL_KEYWORDS: &[&str] = &[
    "exports",
    "module",
    "non-sealed",
    "open",
    "opens",
    "permits",
    "provides",
    "record",
    "requires",
    "sealed",
    "to",
    "transitive",
    "uses",
    "var",
    "when",
    "with",
    "yield",
];

pub fn is_restricted_type_name(word: &str) -> bool {
    RESTRICTED_TYPE_NAMES.contains(&word)
}

pub fn is_contextual_keyword(word: &str) -> bool {
    CONTEXTUAL_KEYWORDS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_words_round_trip() {
        for (word, kind) in WORDS.entries() {
            if let TokenKind::Keyword(kw) = kind {
                assert_eq!(kw.as_str(), *word);
            }
        }
        assert_eq!(WORDS.len(), 53);
    }

    #[test]
    fn test_classify_word() {
        assert_eq!(classify_word("class"), TokenKind::Keyword(Keyword::Class));
        assert_eq!(classify_word("true"), TokenKind::True);
        assert_eq!(classify_word("null"), TokenKind::Null);
        assert_eq!(classify_word("Class"), TokenKind::Identifier);
    }

    #[test]
    fn test_contextual_keywords_are_identifiers() {
        for word in CONTEXTUAL_KEYWORDS {
            assert_eq!(classify_word(word), TokenKind::Identifier, "{}", word);
        }
        assert!(is_restricted_type_name("permits"));
        assert!(!is_restricted_type_name("when"));
    }

    #[test]
    fn test_keyword_groups() {
        assert!(Keyword::Int.is_primitive_type());
        assert!(!Keyword::Void.is_primitive_type());
        assert!(Keyword::Transient.is_modifier());
        assert!(!Keyword::Class.is_modifier());
    }
}
