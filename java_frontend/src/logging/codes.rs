//! Error and success codes with their classification metadata
//!
//! Every error type in the crate maps onto one of these codes, and the
//! registry below is the single place severity, category and remediation
//! text are defined.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
}

pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const INVALID_NUMBER: Code = Code::new("E022");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E023");
    pub const STRING_TOO_LARGE: Code = Code::new("E024");
    pub const COMMENT_TOO_LONG: Code = Code::new("E026");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
    pub const UNTERMINATED_CHAR: Code = Code::new("E029");
    pub const UNTERMINATED_TEXT_BLOCK: Code = Code::new("E030");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E031");
    pub const INVALID_ESCAPE: Code = Code::new("E032");
    pub const INVALID_CHAR_LITERAL: Code = Code::new("E033");
    pub const NO_DECODED_VALUE: Code = Code::new("E034");
    pub const INVALID_TEXT_BLOCK_OPENING: Code = Code::new("E035");
    pub const UNEXPECTED_END_OF_INPUT: Code = Code::new("E036");
}

pub mod syntax {
    use super::Code;

    pub const GRAMMAR_VIOLATION: Code = Code::new("E043");
    pub const UNEXPECTED_TOKEN: Code = Code::new("E050");
    pub const CONTEXTUAL_KEYWORD: Code = Code::new("E051");
    pub const UNEXPECTED_EOF: Code = Code::new("E052");
    pub const INTERNAL_PARSER_ERROR: Code = Code::new("E086");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E087");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const AST_CONSTRUCTION_COMPLETE: Code = Code::new("I040");
    pub const ROUND_TRIP_VERIFIED: Code = Code::new("I041");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    use Severity::*;

    ERROR_REGISTRY.get_or_init(|| {
        // (code, category, severity, recoverable, requires_halt, description, action)
        let entries = [
            // System
            ("ERR001", "System", Critical, false, true,
                "Internal front end error",
                "Report the input that triggered this error"),
            ("ERR002", "System", Critical, false, true,
                "Initialization failure",
                "Check configuration and environment variables"),
            // File processing
            ("E005", "FileProcessing", High, false, true,
                "Source file not found",
                "Check the file path"),
            ("E006", "FileProcessing", Low, true, false,
                "File does not have a .java extension",
                "Rename the file or pass a Java source file"),
            ("E007", "FileProcessing", High, false, true,
                "File exceeds maximum size limit",
                "Split the file or raise max_file_size in the build profile"),
            ("E009", "FileProcessing", High, false, true,
                "Permission denied reading source file",
                "Check file permissions"),
            ("E010", "FileProcessing", High, false, true,
                "Source file is not valid UTF-8",
                "Re-encode the file as UTF-8"),
            ("E011", "FileProcessing", High, false, true,
                "I/O error while reading source file",
                "Check the file system and retry"),
            // Lexical
            ("E020", "Lexical", High, false, true,
                "Invalid character in source",
                "Remove the character or place it inside a literal or comment"),
            ("E021", "Lexical", High, false, true,
                "Unterminated string literal",
                "Add the closing double quote before the end of the line"),
            ("E022", "Lexical", High, false, true,
                "Malformed or out-of-range numeric literal",
                "Check digits, radix prefix, suffix and range"),
            ("E023", "Lexical", Medium, false, true,
                "Identifier exceeds maximum length",
                "Use a shorter identifier"),
            ("E024", "Lexical", Medium, false, true,
                "String literal exceeds maximum size limit",
                "Reduce string size or break into smaller parts"),
            ("E026", "Lexical", Medium, false, true,
                "Comment exceeds maximum allowed length",
                "Reduce comment length or break into multiple comments"),
            ("E027", "Lexical", High, false, true,
                "Input contains too many tokens",
                "Split the input or raise max_token_count in the build profile"),
            ("E029", "Lexical", High, false, true,
                "Unterminated character literal",
                "Add the closing single quote"),
            ("E030", "Lexical", High, false, true,
                "Unterminated text block",
                "Close the text block with three double quotes"),
            ("E031", "Lexical", High, false, true,
                "Unterminated block comment",
                "Close the comment with */"),
            ("E032", "Lexical", High, false, true,
                "Invalid escape sequence",
                "Use one of \\b \\t \\n \\f \\r \\s \\\" \\' \\\\, an octal escape or \\uXXXX"),
            ("E033", "Lexical", High, false, true,
                "Character literal must contain exactly one character",
                "Use a string literal for multiple characters"),
            ("E034", "Lexical", Low, true, false,
                "Token carries no decoded value",
                "Only call value accessors on literal tokens"),
            ("E035", "Lexical", High, false, true,
                "Text block opening delimiter must be followed by a line terminator",
                "Start the text block content on the line after the opening quotes"),
            ("E036", "Lexical", High, false, true,
                "Input ended in the middle of a token",
                "Complete the final token"),
            // Syntax
            ("E043", "Syntax", High, false, true,
                "Grammar violation during parsing",
                "Fix the construct named in the message"),
            ("E050", "Syntax", High, false, true,
                "Unexpected token",
                "Check the token against the expected construct"),
            ("E051", "Syntax", Medium, false, true,
                "Contextual keyword used as a type name",
                "Rename the type; permits, record, sealed, var and yield are restricted"),
            ("E052", "Syntax", High, false, true,
                "Unexpected end of input",
                "Complete the unfinished construct"),
            ("E086", "Syntax", Critical, false, true,
                "Internal parser error",
                "Report the input that triggered this error"),
            ("E087", "Syntax", High, false, true,
                "Maximum parse depth exceeded",
                "Reduce nesting or raise max_parse_depth in the build profile"),
            // Success
            ("I004", "System", Low, true, false,
                "Logging system initialized",
                "None"),
            ("I006", "FileProcessing", Low, true, false,
                "Source file read successfully",
                "Continue to lexical analysis"),
            ("I020", "Lexical", Low, true, false,
                "Tokenization completed",
                "Continue to parsing"),
            ("I040", "Syntax", Low, true, false,
                "AST construction completed",
                "None"),
            ("I041", "Syntax", Low, true, false,
                "Source round-trip verified",
                "None"),
        ];

        entries
            .into_iter()
            .map(|(code, category, severity, recoverable, halt, description, action)| {
                (
                    code,
                    ErrorMetadata::new(
                        code,
                        category,
                        severity,
                        recoverable,
                        halt,
                        description,
                        action,
                    ),
                )
            })
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Human-readable description, or "Unknown error"
pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

/// Success codes use the `I` prefix
pub fn is_success_code(code: &str) -> bool {
    code.starts_with('I')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_code_has_metadata() {
        let declared = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            file_processing::FILE_NOT_FOUND,
            file_processing::INVALID_EXTENSION,
            file_processing::FILE_TOO_LARGE,
            file_processing::PERMISSION_DENIED,
            file_processing::INVALID_ENCODING,
            file_processing::IO_ERROR,
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
            lexical::NO_DECODED_VALUE,
            lexical::INVALID_TEXT_BLOCK_OPENING,
            lexical::UNEXPECTED_END_OF_INPUT,
            syntax::GRAMMAR_VIOLATION,
            syntax::UNEXPECTED_TOKEN,
            syntax::CONTEXTUAL_KEYWORD,
            syntax::UNEXPECTED_EOF,
            syntax::INTERNAL_PARSER_ERROR,
            syntax::MAX_RECURSION_DEPTH,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::FILE_PROCESSING_SUCCESS,
            success::TOKENIZATION_COMPLETE,
            success::AST_CONSTRUCTION_COMPLETE,
            success::ROUND_TRIP_VERIFIED,
        ];

        for code in declared {
            let metadata = get_error_metadata(code.as_str());
            assert!(metadata.is_some(), "missing metadata for {}", code);
            assert_eq!(metadata.unwrap().code, code.as_str());
        }
    }

    #[test]
    fn test_classification_lookups() {
        assert_eq!(get_category("E020"), "Lexical");
        assert_eq!(get_category("E050"), "Syntax");
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(requires_halt("E031"));
        assert!(is_recoverable("E034"));
        assert!(is_success_code("I040"));
        assert!(!is_success_code("E040"));
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_category("E999"), "Unknown");
        assert_eq!(get_severity("E999"), Severity::Medium);
        assert!(!requires_halt("E999"));
    }
}
