use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::logging::Code;
use crate::syntax::SyntaxError;

/// Pipeline processing errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexical analysis failed: {0}")]
    Lexical(#[from] LexerError),

    #[error("Syntax analysis failed: {0}")]
    Syntax(SyntaxError),
}

/// Lexer failures met by the parser surface as lexical errors
impl From<SyntaxError> for PipelineError {
    fn from(error: SyntaxError) -> Self {
        match error {
            SyntaxError::Lexical(error) => Self::Lexical(error),
            other => Self::Syntax(other),
        }
    }
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(error) => error.error_code(),
            Self::Lexical(error) => error.error_code(),
            Self::Syntax(error) => error.error_code(),
        }
    }

    /// Byte offset of the failure in the source text
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::FileProcessing(_) => None,
            Self::Lexical(error) => Some(error.offset()),
            Self::Syntax(error) => Some(error.offset()),
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self, Self::Lexical(_))
    }

    pub fn recommended_action(&self) -> &'static str {
        crate::logging::codes::get_action(self.error_code().as_str())
    }
}
