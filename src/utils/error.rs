//! Error handling for the Bhagwad compiler

use crate::utils::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// The pipeline stage that detected an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Syntax,
    Semantic,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Lex => write!(f, "lex"),
            Stage::Syntax => write!(f, "syntax"),
            Stage::Semantic => write!(f, "semantic"),
        }
    }
}

/// Compiler error
#[derive(Error, Debug, Clone)]
pub enum Error {
    // ==================== Lexer Errors ====================

    #[error("unexpected character '{ch}'")]
    UnexpectedChar { ch: char, span: Span },

    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    // ==================== Parser Errors ====================

    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("invalid assignment target")]
    InvalidAssignTarget { span: Span },

    #[error("invalid call target")]
    InvalidCallTarget { span: Span },

    // ==================== Semantic Errors ====================

    #[error("cannot reassign constant '{name}'")]
    ConstantReassignment { name: String, span: Span },

    #[error("duplicate function '{name}' in this scope")]
    DuplicateFunction { name: String, span: Span },

    #[error("duplicate parameter '{name}'")]
    DuplicateParameter { name: String, span: Span },

    #[error("undefined name '{name}'")]
    UndefinedName { name: String, span: Span },

    #[error("'{name}' returns a value but declares no return type")]
    ReturnValueInVoidFunction { name: String, span: Span },

    #[error("'{name}' declares a return type but returns no value")]
    MissingReturnValue { name: String, span: Span },

    #[error("duplicate 'arjuna' entry block")]
    DuplicateEntry { span: Span },

    #[error("program has no 'arjuna' entry block")]
    MissingEntry { span: Span },
}

impl Error {
    /// Get the span associated with this error
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedChar { span, .. } => *span,
            Self::UnterminatedString { span } => *span,
            Self::UnexpectedToken { span, .. } => *span,
            Self::InvalidAssignTarget { span } => *span,
            Self::InvalidCallTarget { span } => *span,
            Self::ConstantReassignment { span, .. } => *span,
            Self::DuplicateFunction { span, .. } => *span,
            Self::DuplicateParameter { span, .. } => *span,
            Self::UndefinedName { span, .. } => *span,
            Self::ReturnValueInVoidFunction { span, .. } => *span,
            Self::MissingReturnValue { span, .. } => *span,
            Self::DuplicateEntry { span } => *span,
            Self::MissingEntry { span } => *span,
        }
    }

    /// Get the pipeline stage that raises this error
    pub fn stage(&self) -> Stage {
        match self {
            Self::UnexpectedChar { .. } | Self::UnterminatedString { .. } => Stage::Lex,
            Self::UnexpectedToken { .. }
            | Self::InvalidAssignTarget { .. }
            | Self::InvalidCallTarget { .. } => Stage::Syntax,
            _ => Stage::Semantic,
        }
    }
}
