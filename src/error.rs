use thiserror::Error as ThisError;

/// Coarse classification of an [`Error`], for callers that only need to
/// tell "malformed array" apart from "bad element" without destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Structural,
    DimensionMismatch,
    ElementDecode,
    NullNotAllowed,
    Encode,
    Internal,
}

/// Failure reported by an element strategy.
///
/// The parser attaches the element span when it wraps this into
/// [`Error::ElementDecode`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct ElementError {
    pub message: String,
}

impl ElementError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn invalid(kind: &str, text: &str) -> Self {
        Self::new(format!("invalid {kind} value: \"{text}\""))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("{message} at offset {offset}")]
    Structural { offset: usize, message: String },

    #[error("{message} after offset {offset}")]
    DimensionMismatch { offset: usize, message: String },

    #[error("cannot decode element at [{offset}, {end}): {source}")]
    ElementDecode {
        offset: usize,
        end: usize,
        #[source]
        source: ElementError,
    },

    #[error("null element not allowed at offset {offset}")]
    NullNotAllowed { offset: usize },

    #[error("cannot encode array: {0}")]
    Encode(String),

    #[error("internal codec error: {0}")]
    Internal(String),
}

impl Error {
    pub fn structural(offset: usize, message: impl Into<String>) -> Self {
        Error::Structural {
            offset,
            message: message.into(),
        }
    }

    pub fn dimension(offset: usize, message: impl Into<String>) -> Self {
        Error::DimensionMismatch {
            offset,
            message: message.into(),
        }
    }

    pub fn element(offset: usize, end: usize, source: ElementError) -> Self {
        Error::ElementDecode {
            offset,
            end,
            source,
        }
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Error::Encode(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Structural { .. } => ErrorKind::Structural,
            Error::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Error::ElementDecode { .. } => ErrorKind::ElementDecode,
            Error::NullNotAllowed { .. } => ErrorKind::NullNotAllowed,
            Error::Encode(_) => ErrorKind::Encode,
            Error::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Byte offset into the literal the error refers to, when there is one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Structural { offset, .. }
            | Error::DimensionMismatch { offset, .. }
            | Error::ElementDecode { offset, .. }
            | Error::NullNotAllowed { offset } => Some(*offset),
            Error::Encode(_) | Error::Internal(_) => None,
        }
    }
}
