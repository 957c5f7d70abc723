use rhai::{EvalAltResult, ParseError};
use thiserror::Error;

/// Errors raised by the embedded engine itself. They are carried unchanged.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("runtime error: {0}")]
    Runtime(#[from] Box<EvalAltResult>),
}

/// Everything a [`Sandbox`](crate::Sandbox) operation can fail with.
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was not supplied.
    #[error("missing argument '{0}'")]
    MissingArgument(&'static str),

    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// The identifier handed to a bind operation was not a string.
    #[error("unexpected {found}, expecting string identifier")]
    IdentifierType { found: String },

    /// `bind_type` was handed something that is neither a function nor a host type.
    #[error("target is not a constructor ({found})")]
    NotConstructor { found: String },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("conversion error: {0}")]
    Convert(String),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Argument,
    TypeMismatch,
    Engine,
    Conversion,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingArgument(_) | Error::InvalidArgument { .. } => ErrorKind::Argument,
            Error::IdentifierType { .. } | Error::NotConstructor { .. } => ErrorKind::TypeMismatch,
            Error::Engine(_) => ErrorKind::Engine,
            Error::Convert(_) => ErrorKind::Conversion,
            Error::Config(_) | Error::Io(_) => ErrorKind::Config,
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Engine(EngineError::Parse(e))
    }
}

impl From<Box<EvalAltResult>> for Error {
    fn from(e: Box<EvalAltResult>) -> Self {
        Error::Engine(EngineError::Runtime(e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
