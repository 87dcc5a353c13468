//! Application-level error types for the Kelp server.
//!
//! Two tiers matter on the wire: [`ProtocolError`] is fatal to a connection,
//! [`CommandError`] is reported to the client as an error reply and the
//! connection keeps serving.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("store error: {0}")]
    Store(#[from] crate::storage::StoreError),

    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
}

/// Framing-level failures while decoding the byte stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unknown type: '{}'", char::from(*.0))]
    UnknownType(u8),

    #[error("invalid frame: line not terminated by CRLF")]
    MissingCrlf,

    #[error("protocol line longer than {0} bytes")]
    LineTooLong(usize),

    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    #[error("invalid bulk string length: {0}")]
    InvalidBulkLength(String),

    #[error("invalid array length: {0}")]
    InvalidArrayLength(String),

    #[error("frame too large: declared length {0}")]
    FrameTooLarge(i64),

    #[error("arrays nested deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("invalid UTF-8 in status line")]
    InvalidUtf8,

    #[error("stream closed in the middle of a frame")]
    Truncated,

    #[error("command must be an array")]
    NotAnArray,

    #[error("command array is null")]
    NullCommand,

    #[error("command contains null bulk string")]
    NullArgument,

    #[error("invalid command element type: {0}")]
    InvalidArgument(char),
}

/// Command-level failures. `Display` is the exact error text sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(String),

    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,

    #[error("ERR unknown command '{0}'")]
    Unknown(String),

    #[error("ERR empty command")]
    Empty,
}

impl CommandError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::WrongArity(_) => "wrong_arity",
            CommandError::NotAnInteger => "not_an_integer",
            CommandError::Unknown(_) => "unknown_command",
            CommandError::Empty => "empty_command",
        }
    }
}

impl From<crate::storage::StoreError> for CommandError {
    fn from(err: crate::storage::StoreError) -> Self {
        match err {
            crate::storage::StoreError::NotAnInteger => CommandError::NotAnInteger,
        }
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("file error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Telemetry initialization errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("logging setup failed: {0}")]
    LoggingInit(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
