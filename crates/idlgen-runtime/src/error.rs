//! Error types for generated marshaling and RPC code

use crate::wire::MessageKind;
use thiserror::Error;

/// Result type alias for protocol and RPC operations
pub type RpcResult<T> = Result<T, RpcError>;

/// Failures of the underlying byte channel
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer end of the channel is gone
    #[error("channel closed")]
    Closed,

    /// A read asked for more bytes than the channel holds
    #[error("unexpected end of input: wanted {wanted} bytes, {available} available")]
    UnexpectedEof { wanted: usize, available: usize },
}

/// Violations of the wire protocol, detected by generated code or the
/// protocol implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unexpected message kind: expected {expected}, got {actual}")]
    UnexpectedMessageKind {
        expected: MessageKind,
        actual: MessageKind,
    },

    #[error("sequence id mismatch: expected {expected}, got {actual}")]
    SequenceMismatch { expected: u32, actual: u32 },

    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// A reply carried neither a return value nor a declared exception
    #[error("{0} failed: unknown result")]
    MissingResult(String),

    #[error("invalid wire type tag: {0}")]
    InvalidWireType(u8),

    #[error("invalid message kind: {0}")]
    InvalidMessageKind(u8),

    #[error("invalid UTF-8 in string value")]
    InvalidUtf8,

    #[error("length {len} exceeds limit {limit}")]
    SizeLimit { len: u32, limit: u32 },

    #[error("nesting depth limit exceeded while skipping")]
    DepthLimit,

    #[error("unexpected stop tag in value position")]
    UnexpectedStop,
}

/// Error type for everything generated code can fail with.
///
/// Declared application exceptions are not errors at this level; they travel
/// as data in result structs and surface through per-function error enums.
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// An undeclared failure raised by a handler; propagates out of dispatch
    #[error("handler error: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RpcError {
    /// Wrap an arbitrary handler failure
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        RpcError::Handler(err.into())
    }

    /// Returns a stable numeric code for logging and host bindings
    pub fn error_code(&self) -> u32 {
        match self {
            RpcError::Transport(TransportError::Io(_)) => 1,
            RpcError::Transport(TransportError::Closed) => 2,
            RpcError::Transport(TransportError::UnexpectedEof { .. }) => 3,
            RpcError::Protocol(ProtocolError::UnexpectedMessageKind { .. }) => 10,
            RpcError::Protocol(ProtocolError::SequenceMismatch { .. }) => 11,
            RpcError::Protocol(ProtocolError::UnknownMethod(_)) => 12,
            RpcError::Protocol(ProtocolError::MissingResult(_)) => 13,
            RpcError::Protocol(ProtocolError::InvalidWireType(_)) => 14,
            RpcError::Protocol(ProtocolError::InvalidMessageKind(_)) => 15,
            RpcError::Protocol(ProtocolError::InvalidUtf8) => 16,
            RpcError::Protocol(ProtocolError::SizeLimit { .. }) => 17,
            RpcError::Protocol(ProtocolError::DepthLimit) => 18,
            RpcError::Protocol(ProtocolError::UnexpectedStop) => 19,
            RpcError::Handler(_) => 20,
        }
    }

    /// Whether this is the given protocol violation kind
    pub fn as_protocol(&self) -> Option<&ProtocolError> {
        match self {
            RpcError::Protocol(err) => Some(err),
            _ => None,
        }
    }
}
