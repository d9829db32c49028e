//! idlgen-runtime - Wire protocol contract for idlgen-generated code
//!
//! This crate provides:
//! - [`Protocol`] trait: message, struct, field and collection framing plus one
//!   read/write pair per primitive kind and a generic [`Protocol::skip`]
//! - [`BinaryProtocol`] big-endian implementation of that contract
//! - [`Channel`] duplex byte channel with [`MemoryChannel`], [`DuplexChannel`]
//!   and [`StreamChannel`] implementations
//! - [`Processor`] trait implemented by generated server dispatchers
//! - [`RpcError`], [`ProtocolError`] and [`TransportError`]
//!
//! Generated code refers to this crate by absolute path, so the only thing a
//! consumer needs is the dependency itself.

mod binary;
mod channel;
mod error;
mod processor;
mod protocol;
mod wire;

pub use binary::BinaryProtocol;
pub use channel::{Channel, DuplexChannel, MemoryChannel, StreamChannel};
pub use error::{ProtocolError, RpcError, RpcResult, TransportError};
pub use processor::Processor;
pub use protocol::{DEFAULT_MAX_DEPTH, Protocol, skip_value};
pub use wire::{
    FieldHeader, ListHeader, MapHeader, MessageHeader, MessageKind, WireType, wire_len,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BinaryProtocol, Channel, DuplexChannel, MemoryChannel, MessageKind, Processor, Protocol,
        ProtocolError, RpcError, RpcResult, TransportError, WireType,
    };
}
