//! Wire-level tags and frame headers

use crate::error::ProtocolError;
use std::fmt;

/// Wire type tag written ahead of every field and collection element run.
///
/// `Stop` is reserved: it terminates a struct's field list and never
/// describes a value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WireType {
    Stop = 1,
    Void = 2,
    Bool = 3,
    Byte = 4,
    I08 = 5,
    U16 = 6,
    I16 = 7,
    U32 = 8,
    I32 = 9,
    U64 = 10,
    I64 = 11,
    Double = 12,
    Utf7 = 13,
    Struct = 14,
    Map = 15,
    Set = 16,
    List = 17,
    Utf8 = 18,
    Utf16 = 19,
}

impl WireType {
    /// Decode a tag byte
    pub fn from_u8(value: u8) -> Option<Self> {
        let wire_type = match value {
            1 => WireType::Stop,
            2 => WireType::Void,
            3 => WireType::Bool,
            4 => WireType::Byte,
            5 => WireType::I08,
            6 => WireType::U16,
            7 => WireType::I16,
            8 => WireType::U32,
            9 => WireType::I32,
            10 => WireType::U64,
            11 => WireType::I64,
            12 => WireType::Double,
            13 => WireType::Utf7,
            14 => WireType::Struct,
            15 => WireType::Map,
            16 => WireType::Set,
            17 => WireType::List,
            18 => WireType::Utf8,
            19 => WireType::Utf16,
            _ => return None,
        };
        Some(wire_type)
    }

    /// The tag byte
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Variant name, as it appears in generated code
    pub fn variant_name(self) -> &'static str {
        match self {
            WireType::Stop => "Stop",
            WireType::Void => "Void",
            WireType::Bool => "Bool",
            WireType::Byte => "Byte",
            WireType::I08 => "I08",
            WireType::U16 => "U16",
            WireType::I16 => "I16",
            WireType::U32 => "U32",
            WireType::I32 => "I32",
            WireType::U64 => "U64",
            WireType::I64 => "I64",
            WireType::Double => "Double",
            WireType::Utf7 => "Utf7",
            WireType::Struct => "Struct",
            WireType::Map => "Map",
            WireType::Set => "Set",
            WireType::List => "List",
            WireType::Utf8 => "Utf8",
            WireType::Utf16 => "Utf16",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.variant_name())
    }
}

/// Kind of an RPC envelope
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Call = 1,
    Reply = 2,
}

impl MessageKind {
    /// Decode a kind byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(MessageKind::Call),
            2 => Some(MessageKind::Reply),
            _ => None,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Call => write!(f, "call"),
            MessageKind::Reply => write!(f, "reply"),
        }
    }
}

/// RPC envelope header: method name, kind and sequence id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHeader {
    pub name: String,
    pub kind: MessageKind,
    pub seqid: u32,
}

impl MessageHeader {
    /// Create a new envelope header
    pub fn new(name: impl Into<String>, kind: MessageKind, seqid: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            seqid,
        }
    }
}

/// Field header read from the wire.
///
/// Protocols that do not carry field names on the wire report an empty name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHeader {
    pub name: String,
    pub wire_type: WireType,
    pub id: i16,
}

impl FieldHeader {
    /// The header that terminates a struct
    pub fn stop() -> Self {
        Self {
            name: String::new(),
            wire_type: WireType::Stop,
            id: 0,
        }
    }

    /// Whether this header ends the field list
    pub fn is_stop(&self) -> bool {
        self.wire_type == WireType::Stop
    }
}

/// Map header: key and value tags plus entry count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapHeader {
    pub key: WireType,
    pub value: WireType,
    pub len: u32,
}

/// List or set header: element tag plus element count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListHeader {
    pub elem: WireType,
    pub len: u32,
}

/// Element count of an in-memory collection as a wire length.
///
/// Counts that do not fit the u32 length prefix fail with
/// [`ProtocolError::SizeLimit`] instead of being truncated.
pub fn wire_len(len: usize) -> Result<u32, ProtocolError> {
    u32::try_from(len).map_err(|_| ProtocolError::SizeLimit {
        len: u32::MAX,
        limit: u32::MAX,
    })
}
