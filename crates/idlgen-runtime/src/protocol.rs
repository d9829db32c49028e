//! The protocol contract generated code is written against

use crate::channel::Channel;
use crate::error::{ProtocolError, RpcResult};
use crate::wire::{FieldHeader, ListHeader, MapHeader, MessageHeader, MessageKind, WireType};

/// Default nesting limit for [`skip_value`]
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Serialization protocol used by generated code.
///
/// A protocol is stateless with respect to the channel: every call takes the
/// channel to read from or write to. Each write method has a matching read
/// method that consumes exactly what it produced.
///
/// The trait is object safe. Generated servers and clients hold
/// `Box<dyn Protocol>` values so input and output protocols can differ.
pub trait Protocol {
    fn write_message_begin(
        &self,
        out: &mut dyn Channel,
        name: &str,
        kind: MessageKind,
        seqid: u32,
    ) -> RpcResult<()>;
    fn write_message_end(&self, out: &mut dyn Channel) -> RpcResult<()>;
    fn write_struct_begin(&self, out: &mut dyn Channel, name: &str) -> RpcResult<()>;
    fn write_struct_end(&self, out: &mut dyn Channel) -> RpcResult<()>;
    fn write_field_begin(
        &self,
        out: &mut dyn Channel,
        name: &str,
        wire_type: WireType,
        id: i16,
    ) -> RpcResult<()>;
    fn write_field_end(&self, out: &mut dyn Channel) -> RpcResult<()>;
    fn write_field_stop(&self, out: &mut dyn Channel) -> RpcResult<()>;
    fn write_map_begin(
        &self,
        out: &mut dyn Channel,
        key: WireType,
        value: WireType,
        len: u32,
    ) -> RpcResult<()>;
    fn write_map_end(&self, out: &mut dyn Channel) -> RpcResult<()>;
    fn write_list_begin(&self, out: &mut dyn Channel, elem: WireType, len: u32) -> RpcResult<()>;
    fn write_list_end(&self, out: &mut dyn Channel) -> RpcResult<()>;
    fn write_set_begin(&self, out: &mut dyn Channel, elem: WireType, len: u32) -> RpcResult<()>;
    fn write_set_end(&self, out: &mut dyn Channel) -> RpcResult<()>;

    fn write_bool(&self, out: &mut dyn Channel, value: bool) -> RpcResult<()>;
    fn write_byte(&self, out: &mut dyn Channel, value: u8) -> RpcResult<()>;
    fn write_i08(&self, out: &mut dyn Channel, value: i8) -> RpcResult<()>;
    fn write_i16(&self, out: &mut dyn Channel, value: i16) -> RpcResult<()>;
    fn write_u16(&self, out: &mut dyn Channel, value: u16) -> RpcResult<()>;
    fn write_i32(&self, out: &mut dyn Channel, value: i32) -> RpcResult<()>;
    fn write_u32(&self, out: &mut dyn Channel, value: u32) -> RpcResult<()>;
    fn write_i64(&self, out: &mut dyn Channel, value: i64) -> RpcResult<()>;
    fn write_u64(&self, out: &mut dyn Channel, value: u64) -> RpcResult<()>;
    fn write_double(&self, out: &mut dyn Channel, value: f64) -> RpcResult<()>;
    fn write_string(&self, out: &mut dyn Channel, value: &str) -> RpcResult<()>;

    fn read_message_begin(&self, input: &mut dyn Channel) -> RpcResult<MessageHeader>;
    fn read_message_end(&self, input: &mut dyn Channel) -> RpcResult<()>;
    fn read_struct_begin(&self, input: &mut dyn Channel) -> RpcResult<String>;
    fn read_struct_end(&self, input: &mut dyn Channel) -> RpcResult<()>;
    /// Returns a header with [`WireType::Stop`] at the end of the field list
    fn read_field_begin(&self, input: &mut dyn Channel) -> RpcResult<FieldHeader>;
    fn read_field_end(&self, input: &mut dyn Channel) -> RpcResult<()>;
    fn read_map_begin(&self, input: &mut dyn Channel) -> RpcResult<MapHeader>;
    fn read_map_end(&self, input: &mut dyn Channel) -> RpcResult<()>;
    fn read_list_begin(&self, input: &mut dyn Channel) -> RpcResult<ListHeader>;
    fn read_list_end(&self, input: &mut dyn Channel) -> RpcResult<()>;
    fn read_set_begin(&self, input: &mut dyn Channel) -> RpcResult<ListHeader>;
    fn read_set_end(&self, input: &mut dyn Channel) -> RpcResult<()>;

    fn read_bool(&self, input: &mut dyn Channel) -> RpcResult<bool>;
    fn read_byte(&self, input: &mut dyn Channel) -> RpcResult<u8>;
    fn read_i08(&self, input: &mut dyn Channel) -> RpcResult<i8>;
    fn read_i16(&self, input: &mut dyn Channel) -> RpcResult<i16>;
    fn read_u16(&self, input: &mut dyn Channel) -> RpcResult<u16>;
    fn read_i32(&self, input: &mut dyn Channel) -> RpcResult<i32>;
    fn read_u32(&self, input: &mut dyn Channel) -> RpcResult<u32>;
    fn read_i64(&self, input: &mut dyn Channel) -> RpcResult<i64>;
    fn read_u64(&self, input: &mut dyn Channel) -> RpcResult<u64>;
    fn read_double(&self, input: &mut dyn Channel) -> RpcResult<f64>;
    fn read_string(&self, input: &mut dyn Channel) -> RpcResult<String>;

    /// Nesting limit applied by [`Protocol::skip`]
    fn max_depth(&self) -> usize {
        DEFAULT_MAX_DEPTH
    }

    /// Consume and discard one value of the given wire type, including any
    /// nested structs and collections
    fn skip(&self, input: &mut dyn Channel, wire_type: WireType) -> RpcResult<()> {
        skip_value(self, input, wire_type, self.max_depth())
    }
}

/// Consume one value of `wire_type` using only the protocol's read methods.
///
/// `depth` bounds how many struct or collection levels may be entered.
pub fn skip_value<P: Protocol + ?Sized>(
    protocol: &P,
    input: &mut dyn Channel,
    wire_type: WireType,
    depth: usize,
) -> RpcResult<()> {
    if depth == 0 {
        return Err(ProtocolError::DepthLimit.into());
    }
    match wire_type {
        WireType::Stop => Err(ProtocolError::UnexpectedStop.into()),
        WireType::Void => Ok(()),
        WireType::Bool => protocol.read_bool(input).map(drop),
        WireType::Byte => protocol.read_byte(input).map(drop),
        WireType::I08 => protocol.read_i08(input).map(drop),
        WireType::I16 => protocol.read_i16(input).map(drop),
        WireType::U16 => protocol.read_u16(input).map(drop),
        WireType::I32 => protocol.read_i32(input).map(drop),
        WireType::U32 => protocol.read_u32(input).map(drop),
        WireType::I64 => protocol.read_i64(input).map(drop),
        WireType::U64 => protocol.read_u64(input).map(drop),
        WireType::Double => protocol.read_double(input).map(drop),
        WireType::Utf7 | WireType::Utf8 | WireType::Utf16 => {
            protocol.read_string(input).map(drop)
        }
        WireType::Struct => {
            protocol.read_struct_begin(input)?;
            loop {
                let field = protocol.read_field_begin(input)?;
                if field.is_stop() {
                    break;
                }
                skip_value(protocol, input, field.wire_type, depth - 1)?;
                protocol.read_field_end(input)?;
            }
            protocol.read_struct_end(input)
        }
        WireType::Map => {
            let header = protocol.read_map_begin(input)?;
            for _ in 0..header.len {
                skip_value(protocol, input, header.key, depth - 1)?;
                skip_value(protocol, input, header.value, depth - 1)?;
            }
            protocol.read_map_end(input)
        }
        WireType::List => {
            let header = protocol.read_list_begin(input)?;
            for _ in 0..header.len {
                skip_value(protocol, input, header.elem, depth - 1)?;
            }
            protocol.read_list_end(input)
        }
        WireType::Set => {
            let header = protocol.read_set_begin(input)?;
            for _ in 0..header.len {
                skip_value(protocol, input, header.elem, depth - 1)?;
            }
            protocol.read_set_end(input)
        }
    }
}
