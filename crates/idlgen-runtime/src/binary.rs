//! Big-endian binary protocol
//!
//! Layout:
//! - message: name (string), kind (1 byte), seqid (u32)
//! - field: wire tag (1 byte), id (i16); the stop marker is the tag alone
//! - map: key tag, value tag, count (u32)
//! - list / set: element tag, count (u32)
//! - string: length (u32) followed by UTF-8 bytes
//! - integers and doubles: fixed width, big-endian; bool is one byte
//!
//! Struct, message and collection end markers write nothing.

use crate::channel::Channel;
use crate::error::{ProtocolError, RpcResult};
use crate::protocol::{DEFAULT_MAX_DEPTH, Protocol};
use crate::wire::{FieldHeader, ListHeader, MapHeader, MessageHeader, MessageKind, WireType};

/// Default upper bound for string lengths and collection counts (16 MiB)
const DEFAULT_MAX_LENGTH: u32 = 16 * 1024 * 1024;

/// Big-endian binary protocol with length and nesting limits
#[derive(Debug, Clone, Copy)]
pub struct BinaryProtocol {
    max_length: u32,
    max_depth: usize,
}

impl BinaryProtocol {
    /// Create a protocol with default limits
    pub fn new() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit accepted string lengths and collection counts
    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = max_length;
        self
    }

    /// Limit nesting while skipping unknown values
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Boxed default protocol, the form generated servers and clients store
    pub fn boxed() -> Box<dyn Protocol + Send> {
        Box::new(Self::new())
    }

    fn check_length(&self, len: u32) -> RpcResult<()> {
        if len > self.max_length {
            return Err(ProtocolError::SizeLimit {
                len,
                limit: self.max_length,
            }
            .into());
        }
        Ok(())
    }

    fn read_array<const N: usize>(&self, input: &mut dyn Channel) -> RpcResult<[u8; N]> {
        let mut buf = [0u8; N];
        input.receive(&mut buf)?;
        Ok(buf)
    }

    fn read_wire_type(&self, input: &mut dyn Channel) -> RpcResult<WireType> {
        let tag = self.read_byte(input)?;
        WireType::from_u8(tag).ok_or_else(|| ProtocolError::InvalidWireType(tag).into())
    }

    fn write_len(&self, out: &mut dyn Channel, len: u32) -> RpcResult<()> {
        self.check_length(len)?;
        self.write_u32(out, len)
    }

    fn read_len(&self, input: &mut dyn Channel) -> RpcResult<u32> {
        let len = self.read_u32(input)?;
        self.check_length(len)?;
        Ok(len)
    }
}

impl Default for BinaryProtocol {
    fn default() -> Self {
        Self::new()
    }
}

impl Protocol for BinaryProtocol {
    fn write_message_begin(
        &self,
        out: &mut dyn Channel,
        name: &str,
        kind: MessageKind,
        seqid: u32,
    ) -> RpcResult<()> {
        self.write_string(out, name)?;
        self.write_byte(out, kind as u8)?;
        self.write_u32(out, seqid)
    }

    fn write_message_end(&self, _out: &mut dyn Channel) -> RpcResult<()> {
        Ok(())
    }

    fn write_struct_begin(&self, _out: &mut dyn Channel, _name: &str) -> RpcResult<()> {
        Ok(())
    }

    fn write_struct_end(&self, _out: &mut dyn Channel) -> RpcResult<()> {
        Ok(())
    }

    fn write_field_begin(
        &self,
        out: &mut dyn Channel,
        _name: &str,
        wire_type: WireType,
        id: i16,
    ) -> RpcResult<()> {
        self.write_byte(out, wire_type.as_u8())?;
        self.write_i16(out, id)
    }

    fn write_field_end(&self, _out: &mut dyn Channel) -> RpcResult<()> {
        Ok(())
    }

    fn write_field_stop(&self, out: &mut dyn Channel) -> RpcResult<()> {
        self.write_byte(out, WireType::Stop.as_u8())
    }

    fn write_map_begin(
        &self,
        out: &mut dyn Channel,
        key: WireType,
        value: WireType,
        len: u32,
    ) -> RpcResult<()> {
        self.write_byte(out, key.as_u8())?;
        self.write_byte(out, value.as_u8())?;
        self.write_len(out, len)
    }

    fn write_map_end(&self, _out: &mut dyn Channel) -> RpcResult<()> {
        Ok(())
    }

    fn write_list_begin(&self, out: &mut dyn Channel, elem: WireType, len: u32) -> RpcResult<()> {
        self.write_byte(out, elem.as_u8())?;
        self.write_len(out, len)
    }

    fn write_list_end(&self, _out: &mut dyn Channel) -> RpcResult<()> {
        Ok(())
    }

    fn write_set_begin(&self, out: &mut dyn Channel, elem: WireType, len: u32) -> RpcResult<()> {
        self.write_byte(out, elem.as_u8())?;
        self.write_len(out, len)
    }

    fn write_set_end(&self, _out: &mut dyn Channel) -> RpcResult<()> {
        Ok(())
    }

    fn write_bool(&self, out: &mut dyn Channel, value: bool) -> RpcResult<()> {
        self.write_byte(out, u8::from(value))
    }

    fn write_byte(&self, out: &mut dyn Channel, value: u8) -> RpcResult<()> {
        out.send(&[value])?;
        Ok(())
    }

    fn write_i08(&self, out: &mut dyn Channel, value: i8) -> RpcResult<()> {
        out.send(&value.to_be_bytes())?;
        Ok(())
    }

    fn write_i16(&self, out: &mut dyn Channel, value: i16) -> RpcResult<()> {
        out.send(&value.to_be_bytes())?;
        Ok(())
    }

    fn write_u16(&self, out: &mut dyn Channel, value: u16) -> RpcResult<()> {
        out.send(&value.to_be_bytes())?;
        Ok(())
    }

    fn write_i32(&self, out: &mut dyn Channel, value: i32) -> RpcResult<()> {
        out.send(&value.to_be_bytes())?;
        Ok(())
    }

    fn write_u32(&self, out: &mut dyn Channel, value: u32) -> RpcResult<()> {
        out.send(&value.to_be_bytes())?;
        Ok(())
    }

    fn write_i64(&self, out: &mut dyn Channel, value: i64) -> RpcResult<()> {
        out.send(&value.to_be_bytes())?;
        Ok(())
    }

    fn write_u64(&self, out: &mut dyn Channel, value: u64) -> RpcResult<()> {
        out.send(&value.to_be_bytes())?;
        Ok(())
    }

    fn write_double(&self, out: &mut dyn Channel, value: f64) -> RpcResult<()> {
        out.send(&value.to_bits().to_be_bytes())?;
        Ok(())
    }

    fn write_string(&self, out: &mut dyn Channel, value: &str) -> RpcResult<()> {
        let len = u32::try_from(value.len()).map_err(|_| ProtocolError::SizeLimit {
            len: u32::MAX,
            limit: self.max_length,
        })?;
        self.write_len(out, len)?;
        out.send(value.as_bytes())?;
        Ok(())
    }

    fn read_message_begin(&self, input: &mut dyn Channel) -> RpcResult<MessageHeader> {
        let name = self.read_string(input)?;
        let kind_byte = self.read_byte(input)?;
        let kind =
            MessageKind::from_u8(kind_byte).ok_or(ProtocolError::InvalidMessageKind(kind_byte))?;
        let seqid = self.read_u32(input)?;
        Ok(MessageHeader { name, kind, seqid })
    }

    fn read_message_end(&self, _input: &mut dyn Channel) -> RpcResult<()> {
        Ok(())
    }

    fn read_struct_begin(&self, _input: &mut dyn Channel) -> RpcResult<String> {
        Ok(String::new())
    }

    fn read_struct_end(&self, _input: &mut dyn Channel) -> RpcResult<()> {
        Ok(())
    }

    fn read_field_begin(&self, input: &mut dyn Channel) -> RpcResult<FieldHeader> {
        let wire_type = self.read_wire_type(input)?;
        if wire_type == WireType::Stop {
            return Ok(FieldHeader::stop());
        }
        let id = self.read_i16(input)?;
        Ok(FieldHeader {
            name: String::new(),
            wire_type,
            id,
        })
    }

    fn read_field_end(&self, _input: &mut dyn Channel) -> RpcResult<()> {
        Ok(())
    }

    fn read_map_begin(&self, input: &mut dyn Channel) -> RpcResult<MapHeader> {
        let key = self.read_wire_type(input)?;
        let value = self.read_wire_type(input)?;
        let len = self.read_len(input)?;
        Ok(MapHeader { key, value, len })
    }

    fn read_map_end(&self, _input: &mut dyn Channel) -> RpcResult<()> {
        Ok(())
    }

    fn read_list_begin(&self, input: &mut dyn Channel) -> RpcResult<ListHeader> {
        let elem = self.read_wire_type(input)?;
        let len = self.read_len(input)?;
        Ok(ListHeader { elem, len })
    }

    fn read_list_end(&self, _input: &mut dyn Channel) -> RpcResult<()> {
        Ok(())
    }

    fn read_set_begin(&self, input: &mut dyn Channel) -> RpcResult<ListHeader> {
        self.read_list_begin(input)
    }

    fn read_set_end(&self, _input: &mut dyn Channel) -> RpcResult<()> {
        Ok(())
    }

    fn read_bool(&self, input: &mut dyn Channel) -> RpcResult<bool> {
        Ok(self.read_byte(input)? != 0)
    }

    fn read_byte(&self, input: &mut dyn Channel) -> RpcResult<u8> {
        Ok(self.read_array::<1>(input)?[0])
    }

    fn read_i08(&self, input: &mut dyn Channel) -> RpcResult<i8> {
        Ok(i8::from_be_bytes(self.read_array(input)?))
    }

    fn read_i16(&self, input: &mut dyn Channel) -> RpcResult<i16> {
        Ok(i16::from_be_bytes(self.read_array(input)?))
    }

    fn read_u16(&self, input: &mut dyn Channel) -> RpcResult<u16> {
        Ok(u16::from_be_bytes(self.read_array(input)?))
    }

    fn read_i32(&self, input: &mut dyn Channel) -> RpcResult<i32> {
        Ok(i32::from_be_bytes(self.read_array(input)?))
    }

    fn read_u32(&self, input: &mut dyn Channel) -> RpcResult<u32> {
        Ok(u32::from_be_bytes(self.read_array(input)?))
    }

    fn read_i64(&self, input: &mut dyn Channel) -> RpcResult<i64> {
        Ok(i64::from_be_bytes(self.read_array(input)?))
    }

    fn read_u64(&self, input: &mut dyn Channel) -> RpcResult<u64> {
        Ok(u64::from_be_bytes(self.read_array(input)?))
    }

    fn read_double(&self, input: &mut dyn Channel) -> RpcResult<f64> {
        Ok(f64::from_bits(u64::from_be_bytes(self.read_array(input)?)))
    }

    fn read_string(&self, input: &mut dyn Channel) -> RpcResult<String> {
        let len = self.read_len(input)?;
        let mut buf = vec![0u8; len as usize];
        input.receive(&mut buf)?;
        String::from_utf8(buf).map_err(|_| ProtocolError::InvalidUtf8.into())
    }

    fn max_depth(&self) -> usize {
        self.max_depth
    }
}

#[cfg(test)]
#[path = "binary/binary_tests.rs"]
mod binary_tests;
