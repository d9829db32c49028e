#![allow(non_snake_case)]

use super::*;
use crate::channel::MemoryChannel;
use crate::error::{RpcError, TransportError};
use test_case::test_case;

fn written(f: impl FnOnce(&BinaryProtocol, &mut MemoryChannel)) -> Vec<u8> {
    let protocol = BinaryProtocol::new();
    let mut channel = MemoryChannel::new();
    f(&protocol, &mut channel);
    channel.take_output()
}

// Layout

#[test]
fn BinaryProtocol___write_i32___is_big_endian() {
    let bytes = written(|p, c| p.write_i32(c, 0x0102_0304).unwrap());

    assert_eq!(bytes, vec![1, 2, 3, 4]);
}

#[test]
fn BinaryProtocol___write_string___prefixes_u32_length() {
    let bytes = written(|p, c| p.write_string(c, "hi").unwrap());

    assert_eq!(bytes, vec![0, 0, 0, 2, b'h', b'i']);
}

#[test]
fn BinaryProtocol___write_field_begin___writes_tag_then_id() {
    let bytes = written(|p, c| p.write_field_begin(c, "x", WireType::I32, 3).unwrap());

    assert_eq!(bytes, vec![WireType::I32 as u8, 0, 3]);
}

#[test]
fn BinaryProtocol___write_field_stop___writes_tag_only() {
    let bytes = written(|p, c| p.write_field_stop(c).unwrap());

    assert_eq!(bytes, vec![WireType::Stop as u8]);
}

#[test]
fn BinaryProtocol___write_message_begin___writes_name_kind_seqid() {
    let bytes = written(|p, c| {
        p.write_message_begin(c, "add", MessageKind::Call, 7)
            .unwrap()
    });

    assert_eq!(bytes, vec![0, 0, 0, 3, b'a', b'd', b'd', 1, 0, 0, 0, 7]);
}

#[test]
fn BinaryProtocol___write_map_begin___writes_tags_then_count() {
    let bytes = written(|p, c| {
        p.write_map_begin(c, WireType::Utf8, WireType::I32, 2)
            .unwrap()
    });

    assert_eq!(
        bytes,
        vec![WireType::Utf8 as u8, WireType::I32 as u8, 0, 0, 0, 2]
    );
}

#[test]
fn BinaryProtocol___end_markers___write_nothing() {
    let bytes = written(|p, c| {
        p.write_struct_begin(c, "S").unwrap();
        p.write_field_end(c).unwrap();
        p.write_struct_end(c).unwrap();
        p.write_list_end(c).unwrap();
        p.write_set_end(c).unwrap();
        p.write_map_end(c).unwrap();
        p.write_message_end(c).unwrap();
    });

    assert!(bytes.is_empty());
}

// Reading

#[test]
fn BinaryProtocol___read_message_begin___decodes_header() {
    let protocol = BinaryProtocol::new();
    let mut channel = MemoryChannel::new();
    protocol
        .write_message_begin(&mut channel, "divide", MessageKind::Reply, 42)
        .unwrap();
    channel.loopback();

    let header = protocol.read_message_begin(&mut channel).unwrap();

    assert_eq!(header, MessageHeader::new("divide", MessageKind::Reply, 42));
}

#[test]
fn BinaryProtocol___read_message_begin___rejects_unknown_kind() {
    let protocol = BinaryProtocol::new();
    let mut channel = MemoryChannel::with_input(vec![0, 0, 0, 0, 9, 0, 0, 0, 1]);

    let err = protocol.read_message_begin(&mut channel).unwrap_err();

    assert!(matches!(
        err,
        RpcError::Protocol(ProtocolError::InvalidMessageKind(9))
    ));
}

#[test]
fn BinaryProtocol___read_field_begin___stop_has_no_id() {
    let protocol = BinaryProtocol::new();
    let mut channel = MemoryChannel::with_input(vec![WireType::Stop as u8]);

    let header = protocol.read_field_begin(&mut channel).unwrap();

    assert!(header.is_stop());
    assert_eq!(channel.remaining(), 0);
}

#[test_case(0)]
#[test_case(20)]
#[test_case(200)]
fn BinaryProtocol___read_field_begin___rejects_unknown_tag(tag: u8) {
    let protocol = BinaryProtocol::new();
    let mut channel = MemoryChannel::with_input(vec![tag, 0, 1]);

    let err = protocol.read_field_begin(&mut channel).unwrap_err();

    assert!(matches!(
        err,
        RpcError::Protocol(ProtocolError::InvalidWireType(t)) if t == tag
    ));
}

#[test]
fn BinaryProtocol___read_string___rejects_invalid_utf8() {
    let protocol = BinaryProtocol::new();
    let mut channel = MemoryChannel::with_input(vec![0, 0, 0, 2, 0xff, 0xfe]);

    let err = protocol.read_string(&mut channel).unwrap_err();

    assert!(matches!(err, RpcError::Protocol(ProtocolError::InvalidUtf8)));
}

#[test]
fn BinaryProtocol___read_string___over_limit_fails_before_reading_body() {
    let protocol = BinaryProtocol::new().with_max_length(4);
    let mut channel = MemoryChannel::with_input(vec![0, 0, 0, 5, b'a', b'b', b'c', b'd', b'e']);

    let err = protocol.read_string(&mut channel).unwrap_err();

    assert!(matches!(
        err,
        RpcError::Protocol(ProtocolError::SizeLimit { len: 5, limit: 4 })
    ));
    assert_eq!(channel.remaining(), 5);
}

#[test]
fn BinaryProtocol___read_list_begin___over_limit_fails() {
    let protocol = BinaryProtocol::new().with_max_length(1);
    let mut channel = MemoryChannel::with_input(vec![WireType::I32 as u8, 0, 0, 0, 2]);

    let err = protocol.read_list_begin(&mut channel).unwrap_err();

    assert!(matches!(
        err,
        RpcError::Protocol(ProtocolError::SizeLimit { .. })
    ));
}

#[test]
fn BinaryProtocol___read_truncated___surfaces_transport_error() {
    let protocol = BinaryProtocol::new();
    let mut channel = MemoryChannel::with_input(vec![0, 1]);

    let err = protocol.read_i32(&mut channel).unwrap_err();

    assert!(matches!(
        err,
        RpcError::Transport(TransportError::UnexpectedEof { .. })
    ));
}

#[test_case(f64::MIN_POSITIVE)]
#[test_case(-0.0)]
#[test_case(f64::INFINITY)]
#[test_case(1.5e300)]
fn BinaryProtocol___double___preserves_bits(value: f64) {
    let protocol = BinaryProtocol::new();
    let mut channel = MemoryChannel::new();
    protocol.write_double(&mut channel, value).unwrap();
    channel.loopback();

    let read = protocol.read_double(&mut channel).unwrap();

    assert_eq!(read.to_bits(), value.to_bits());
}

#[test]
fn BinaryProtocol___bool___reads_nonzero_as_true() {
    let protocol = BinaryProtocol::new();
    let mut channel = MemoryChannel::with_input(vec![0, 1, 7]);

    assert!(!protocol.read_bool(&mut channel).unwrap());
    assert!(protocol.read_bool(&mut channel).unwrap());
    assert!(protocol.read_bool(&mut channel).unwrap());
}

// Skipping

fn write_nested_value(protocol: &BinaryProtocol, channel: &mut MemoryChannel) {
    // struct { 1: map<string, list<i32>>, 2: struct { 1: double } }
    protocol.write_struct_begin(channel, "Outer").unwrap();
    protocol
        .write_field_begin(channel, "m", WireType::Map, 1)
        .unwrap();
    protocol
        .write_map_begin(channel, WireType::Utf8, WireType::List, 1)
        .unwrap();
    protocol.write_string(channel, "k").unwrap();
    protocol.write_list_begin(channel, WireType::I32, 2).unwrap();
    protocol.write_i32(channel, 1).unwrap();
    protocol.write_i32(channel, 2).unwrap();
    protocol.write_list_end(channel).unwrap();
    protocol.write_map_end(channel).unwrap();
    protocol.write_field_end(channel).unwrap();
    protocol
        .write_field_begin(channel, "inner", WireType::Struct, 2)
        .unwrap();
    protocol.write_struct_begin(channel, "Inner").unwrap();
    protocol
        .write_field_begin(channel, "d", WireType::Double, 1)
        .unwrap();
    protocol.write_double(channel, 2.5).unwrap();
    protocol.write_field_end(channel).unwrap();
    protocol.write_field_stop(channel).unwrap();
    protocol.write_struct_end(channel).unwrap();
    protocol.write_field_end(channel).unwrap();
    protocol.write_field_stop(channel).unwrap();
    protocol.write_struct_end(channel).unwrap();
}

#[test]
fn BinaryProtocol___skip_nested_struct___consumes_exactly_the_value() {
    let protocol = BinaryProtocol::new();
    let mut channel = MemoryChannel::new();
    write_nested_value(&protocol, &mut channel);
    protocol.write_i32(&mut channel, 99).unwrap();
    channel.loopback();

    protocol.skip(&mut channel, WireType::Struct).unwrap();

    assert_eq!(protocol.read_i32(&mut channel).unwrap(), 99);
    assert_eq!(channel.remaining(), 0);
}

#[test]
fn BinaryProtocol___skip_beyond_depth___returns_depth_limit() {
    let protocol = BinaryProtocol::new().with_max_depth(2);
    let mut channel = MemoryChannel::new();
    write_nested_value(&protocol, &mut channel);
    channel.loopback();

    let err = protocol.skip(&mut channel, WireType::Struct).unwrap_err();

    assert!(matches!(err, RpcError::Protocol(ProtocolError::DepthLimit)));
}

#[test]
fn BinaryProtocol___skip_stop___is_rejected() {
    let protocol = BinaryProtocol::new();
    let mut channel = MemoryChannel::new();

    let err = protocol.skip(&mut channel, WireType::Stop).unwrap_err();

    assert!(matches!(
        err,
        RpcError::Protocol(ProtocolError::UnexpectedStop)
    ));
}

#[test]
fn BinaryProtocol___skip_void___consumes_nothing() {
    let protocol = BinaryProtocol::new();
    let mut channel = MemoryChannel::with_input(vec![1]);

    protocol.skip(&mut channel, WireType::Void).unwrap();

    assert_eq!(channel.remaining(), 1);
}

#[test]
fn BinaryProtocol___boxed___is_usable_as_trait_object() {
    let protocol = BinaryProtocol::boxed();
    let mut channel = MemoryChannel::new();

    protocol.write_u16(&mut channel, 0xabcd).unwrap();
    channel.loopback();

    assert_eq!(protocol.read_u16(&mut channel).unwrap(), 0xabcd);
}
