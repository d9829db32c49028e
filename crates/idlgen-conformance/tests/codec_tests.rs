//! Wire behavior of the generated readers and writers.
//!
//! Values are written into a [`MemoryChannel`], looped back and read again
//! with the binary protocol.

#![allow(non_snake_case)]

use idlgen_conformance::calc::*;
use idlgen_runtime::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

type WriteFn<T> = fn(&dyn Protocol, &mut dyn Channel, &T) -> RpcResult<()>;
type ReadFn<T> = fn(&dyn Protocol, &mut dyn Channel) -> RpcResult<T>;

fn encode<T>(write: WriteFn<T>, value: &T) -> Vec<u8> {
    let protocol = BinaryProtocol::new();
    let mut channel = MemoryChannel::new();
    write(&protocol, &mut channel, value).unwrap();
    channel.take_output()
}

fn decode<T>(read: ReadFn<T>, bytes: Vec<u8>) -> T {
    let protocol = BinaryProtocol::new();
    let mut channel = MemoryChannel::with_input(bytes);
    let value = read(&protocol, &mut channel).unwrap();
    assert_eq!(channel.remaining(), 0, "reader left bytes behind");
    value
}

fn point(x: i32, y: i32) -> Point {
    Point {
        x,
        y,
        __isset: PointIsset { x: true, y: true },
    }
}

fn sample_shape() -> Shape {
    let mut tags = BTreeMap::new();
    tags.insert("primes".to_string(), BTreeSet::from([2, 3, 5]));
    tags.insert("empty".to_string(), BTreeSet::new());

    Shape {
        name: "triangle".into(),
        points: vec![point(0, 0), point(4, 0), point(0, 3)],
        tags,
        color: Color::BLUE,
        id: 42,
        __isset: ShapeIsset {
            name: true,
            points: true,
            tags: true,
            color: true,
            id: true,
        },
    }
}

// ============================================================================
// Round trips
// ============================================================================

mod roundtrip {
    use super::*;

    #[test]
    fn struct_point___roundtrip___fields_and_presence_restored() {
        let bytes = encode(write_struct_point, &point(3, -7));

        let decoded = decode(read_struct_point, bytes);

        assert_eq!(decoded, point(3, -7));
        assert!(decoded.__isset.x && decoded.__isset.y);
    }

    #[test]
    fn struct_shape___roundtrip___nested_collections_restored() {
        let shape = sample_shape();

        let decoded = decode(read_struct_shape, encode(write_struct_shape, &shape));

        assert_eq!(decoded, shape);
    }

    #[test]
    fn struct_sample___roundtrip___every_primitive_kind() {
        let sample = Sample {
            flag: true,
            small: 0xfe,
            signed_small: -5,
            short: -1200,
            port: 8080,
            count: u32::MAX,
            wide: u64::MAX - 1,
            ratio: 0.25,
            text: "héllo".into(),
            wide_text: "wide".into(),
            groups: BTreeMap::from([(1, vec!["a".to_string(), "b".to_string()]), (-4, vec![])]),
            palette: BTreeSet::from([Color::RED, Color::GREEN]),
            r#type: "kind".into(),
            __isset: SampleIsset {
                flag: true,
                small: true,
                signed_small: true,
                short: true,
                port: true,
                count: true,
                wide: true,
                ratio: true,
                text: true,
                wide_text: true,
                groups: true,
                palette: true,
                r#type: true,
            },
        };

        let decoded = decode(read_struct_sample, encode(write_struct_sample, &sample));

        assert_eq!(decoded, sample);
    }

    #[test]
    fn list_helper___roundtrip___order_preserved() {
        let points = vec![point(1, 1), point(2, 2), point(1, 1)];

        let decoded = decode(
            read_list_v_struct_point,
            encode(write_list_v_struct_point, &points),
        );

        assert_eq!(decoded, points);
    }

    #[test]
    fn map_helper___empty___roundtrips() {
        let empty: BTreeMap<String, BTreeSet<i32>> = BTreeMap::new();

        let decoded = decode(
            read_map_k_string_v_set_v_i32,
            encode(write_map_k_string_v_set_v_i32, &empty),
        );

        assert!(decoded.is_empty());
    }
}

// ============================================================================
// Compatibility
// ============================================================================

mod compatibility {
    use super::*;

    #[test]
    fn read_struct_point___unknown_fields___skipped() {
        let labeled = LabeledPoint {
            x: 10,
            y: 20,
            label: "origin".into(),
            trail: vec![point(1, 2)],
            __isset: LabeledPointIsset {
                x: true,
                y: true,
                label: true,
                trail: true,
            },
        };

        let decoded = decode(read_struct_point, encode(write_struct_labeled_point, &labeled));

        assert_eq!(decoded, point(10, 20));
    }

    #[test]
    fn read_struct_point___wire_type_mismatch___field_skipped_and_unset() {
        let mislabeled = Mislabeled {
            x: "not a number".into(),
            y: 7,
            __isset: MislabeledIsset { x: true, y: true },
        };

        let decoded = decode(read_struct_point, encode(write_struct_mislabeled, &mislabeled));

        assert_eq!(decoded.x, 0);
        assert!(!decoded.__isset.x);
        assert_eq!(decoded.y, 7);
        assert!(decoded.__isset.y);
    }

    #[test]
    fn read_struct_shape___unknown_enum_value___preserved() {
        let mut shape = sample_shape();
        shape.color = Color(99);

        let decoded = decode(read_struct_shape, encode(write_struct_shape, &shape));

        assert_eq!(decoded.color, Color(99));
        assert_ne!(decoded.color, Color::RED);
    }

    #[test]
    fn read_struct_tally___mismatched_element_tags___collections_skipped() {
        let text = TallyText {
            values: vec!["one".into(), "two".into()],
            weights: BTreeMap::from([("heavy".to_string(), "9".to_string())]),
            total: 11,
            __isset: TallyTextIsset {
                values: true,
                weights: true,
                total: true,
            },
        };

        let decoded = decode(read_struct_tally, encode(write_struct_tally_text, &text));

        assert!(decoded.values.is_empty());
        assert!(decoded.weights.is_empty());
        // Skipping kept the stream aligned for the field that follows
        assert_eq!(decoded.total, 11);
        assert!(decoded.__isset.total);
    }

    #[test]
    fn read_struct_tally___matching_element_tags___decoded() {
        let tally = Tally {
            values: vec![3, 1, 2],
            weights: BTreeMap::from([("heavy".to_string(), 9)]),
            total: 6,
            ..Default::default()
        };

        let decoded = decode(read_struct_tally, encode(write_struct_tally, &tally));

        assert_eq!(decoded.values, vec![3, 1, 2]);
        assert_eq!(decoded.weights, tally.weights);
    }

    #[test]
    fn write_struct_shape___enum_field___same_bytes_as_plain_i32() {
        let shape = sample_shape();
        let plain = PlainShape {
            name: shape.name.clone(),
            points: shape.points.clone(),
            tags: shape.tags.clone(),
            color: 4,
            id: shape.id,
            __isset: PlainShapeIsset {
                name: true,
                points: true,
                tags: true,
                color: true,
                id: true,
            },
        };
        assert_eq!(shape.color, Color(4));

        let enum_bytes = encode(write_struct_shape, &shape);

        assert_eq!(enum_bytes, encode(write_struct_plain_shape, &plain));
        let back = decode(read_struct_plain_shape, enum_bytes);
        assert_eq!(back.color, 4);
    }

    #[test]
    fn read_struct_point___empty_struct___defaults_without_presence() {
        let decoded = decode(read_struct_point, vec![WireType::Stop.as_u8()]);

        assert_eq!(decoded, Point::default());
        assert!(!decoded.__isset.x);
    }

    #[test]
    fn read_struct_point___truncated_input___returns_error() {
        let mut bytes = encode(write_struct_point, &point(1, 2));
        bytes.truncate(bytes.len() - 2);
        let protocol = BinaryProtocol::new();
        let mut channel = MemoryChannel::with_input(bytes);

        let result = read_struct_point(&protocol, &mut channel);

        assert!(result.is_err());
    }
}

// ============================================================================
// Declarations
// ============================================================================

mod declarations {
    use super::*;

    #[test]
    fn enum_constants___carry_declared_values() {
        assert_eq!(Color::RED.0, 1);
        assert_eq!(Color::GREEN.0, 2);
        assert_eq!(Color::BLUE.0, 4);
        assert_eq!(Color::default(), Color(0));
    }

    #[test]
    fn typedef___is_alias_of_target() {
        let id: Id = i64::MIN;

        assert_eq!(id, i64::MIN);
    }

    #[test]
    fn exception___implements_error() {
        let err = DivByZero {
            message: "1 / 0".into(),
            ..Default::default()
        };

        let boxed: Box<dyn std::error::Error> = Box::new(err);

        assert!(boxed.to_string().contains("1 / 0"));
    }
}

// ============================================================================
// Result presence gating
// ============================================================================

mod presence {
    use super::*;

    #[test]
    fn write_result___nothing_set___writes_only_stop() {
        let bytes = encode(write_struct_calc_divide_result, &CalcDivideResult::default());

        assert_eq!(bytes, vec![WireType::Stop.as_u8()]);
    }

    #[test]
    fn write_result___exception_set___success_absent_on_read() {
        let result = CalcDivideResult {
            zero: DivByZero {
                message: "boom".into(),
                ..Default::default()
            },
            __isset: CalcDivideResultIsset {
                zero: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let decoded = decode(
            read_struct_calc_divide_result,
            encode(write_struct_calc_divide_result, &result),
        );

        assert!(!decoded.__isset.success);
        assert!(!decoded.__isset.overflow);
        assert!(decoded.__isset.zero);
        assert_eq!(decoded.zero.message, "boom");
    }

    #[test]
    fn write_args___not_gated___default_fields_still_written() {
        let bytes = encode(write_struct_calc_add_args, &CalcAddArgs::default());

        let decoded = decode(read_struct_calc_add_args, bytes);

        assert!(decoded.__isset.a && decoded.__isset.b);
        assert_eq!((decoded.a, decoded.b), (0, 0));
    }
}
