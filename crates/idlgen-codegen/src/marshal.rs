//! Marshal code synthesizer.
//!
//! For every struct and collection type in emission order this builds a
//! reader/writer [`CodecPair`] following the wire framing:
//!
//! - struct: struct-begin, per field (declaration order) field-begin with
//!   name, wire tag and id, the value, field-end; then field-stop and
//!   struct-end. The reader loops on field-begin until `Stop`, dispatches on
//!   id (and wire tag), skips anything it does not recognize and records
//!   presence for what it decodes.
//! - list / set: element tag and u32 count, then the elements.
//! - map: key tag, value tag and u32 count, then key/value pairs.
//!
//! Enums and typedefs have no codec of their own: enums travel as i32 and
//! typedefs reuse the codec of their canonical type.

use crate::error::{GenResult, SchemaError};
use crate::ir::{
    CodecBody, CodecFn, CodecPair, ElementCodec, FieldCodec, StructCodec, TargetType, ValueCodec,
};
use crate::naming::{field_ident, to_snake_case};
use crate::type_map::{target_type, value_type, wire_type};
use idlgen_schema::{Primitive, Program, StructDef, Type};

/// Protocol method suffix for a primitive; `None` for void
pub fn io_method(p: Primitive) -> Option<&'static str> {
    let method = match p {
        Primitive::Void => return None,
        Primitive::Bool => "bool",
        Primitive::String | Primitive::Utf7 | Primitive::Utf8 | Primitive::Utf16 => "string",
        Primitive::Byte | Primitive::U08 => "byte",
        Primitive::I08 => "i08",
        Primitive::I16 => "i16",
        Primitive::U16 => "u16",
        Primitive::I32 => "i32",
        Primitive::U32 => "u32",
        Primitive::I64 => "i64",
        Primitive::U64 => "u64",
        Primitive::Float => "double",
    };
    Some(method)
}

/// Helper name suffix, unique per structural identity.
///
/// Primitive element names keep the IDL keyword so that `list<utf8>` and
/// `list<string>` get distinct helpers. Named types carry their kind as a
/// prefix, so an enum called `I32` cannot share a helper with `i32`.
pub fn helper_suffix(ty: &Type) -> String {
    match ty {
        Type::Primitive(p) => p.name().to_string(),
        Type::Struct(name) => format!("struct_{}", to_snake_case(name)),
        Type::Enum(name) => format!("enum_{}", to_snake_case(name)),
        Type::Typedef(name) => format!("typedef_{}", to_snake_case(name)),
        Type::List(elem) => format!("list_v_{}", helper_suffix(elem)),
        Type::Set(elem) => format!("set_v_{}", helper_suffix(elem)),
        Type::Map { key, value } => {
            format!("map_k_{}_v_{}", helper_suffix(key), helper_suffix(value))
        }
    }
}

/// How a value of `ty` is read and written, resolved through typedefs
pub fn value_codec(ty: &Type, program: &Program) -> GenResult<ValueCodec> {
    let canonical = program
        .canonical(ty)
        .ok_or_else(|| SchemaError::UnknownType(ty.to_string()))?;
    match canonical {
        Type::Primitive(p) => {
            let method = io_method(*p).ok_or_else(|| SchemaError::VoidValue {
                context: format!("codec for {ty}"),
            })?;
            Ok(ValueCodec::Primitive {
                method,
                by_ref: method == "string",
            })
        }
        Type::Enum(name) => {
            program
                .enum_def(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
            Ok(ValueCodec::Enum(name.clone()))
        }
        Type::Struct(_) | Type::Map { .. } | Type::List(_) | Type::Set(_) => {
            Ok(ValueCodec::Helper(helper_suffix(canonical)))
        }
        Type::Typedef(name) => Err(SchemaError::UnknownType(name.clone())),
    }
}

/// Wire tag and value codec for one value position
pub fn element_codec(ty: &Type, program: &Program, context: &str) -> GenResult<ElementCodec> {
    value_type(ty, program, context)?;
    Ok(ElementCodec {
        wire: wire_type(ty, program)?,
        codec: value_codec(ty, program)?,
    })
}

/// Build the codec pair for an ordered type.
///
/// Returns `None` for enums and typedefs, which have no codec of their own.
pub fn synthesize(ty: &Type, program: &Program) -> GenResult<Option<CodecPair>> {
    let pair = match ty {
        Type::Primitive(_) | Type::Typedef(_) | Type::Enum(_) => return Ok(None),
        Type::Struct(name) => {
            let def = program
                .struct_def(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
            struct_codec_pair(def, program, false)?
        }
        Type::List(elem) => {
            let elem = element_codec(elem, program, &format!("element of {ty}"))?;
            collection_pair(
                ty,
                program,
                CodecBody::ReadList(elem.clone()),
                CodecBody::WriteList(elem),
            )?
        }
        Type::Set(elem) => {
            let elem = element_codec(elem, program, &format!("element of {ty}"))?;
            collection_pair(
                ty,
                program,
                CodecBody::ReadSet(elem.clone()),
                CodecBody::WriteSet(elem),
            )?
        }
        Type::Map { key, value } => {
            let key = element_codec(key, program, &format!("key of {ty}"))?;
            let value = element_codec(value, program, &format!("value of {ty}"))?;
            collection_pair(
                ty,
                program,
                CodecBody::ReadMap {
                    key: key.clone(),
                    value: value.clone(),
                },
                CodecBody::WriteMap { key, value },
            )?
        }
    };
    Ok(Some(pair))
}

fn collection_pair(
    ty: &Type,
    program: &Program,
    read: CodecBody,
    write: CodecBody,
) -> GenResult<CodecPair> {
    let suffix = helper_suffix(ty);
    let value_type = target_type(ty, program)?;
    Ok(CodecPair {
        label: ty.to_string(),
        reader: CodecFn {
            name: format!("read_{suffix}"),
            value_type: value_type.clone(),
            body: read,
        },
        writer: CodecFn {
            name: format!("write_{suffix}"),
            value_type,
            body: write,
        },
    })
}

/// Build the codec pair for a struct definition.
///
/// `presence_gated` writers emit only fields whose presence flag is set; it
/// is used for result structs so that at most one slot goes on the wire.
pub fn struct_codec_pair(
    def: &StructDef,
    program: &Program,
    presence_gated: bool,
) -> GenResult<CodecPair> {
    let fields = def
        .fields
        .iter()
        .map(|field| {
            let context = format!("field {}.{}", def.name, field.name);
            Ok(FieldCodec {
                id: field.id,
                name: field.name.clone(),
                ident: field_ident(&field.name),
                element: element_codec(&field.ty, program, &context)?,
            })
        })
        .collect::<GenResult<Vec<_>>>()?;

    let codec = StructCodec {
        name: def.name.clone(),
        fields,
        presence_gated,
    };
    let suffix = helper_suffix(&Type::Struct(def.name.clone()));
    let value_type = TargetType::Named(def.name.clone());

    Ok(CodecPair {
        label: def.name.clone(),
        reader: CodecFn {
            name: format!("read_{suffix}"),
            value_type: value_type.clone(),
            body: CodecBody::ReadStruct(codec.clone()),
        },
        writer: CodecFn {
            name: format!("write_{suffix}"),
            value_type,
            body: CodecBody::WriteStruct(codec),
        },
    })
}
