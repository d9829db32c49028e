//! Type mapper: IDL types to target types and wire tags.
//!
//! Every function here is pure and total over the closed [`Type`] enum.
//! Named references are resolved through the [`Program`]; a name that
//! resolves to nothing is the only way to reach [`SchemaError::UnknownType`].

use crate::error::{GenResult, SchemaError};
use crate::ir::TargetType;
use idlgen_runtime::WireType;
use idlgen_schema::{Primitive, Program, Type};
use std::collections::HashSet;

/// Map a primitive to its built-in target type
pub fn primitive_target(p: Primitive) -> TargetType {
    match p {
        Primitive::Void => TargetType::Unit,
        Primitive::Bool => TargetType::Bool,
        Primitive::String | Primitive::Utf7 | Primitive::Utf8 | Primitive::Utf16 => {
            TargetType::String
        }
        Primitive::Byte | Primitive::U08 => TargetType::U8,
        Primitive::I08 => TargetType::I8,
        Primitive::I16 => TargetType::I16,
        Primitive::U16 => TargetType::U16,
        Primitive::I32 => TargetType::I32,
        Primitive::U32 => TargetType::U32,
        Primitive::I64 => TargetType::I64,
        Primitive::U64 => TargetType::U64,
        Primitive::Float => TargetType::F64,
    }
}

/// Map a primitive to its wire tag
pub fn primitive_wire_type(p: Primitive) -> WireType {
    match p {
        Primitive::Void => WireType::Void,
        Primitive::Bool => WireType::Bool,
        Primitive::String | Primitive::Utf7 => WireType::Utf7,
        Primitive::Utf8 => WireType::Utf8,
        Primitive::Utf16 => WireType::Utf16,
        Primitive::Byte | Primitive::U08 => WireType::Byte,
        Primitive::I08 => WireType::I08,
        Primitive::I16 => WireType::I16,
        Primitive::U16 => WireType::U16,
        Primitive::I32 => WireType::I32,
        Primitive::U32 => WireType::U32,
        Primitive::I64 => WireType::I64,
        Primitive::U64 => WireType::U64,
        Primitive::Float => WireType::Double,
    }
}

/// Map an IDL type to its target type.
///
/// `void` maps to [`TargetType::Unit`] at the top level; inside a collection
/// it is rejected. Map keys and set elements must have a total order because
/// they map to ordered containers.
pub fn target_type(ty: &Type, program: &Program) -> GenResult<TargetType> {
    match ty {
        Type::Primitive(p) => Ok(primitive_target(*p)),
        Type::Map { key, value } => {
            require_total_order(key, program)?;
            Ok(TargetType::Map(
                Box::new(element_type(key, ty, program)?),
                Box::new(element_type(value, ty, program)?),
            ))
        }
        Type::List(elem) => Ok(TargetType::List(Box::new(element_type(elem, ty, program)?))),
        Type::Set(elem) => {
            require_total_order(elem, program)?;
            Ok(TargetType::Set(Box::new(element_type(elem, ty, program)?)))
        }
        Type::Struct(name) => {
            program
                .struct_def(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
            Ok(TargetType::Named(name.clone()))
        }
        Type::Typedef(name) => {
            program
                .typedef_def(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
            Ok(TargetType::Named(name.clone()))
        }
        Type::Enum(name) => {
            program
                .enum_def(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
            Ok(TargetType::Named(name.clone()))
        }
    }
}

/// Map a type in a value position (field, parameter, element).
///
/// `context` names the position for the error message when the type is void.
pub fn value_type(ty: &Type, program: &Program, context: &str) -> GenResult<TargetType> {
    if is_void(ty, program) {
        return Err(SchemaError::VoidValue {
            context: context.to_string(),
        });
    }
    target_type(ty, program)
}

fn element_type(elem: &Type, container: &Type, program: &Program) -> GenResult<TargetType> {
    value_type(elem, program, &format!("element of {container}"))
}

fn require_total_order(ty: &Type, program: &Program) -> GenResult<()> {
    if has_total_order(ty, program)? {
        Ok(())
    } else {
        Err(SchemaError::UnorderedKey { ty: ty.to_string() })
    }
}

/// Whether `ty` is void, directly or through a typedef
fn is_void(ty: &Type, program: &Program) -> bool {
    program.canonical(ty).is_some_and(Type::is_void)
}

/// The wire tag for a type: enums are i32, typedefs use their canonical
/// type's tag.
pub fn wire_type(ty: &Type, program: &Program) -> GenResult<WireType> {
    let canonical = program
        .canonical(ty)
        .ok_or_else(|| SchemaError::UnknownType(ty.to_string()))?;
    match canonical {
        Type::Primitive(p) => Ok(primitive_wire_type(*p)),
        Type::Map { .. } => Ok(WireType::Map),
        Type::List(_) => Ok(WireType::List),
        Type::Set(_) => Ok(WireType::Set),
        Type::Struct(name) => {
            program
                .struct_def(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
            Ok(WireType::Struct)
        }
        Type::Enum(name) => {
            program
                .enum_def(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
            Ok(WireType::I32)
        }
        Type::Typedef(name) => Err(SchemaError::UnknownType(name.clone())),
    }
}

/// Whether every value of `ty` is totally ordered: no float is reachable
/// through collections, struct fields or typedefs.
pub fn has_total_order(ty: &Type, program: &Program) -> GenResult<bool> {
    let mut seen = HashSet::new();
    total_order_inner(ty, program, &mut seen)
}

fn total_order_inner<'a>(
    ty: &'a Type,
    program: &'a Program,
    seen: &mut HashSet<&'a str>,
) -> GenResult<bool> {
    match ty {
        Type::Primitive(p) => Ok(*p != Primitive::Float),
        Type::Map { key, value } => Ok(total_order_inner(key, program, seen)?
            && total_order_inner(value, program, seen)?),
        Type::List(elem) | Type::Set(elem) => total_order_inner(elem, program, seen),
        Type::Enum(_) => Ok(true),
        Type::Typedef(name) => {
            if !seen.insert(name.as_str()) {
                return Ok(true);
            }
            let def = program
                .typedef_def(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
            total_order_inner(&def.target, program, seen)
        }
        Type::Struct(name) => {
            if !seen.insert(name.as_str()) {
                return Ok(true);
            }
            let def = program
                .struct_def(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
            for field in &def.fields {
                if !total_order_inner(&field.ty, program, seen)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}
