//! Declaration emitter.
//!
//! Turns structs, exceptions, enums and typedefs into declaration items.
//! Declarations carry no behaviour; codecs and trait impls are separate
//! items in the implementation unit.

use crate::error::{GenResult, SchemaError};
use crate::ir::{EnumConst, EnumDecl, FieldDecl, Item, StructDecl, TypedefDecl};
use crate::naming::{field_ident, rust_ident, to_constant_case};
use crate::type_map::{has_total_order, target_type, value_type};
use idlgen_schema::{EnumDef, Program, StructDef, Type, TypedefDef};

/// Declaration item for an ordered type, `None` for collections
pub fn declare(ty: &Type, program: &Program) -> GenResult<Option<Item>> {
    let item = match ty {
        Type::Struct(name) => {
            let def = program
                .struct_def(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
            Item::Struct(struct_decl(def, program)?)
        }
        Type::Enum(name) => {
            let def = program
                .enum_def(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
            Item::Enum(enum_decl(def))
        }
        Type::Typedef(name) => {
            let def = program
                .typedef_def(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
            Item::Typedef(typedef_decl(def, program)?)
        }
        Type::Primitive(_) | Type::Map { .. } | Type::List(_) | Type::Set(_) => return Ok(None),
    };
    Ok(Some(item))
}

/// Struct declaration with one presence flag per field
pub fn struct_decl(def: &StructDef, program: &Program) -> GenResult<StructDecl> {
    let mut total_order = true;
    let mut fields = Vec::with_capacity(def.fields.len());

    for field in &def.fields {
        let context = format!("field {}.{}", def.name, field.name);
        let ty = value_type(&field.ty, program, &context)?;
        total_order &= has_total_order(&field.ty, program)?;
        fields.push(FieldDecl {
            id: field.id,
            ident: field_ident(&field.name),
            ty,
        });
    }

    Ok(StructDecl {
        name: def.name.clone(),
        isset: format!("{}Isset", def.name),
        fields,
        total_order,
    })
}

pub fn enum_decl(def: &EnumDef) -> EnumDecl {
    EnumDecl {
        name: def.name.clone(),
        constants: def
            .variants
            .iter()
            .map(|v| EnumConst {
                ident: rust_ident(&to_constant_case(&v.name)),
                value: v.value,
            })
            .collect(),
    }
}

/// Type alias; a typedef of void is rejected like any other void value
pub fn typedef_decl(def: &TypedefDef, program: &Program) -> GenResult<TypedefDecl> {
    let context = format!("typedef {}", def.name);
    value_type(&def.target, program, &context)?;
    Ok(TypedefDecl {
        name: def.name.clone(),
        target: target_type(&def.target, program)?,
    })
}
