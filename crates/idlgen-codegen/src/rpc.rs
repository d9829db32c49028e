//! RPC emitter.
//!
//! Builds the [`ServiceModel`] for a service together with the synthesized
//! args and result structs of every function, and splits the resulting
//! items between the interfaces unit and the implementation unit.

use crate::decl::struct_decl;
use crate::error::{GenResult, SchemaError};
use crate::ir::{
    CodecPair, ExceptionSlot, FunctionModel, Item, ParamModel, ServiceErrorDecl, ServiceModel,
    StructDecl, StructRef,
};
use crate::marshal::struct_codec_pair;
use crate::naming::{field_ident, rust_ident, to_pascal_case, to_snake_case};
use crate::type_map::{target_type, value_type};
use idlgen_schema::{Field, Function, Program, Service, Type};

/// Error enum variant reserved for transport and protocol failures
const RPC_VARIANT: &str = "Rpc";

/// Everything emitted for one service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEmission {
    pub model: ServiceModel,

    /// Args and result structs with their codecs, function by function
    pub structs: Vec<(StructDecl, CodecPair)>,

    /// Error enums of functions that declare exceptions
    pub errors: Vec<ServiceErrorDecl>,
}

impl ServiceEmission {
    /// Trait, error enums and stub declarations
    pub fn interface_items(&self) -> Vec<Item> {
        let mut items = vec![Item::Interface(self.model.clone())];
        items.extend(self.errors.iter().cloned().map(Item::ServiceError));
        items.push(Item::ServerDecl(self.model.clone()));
        items.push(Item::ClientDecl(self.model.clone()));
        items
    }

    /// Args and result structs with their codecs
    pub fn synthesized_items(&self) -> Vec<Item> {
        self.structs
            .iter()
            .flat_map(|(decl, codec)| [Item::Struct(decl.clone()), Item::Codec(codec.clone())])
            .collect()
    }

    /// Conversions and `Display` for the error enums
    pub fn error_impl_items(&self) -> Vec<Item> {
        self.errors.iter().cloned().map(Item::ServiceErrorImpl).collect()
    }

    /// Body of the server stub
    pub fn server_item(&self) -> Item {
        Item::ServerImpl(self.model.clone())
    }

    /// Body of the client stub
    pub fn client_item(&self) -> Item {
        Item::ClientImpl(self.model.clone())
    }
}

/// Build the RPC model of a service.
///
/// Fails on void parameters, unresolvable types and `throws` entries that do
/// not name an exception.
pub fn service_model(service: &Service, program: &Program) -> GenResult<ServiceEmission> {
    let mut functions = Vec::with_capacity(service.functions.len());
    let mut structs = Vec::with_capacity(service.functions.len() * 2);
    let mut errors = Vec::new();

    for function in &service.functions {
        let pascal = to_pascal_case(&function.name);
        let args_def = function.args_struct(format!("{}{pascal}Args", service.name));
        let result_def = function.result_struct(format!("{}{pascal}Result", service.name));

        let params = function
            .params
            .iter()
            .map(|param| {
                let context = format!("parameter {}.{}", function.name, param.name);
                Ok(ParamModel {
                    ident: field_ident(&param.name),
                    ty: value_type(&param.ty, program, &context)?,
                })
            })
            .collect::<GenResult<Vec<_>>>()?;

        let exceptions = exception_slots(function, program)?;
        let error = if exceptions.is_empty() {
            None
        } else {
            let name = format!("{}{pascal}Error", service.name);
            errors.push(ServiceErrorDecl {
                name: name.clone(),
                function: function.name.clone(),
                variants: exceptions.clone(),
            });
            Some(name)
        };

        let args_codec = struct_codec_pair(&args_def, program, false)?;
        let result_codec = struct_codec_pair(&result_def, program, true)?;
        let args = struct_ref(&args_codec);
        let result = struct_ref(&result_codec);
        structs.push((struct_decl(&args_def, program)?, args_codec));
        structs.push((struct_decl(&result_def, program)?, result_codec));

        functions.push(FunctionModel {
            name: function.name.clone(),
            method: rust_ident(&to_snake_case(&function.name)),
            stem: to_snake_case(&function.name),
            params,
            returns: target_type(&function.return_type, program)?,
            args,
            result,
            has_success: function.returns_value(),
            exceptions,
            error,
        });
    }

    Ok(ServiceEmission {
        model: ServiceModel {
            name: service.name.clone(),
            interface: format!("{}If", service.name),
            server: format!("{}Server", service.name),
            client: format!("{}Client", service.name),
            functions,
        },
        structs,
        errors,
    })
}

fn exception_slots(function: &Function, program: &Program) -> GenResult<Vec<ExceptionSlot>> {
    let exceptions = function
        .throws
        .iter()
        .map(|field| exception_name(function, field, program))
        .collect::<GenResult<Vec<_>>>()?;

    let slots = function
        .throws
        .iter()
        .zip(&exceptions)
        .map(|(field, exception)| {
            let mut variant = to_pascal_case(&to_snake_case(&field.name));
            if variant == RPC_VARIANT {
                variant.push_str("Exception");
            }
            ExceptionSlot {
                ident: field_ident(&field.name),
                variant,
                exception: exception.clone(),
                from_impl: exceptions.iter().filter(|e| *e == exception).count() == 1,
            }
        })
        .collect();
    Ok(slots)
}

/// The exception struct a thrown field refers to, through typedefs
fn exception_name(function: &Function, field: &Field, program: &Program) -> GenResult<String> {
    let canonical = program
        .canonical(&field.ty)
        .ok_or_else(|| SchemaError::UnknownType(field.ty.to_string()))?;
    match canonical {
        Type::Struct(name) if program.is_exception(name) => Ok(name.clone()),
        Type::Struct(name) if program.struct_def(name).is_none() => {
            Err(SchemaError::UnknownType(name.clone()))
        }
        other => Err(SchemaError::InvalidException {
            function: function.name.clone(),
            field: field.name.clone(),
            ty: other.to_string(),
        }),
    }
}

fn struct_ref(codec: &CodecPair) -> StructRef {
    StructRef {
        name: codec.label.clone(),
        isset: format!("{}Isset", codec.label),
        reader: codec.reader.name.clone(),
        writer: codec.writer.name.clone(),
    }
}
