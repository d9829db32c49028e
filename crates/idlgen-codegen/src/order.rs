//! Dependency orderer.
//!
//! Produces every non-primitive type reachable from the program such that
//! each type comes after everything it contains. Declarations and codecs are
//! emitted in this order.

use crate::error::{GenResult, SchemaError};
use idlgen_schema::{Definition, Program, Type};
use std::collections::HashSet;

/// Order all types reachable from the program's definitions and services.
///
/// Roots, in declaration order: every struct, exception, typedef and enum,
/// then for every service function its return type, parameter types and
/// thrown types. Synthesized args and result structs are not roots.
///
/// Dependencies are collection key and element types, struct field types and
/// typedef targets. Primitives are leaves and never appear in the output.
pub fn order_for_emission(program: &Program) -> GenResult<Vec<Type>> {
    let mut orderer = Orderer::new(program);

    for def in program.definitions() {
        match def {
            Definition::Struct(s) | Definition::Exception(s) => {
                orderer.visit(&Type::Struct(s.name.clone()))?;
            }
            Definition::Typedef(t) => orderer.visit(&Type::Typedef(t.name.clone()))?,
            Definition::Enum(e) => orderer.visit(&Type::Enum(e.name.clone()))?,
            Definition::Service(_) => {}
        }
    }

    for service in program.services() {
        for function in &service.functions {
            orderer.visit(&function.return_type)?;
            for param in &function.params {
                orderer.visit(&param.ty)?;
            }
            for thrown in &function.throws {
                orderer.visit(&thrown.ty)?;
            }
        }
    }

    tracing::debug!(types = orderer.order.len(), "ordered types for emission");
    Ok(orderer.order)
}

struct Orderer<'a> {
    program: &'a Program,
    visited: HashSet<Type>,

    /// Types whose dependencies are being visited, outermost first
    in_progress: Vec<Type>,

    order: Vec<Type>,
}

impl<'a> Orderer<'a> {
    fn new(program: &'a Program) -> Self {
        Self {
            program,
            visited: HashSet::new(),
            in_progress: Vec::new(),
            order: Vec::new(),
        }
    }

    fn visit(&mut self, ty: &Type) -> GenResult<()> {
        if matches!(ty, Type::Primitive(_)) || self.visited.contains(ty) {
            return Ok(());
        }
        if let Some(start) = self.in_progress.iter().position(|t| t == ty) {
            let mut path: Vec<String> = self.in_progress[start..]
                .iter()
                .map(ToString::to_string)
                .collect();
            path.push(ty.to_string());
            return Err(SchemaError::CyclicType { path });
        }

        self.in_progress.push(ty.clone());
        for dep in self.dependencies(ty)? {
            self.visit(&dep)?;
        }
        self.in_progress.pop();

        self.visited.insert(ty.clone());
        self.order.push(ty.clone());
        Ok(())
    }

    fn dependencies(&self, ty: &Type) -> GenResult<Vec<Type>> {
        let deps = match ty {
            Type::Primitive(_) => Vec::new(),
            Type::Map { .. } | Type::List(_) | Type::Set(_) => {
                ty.children().into_iter().cloned().collect()
            }
            Type::Struct(name) => self
                .program
                .struct_def(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone()))?
                .fields
                .iter()
                .map(|f| f.ty.clone())
                .collect(),
            Type::Typedef(name) => vec![
                self.program
                    .typedef_def(name)
                    .ok_or_else(|| SchemaError::UnknownType(name.clone()))?
                    .target
                    .clone(),
            ],
            Type::Enum(name) => {
                self.program
                    .enum_def(name)
                    .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
                Vec::new()
            }
        };
        Ok(deps)
    }
}
