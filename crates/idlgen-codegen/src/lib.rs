//! idlgen-codegen - Back-end of the idlgen IDL compiler
//!
//! This crate turns a [`Program`](idlgen_schema::Program) into Rust source:
//! - [`type_map`] maps IDL types to target types and wire tags
//! - [`order`] orders every reachable type after its dependencies
//! - [`marshal`] synthesizes reader/writer pairs for structs and collections
//! - [`decl`] emits struct, enum and typedef declarations
//! - [`rpc`] builds service traits, server dispatchers and client stubs
//! - [`Generator`] runs all of the above and renders three units per program
//!
//! Generated code depends only on `idlgen-runtime`.
//!
//! # Example
//!
//! ```
//! use idlgen_codegen::{Generator, GeneratorConfig};
//! use idlgen_schema::prelude::*;
//!
//! let program = Program::new(vec![Definition::Struct(StructDef::new(
//!     "Point",
//!     vec![
//!         Field::new(1, "x", Type::primitive(Primitive::I32)),
//!         Field::new(2, "y", Type::primitive(Primitive::I32)),
//!     ],
//! ))]);
//!
//! let units = Generator::new(GeneratorConfig::default())
//!     .generate(&program, "geometry")
//!     .unwrap();
//!
//! assert_eq!(units.types.file_name, "geometry_types.rs");
//! assert!(units.types.source.contains("pub struct Point {"));
//! assert!(units.implementation.source.contains("pub fn read_struct_point("));
//! ```

pub mod code_writer;
mod config;
pub mod decl;
mod error;
mod generate;
pub mod ir;
pub mod marshal;
pub mod naming;
pub mod order;
pub mod render;
pub mod rpc;
pub mod type_map;

#[cfg(test)]
mod test_support;

pub use config::GeneratorConfig;
pub use error::{GenResult, SchemaError};
pub use generate::{GeneratedUnit, GeneratedUnits, GenerationStats, Generator, UnitTrees};
pub use order::order_for_emission;
pub use render::RustRenderer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        GenResult, GeneratedUnit, GeneratedUnits, Generator, GeneratorConfig, SchemaError,
        order_for_emission,
    };
}
