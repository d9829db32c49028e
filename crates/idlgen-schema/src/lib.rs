//! idlgen-schema - Abstract schema model for the idlgen code generator
//!
//! This crate provides the read-only entity graph produced by an IDL front-end:
//! - [`Type`] and [`Primitive`] for the five type families
//! - [`StructDef`], [`EnumDef`], [`TypedefDef`] for named definitions
//! - [`Function`] and [`Service`] for RPC surfaces
//! - [`Program`] for the ordered definition list and its name lookups
//!
//! The front-end hands programs over as JSON; see [`Program::from_json`].

mod definition;
mod error;
mod program;
mod types;

pub use definition::{
    Definition, EnumDef, EnumVariant, Function, SUCCESS_FIELD, Service, StructDef, TypedefDef,
};
pub use error::{LoadError, LoadResult};
pub use program::Program;
pub use types::{Field, Primitive, Type};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Definition, EnumDef, EnumVariant, Field, Function, Primitive, Program, Service, StructDef,
        Type, TypedefDef,
    };
}
