//! Top-level definitions: structs, exceptions, enums, typedefs and services

use crate::types::{Field, Primitive, Type};
use serde::{Deserialize, Serialize};

/// Field name of the return-value slot in a synthesized result struct
pub const SUCCESS_FIELD: &str = "success";

/// A struct (or exception) definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    /// Struct name
    pub name: String,

    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl StructDef {
    /// Create a new struct definition
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Find a field by wire id
    pub fn field_by_id(&self, id: i16) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }
}

/// A named enum constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumVariant {
    pub name: String,
    pub value: i32,
}

/// An enum definition, wire-encoded as a signed 32-bit integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,

    /// Constants in declaration order
    #[serde(default)]
    pub variants: Vec<EnumVariant>,
}

/// A typedef: a new name for an underlying type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedefDef {
    pub name: String,

    /// The aliased type, possibly another typedef
    #[serde(rename = "type")]
    pub target: Type,
}

/// An RPC function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// Function name, also the method name on the wire
    pub name: String,

    /// Parameters in declaration order
    #[serde(default)]
    pub params: Vec<Field>,

    /// Return type, possibly `void`
    #[serde(default = "void_type")]
    pub return_type: Type,

    /// Declared application exceptions
    #[serde(default)]
    pub throws: Vec<Field>,
}

fn void_type() -> Type {
    Type::Primitive(Primitive::Void)
}

impl Function {
    /// Create a function with no declared exceptions
    pub fn new(name: impl Into<String>, params: Vec<Field>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            throws: Vec::new(),
        }
    }

    /// Add declared exceptions
    pub fn with_throws(mut self, throws: Vec<Field>) -> Self {
        self.throws = throws;
        self
    }

    /// Whether the function returns a value
    pub fn returns_value(&self) -> bool {
        !self.return_type.is_void()
    }

    /// Synthesize the args struct: one field per parameter, carrying the
    /// parameter's id.
    pub fn args_struct(&self, name: impl Into<String>) -> StructDef {
        StructDef::new(name, self.params.clone())
    }

    /// Synthesize the result struct: field 0 is the return value (absent for
    /// void functions), followed by one field per declared exception.
    pub fn result_struct(&self, name: impl Into<String>) -> StructDef {
        let mut fields = Vec::with_capacity(self.throws.len() + 1);
        if self.returns_value() {
            fields.push(Field::new(0, SUCCESS_FIELD, self.return_type.clone()));
        }
        fields.extend(self.throws.iter().cloned());
        StructDef::new(name, fields)
    }
}

/// An RPC service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,

    /// Functions in declaration order
    #[serde(default)]
    pub functions: Vec<Function>,
}

impl Service {
    /// Find a function by name
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}

/// A top-level definition, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Definition {
    Struct(StructDef),
    Exception(StructDef),
    Typedef(TypedefDef),
    Enum(EnumDef),
    Service(Service),
}

impl Definition {
    /// The definition's name
    pub fn name(&self) -> &str {
        match self {
            Definition::Struct(s) | Definition::Exception(s) => &s.name,
            Definition::Typedef(t) => &t.name,
            Definition::Enum(e) => &e.name,
            Definition::Service(s) => &s.name,
        }
    }
}
