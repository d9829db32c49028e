//! Type references and fields

use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in scalar kinds of the IDL.
///
/// The serialized name is the IDL keyword, which also drives the target-type
/// and wire-tag tables in the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Void,
    Bool,
    String,
    Utf7,
    Utf8,
    Utf16,
    Byte,
    I08,
    U08,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    Float,
}

impl Primitive {
    /// All primitive kinds, in declaration order
    pub const ALL: [Primitive; 16] = [
        Primitive::Void,
        Primitive::Bool,
        Primitive::String,
        Primitive::Utf7,
        Primitive::Utf8,
        Primitive::Utf16,
        Primitive::Byte,
        Primitive::I08,
        Primitive::U08,
        Primitive::I16,
        Primitive::U16,
        Primitive::I32,
        Primitive::U32,
        Primitive::I64,
        Primitive::U64,
        Primitive::Float,
    ];

    /// The IDL keyword for this primitive
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Void => "void",
            Primitive::Bool => "bool",
            Primitive::String => "string",
            Primitive::Utf7 => "utf7",
            Primitive::Utf8 => "utf8",
            Primitive::Utf16 => "utf16",
            Primitive::Byte => "byte",
            Primitive::I08 => "i08",
            Primitive::U08 => "u08",
            Primitive::I16 => "i16",
            Primitive::U16 => "u16",
            Primitive::I32 => "i32",
            Primitive::U32 => "u32",
            Primitive::I64 => "i64",
            Primitive::U64 => "u64",
            Primitive::Float => "float",
        }
    }

    /// Look up a primitive by its IDL keyword
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A type reference as it appears in a field, parameter or return position.
///
/// Named variants refer to top-level definitions of the owning
/// [`Program`](crate::Program). Structural equality is the identity used to
/// deduplicate shared subtypes, so two `List(I32)` occurrences are the same
/// type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    /// Built-in scalar
    Primitive(Primitive),

    /// Associative container
    Map { key: Box<Type>, value: Box<Type> },

    /// Ordered sequence
    List(Box<Type>),

    /// Unordered unique collection
    Set(Box<Type>),

    /// Reference to a struct or exception definition
    Struct(String),

    /// Reference to a typedef definition
    Typedef(String),

    /// Reference to an enum definition
    Enum(String),
}

impl Type {
    /// Shorthand for a primitive type
    pub fn primitive(p: Primitive) -> Self {
        Type::Primitive(p)
    }

    /// Shorthand for `map<key, value>`
    pub fn map(key: Type, value: Type) -> Self {
        Type::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Shorthand for `list<elem>`
    pub fn list(elem: Type) -> Self {
        Type::List(Box::new(elem))
    }

    /// Shorthand for `set<elem>`
    pub fn set(elem: Type) -> Self {
        Type::Set(Box::new(elem))
    }

    /// Shorthand for a struct reference
    pub fn named_struct(name: impl Into<String>) -> Self {
        Type::Struct(name.into())
    }

    /// Whether this is the `void` primitive
    pub fn is_void(&self) -> bool {
        matches!(self, Type::Primitive(Primitive::Void))
    }

    /// Directly contained types, in traversal order (map key before value)
    pub fn children(&self) -> Vec<&Type> {
        match self {
            Type::Map { key, value } => vec![key.as_ref(), value.as_ref()],
            Type::List(elem) | Type::Set(elem) => vec![elem.as_ref()],
            Type::Primitive(_) | Type::Struct(_) | Type::Typedef(_) | Type::Enum(_) => Vec::new(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{p}"),
            Type::Map { key, value } => write!(f, "map<{key}, {value}>"),
            Type::List(elem) => write!(f, "list<{elem}>"),
            Type::Set(elem) => write!(f, "set<{elem}>"),
            Type::Struct(name) | Type::Typedef(name) | Type::Enum(name) => f.write_str(name),
        }
    }
}

/// A struct field or function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Wire identifier, unique within the owning struct
    pub id: i16,

    /// Field name
    pub name: String,

    /// Field type
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Field {
    /// Create a new field
    pub fn new(id: i16, name: impl Into<String>, ty: Type) -> Self {
        Self {
            id,
            name: name.into(),
            ty,
        }
    }
}
