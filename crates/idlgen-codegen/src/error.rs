//! Generator error types

use thiserror::Error;

/// Result type alias for generation
pub type GenResult<T> = Result<T, SchemaError>;

/// Structural errors that abort a generation pass.
///
/// Generation fails fast on the first of these; no partial unit is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A named type reference that resolves to nothing
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// A type that (transitively) contains itself
    #[error("cyclic type dependency: {}", path.join(" -> "))]
    CyclicType { path: Vec<String> },

    /// A map key or set element without a total order
    #[error("{ty} cannot be used as a map key or set element: floats have no total order")]
    UnorderedKey { ty: String },

    /// `void` used anywhere other than a function return type
    #[error("void is not a value type: {context}")]
    VoidValue { context: String },

    /// A `throws` clause referencing something other than an exception
    #[error("{function}: thrown field '{field}' must reference an exception, found {ty}")]
    InvalidException {
        function: String,
        field: String,
        ty: String,
    },

    #[error("rendering failed: {0}")]
    Render(#[from] std::fmt::Error),
}

impl SchemaError {
    /// Returns a stable numeric code; `idlgen` exits with `10 + code`
    pub fn error_code(&self) -> u32 {
        match self {
            SchemaError::UnknownType(_) => 1,
            SchemaError::CyclicType { .. } => 2,
            SchemaError::UnorderedKey { .. } => 3,
            SchemaError::VoidValue { .. } => 4,
            SchemaError::InvalidException { .. } => 5,
            SchemaError::Render(_) => 6,
        }
    }
}
