//! Emission tree built by the generator components.
//!
//! The type mapper, marshal synthesizer, declaration emitter and RPC emitter
//! produce these nodes; [`render`](crate::render) turns them into source text.
//! Nothing in this module knows target syntax beyond the names it stores.
//!
//! # Structure
//!
//! - [`Unit`]: one output file, with its guard name and ordered [`Item`]s
//! - [`TargetType`]: a mapped type in the target language
//! - [`CodecPair`]: reader and writer for one struct or collection type
//! - [`ValueCodec`]: how one value is read or written inside a codec body
//! - [`ServiceModel`]: everything the RPC items of one service need

use idlgen_runtime::WireType;

/// A target-language type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// `void`, only valid as a return type
    Unit,
    Bool,
    String,
    U8,
    I8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F64,
    Map(Box<TargetType>, Box<TargetType>),
    List(Box<TargetType>),
    Set(Box<TargetType>),

    /// A generated struct, enum or typedef
    Named(String),
}

/// One output unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    /// Guard name, unique per unit
    pub name: String,

    /// Guards of units this one depends on
    pub requires: Vec<String>,

    pub items: Vec<Item>,
}

impl Unit {
    /// Create an empty unit
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Declare a dependency on another unit
    pub fn requires(mut self, guard: impl Into<String>) -> Self {
        self.requires.push(guard.into());
        self
    }
}

/// A top-level item of a unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Struct(StructDecl),
    Enum(EnumDecl),
    Typedef(TypedefDecl),
    Codec(CodecPair),

    /// `Display` and `Error` for an exception struct
    ExceptionImpl(ExceptionImpl),

    /// The service trait
    Interface(ServiceModel),

    /// Per-function error enum declaration
    ServiceError(ServiceErrorDecl),

    /// Conversions and trait impls for a per-function error enum
    ServiceErrorImpl(ServiceErrorDecl),

    ServerDecl(ServiceModel),
    ServerImpl(ServiceModel),
    ClientDecl(ServiceModel),
    ClientImpl(ServiceModel),
}

impl Item {
    /// Short label for logging
    pub fn label(&self) -> String {
        match self {
            Item::Struct(s) => format!("struct {}", s.name),
            Item::Enum(e) => format!("enum {}", e.name),
            Item::Typedef(t) => format!("typedef {}", t.name),
            Item::Codec(c) => format!("codec {}", c.label),
            Item::ExceptionImpl(e) => format!("exception impl {}", e.name),
            Item::Interface(s) => format!("interface {}", s.interface),
            Item::ServiceError(e) => format!("service error {}", e.name),
            Item::ServiceErrorImpl(e) => format!("service error impl {}", e.name),
            Item::ServerDecl(s) => format!("server {}", s.server),
            Item::ServerImpl(s) => format!("server impl {}", s.server),
            Item::ClientDecl(s) => format!("client {}", s.client),
            Item::ClientImpl(s) => format!("client impl {}", s.client),
        }
    }
}

/// Struct declaration with its presence aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,

    /// Name of the presence aggregate, `<Name>Isset`
    pub isset: String,

    pub fields: Vec<FieldDecl>,

    /// No float reachable: derive `Eq`, `Ord` and `Hash` as well
    pub total_order: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub id: i16,
    pub ident: String,
    pub ty: TargetType,
}

/// Integer-backed enum with named constants
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub constants: Vec<EnumConst>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConst {
    pub ident: String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedefDecl {
    pub name: String,
    pub target: TargetType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionImpl {
    pub name: String,
}

/// Reader and writer for one struct or collection type.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecPair {
    /// The IDL spelling of the type, for comments and logs
    pub label: String,
    pub reader: CodecFn,
    pub writer: CodecFn,
}

/// One generated function: `read_<suffix>` or `write_<suffix>`.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecFn {
    pub name: String,

    /// Type produced by the reader or consumed by the writer
    pub value_type: TargetType,

    pub body: CodecBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CodecBody {
    ReadStruct(StructCodec),
    WriteStruct(StructCodec),
    ReadList(ElementCodec),
    WriteList(ElementCodec),
    ReadSet(ElementCodec),
    WriteSet(ElementCodec),
    ReadMap {
        key: ElementCodec,
        value: ElementCodec,
    },
    WriteMap {
        key: ElementCodec,
        value: ElementCodec,
    },
}

/// Field framing for one struct.
#[derive(Debug, Clone, PartialEq)]
pub struct StructCodec {
    /// Struct name, also the name passed to struct-begin
    pub name: String,

    /// Fields in declaration order
    pub fields: Vec<FieldCodec>,

    /// Writer emits only fields whose presence flag is set
    pub presence_gated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldCodec {
    pub id: i16,

    /// IDL field name, as written to the wire
    pub name: String,

    /// Rust field identifier
    pub ident: String,

    pub element: ElementCodec,
}

/// Wire tag plus value codec for a field, element, key or value position.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementCodec {
    pub wire: WireType,
    pub codec: ValueCodec,
}

/// How a single value is read or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueCodec {
    /// A protocol primitive, `read_<method>` / `write_<method>`
    Primitive {
        method: &'static str,

        /// The writer takes a reference (`&str`) rather than a copy
        by_ref: bool,
    },

    /// An enum newtype around the i32 primitive
    Enum(String),

    /// A generated helper pair, `read_<suffix>` / `write_<suffix>`
    Helper(String),
}

/// Everything the RPC items of one service need.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceModel {
    pub name: String,

    /// `<Service>If`
    pub interface: String,

    /// `<Service>Server`
    pub server: String,

    /// `<Service>Client`
    pub client: String,

    pub functions: Vec<FunctionModel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionModel {
    /// Method name on the wire
    pub name: String,

    /// Trait method identifier
    pub method: String,

    /// snake_case stem for `send_`, `recv_` and `process_` methods
    pub stem: String,

    pub params: Vec<ParamModel>,

    /// Return type, [`TargetType::Unit`] for void
    pub returns: TargetType,

    pub args: StructRef,
    pub result: StructRef,

    /// Result struct carries a `success` slot
    pub has_success: bool,

    /// Declared exceptions, in `throws` order
    pub exceptions: Vec<ExceptionSlot>,

    /// `<Service><Function>Error` when the function declares exceptions
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamModel {
    pub ident: String,
    pub ty: TargetType,
}

/// A synthesized struct and the helpers that marshal it.
#[derive(Debug, Clone, PartialEq)]
pub struct StructRef {
    pub name: String,
    pub isset: String,
    pub reader: String,
    pub writer: String,
}

/// A declared exception: result-struct slot and error-enum variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionSlot {
    /// Result struct field identifier
    pub ident: String,

    /// Error enum variant
    pub variant: String,

    /// Exception struct name
    pub exception: String,

    /// Emit `From<exception>` for the error enum (exception type is unique
    /// within the function's `throws`)
    pub from_impl: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceErrorDecl {
    pub name: String,

    /// Wire name of the function, for messages
    pub function: String,

    pub variants: Vec<ExceptionSlot>,
}
