//! Rust renderer for the emission tree.
//!
//! Every unit of one program is `include!`d into the same module, so
//! rendered code never emits `use` items: runtime items are reached through
//! the configured crate path and std items through `::std`.

use crate::code_writer::CodeWriter;
use crate::config::GeneratorConfig;
use crate::cw_writeln;
use crate::error::GenResult;
use crate::ir::{
    CodecBody, CodecFn, CodecPair, ElementCodec, EnumDecl, ExceptionImpl, FunctionModel, Item,
    ServiceErrorDecl, ServiceModel, StructCodec, StructDecl, TargetType, TypedefDecl, Unit,
    ValueCodec,
};
use idlgen_runtime::WireType;
use std::fmt;

/// First line of every unit when headers are enabled
pub const GENERATED_BANNER: &str = "@generated by idlgen. Do not edit.";

type Writer = CodeWriter<String>;

/// Render a target type as a path usable anywhere
pub fn type_name(ty: &TargetType) -> String {
    match ty {
        TargetType::Unit => "()".to_string(),
        TargetType::Bool => "bool".to_string(),
        TargetType::String => "::std::string::String".to_string(),
        TargetType::U8 => "u8".to_string(),
        TargetType::I8 => "i8".to_string(),
        TargetType::I16 => "i16".to_string(),
        TargetType::U16 => "u16".to_string(),
        TargetType::I32 => "i32".to_string(),
        TargetType::U32 => "u32".to_string(),
        TargetType::I64 => "i64".to_string(),
        TargetType::U64 => "u64".to_string(),
        TargetType::F64 => "f64".to_string(),
        TargetType::Map(key, value) => format!(
            "::std::collections::BTreeMap<{}, {}>",
            type_name(key),
            type_name(value)
        ),
        TargetType::List(elem) => format!("::std::vec::Vec<{}>", type_name(elem)),
        TargetType::Set(elem) => format!("::std::collections::BTreeSet<{}>", type_name(elem)),
        TargetType::Named(name) => name.clone(),
    }
}

/// Where a value being written lives
#[derive(Clone, Copy)]
enum Place<'a> {
    /// `value.<ident>` inside a struct writer
    Field(&'a str),

    /// A reference binding inside a collection loop
    Elem(&'a str),
}

/// Renders [`Unit`]s as Rust source.
pub struct RustRenderer {
    rt: String,
    indent_width: usize,
    header: bool,
}

impl RustRenderer {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            rt: config.runtime_path(),
            indent_width: config.indent_width,
            header: config.header,
        }
    }

    /// Render one unit: header comments, then items separated by blank lines
    pub fn render_unit(&self, unit: &Unit) -> GenResult<String> {
        let mut w = CodeWriter::with_indent_spaces(String::new(), self.indent_width);

        if self.header {
            w.comment(GENERATED_BANNER)?;
        }
        cw_writeln!(w, "// unit: {}", unit.name)?;
        for guard in &unit.requires {
            cw_writeln!(w, "// requires: {guard}")?;
        }

        for item in &unit.items {
            w.blank_line()?;
            self.item(&mut w, item)?;
        }

        Ok(w.into_inner())
    }

    fn item(&self, w: &mut Writer, item: &Item) -> fmt::Result {
        match item {
            Item::Struct(decl) => self.struct_decl(w, decl),
            Item::Enum(decl) => self.enum_decl(w, decl),
            Item::Typedef(decl) => self.typedef_decl(w, decl),
            Item::Codec(pair) => self.codec_pair(w, pair),
            Item::ExceptionImpl(exc) => self.exception_impl(w, exc),
            Item::Interface(model) => self.interface(w, model),
            Item::ServiceError(decl) => self.service_error(w, decl),
            Item::ServiceErrorImpl(decl) => self.service_error_impl(w, decl),
            Item::ServerDecl(model) => self.server_decl(w, model),
            Item::ServerImpl(model) => self.server_impl(w, model),
            Item::ClientDecl(model) => self.client_decl(w, model),
            Item::ClientImpl(model) => self.client_impl(w, model),
        }
    }

    fn rt(&self, path: &str) -> String {
        format!("{}::{path}", self.rt)
    }

    fn result(&self, ok: &str) -> String {
        format!("::std::result::Result<{ok}, {}>", self.rt("RpcError"))
    }

    fn wire(&self, wire: WireType) -> String {
        self.rt(&format!("WireType::{}", wire.variant_name()))
    }

    fn boxed_protocol(&self) -> String {
        format!("::std::boxed::Box<dyn {} + Send>", self.rt("Protocol"))
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn struct_decl(&self, w: &mut Writer, decl: &StructDecl) -> fmt::Result {
        let derives = if decl.total_order {
            "Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash"
        } else {
            "Debug, Clone, Default, PartialEq, PartialOrd"
        };
        cw_writeln!(w, "#[derive({derives})]")?;
        w.block(&format!("pub struct {}", decl.name), |w| {
            for field in &decl.fields {
                cw_writeln!(w, "pub {}: {},", field.ident, type_name(&field.ty))?;
            }
            cw_writeln!(w, "pub __isset: {},", decl.isset)
        })?;

        w.blank_line()?;
        w.writeln("#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]")?;
        w.block(&format!("pub struct {}", decl.isset), |w| {
            for field in &decl.fields {
                cw_writeln!(w, "pub {}: bool,", field.ident)?;
            }
            Ok(())
        })
    }

    fn enum_decl(&self, w: &mut Writer, decl: &EnumDecl) -> fmt::Result {
        w.writeln("#[repr(transparent)]")?;
        w.writeln("#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]")?;
        cw_writeln!(w, "pub struct {}(pub i32);", decl.name)?;
        w.blank_line()?;
        w.block(&format!("impl {}", decl.name), |w| {
            for constant in &decl.constants {
                cw_writeln!(
                    w,
                    "pub const {}: {name} = {name}({});",
                    constant.ident,
                    constant.value,
                    name = decl.name
                )?;
            }
            Ok(())
        })
    }

    fn typedef_decl(&self, w: &mut Writer, decl: &TypedefDecl) -> fmt::Result {
        cw_writeln!(w, "pub type {} = {};", decl.name, type_name(&decl.target))
    }

    fn exception_impl(&self, w: &mut Writer, exc: &ExceptionImpl) -> fmt::Result {
        w.block(&format!("impl ::std::fmt::Display for {}", exc.name), |w| {
            w.block(
                "fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result",
                |w| w.writeln("write!(f, \"{self:?}\")"),
            )
        })?;
        w.blank_line()?;
        cw_writeln!(w, "impl ::std::error::Error for {} {{}}", exc.name)
    }

    // ------------------------------------------------------------------
    // Codecs
    // ------------------------------------------------------------------

    fn codec_pair(&self, w: &mut Writer, pair: &CodecPair) -> fmt::Result {
        w.comment(&pair.label)?;
        self.reader(w, &pair.reader)?;
        w.blank_line()?;
        self.writer(w, &pair.writer)
    }

    fn reader(&self, w: &mut Writer, f: &CodecFn) -> fmt::Result {
        w.writeln("#[allow(dead_code)]")?;
        let header = format!(
            "pub fn {}(iprot: &dyn {}, channel: &mut dyn {}) -> {}",
            f.name,
            self.rt("Protocol"),
            self.rt("Channel"),
            self.result(&type_name(&f.value_type))
        );
        w.block(&header, |w| match &f.body {
            CodecBody::ReadStruct(codec) => self.read_struct(w, codec),
            CodecBody::ReadList(elem) => self.read_sequence(w, elem, "list", "::std::vec::Vec", "push"),
            CodecBody::ReadSet(elem) => {
                self.read_sequence(w, elem, "set", "::std::collections::BTreeSet", "insert")
            }
            CodecBody::ReadMap { key, value } => self.read_map(w, key, value),
            _ => Err(fmt::Error),
        })
    }

    fn writer(&self, w: &mut Writer, f: &CodecFn) -> fmt::Result {
        w.writeln("#[allow(dead_code, clippy::ptr_arg)]")?;
        let header = format!(
            "pub fn {}(oprot: &dyn {}, channel: &mut dyn {}, value: &{}) -> {}",
            f.name,
            self.rt("Protocol"),
            self.rt("Channel"),
            type_name(&f.value_type),
            self.result("()")
        );
        w.block(&header, |w| match &f.body {
            CodecBody::WriteStruct(codec) => self.write_struct(w, codec),
            CodecBody::WriteList(elem) => self.write_sequence(w, elem, "list"),
            CodecBody::WriteSet(elem) => self.write_sequence(w, elem, "set"),
            CodecBody::WriteMap { key, value } => self.write_map(w, key, value),
            _ => Err(fmt::Error),
        })
    }

    fn read_expr(&self, codec: &ValueCodec) -> String {
        match codec {
            ValueCodec::Primitive { method, .. } => format!("iprot.read_{method}(channel)?"),
            ValueCodec::Enum(name) => format!("{name}(iprot.read_i32(channel)?)"),
            ValueCodec::Helper(suffix) => format!("read_{suffix}(iprot, channel)?"),
        }
    }

    fn write_stmt(&self, codec: &ValueCodec, place: Place<'_>) -> String {
        let arg = match (codec, place) {
            (ValueCodec::Primitive { by_ref: false, .. }, Place::Field(f)) => format!("value.{f}"),
            (ValueCodec::Primitive { by_ref: false, .. }, Place::Elem(v)) => format!("*{v}"),
            (ValueCodec::Enum(_), Place::Field(f)) => format!("value.{f}.0"),
            (ValueCodec::Enum(_), Place::Elem(v)) => format!("{v}.0"),
            (_, Place::Field(f)) => format!("&value.{f}"),
            (_, Place::Elem(v)) => v.to_string(),
        };
        match codec {
            ValueCodec::Primitive { method, .. } => {
                format!("oprot.write_{method}(channel, {arg})?;")
            }
            ValueCodec::Enum(_) => format!("oprot.write_i32(channel, {arg})?;"),
            ValueCodec::Helper(suffix) => format!("write_{suffix}(oprot, channel, {arg})?;"),
        }
    }

    fn read_struct(&self, w: &mut Writer, codec: &StructCodec) -> fmt::Result {
        if codec.fields.is_empty() {
            cw_writeln!(w, "let value = {}::default();", codec.name)?;
        } else {
            cw_writeln!(w, "let mut value = {}::default();", codec.name)?;
        }
        w.writeln("iprot.read_struct_begin(channel)?;")?;
        w.block("loop", |w| {
            w.writeln("let field = iprot.read_field_begin(channel)?;")?;
            w.block(
                &format!("if field.wire_type == {}", self.wire(WireType::Stop)),
                |w| w.writeln("break;"),
            )?;
            if codec.fields.is_empty() {
                w.writeln("iprot.skip(channel, field.wire_type)?;")?;
            } else {
                w.block("match field.id", |w| {
                    for field in &codec.fields {
                        let arm = format!(
                            "{} if field.wire_type == {} =>",
                            field.id,
                            self.wire(field.element.wire)
                        );
                        w.block(&arm, |w| {
                            cw_writeln!(
                                w,
                                "value.{} = {};",
                                field.ident,
                                self.read_expr(&field.element.codec)
                            )?;
                            cw_writeln!(w, "value.__isset.{} = true;", field.ident)
                        })?;
                    }
                    w.writeln("_ => iprot.skip(channel, field.wire_type)?,")
                })?;
            }
            w.writeln("iprot.read_field_end(channel)?;")
        })?;
        w.writeln("iprot.read_struct_end(channel)?;")?;
        w.writeln("Ok(value)")
    }

    fn write_struct(&self, w: &mut Writer, codec: &StructCodec) -> fmt::Result {
        if codec.fields.is_empty() {
            w.writeln("let _ = value;")?;
        }
        cw_writeln!(w, "oprot.write_struct_begin(channel, {:?})?;", codec.name)?;
        for field in &codec.fields {
            let body = |w: &mut Writer| -> fmt::Result {
                cw_writeln!(
                    w,
                    "oprot.write_field_begin(channel, {:?}, {}, {})?;",
                    field.name,
                    self.wire(field.element.wire),
                    field.id
                )?;
                w.writeln(&self.write_stmt(&field.element.codec, Place::Field(&field.ident)))?;
                w.writeln("oprot.write_field_end(channel)?;")
            };
            if codec.presence_gated {
                w.block(&format!("if value.__isset.{}", field.ident), body)?;
            } else {
                body(w)?;
            }
        }
        w.writeln("oprot.write_field_stop(channel)?;")?;
        w.writeln("oprot.write_struct_end(channel)?;")?;
        w.writeln("Ok(())")
    }

    fn read_sequence(
        &self,
        w: &mut Writer,
        elem: &ElementCodec,
        kind: &str,
        container: &str,
        insert: &str,
    ) -> fmt::Result {
        cw_writeln!(w, "let header = iprot.read_{kind}_begin(channel)?;")?;
        cw_writeln!(w, "let mut value = {container}::new();")?;
        // Elements tagged differently from the declaration are skipped whole
        w.block(&format!("if header.elem != {}", self.wire(elem.wire)), |w| {
            w.block("for _ in 0..header.len", |w| {
                w.writeln("iprot.skip(channel, header.elem)?;")
            })?;
            cw_writeln!(w, "iprot.read_{kind}_end(channel)?;")?;
            w.writeln("return Ok(value);")
        })?;
        w.block("for _ in 0..header.len", |w| {
            cw_writeln!(w, "value.{insert}({});", self.read_expr(&elem.codec))
        })?;
        cw_writeln!(w, "iprot.read_{kind}_end(channel)?;")?;
        w.writeln("Ok(value)")
    }

    fn write_len(&self) -> String {
        format!("{}(value.len())?", self.rt("wire_len"))
    }

    fn write_sequence(&self, w: &mut Writer, elem: &ElementCodec, kind: &str) -> fmt::Result {
        cw_writeln!(
            w,
            "oprot.write_{kind}_begin(channel, {}, {})?;",
            self.wire(elem.wire),
            self.write_len()
        )?;
        w.block("for elem in value.iter()", |w| {
            w.writeln(&self.write_stmt(&elem.codec, Place::Elem("elem")))
        })?;
        cw_writeln!(w, "oprot.write_{kind}_end(channel)?;")?;
        w.writeln("Ok(())")
    }

    fn read_map(&self, w: &mut Writer, key: &ElementCodec, value: &ElementCodec) -> fmt::Result {
        w.writeln("let header = iprot.read_map_begin(channel)?;")?;
        w.writeln("let mut value = ::std::collections::BTreeMap::new();")?;
        let mismatch = format!(
            "if header.key != {} || header.value != {}",
            self.wire(key.wire),
            self.wire(value.wire)
        );
        w.block(&mismatch, |w| {
            w.block("for _ in 0..header.len", |w| {
                w.writeln("iprot.skip(channel, header.key)?;")?;
                w.writeln("iprot.skip(channel, header.value)?;")
            })?;
            w.writeln("iprot.read_map_end(channel)?;")?;
            w.writeln("return Ok(value);")
        })?;
        w.block("for _ in 0..header.len", |w| {
            cw_writeln!(w, "let key = {};", self.read_expr(&key.codec))?;
            cw_writeln!(w, "let val = {};", self.read_expr(&value.codec))?;
            w.writeln("value.insert(key, val);")
        })?;
        w.writeln("iprot.read_map_end(channel)?;")?;
        w.writeln("Ok(value)")
    }

    fn write_map(&self, w: &mut Writer, key: &ElementCodec, value: &ElementCodec) -> fmt::Result {
        cw_writeln!(
            w,
            "oprot.write_map_begin(channel, {}, {}, {})?;",
            self.wire(key.wire),
            self.wire(value.wire),
            self.write_len()
        )?;
        w.block("for (key, val) in value.iter()", |w| {
            w.writeln(&self.write_stmt(&key.codec, Place::Elem("key")))?;
            w.writeln(&self.write_stmt(&value.codec, Place::Elem("val")))
        })?;
        w.writeln("oprot.write_map_end(channel)?;")?;
        w.writeln("Ok(())")
    }

    // ------------------------------------------------------------------
    // Services
    // ------------------------------------------------------------------

    fn params(f: &FunctionModel) -> String {
        f.params
            .iter()
            .map(|p| format!(", {}: {}", p.ident, type_name(&p.ty)))
            .collect()
    }

    fn method_signature(&self, f: &FunctionModel) -> String {
        let ok = type_name(&f.returns);
        let returns = match &f.error {
            Some(error) => format!("::std::result::Result<{ok}, {error}>"),
            None => self.result(&ok),
        };
        format!("fn {}(&mut self{}) -> {returns}", f.method, Self::params(f))
    }

    fn interface(&self, w: &mut Writer, model: &ServiceModel) -> fmt::Result {
        cw_writeln!(w, "/// Handler and client interface of service `{}`", model.name)?;
        w.block(&format!("pub trait {}", model.interface), |w| {
            for f in &model.functions {
                cw_writeln!(w, "{};", self.method_signature(f))?;
            }
            Ok(())
        })
    }

    fn service_error(&self, w: &mut Writer, decl: &ServiceErrorDecl) -> fmt::Result {
        cw_writeln!(w, "/// Failures of `{}`: declared exceptions or an RPC error", decl.function)?;
        w.writeln("#[derive(Debug)]")?;
        w.block(&format!("pub enum {}", decl.name), |w| {
            for slot in &decl.variants {
                cw_writeln!(w, "{}({}),", slot.variant, slot.exception)?;
            }
            cw_writeln!(w, "Rpc({}),", self.rt("RpcError"))
        })
    }

    fn service_error_impl(&self, w: &mut Writer, decl: &ServiceErrorDecl) -> fmt::Result {
        let rpc_error = self.rt("RpcError");
        w.block(
            &format!("impl ::std::convert::From<{rpc_error}> for {}", decl.name),
            |w| {
                w.block(&format!("fn from(error: {rpc_error}) -> Self"), |w| {
                    cw_writeln!(w, "{}::Rpc(error)", decl.name)
                })
            },
        )?;

        for slot in decl.variants.iter().filter(|s| s.from_impl) {
            w.blank_line()?;
            w.block(
                &format!("impl ::std::convert::From<{}> for {}", slot.exception, decl.name),
                |w| {
                    w.block(&format!("fn from(error: {}) -> Self", slot.exception), |w| {
                        cw_writeln!(w, "{}::{}(error)", decl.name, slot.variant)
                    })
                },
            )?;
        }

        w.blank_line()?;
        w.block(&format!("impl ::std::fmt::Display for {}", decl.name), |w| {
            w.block(
                "fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result",
                |w| {
                    w.block("match self", |w| {
                        for slot in &decl.variants {
                            cw_writeln!(
                                w,
                                "{}::{}(e) => write!(f, \"{} raised {}: {{e}}\"),",
                                decl.name,
                                slot.variant,
                                decl.function,
                                slot.exception
                            )?;
                        }
                        cw_writeln!(
                            w,
                            "{}::Rpc(e) => write!(f, \"{} failed: {{e}}\"),",
                            decl.name,
                            decl.function
                        )
                    })
                },
            )
        })?;

        w.blank_line()?;
        w.block(&format!("impl ::std::error::Error for {}", decl.name), |w| {
            w.block(
                "fn source(&self) -> ::std::option::Option<&(dyn ::std::error::Error + 'static)>",
                |w| {
                    w.block("match self", |w| {
                        for slot in &decl.variants {
                            cw_writeln!(
                                w,
                                "{}::{}(e) => ::std::option::Option::Some(e),",
                                decl.name,
                                slot.variant
                            )?;
                        }
                        cw_writeln!(w, "{}::Rpc(e) => ::std::option::Option::Some(e),", decl.name)
                    })
                },
            )
        })
    }

    fn server_decl(&self, w: &mut Writer, model: &ServiceModel) -> fmt::Result {
        let proto = self.boxed_protocol();
        cw_writeln!(
            w,
            "/// Dispatches `{}` calls read from a channel to a [`{}`] handler",
            model.name,
            model.interface
        )?;
        w.block(&format!("pub struct {}<H>", model.server), |w| {
            w.writeln("handler: H,")?;
            cw_writeln!(w, "iprot: {proto},")?;
            cw_writeln!(w, "oprot: {proto},")
        })
    }

    fn client_decl(&self, w: &mut Writer, model: &ServiceModel) -> fmt::Result {
        let proto = self.boxed_protocol();
        cw_writeln!(w, "/// Calls `{}` over a channel", model.name)?;
        w.block(&format!("pub struct {}<C>", model.client), |w| {
            w.writeln("channel: C,")?;
            cw_writeln!(w, "iprot: {proto},")?;
            cw_writeln!(w, "oprot: {proto},")?;
            w.writeln("seqid: u32,")
        })
    }

    fn server_impl(&self, w: &mut Writer, model: &ServiceModel) -> fmt::Result {
        let proto = self.boxed_protocol();
        let binary = self.rt("BinaryProtocol");

        w.block(
            &format!("impl<H: {}> {}<H>", model.interface, model.server),
            |w| {
                w.block("pub fn new(handler: H) -> Self", |w| {
                    cw_writeln!(w, "Self::with_protocols(handler, {binary}::boxed(), {binary}::boxed())")
                })?;
                w.blank_line()?;
                w.block(
                    &format!("pub fn with_protocols(handler: H, iprot: {proto}, oprot: {proto}) -> Self"),
                    |w| {
                        w.block("Self", |w| {
                            w.writeln("handler,")?;
                            w.writeln("iprot,")?;
                            w.writeln("oprot,")
                        })
                    },
                )?;
                w.blank_line()?;
                w.block("pub fn handler(&self) -> &H", |w| w.writeln("&self.handler"))?;
                w.blank_line()?;
                w.block("pub fn handler_mut(&mut self) -> &mut H", |w| {
                    w.writeln("&mut self.handler")
                })?;
                w.blank_line()?;
                w.block("pub fn into_handler(self) -> H", |w| w.writeln("self.handler"))?;
                for f in &model.functions {
                    w.blank_line()?;
                    self.process_fn(w, f)?;
                }
                Ok(())
            },
        )?;

        w.blank_line()?;
        w.block(
            &format!(
                "impl<H: {}> {} for {}<H>",
                model.interface,
                self.rt("Processor"),
                model.server
            ),
            |w| {
                w.block(
                    &format!(
                        "fn process(&mut self, channel: &mut dyn {}) -> {}",
                        self.rt("Channel"),
                        self.result("()")
                    ),
                    |w| {
                        w.writeln("let header = self.iprot.read_message_begin(channel)?;")?;
                        w.block(
                            &format!("if header.kind != {}", self.rt("MessageKind::Call")),
                            |w| self.unexpected_kind(w, "Call", "header"),
                        )?;
                        w.block("match header.name.as_str()", |w| {
                            for f in &model.functions {
                                cw_writeln!(
                                    w,
                                    "{:?} => self.process_{}(header.seqid, channel),",
                                    f.name,
                                    f.stem
                                )?;
                            }
                            cw_writeln!(
                                w,
                                "other => Err({}::UnknownMethod(other.to_string()).into()),",
                                self.rt("ProtocolError")
                            )
                        })
                    },
                )
            },
        )
    }

    fn unexpected_kind(&self, w: &mut Writer, expected: &str, header: &str) -> fmt::Result {
        w.block_with_suffix(
            &format!(
                "return Err({}::UnexpectedMessageKind",
                self.rt("ProtocolError")
            ),
            ".into());",
            |w| {
                cw_writeln!(w, "expected: {},", self.rt(&format!("MessageKind::{expected}")))?;
                cw_writeln!(w, "actual: {header}.kind,")
            },
        )
    }

    fn process_fn(&self, w: &mut Writer, f: &FunctionModel) -> fmt::Result {
        let header = format!(
            "fn process_{}(&mut self, seqid: u32, channel: &mut dyn {}) -> {}",
            f.stem,
            self.rt("Channel"),
            self.result("()")
        );
        w.block(&header, |w| {
            if f.params.is_empty() {
                cw_writeln!(w, "{}(&*self.iprot, channel)?;", f.args.reader)?;
            } else {
                cw_writeln!(w, "let args = {}(&*self.iprot, channel)?;", f.args.reader)?;
            }
            w.writeln("self.iprot.read_message_end(channel)?;")?;

            let has_slots = f.has_success || !f.exceptions.is_empty();
            cw_writeln!(
                w,
                "let {}result = {}::default();",
                if has_slots { "mut " } else { "" },
                f.result.name
            )?;

            let args: Vec<String> = f.params.iter().map(|p| format!("args.{}", p.ident)).collect();
            let call = format!("self.handler.{}({})", f.method, args.join(", "));
            w.block(&format!("match {call}"), |w| {
                if f.has_success {
                    w.block("Ok(success) =>", |w| {
                        w.writeln("result.success = success;")?;
                        w.writeln("result.__isset.success = true;")
                    })?;
                } else {
                    w.writeln("Ok(()) => {}")?;
                }
                match &f.error {
                    None => w.writeln("Err(error) => return Err(error),"),
                    Some(error) => {
                        for slot in &f.exceptions {
                            w.block(&format!("Err({error}::{}(exception)) =>", slot.variant), |w| {
                                cw_writeln!(w, "result.{} = exception;", slot.ident)?;
                                cw_writeln!(w, "result.__isset.{} = true;", slot.ident)
                            })?;
                        }
                        cw_writeln!(w, "Err({error}::Rpc(error)) => return Err(error),")
                    }
                }
            })?;

            cw_writeln!(
                w,
                "self.oprot.write_message_begin(channel, {:?}, {}, seqid)?;",
                f.name,
                self.rt("MessageKind::Reply")
            )?;
            cw_writeln!(w, "{}(&*self.oprot, channel, &result)?;", f.result.writer)?;
            w.writeln("self.oprot.write_message_end(channel)?;")?;
            w.writeln("channel.flush()?;")?;
            w.writeln("Ok(())")
        })
    }

    fn client_impl(&self, w: &mut Writer, model: &ServiceModel) -> fmt::Result {
        let proto = self.boxed_protocol();
        let binary = self.rt("BinaryProtocol");
        let channel = self.rt("Channel");

        w.block(&format!("impl<C: {channel}> {}<C>", model.client), |w| {
            w.block("pub fn new(channel: C) -> Self", |w| {
                cw_writeln!(w, "Self::with_protocols(channel, {binary}::boxed(), {binary}::boxed())")
            })?;
            w.blank_line()?;
            w.block(
                &format!("pub fn with_protocols(channel: C, iprot: {proto}, oprot: {proto}) -> Self"),
                |w| {
                    w.block("Self", |w| {
                        w.writeln("channel,")?;
                        w.writeln("iprot,")?;
                        w.writeln("oprot,")?;
                        w.writeln("seqid: 0,")
                    })
                },
            )?;
            w.blank_line()?;
            w.block("pub fn channel(&self) -> &C", |w| w.writeln("&self.channel"))?;
            w.blank_line()?;
            w.block("pub fn channel_mut(&mut self) -> &mut C", |w| {
                w.writeln("&mut self.channel")
            })?;
            w.blank_line()?;
            w.block("pub fn into_channel(self) -> C", |w| w.writeln("self.channel"))?;
            w.blank_line()?;
            w.writeln("#[allow(dead_code)]")?;
            w.block("fn next_seqid(&mut self) -> u32", |w| {
                w.writeln("self.seqid = self.seqid.wrapping_add(1);")?;
                w.writeln("self.seqid")
            })?;
            for f in &model.functions {
                w.blank_line()?;
                self.send_fn(w, f)?;
                w.blank_line()?;
                self.recv_fn(w, f)?;
            }
            Ok(())
        })?;

        w.blank_line()?;
        w.block(
            &format!("impl<C: {channel}> {} for {}<C>", model.interface, model.client),
            |w| {
                for (i, f) in model.functions.iter().enumerate() {
                    if i > 0 {
                        w.blank_line()?;
                    }
                    self.client_method(w, f)?;
                }
                Ok(())
            },
        )
    }

    fn send_fn(&self, w: &mut Writer, f: &FunctionModel) -> fmt::Result {
        let header = format!(
            "pub fn send_{}(&mut self{}) -> {}",
            f.stem,
            Self::params(f),
            self.result("u32")
        );
        w.block(&header, |w| {
            w.writeln("let __seqid = self.next_seqid();")?;
            w.block_with_suffix(&format!("let __args = {}", f.args.name), ";", |w| {
                for p in &f.params {
                    cw_writeln!(w, "{},", p.ident)?;
                }
                w.block_with_suffix(&format!("__isset: {}", f.args.isset), ",", |w| {
                    for p in &f.params {
                        cw_writeln!(w, "{}: true,", p.ident)?;
                    }
                    Ok(())
                })
            })?;
            cw_writeln!(
                w,
                "self.oprot.write_message_begin(&mut self.channel, {:?}, {}, __seqid)?;",
                f.name,
                self.rt("MessageKind::Call")
            )?;
            cw_writeln!(w, "{}(&*self.oprot, &mut self.channel, &__args)?;", f.args.writer)?;
            w.writeln("self.oprot.write_message_end(&mut self.channel)?;")?;
            cw_writeln!(w, "{}::flush(&mut self.channel)?;", self.rt("Channel"))?;
            w.writeln("Ok(__seqid)")
        })
    }

    fn recv_fn(&self, w: &mut Writer, f: &FunctionModel) -> fmt::Result {
        let header = format!(
            "pub fn recv_{}(&mut self, seqid: u32) -> {}",
            f.stem,
            self.result(&f.result.name)
        );
        w.block(&header, |w| {
            w.writeln("let __header = self.iprot.read_message_begin(&mut self.channel)?;")?;
            w.block(
                &format!("if __header.kind != {}", self.rt("MessageKind::Reply")),
                |w| self.unexpected_kind(w, "Reply", "__header"),
            )?;
            w.block("if __header.seqid != seqid", |w| {
                w.block_with_suffix(
                    &format!("return Err({}::SequenceMismatch", self.rt("ProtocolError")),
                    ".into());",
                    |w| {
                        w.writeln("expected: seqid,")?;
                        w.writeln("actual: __header.seqid,")
                    },
                )
            })?;
            cw_writeln!(
                w,
                "let __result = {}(&*self.iprot, &mut self.channel)?;",
                f.result.reader
            )?;
            w.writeln("self.iprot.read_message_end(&mut self.channel)?;")?;
            w.writeln("Ok(__result)")
        })
    }

    fn client_method(&self, w: &mut Writer, f: &FunctionModel) -> fmt::Result {
        w.block(&self.method_signature(f), |w| {
            let args: Vec<&str> = f.params.iter().map(|p| p.ident.as_str()).collect();
            cw_writeln!(w, "let __seqid = self.send_{}({})?;", f.stem, args.join(", "))?;

            let has_slots = f.has_success || !f.exceptions.is_empty();
            if has_slots {
                cw_writeln!(w, "let __result = self.recv_{}(__seqid)?;", f.stem)?;
            } else {
                cw_writeln!(w, "self.recv_{}(__seqid)?;", f.stem)?;
            }

            if f.has_success {
                w.block("if __result.__isset.success", |w| {
                    w.writeln("return Ok(__result.success);")
                })?;
            }
            if let Some(error) = &f.error {
                for slot in &f.exceptions {
                    w.block(&format!("if __result.__isset.{}", slot.ident), |w| {
                        cw_writeln!(w, "return Err({error}::{}(__result.{}));", slot.variant, slot.ident)
                    })?;
                }
            }

            if !f.has_success {
                return w.writeln("Ok(())");
            }
            let missing = format!(
                "{}::MissingResult({:?}.to_string()).into()",
                self.rt("ProtocolError"),
                f.name
            );
            match &f.error {
                Some(error) => cw_writeln!(w, "Err({error}::Rpc({missing}))"),
                None => cw_writeln!(w, "Err({missing})"),
            }
        })
    }
}
