//! Generation orchestrator.
//!
//! Runs the components in order and renders three units per program:
//!
//! | Unit | Guard | Contents |
//! |------|-------|----------|
//! | `<base>_types.rs` | `<base>_types` | struct, enum and typedef declarations |
//! | `<base>.rs` | `<base>` | service traits, error enums, server and client structs |
//! | `<base>_impl.rs` | `<base>_impl` | codecs, args/result structs, trait impls, stub bodies |
//!
//! The first [`SchemaError`](crate::SchemaError) aborts the pass; no partial
//! output is returned.

use crate::config::GeneratorConfig;
use crate::decl::declare;
use crate::error::GenResult;
use crate::ir::{ExceptionImpl, Item, Unit};
use crate::marshal::synthesize;
use crate::order::order_for_emission;
use crate::render::RustRenderer;
use crate::rpc::{ServiceEmission, service_model};
use idlgen_schema::{Program, Type};

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Guard name, unique per unit
    pub guard: String,

    /// File name, `<guard>.rs`
    pub file_name: String,

    pub source: String,
}

/// Counts reported by `idlgen check` and the CLI summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Ordered non-primitive types
    pub types: usize,

    /// Reader/writer pairs, including args and result structs
    pub codecs: usize,

    pub services: usize,
    pub functions: usize,
}

/// The three rendered units of one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnits {
    pub types: GeneratedUnit,
    pub interfaces: GeneratedUnit,
    pub implementation: GeneratedUnit,
    pub stats: GenerationStats,
}

impl GeneratedUnits {
    /// Units in dependency order
    pub fn units(&self) -> [&GeneratedUnit; 3] {
        [&self.types, &self.interfaces, &self.implementation]
    }
}

/// The three emission trees of one program, before rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTrees {
    pub types: Unit,
    pub interfaces: Unit,
    pub implementation: Unit,
    pub stats: GenerationStats,
}

/// Code generator for one configuration.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build the emission trees without rendering.
    pub fn build_units(&self, program: &Program, base: &str) -> GenResult<UnitTrees> {
        let order = order_for_emission(program)?;
        let mut stats = GenerationStats {
            types: order.len(),
            ..GenerationStats::default()
        };

        let types_guard = format!("{base}_types");
        let impl_guard = format!("{base}_impl");

        let mut types = Unit::new(types_guard.clone());
        for ty in &order {
            if let Some(item) = declare(ty, program)? {
                tracing::debug!(item = %item.label(), "declared");
                types.items.push(item);
            }
        }

        let mut codecs = Vec::new();
        for ty in &order {
            if let Some(pair) = synthesize(ty, program)? {
                tracing::debug!(codec = %pair.label, "synthesized codec");
                codecs.push(Item::Codec(pair));
            }
        }

        let emissions = program
            .services()
            .map(|service| service_model(service, program))
            .collect::<GenResult<Vec<ServiceEmission>>>()?;
        stats.services = emissions.len();
        stats.functions = emissions.iter().map(|e| e.model.functions.len()).sum();
        stats.codecs = codecs.len() + emissions.iter().map(|e| e.structs.len()).sum::<usize>();

        let mut interfaces = Unit::new(base).requires(types_guard.clone());
        for emission in &emissions {
            interfaces.items.extend(emission.interface_items());
        }

        let mut implementation = Unit::new(impl_guard)
            .requires(types_guard)
            .requires(base);
        implementation.items.extend(codecs);
        for emission in &emissions {
            implementation.items.extend(emission.synthesized_items());
        }
        implementation.items.extend(exception_impls(&order, program));
        // All server bodies precede all client bodies
        for emission in &emissions {
            implementation.items.extend(emission.error_impl_items());
        }
        implementation
            .items
            .extend(emissions.iter().map(ServiceEmission::server_item));
        implementation
            .items
            .extend(emissions.iter().map(ServiceEmission::client_item));

        Ok(UnitTrees {
            types,
            interfaces,
            implementation,
            stats,
        })
    }

    /// Generate and render all units for `program`.
    ///
    /// Output is byte-identical for identical input and configuration.
    pub fn generate(&self, program: &Program, base: &str) -> GenResult<GeneratedUnits> {
        let trees = self.build_units(program, base)?;
        let renderer = RustRenderer::new(&self.config);

        let render = |unit: &Unit| -> GenResult<GeneratedUnit> {
            let source = renderer.render_unit(unit)?;
            tracing::info!(
                unit = %unit.name,
                items = unit.items.len(),
                bytes = source.len(),
                "rendered unit"
            );
            Ok(GeneratedUnit {
                guard: unit.name.clone(),
                file_name: format!("{}.rs", unit.name),
                source,
            })
        };

        Ok(GeneratedUnits {
            types: render(&trees.types)?,
            interfaces: render(&trees.interfaces)?,
            implementation: render(&trees.implementation)?,
            stats: trees.stats,
        })
    }
}

/// `Display`/`Error` impls for every ordered exception struct
fn exception_impls(order: &[Type], program: &Program) -> Vec<Item> {
    order
        .iter()
        .filter_map(|ty| match ty {
            Type::Struct(name) if program.is_exception(name) => {
                Some(Item::ExceptionImpl(ExceptionImpl { name: name.clone() }))
            }
            _ => None,
        })
        .collect()
}
