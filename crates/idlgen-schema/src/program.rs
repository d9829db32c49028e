//! The program: ordered definitions plus name-indexed lookups

use crate::definition::{Definition, EnumDef, Service, StructDef, TypedefDef};
use crate::error::LoadResult;
use crate::types::Type;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Wire document for a program: just the ordered definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProgramDocument {
    #[serde(default)]
    definitions: Vec<Definition>,
}

/// An already-parsed, read-only schema.
///
/// Definitions keep their source order. Lookups by name index into that
/// list; when a name is defined twice the first definition wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "ProgramDocument", into = "ProgramDocument")]
pub struct Program {
    definitions: Vec<Definition>,
    structs: HashMap<String, usize>,
    typedefs: HashMap<String, usize>,
    enums: HashMap<String, usize>,
    services: HashMap<String, usize>,
}

impl From<ProgramDocument> for Program {
    fn from(doc: ProgramDocument) -> Self {
        Self::new(doc.definitions)
    }
}

impl From<Program> for ProgramDocument {
    fn from(program: Program) -> Self {
        Self {
            definitions: program.definitions,
        }
    }
}

impl Program {
    /// Build a program and its lookup maps from ordered definitions
    pub fn new(definitions: Vec<Definition>) -> Self {
        let mut structs = HashMap::new();
        let mut typedefs = HashMap::new();
        let mut enums = HashMap::new();
        let mut services = HashMap::new();

        for (index, def) in definitions.iter().enumerate() {
            let map = match def {
                Definition::Struct(_) | Definition::Exception(_) => &mut structs,
                Definition::Typedef(_) => &mut typedefs,
                Definition::Enum(_) => &mut enums,
                Definition::Service(_) => &mut services,
            };
            map.entry(def.name().to_string()).or_insert(index);
        }

        Self {
            definitions,
            structs,
            typedefs,
            enums,
            services,
        }
    }

    /// Parse a program from the front-end's JSON document
    pub fn from_json(json: &str) -> LoadResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a program from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> LoadResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Top-level definitions in source order
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// Look up a struct or exception by name
    pub fn struct_def(&self, name: &str) -> Option<&StructDef> {
        match self.definitions.get(*self.structs.get(name)?)? {
            Definition::Struct(s) | Definition::Exception(s) => Some(s),
            _ => None,
        }
    }

    /// Whether `name` refers to an exception definition
    pub fn is_exception(&self, name: &str) -> bool {
        self.structs
            .get(name)
            .and_then(|&i| self.definitions.get(i))
            .is_some_and(|d| matches!(d, Definition::Exception(_)))
    }

    /// Look up a typedef by name
    pub fn typedef_def(&self, name: &str) -> Option<&TypedefDef> {
        match self.definitions.get(*self.typedefs.get(name)?)? {
            Definition::Typedef(t) => Some(t),
            _ => None,
        }
    }

    /// Look up an enum by name
    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        match self.definitions.get(*self.enums.get(name)?)? {
            Definition::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Look up a service by name
    pub fn service(&self, name: &str) -> Option<&Service> {
        match self.definitions.get(*self.services.get(name)?)? {
            Definition::Service(s) => Some(s),
            _ => None,
        }
    }

    /// Services in source order
    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Service(s) => Some(s),
            _ => None,
        })
    }

    /// Structs and exceptions in source order
    pub fn structs(&self) -> impl Iterator<Item = &StructDef> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Struct(s) | Definition::Exception(s) => Some(s),
            _ => None,
        })
    }

    /// Reduce a typedef chain to the first non-typedef type.
    ///
    /// Returns `None` when a typedef in the chain is undefined or the chain
    /// loops back on itself.
    pub fn canonical<'a>(&'a self, ty: &'a Type) -> Option<&'a Type> {
        let mut current = ty;
        let mut hops = 0;
        while let Type::Typedef(name) = current {
            if hops > self.typedefs.len() {
                return None;
            }
            current = &self.typedef_def(name)?.target;
            hops += 1;
        }
        Some(current)
    }
}

#[cfg(test)]
#[path = "program/program_tests.rs"]
mod program_tests;
