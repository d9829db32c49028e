//! Generator configuration

use serde::{Deserialize, Serialize};

/// Options controlling the rendered output.
///
/// Every field has a default, so an empty TOML or JSON document is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Crate name generated code uses to reach the runtime
    #[serde(default = "default_runtime_crate")]
    pub runtime_crate: String,

    /// Spaces per indentation level
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    /// Emit the "generated, do not edit" banner at the top of each unit
    #[serde(default = "default_header")]
    pub header: bool,
}

fn default_runtime_crate() -> String {
    "idlgen_runtime".to_string()
}

fn default_indent_width() -> usize {
    4
}

fn default_header() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime_crate: default_runtime_crate(),
            indent_width: default_indent_width(),
            header: default_header(),
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Parse JSON bytes; empty input yields the defaults
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    /// Use a different runtime crate name
    pub fn with_runtime_crate(mut self, name: impl Into<String>) -> Self {
        self.runtime_crate = name.into();
        self
    }

    /// Absolute path prefix for runtime items, e.g. `::idlgen_runtime`
    pub fn runtime_path(&self) -> String {
        format!("::{}", self.runtime_crate.replace('-', "_"))
    }
}
