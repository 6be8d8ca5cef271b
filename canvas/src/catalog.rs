//! Symbol catalog lookup.
//!
//! The registry is constructed by the composition root and handed to the
//! engine; there is no global cache. It only decides whether a requested
//! symbol type can be drawn. Unknown types are still committed.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Visual definition of one catalog symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Nominal footprint in canvas pixels at scale 1.
    #[serde(default = "default_extent")]
    pub width: f64,
    #[serde(default = "default_extent")]
    pub height: f64,
}

fn default_extent() -> f64 {
    32.0
}

/// Id-keyed symbol catalog with an explicit load/clear lifecycle.
#[derive(Debug, Clone, Default)]
pub struct SymbolRegistry {
    defs: BTreeMap<String, SymbolDef>,
}

impl SymbolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registry contents. Later duplicates win.
    pub fn load(&mut self, defs: impl IntoIterator<Item = SymbolDef>) {
        self.defs = defs.into_iter().map(|d| (d.id.clone(), d)).collect();
        info!(count = self.defs.len(), "symbol catalog loaded");
    }

    /// Replace the registry contents from a JSON array of definitions.
    ///
    /// # Errors
    ///
    /// Returns the parse error and leaves the registry untouched when `json`
    /// is not an array of symbol definitions.
    pub fn load_json(&mut self, json: &str) -> Result<usize, serde_json::Error> {
        let defs: Vec<SymbolDef> = serde_json::from_str(json)?;
        self.load(defs);
        Ok(self.defs.len())
    }

    pub fn clear(&mut self) {
        self.defs.clear();
    }

    #[must_use]
    pub fn get(&self, type_id: &str) -> Option<&SymbolDef> {
        self.defs.get(type_id)
    }

    #[must_use]
    pub fn is_renderable(&self, type_id: &str) -> bool {
        self.defs.contains_key(type_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
