//! Types for layout.toml serialization.
//!
//! Example layout.toml:
//! ```toml
//! [meta]
//! version = 1
//! source = "schema.dbml"
//!
//! [tables."public.users"]
//! x = 100.0
//! y = 200.0
//!
//! [tables."public.posts"]
//! x = 450.0
//! y = 200.0
//!
//! [[relations]]
//! table = "posts"
//! field = "author"
//! foreign_table = "users"
//! foreign_field = "name"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entire layout file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutData {
    #[serde(default)]
    pub meta: LayoutMeta,
    #[serde(default)]
    pub tables: BTreeMap<String, TableCoords>, // Key is "schema.table" (e.g., "public.users")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<RelationEntry>,
}

/// Metadata about the layout file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutMeta {
    pub version: u32,
    #[serde(default)]
    pub source: String,
}

impl Default for LayoutMeta {
    fn default() -> Self {
        Self {
            version: 1,
            source: String::new(),
        }
    }
}

/// Position of a single table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TableCoords {
    pub x: f64,
    pub y: f64,
}

/// A relation kept alongside the coordinates rather than in the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEntry {
    pub table: String,
    pub field: String,
    pub foreign_table: String,
    pub foreign_field: String,
}
