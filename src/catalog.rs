//! Schema metadata used by the relation schema export.
//!
//! [`SchemaSource`] is the lookup capability the exporter depends on; the
//! [`Catalog`] implementation answers it from a parsed DBML [`Diagram`] plus
//! any internal relations declared next to the table coordinates.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::ir::{Column, Diagram, Table};

/// Where relation metadata may come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationSource {
    /// Relations stored outside the schema (layout file `[[relations]]`).
    Internal,
    /// Foreign keys declared by the schema itself.
    ForeignKeys,
    Both,
}

impl RelationSource {
    fn internal(self) -> bool {
        matches!(self, Self::Internal | Self::Both)
    }

    fn foreign_keys(self) -> bool {
        matches!(self, Self::ForeignKeys | Self::Both)
    }
}

/// A single-field relation from `master_field` to `foreign_table.foreign_field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalRelation {
    pub master_field: String,
    pub foreign_table: String,
    pub foreign_field: String,
}

/// A possibly composite foreign key; `index_list[i]` references `ref_index_list[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub index_list: Vec<String>,
    pub ref_table_name: String,
    pub ref_index_list: Vec<String>,
}

impl ForeignKey {
    /// Field pairs `(local, referenced)`; unmatched trailing fields are dropped.
    pub fn field_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.index_list
            .iter()
            .zip(&self.ref_index_list)
            .map(|(local, remote)| (local.as_str(), remote.as_str()))
    }
}

/// Everything a table references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Foreigners {
    pub internal: Vec<InternalRelation>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl Foreigners {
    pub fn is_empty(&self) -> bool {
        self.internal.is_empty() && self.foreign_keys.is_empty()
    }
}

pub trait SchemaSource {
    /// Columns of `table` in declaration order; empty when the table is unknown.
    fn columns(&self, db: &str, table: &str) -> Vec<Column>;

    /// Names of the columns taking part in a key (primary or foreign).
    fn key_columns(&self, db: &str, table: &str) -> Vec<String>;

    /// Relations where `table` is the referencing side, optionally narrowed to one column.
    fn foreigners(
        &self,
        db: &str,
        table: &str,
        column: Option<&str>,
        source: RelationSource,
    ) -> Foreigners;
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    db: String,
    tables: IndexMap<String, Table>,
    foreign_keys: HashMap<String, Vec<ForeignKey>>,
    internal: HashMap<String, Vec<InternalRelation>>,
}

impl Catalog {
    pub fn new(db: impl Into<String>) -> Self {
        Self {
            db: db.into(),
            ..Self::default()
        }
    }

    /// Build the catalog of schema `db` out of a parsed diagram.
    ///
    /// References crossing into another schema are not foreign keys of `db`.
    pub fn from_diagram(diagram: &Diagram, db: &str) -> Self {
        let mut catalog = Self::new(db);
        for table in diagram.tables_in(db) {
            catalog.add_table(table.clone());
        }

        for rel in &diagram.relationships {
            let Some((referencing, referenced)) = rel.foreign_key() else {
                continue;
            };
            if referencing.table_id.schema != db || referenced.table_id.schema != db {
                continue;
            }
            catalog.add_foreign_key(
                &referencing.table_id.name,
                ForeignKey {
                    index_list: referencing.column_names.clone(),
                    ref_table_name: referenced.table_id.name.clone(),
                    ref_index_list: referenced.column_names.clone(),
                },
            );
        }

        catalog
    }

    pub fn db(&self) -> &str {
        &self.db
    }

    pub fn add_table(&mut self, table: Table) {
        self.tables.insert(table.id.name.clone(), table);
    }

    pub fn add_foreign_key(&mut self, table: &str, key: ForeignKey) {
        self.foreign_keys.entry(table.to_string()).or_default().push(key);
    }

    pub fn add_internal_relation(&mut self, table: &str, relation: InternalRelation) {
        self.internal.entry(table.to_string()).or_default().push(relation);
    }

    /// Table names in declaration order.
    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }
}

impl SchemaSource for Catalog {
    fn columns(&self, db: &str, table: &str) -> Vec<Column> {
        if db != self.db {
            return Vec::new();
        }
        self.tables
            .get(table)
            .map(|t| t.columns.clone())
            .unwrap_or_default()
    }

    fn key_columns(&self, db: &str, table: &str) -> Vec<String> {
        let columns = self.columns(db, table);
        let referenced: Vec<&str> = self
            .foreign_keys
            .values()
            .flatten()
            .filter(|fk| fk.ref_table_name == table)
            .flat_map(|fk| fk.ref_index_list.iter().map(String::as_str))
            .collect();
        let referencing: Vec<&str> = self
            .foreign_keys
            .get(table)
            .into_iter()
            .flatten()
            .flat_map(|fk| fk.index_list.iter().map(String::as_str))
            .collect();

        columns
            .into_iter()
            .filter(|c| {
                c.is_pk
                    || referenced.contains(&c.name.as_str())
                    || referencing.contains(&c.name.as_str())
            })
            .map(|c| c.name)
            .collect()
    }

    fn foreigners(
        &self,
        db: &str,
        table: &str,
        column: Option<&str>,
        source: RelationSource,
    ) -> Foreigners {
        if db != self.db {
            return Foreigners::default();
        }

        let mut foreigners = Foreigners::default();
        if source.internal() {
            foreigners.internal = self
                .internal
                .get(table)
                .into_iter()
                .flatten()
                .filter(|r| column.is_none_or(|c| r.master_field == c))
                .cloned()
                .collect();
        }
        if source.foreign_keys() {
            foreigners.foreign_keys = self
                .foreign_keys
                .get(table)
                .into_iter()
                .flatten()
                .filter(|fk| column.is_none_or(|c| fk.index_list.iter().any(|f| f == c)))
                .cloned()
                .collect();
        }
        foreigners
    }
}
