use std::collections::BTreeMap;
use std::path::Path;

use crate::catalog::{Catalog, InternalRelation};
use crate::error::AppError;
use crate::ir::{Position, TableId};

pub(crate) mod auto_layout;
pub(crate) mod layout_file;
pub(crate) mod types;

use types::{LayoutData, LayoutMeta, RelationEntry, TableCoords};

/// Table coordinates and internal relations of one layout file.
#[derive(Debug, Clone, Default)]
pub struct LayoutStore {
    positions: BTreeMap<String, Position>,
    relations: Vec<RelationEntry>,
}

impl LayoutStore {
    /// Load the store from `path`, or start empty.
    pub fn load(path: Option<&Path>) -> Self {
        let data = path
            .map(layout_file::read_layout_or_default)
            .unwrap_or_default();
        Self::from_data(data)
    }

    fn from_data(data: LayoutData) -> Self {
        let positions = data
            .tables
            .into_iter()
            .map(|(key, c)| (key, Position { x: c.x, y: c.y }))
            .collect();
        Self {
            positions,
            relations: data.relations,
        }
    }

    pub fn position(&self, id: &TableId) -> Option<Position> {
        self.positions.get(&id.full_name()).copied()
    }

    pub fn set_position(&mut self, id: &TableId, position: Position) {
        self.positions.insert(id.full_name(), position);
    }

    pub fn relations(&self) -> &[RelationEntry] {
        &self.relations
    }

    /// Register the stored relations as internal relations of `catalog`.
    pub fn apply_relations(&self, catalog: &mut Catalog) {
        for r in &self.relations {
            catalog.add_internal_relation(
                &r.table,
                InternalRelation {
                    master_field: r.field.clone(),
                    foreign_table: r.foreign_table.clone(),
                    foreign_field: r.foreign_field.clone(),
                },
            );
        }
    }

    pub fn save(&self, path: &Path, source: &Path) -> Result<(), AppError> {
        let data = LayoutData {
            meta: LayoutMeta {
                version: 1,
                source: source
                    .file_name()
                    .map(|f| f.to_string_lossy().to_string())
                    .unwrap_or_default(),
            },
            tables: self
                .positions
                .iter()
                .map(|(key, p)| (key.clone(), TableCoords { x: p.x, y: p.y }))
                .collect(),
            relations: self.relations.clone(),
        };
        layout_file::write_layout(path, &data)
    }
}
