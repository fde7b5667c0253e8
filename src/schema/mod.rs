//! Relation schema export: tables laid out as boxes, foreign keys as arrows.

pub mod bounds;
pub mod font;
pub mod relation_layout;
pub mod table_layout;

use indexmap::IndexMap;

use crate::catalog::{RelationSource, SchemaSource};
use crate::ir::TableId;
use crate::layout::LayoutStore;
use crate::layout::auto_layout::grid_layout;
use crate::render::style::{BORDER, DEFAULT_FONT, DEFAULT_FONT_SIZE, RELATION_COLOR, RELATION_PALETTE};
use crate::render::{DocumentInfo, SchemaOutput, Surface};

use bounds::BoundingBox;
use relation_layout::RelationLayout;
use table_layout::TableLayout;

/// Render switches, passed in explicitly by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaOptions {
    pub show_color: bool,
    pub show_keys: bool,
    pub table_dimension: bool,
    pub same_width: bool,
    /// Which relation metadata is drawn.
    pub relation_source: RelationSource,
    pub page_number: u32,
    /// Used as the file name stem instead of the database name.
    pub page_name: Option<String>,
    pub border: f64,
    pub font: String,
    pub font_size: f64,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            show_color: false,
            show_keys: false,
            table_dimension: false,
            same_width: false,
            relation_source: RelationSource::Both,
            page_number: 1,
            page_name: None,
            border: BORDER,
            font: DEFAULT_FONT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// A rendered relation schema.
///
/// Everything happens in [`SchemaExport::new`]; afterwards the document is
/// only read back through [`SchemaExport::output`].
pub struct SchemaExport<S: Surface> {
    db: String,
    options: SchemaOptions,
    tables: IndexMap<String, TableLayout>,
    relations: Vec<RelationLayout>,
    bounds: BoundingBox,
    surface: S,
}

impl<S: Surface> SchemaExport<S> {
    pub fn new(
        source: &dyn SchemaSource,
        db: &str,
        requested: &[String],
        layout: &LayoutStore,
        options: SchemaOptions,
        surface: S,
    ) -> Self {
        let mut export = Self {
            db: db.to_string(),
            options,
            tables: IndexMap::new(),
            relations: Vec::new(),
            bounds: BoundingBox::new(),
            surface,
        };

        for name in requested {
            if export.tables.contains_key(name) {
                continue;
            }
            let table = TableLayout::new(
                source,
                db,
                name,
                export.options.font_size,
                export.options.show_keys,
                export.options.table_dimension,
            );
            if table.fields().is_empty() {
                tracing::warn!(db, table = %name, "table has no columns");
            }
            export.tables.insert(name.clone(), table);
        }

        if export.options.same_width {
            export.equalize_widths();
        }
        export.place_tables(layout);
        for table in export.tables.values() {
            export.bounds.observe(table.rect());
        }

        export.discover_relations(source, requested);
        export.render();
        export
    }

    fn equalize_widths(&mut self) {
        let widest = self.tables.values().map(|t| t.width).fold(0.0, f64::max);
        for table in self.tables.values_mut() {
            table.width = widest;
        }
    }

    /// Stored coordinates first; the rest go on a grid below them.
    fn place_tables(&mut self, layout: &LayoutStore) {
        let mut occupied_bottom: Option<f64> = None;
        let mut unplaced = Vec::new();

        for (name, table) in self.tables.iter_mut() {
            match layout.position(&TableId::new(&self.db, name)) {
                Some(position) => {
                    table.place(position);
                    let bottom = table.rect().bottom();
                    occupied_bottom = Some(occupied_bottom.map_or(bottom, |b| b.max(bottom)));
                }
                None => unplaced.push(name.clone()),
            }
        }
        if unplaced.is_empty() {
            return;
        }

        let sizes: Vec<(f64, f64)> = unplaced
            .iter()
            .filter_map(|name| self.tables.get(name))
            .map(|t| (t.width, t.height))
            .collect();
        for (name, position) in unplaced.iter().zip(grid_layout(&sizes, occupied_bottom)) {
            if let Some(table) = self.tables.get_mut(name) {
                table.place(position);
            }
        }
    }

    fn discover_relations(&mut self, source: &dyn SchemaSource, requested: &[String]) {
        for table in requested {
            let foreigners = source.foreigners(&self.db, table, None, self.options.relation_source);
            if foreigners.is_empty() {
                continue;
            }

            for rel in &foreigners.internal {
                if requested.contains(&rel.foreign_table) {
                    self.add_relation(table, &rel.master_field, &rel.foreign_table, &rel.foreign_field);
                }
            }
            for key in &foreigners.foreign_keys {
                if !requested.contains(&key.ref_table_name) {
                    continue;
                }
                for (field, ref_field) in key.field_pairs() {
                    self.add_relation(table, field, &key.ref_table_name, ref_field);
                }
            }
        }
    }

    fn add_relation(
        &mut self,
        master_table: &str,
        master_field: &str,
        foreign_table: &str,
        foreign_field: &str,
    ) {
        let (Some(master), Some(foreign)) = (
            self.tables.get_index_of(master_table),
            self.tables.get_index_of(foreign_table),
        ) else {
            tracing::warn!(master_table, foreign_table, "relation endpoint not laid out, skipping");
            return;
        };
        self.relations
            .push(RelationLayout::new(master, master_field, foreign, foreign_field));
    }

    fn render(&mut self) {
        let info = DocumentInfo {
            title: format!(
                "Schema of the {} database - Page {}",
                self.db, self.options.page_number
            ),
            author: format!("schema-draw {}", env!("CARGO_PKG_VERSION")),
            font: self.options.font.clone(),
            font_size: self.options.font_size,
        };
        self.surface
            .start_document(self.bounds.with_border(self.options.border), &info);

        let tables: Vec<TableLayout> = self.tables.values().cloned().collect();
        // Relations go underneath the tables.
        for (i, relation) in self.relations.iter().enumerate() {
            let color = if self.options.show_color {
                RELATION_PALETTE[i % RELATION_PALETTE.len()]
            } else {
                RELATION_COLOR
            };
            relation.draw(&mut self.surface, &tables, color);
        }
        for table in &tables {
            table.draw(&mut self.surface, self.options.show_color);
        }

        self.surface.end_document();
        tracing::debug!(
            tables = tables.len(),
            relations = self.relations.len(),
            "schema rendered"
        );
    }

    /// Suggested file name: the page name, or the database name.
    pub fn filename(&self) -> String {
        let stem = self.options.page_name.as_deref().unwrap_or(&self.db);
        format!("{}{}", stem, self.surface.extension())
    }

    pub fn output(&self) -> SchemaOutput {
        self.surface.output(&self.filename())
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableLayout> {
        self.tables.values()
    }

    #[cfg(test)]
    pub fn table(&self, name: &str) -> Option<&TableLayout> {
        self.tables.get(name)
    }

    pub fn relations(&self) -> &[RelationLayout] {
        &self.relations
    }

    #[cfg(test)]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Record the final table coordinates, e.g. to persist automatic placement.
    pub fn store_positions(&self, layout: &mut LayoutStore) {
        for (name, table) in &self.tables {
            layout.set_position(&TableId::new(&self.db, name), table.position());
        }
    }
}
