use crate::catalog::SchemaSource;
use crate::ir::Position;
use crate::render::style::{
    CELL_PADDING, FIELD, FIELD_TEXT, HEADER, HEADER_TEXT, KEY_FIELD, TEXT_BASELINE, TEXT_INSET_X,
    TITLE_WIDEN_STEP,
};
use crate::render::{Point, Rect, Surface};

use super::font::string_width;

/// One table drawn as a header cell followed by a cell per listed field.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    name: String,
    fields: Vec<String>,
    primary: Vec<String>,
    font_size: f64,
    show_dimension: bool,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub cell_height: f64,
}

impl TableLayout {
    /// Size the table `name` of `db`; it sits at the origin until placed.
    ///
    /// With `show_keys` only key columns are listed, unless the table has none.
    pub fn new(
        source: &dyn SchemaSource,
        db: &str,
        name: &str,
        font_size: f64,
        show_keys: bool,
        show_dimension: bool,
    ) -> Self {
        let columns = source.columns(db, name);
        let primary = columns
            .iter()
            .filter(|c| c.is_pk)
            .map(|c| c.name.clone())
            .collect();

        let mut fields = if show_keys {
            source.key_columns(db, name)
        } else {
            Vec::new()
        };
        if fields.is_empty() {
            fields = columns.into_iter().map(|c| c.name).collect();
        }

        let cell_height = font_size + CELL_PADDING;
        let mut table = Self {
            name: name.to_string(),
            height: (fields.len() + 1) as f64 * cell_height,
            fields,
            primary,
            font_size,
            show_dimension,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            cell_height,
        };
        table.fit_width();
        table
    }

    fn fit_width(&mut self) {
        self.width = self
            .fields
            .iter()
            .map(|f| string_width(f, self.font_size))
            .fold(0.0, f64::max);
        self.width += string_width("  ", self.font_size);
        while self.width < string_width(&self.title(), self.font_size) {
            self.width += TITLE_WIDEN_STEP;
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Header text; prefixed with the table size when dimensions are shown.
    pub fn title(&self) -> String {
        if self.show_dimension {
            format!("{:.0}x{:.0} {}", self.width, self.height, self.name)
        } else {
            self.name.clone()
        }
    }

    pub fn place(&mut self, position: Position) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn position(&self) -> Position {
        Position {
            x: self.x,
            y: self.y,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Left edge, right edge and row centre of `field`.
    ///
    /// A field that is not listed anchors on the first row.
    pub fn anchor(&self, field: &str) -> (f64, f64, f64) {
        let index = self.fields.iter().position(|f| f == field).unwrap_or(0);
        (
            self.x,
            self.x + self.width,
            self.y + (index as f64 + 1.5) * self.cell_height,
        )
    }

    pub fn draw(&self, surface: &mut dyn Surface, show_color: bool) {
        surface.rect(
            Rect::new(self.x, self.y, self.width, self.cell_height),
            HEADER,
        );
        surface.text(
            Point::new(self.x + TEXT_INSET_X, self.y + TEXT_BASELINE),
            &self.title(),
            HEADER_TEXT,
        );

        let mut offset = 0.0;
        for field in &self.fields {
            offset += self.cell_height;
            let style = if show_color && self.primary.contains(field) {
                KEY_FIELD
            } else {
                FIELD
            };
            surface.rect(
                Rect::new(self.x, self.y + offset, self.width, self.cell_height),
                style,
            );
            surface.text(
                Point::new(self.x + TEXT_INSET_X, self.y + TEXT_BASELINE + offset),
                field,
                FIELD_TEXT,
            );
        }
    }
}
