use crate::render::style::TICK_WIDTH;
use crate::render::{Point, Style, Surface};

use super::table_layout::TableLayout;

/// A connector from `master_field` of one table to `foreign_field` of another.
///
/// Tables are referenced by their index in the exporter's table list; the
/// anchor points are derived from the tables' positions when drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationLayout {
    pub master_table: usize,
    pub master_field: String,
    pub foreign_table: usize,
    pub foreign_field: String,
}

/// Resolved geometry: anchor points and the side each one leaves from
/// (`-1.0` left, `1.0` right).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub src: Point,
    pub src_dir: f64,
    pub dest: Point,
    pub dest_dir: f64,
}

impl RelationLayout {
    pub fn new(
        master_table: usize,
        master_field: impl Into<String>,
        foreign_table: usize,
        foreign_field: impl Into<String>,
    ) -> Self {
        Self {
            master_table,
            master_field: master_field.into(),
            foreign_table,
            foreign_field: foreign_field.into(),
        }
    }

    /// Pick the pair of table sides with the smallest horizontal gap.
    pub fn connector(&self, tables: &[TableLayout]) -> Option<Connector> {
        let master = tables.get(self.master_table)?;
        let foreign = tables.get(self.foreign_table)?;
        let (src_left, src_right, src_y) = master.anchor(&self.master_field);
        let (dest_left, dest_right, dest_y) = foreign.anchor(&self.foreign_field);

        let mut best: Option<(f64, f64, f64)> = None;
        for src in [src_left, src_right] {
            for dest in [dest_left, dest_right] {
                let distance = (src - dest).abs();
                if best.is_none_or(|(d, _, _)| distance < d) {
                    best = Some((distance, src, dest));
                }
            }
        }
        let (_, src_x, dest_x) = best?;

        Some(Connector {
            src: Point::new(src_x, src_y),
            src_dir: if src_x == src_left { -1.0 } else { 1.0 },
            dest: Point::new(dest_x, dest_y),
            dest_dir: if dest_x == dest_left { -1.0 } else { 1.0 },
        })
    }

    /// Draw ticks on both tables, the joining line and an arrow head at each end.
    pub fn draw(&self, surface: &mut dyn Surface, tables: &[TableLayout], color: &'static str) {
        let Some(c) = self.connector(tables) else {
            return;
        };
        let tick = Style::fill(color).with_stroke("black").with_stroke_width(2.0);
        let link = Style::fill(color).with_stroke(color).with_stroke_width(1.0);
        let root2 = 2.0 * std::f64::consts::SQRT_2;

        let src_tick = Point::new(c.src.x + c.src_dir * TICK_WIDTH, c.src.y);
        let dest_tick = Point::new(c.dest.x + c.dest_dir * TICK_WIDTH, c.dest.y);
        surface.line(c.src, src_tick, tick);
        surface.line(dest_tick, c.dest, tick);
        surface.line(src_tick, dest_tick, link);

        let src_head = Point::new(c.src.x + c.src_dir * TICK_WIDTH * 0.75, c.src.y);
        let src_barb_x = c.src.x + c.src_dir * (0.75 - 1.0 / root2) * TICK_WIDTH;
        surface.line(src_head, Point::new(src_barb_x, c.src.y + TICK_WIDTH / root2), tick);
        surface.line(src_head, Point::new(src_barb_x, c.src.y - TICK_WIDTH / root2), tick);

        let dest_head = Point::new(c.dest.x + c.dest_dir * TICK_WIDTH / 2.0, c.dest.y);
        let dest_barb_x = c.dest.x + c.dest_dir * (0.5 + 1.0 / root2) * TICK_WIDTH;
        surface.line(dest_head, Point::new(dest_barb_x, c.dest.y + TICK_WIDTH / root2), tick);
        surface.line(dest_head, Point::new(dest_barb_x, c.dest.y - TICK_WIDTH / root2), tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::ir::{Column, Position, Table, TableId};
    use crate::render::recording::{Call, RecordingSurface};

    fn tables(a: Position, b: Position) -> Vec<TableLayout> {
        let mut catalog = Catalog::new("db");
        for name in ["a", "b"] {
            catalog.add_table(Table {
                id: TableId::new("db", name),
                columns: vec![Column::new("id").primary(), Column::new("ref")],
            });
        }
        let mut ta = TableLayout::new(&catalog, "db", "a", 16.0, false, false);
        let mut tb = TableLayout::new(&catalog, "db", "b", 16.0, false, false);
        ta.place(a);
        tb.place(b);
        vec![ta, tb]
    }

    #[test]
    fn test_connector_left_to_right() {
        let tables = tables(Position { x: 0.0, y: 0.0 }, Position { x: 500.0, y: 100.0 });
        let rel = RelationLayout::new(0, "ref", 1, "id");
        let c = rel.connector(&tables).unwrap();

        assert_eq!(c.src, Point::new(tables[0].width, 2.5 * 20.0));
        assert_eq!(c.src_dir, 1.0);
        assert_eq!(c.dest, Point::new(500.0, 100.0 + 1.5 * 20.0));
        assert_eq!(c.dest_dir, -1.0);
    }

    #[test]
    fn test_connector_right_to_left() {
        let tables = tables(Position { x: 500.0, y: 0.0 }, Position { x: 0.0, y: 0.0 });
        let c = RelationLayout::new(0, "ref", 1, "id").connector(&tables).unwrap();
        assert_eq!(c.src.x, 500.0);
        assert_eq!(c.src_dir, -1.0);
        assert_eq!(c.dest.x, tables[1].width);
        assert_eq!(c.dest_dir, 1.0);
    }

    #[test]
    fn test_connector_missing_table() {
        let tables = tables(Position { x: 0.0, y: 0.0 }, Position { x: 500.0, y: 0.0 });
        assert!(RelationLayout::new(0, "ref", 7, "id").connector(&tables).is_none());
    }

    #[test]
    fn test_draw_emits_seven_lines() {
        let tables = tables(Position { x: 0.0, y: 0.0 }, Position { x: 500.0, y: 0.0 });
        let rel = RelationLayout::new(0, "ref", 1, "id");
        let mut surface = RecordingSurface::default();
        rel.draw(&mut surface, &tables, "#c00");

        assert_eq!(surface.lines(), 7);
        let Call::Line(from, to, style) = &surface.calls[2] else {
            panic!("expected the joining line");
        };
        assert_eq!(from.x, tables[0].width + 10.0);
        assert_eq!(to.x, 490.0);
        assert_eq!(style.stroke, Some("#c00"));
    }
}
