use crate::ir::Position;

const SPACING_X: f64 = 100.0;
const SPACING_Y: f64 = 80.0;
const COLS_PER_ROW: usize = 3; // 3 tables in one row
const START_X: f64 = 50.0;
const START_Y: f64 = 50.0;

/// Place boxes of the given `(width, height)` on a grid, row by row.
///
/// The first row starts at `START_Y`, or `SPACING_Y` below `occupied_bottom`
/// when some tables already have stored coordinates.
pub fn grid_layout(sizes: &[(f64, f64)], occupied_bottom: Option<f64>) -> Vec<Position> {
    let mut x = START_X;
    let mut y = occupied_bottom.map_or(START_Y, |bottom| bottom + SPACING_Y);
    let mut col_index = 0;
    let mut max_row_height: f64 = 0.0;
    let mut positions = Vec::with_capacity(sizes.len());

    for &(width, height) in sizes {
        positions.push(Position { x, y });
        max_row_height = max_row_height.max(height);

        col_index += 1;
        if col_index >= COLS_PER_ROW {
            col_index = 0;
            x = START_X;
            y += max_row_height + SPACING_Y;
            max_row_height = 0.0;
        } else {
            x += width + SPACING_X;
        }
    }

    positions
}
