//! Drawing constants for schema rendering.

use super::Style;

// Document
pub const BORDER: f64 = 15.0;
pub const DEFAULT_FONT: &str = "Arial";
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

// Tables
pub const CELL_PADDING: f64 = 4.0;
pub const TEXT_INSET_X: f64 = 5.0;
pub const TEXT_BASELINE: f64 = 14.0;
pub const TITLE_WIDEN_STEP: f64 = 7.0;

pub const HEADER: Style = Style::fill("#007").with_stroke("black");
pub const HEADER_TEXT: Style = Style::fill("#fff");
pub const FIELD: Style = Style::fill("none").with_stroke("black");
pub const KEY_FIELD: Style = Style::fill("#aea").with_stroke("black");
pub const FIELD_TEXT: Style = Style::fill("black");

// Relations
pub const TICK_WIDTH: f64 = 10.0;
pub const RELATION_COLOR: &str = "#333333";
pub const RELATION_PALETTE: [&str; 7] = ["#c00", "#bbb", "#333", "#cb0", "#0b0", "#0bf", "#b0b"];
