//! Drawing surfaces for schema export.
//!
//! The exporter only talks to [`Surface`]; every output format provides its
//! own implementation. [`svg_surface::SvgSurface`] is the vector one.

pub mod style;
pub mod svg_surface;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Paint attributes of a shape; `None` leaves the format default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub fill: Option<&'static str>,
    pub stroke: Option<&'static str>,
    pub stroke_width: Option<f64>,
}

impl Style {
    pub const fn fill(color: &'static str) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: None,
        }
    }

    pub const fn with_stroke(mut self, color: &'static str) -> Self {
        self.stroke = Some(color);
        self
    }

    pub const fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }
}

/// Descriptive data written into the document header.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub font: String,
    pub font_size: f64,
}

/// A finished export, ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOutput {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

pub trait Surface {
    /// File extension including the dot, e.g. `.svg`.
    fn extension(&self) -> &'static str;

    fn mime_type(&self) -> &'static str;

    /// Open the document; `bounds` already includes the border.
    fn start_document(&mut self, bounds: Rect, info: &DocumentInfo);

    fn end_document(&mut self);

    fn rect(&mut self, rect: Rect, style: Style);

    fn text(&mut self, at: Point, content: &str, style: Style);

    fn line(&mut self, from: Point, to: Point, style: Style);

    /// The rendered document under `filename`. Reading it has no side effects.
    fn output(&self, filename: &str) -> SchemaOutput;
}
