use svg::Document;
use svg::Node;
use svg::node::Text as TextNode;
use svg::node::element::{Element, Line, Rectangle, Text};

use super::{DocumentInfo, Point, Rect, SchemaOutput, Style, Surface};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// SVG output built on the `svg` crate's document tree.
#[derive(Debug, Default)]
pub struct SvgSurface {
    doc: Option<Document>,
    rendered: Option<String>,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn push<T>(&mut self, node: T)
    where
        T: Into<Box<dyn Node>>,
    {
        if let Some(doc) = self.doc.take() {
            self.doc = Some(doc.add(node));
        }
    }
}

fn styled<T: Node>(mut node: T, style: Style) -> T {
    if let Some(fill) = style.fill {
        node.assign("fill", fill);
    }
    if let Some(stroke) = style.stroke {
        node.assign("stroke", stroke);
    }
    if let Some(width) = style.stroke_width {
        node.assign("stroke-width", width);
    }
    node
}

fn text_element(name: &str, content: &str) -> Element {
    let mut element = Element::new(name);
    element.append(TextNode::new(content));
    element
}

impl Surface for SvgSurface {
    fn extension(&self) -> &'static str {
        ".svg"
    }

    fn mime_type(&self) -> &'static str {
        "image/svg+xml"
    }

    fn start_document(&mut self, bounds: Rect, info: &DocumentInfo) {
        let doc = Document::new()
            .set("width", bounds.width)
            .set("height", bounds.height)
            .set(
                "viewBox",
                format!("{} {} {} {}", bounds.x, bounds.y, bounds.width, bounds.height),
            )
            .set("font-family", info.font.as_str())
            .set("font-size", info.font_size)
            .add(text_element("title", &info.title))
            .add(text_element("desc", &info.author));
        self.doc = Some(doc);
        self.rendered = None;
    }

    fn end_document(&mut self) {
        if let Some(doc) = self.doc.take() {
            self.rendered = Some(format!("{}{}\n", XML_DECLARATION, doc));
        }
    }

    fn rect(&mut self, rect: Rect, style: Style) {
        let shape = Rectangle::new()
            .set("x", rect.x)
            .set("y", rect.y)
            .set("width", rect.width)
            .set("height", rect.height);
        self.push(styled(shape, style));
    }

    fn text(&mut self, at: Point, content: &str, style: Style) {
        let text = Text::new(content).set("x", at.x).set("y", at.y);
        self.push(styled(text, style));
    }

    fn line(&mut self, from: Point, to: Point, style: Style) {
        let line = Line::new()
            .set("x1", from.x)
            .set("y1", from.y)
            .set("x2", to.x)
            .set("y2", to.y);
        self.push(styled(line, style));
    }

    fn output(&self, filename: &str) -> SchemaOutput {
        SchemaOutput {
            filename: filename.to_string(),
            mime_type: self.mime_type(),
            bytes: self.rendered.clone().unwrap_or_default().into_bytes(),
        }
    }
}
