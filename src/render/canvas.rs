use crate::render::document::{Document, Element, EmbeddedImage, Rgb};
use crate::render::metrics::{self, FontFace};

/// Stateful pen over a [`Document`]: the current font, colours and line width
/// apply to every subsequent drawing call.
pub struct Canvas {
    doc: Document,
    face: FontFace,
    size: f32,
    text_color: Rgb,
    draw_color: Rgb,
    line_width: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            doc: Document::new(width, height),
            face: FontFace::Regular,
            size: 10.0,
            text_color: Rgb::BLACK,
            draw_color: Rgb::BLACK,
            line_width: 0.2,
        }
    }

    pub fn width(&self) -> f32 {
        self.doc.width
    }

    pub fn set_font(&mut self, face: FontFace, size: f32) {
        self.face = face;
        self.size = size;
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.size = size;
    }

    pub fn face(&self) -> FontFace {
        self.face
    }

    pub fn font_size(&self) -> f32 {
        self.size
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    pub fn set_draw_color(&mut self, color: Rgb) {
        self.draw_color = color;
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    pub fn text_width(&self, text: &str) -> f32 {
        metrics::text_width(text, self.face, self.size)
    }

    pub fn text(&mut self, text: &str, x: f32, y: f32) {
        self.doc.push(Element::Text {
            text: text.to_string(),
            x,
            y,
            face: self.face,
            size: self.size,
            color: self.text_color,
        });
    }

    pub fn text_centered(&mut self, text: &str, y: f32) {
        self.text_centered_at(text, self.doc.width / 2.0, y);
    }

    pub fn text_centered_at(&mut self, text: &str, center_x: f32, y: f32) {
        let x = center_x - self.text_width(text) / 2.0;
        self.text(text, x, y);
    }

    pub fn text_right(&mut self, text: &str, right_x: f32, y: f32) {
        let x = right_x - self.text_width(text);
        self.text(text, x, y);
    }

    pub fn arc_text(&mut self, text: &str, cx: f32, cy: f32, radius: f32) {
        self.doc.push(Element::ArcText {
            text: text.to_string(),
            cx,
            cy,
            radius,
            face: self.face,
            size: self.size,
            color: self.text_color,
        });
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.doc.push(Element::Line {
            x1,
            y1,
            x2,
            y2,
            width: self.line_width,
            color: self.draw_color,
        });
    }

    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32) {
        self.doc.push(Element::Circle {
            cx,
            cy,
            radius,
            width: self.line_width,
            color: self.draw_color,
        });
    }

    pub fn image(&mut self, image: &EmbeddedImage, x: f32, y: f32, width: f32, height: f32) {
        self.doc.push(Element::Image {
            image: image.clone(),
            x,
            y,
            width,
            height,
        });
    }

    pub fn finish(self) -> Document {
        self.doc
    }
}
