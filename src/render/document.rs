use serde::{Deserialize, Serialize};

use crate::render::metrics::FontFace;

/// RGB colour with 8-bit channels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    pub fn components(&self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

/// Decoded raster ready for embedding, stored as tightly packed 8-bit RGB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub rgb: Vec<u8>,
}

/// One drawing operation. Coordinates are millimetres from the top-left corner;
/// text positions are baselines.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        text: String,
        x: f32,
        y: f32,
        face: FontFace,
        size: f32,
        color: Rgb,
    },
    /// Text set along the upper arc of a circle, centred on its top.
    ArcText {
        text: String,
        cx: f32,
        cy: f32,
        radius: f32,
        face: FontFace,
        size: f32,
        color: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        width: f32,
        color: Rgb,
    },
    Image {
        image: EmbeddedImage,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// A single laid-out page (or continuous thermal strip).
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub file_name: String,
    pub width: f32,
    pub height: f32,
    elements: Vec<Element>,
}

impl Document {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            title: String::new(),
            file_name: String::new(),
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Text runs in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|element| match element {
                Element::Text { text, .. } | Element::ArcText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|text| *text == needle)
    }

    pub fn images(&self) -> impl Iterator<Item = &EmbeddedImage> {
        self.elements.iter().filter_map(|element| match element {
            Element::Image { image, .. } => Some(image),
            _ => None,
        })
    }

    /// Lowest point reached by any element, useful for trimming thermal strips.
    pub fn content_bottom(&self) -> f32 {
        self.elements
            .iter()
            .map(|element| match element {
                Element::Text { y, .. } => *y,
                Element::ArcText { cy, .. } => *cy,
                Element::Line { y1, y2, .. } => y1.max(*y2),
                Element::Circle { cy, radius, .. } => cy + radius,
                Element::Image { y, height, .. } => y + height,
            })
            .fold(0.0, f32::max)
    }
}
