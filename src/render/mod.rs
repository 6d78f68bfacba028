//! Page model, text metrics and PDF output.

pub mod canvas;
pub mod document;
pub mod metrics;
pub mod pdf;

pub use canvas::Canvas;
pub use document::{Document, Element, EmbeddedImage, Rgb};
pub use metrics::FontFace;
pub use pdf::{write_pdf, PdfOptions};
