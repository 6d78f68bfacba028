//! Serializes a laid-out [`Document`] into PDF bytes.
//!
//! Output is a pure function of the document: no creation dates, no random
//! document identifiers, object numbers assigned in drawing order.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

use crate::errors::{ReceiptError, Result};
use crate::render::document::{Document, Element, EmbeddedImage, Rgb};
use crate::render::metrics::{self, encode_win_ansi, FontFace, MM_PER_PT};

/// Bezier control-point factor approximating a quarter circle.
const KAPPA: f32 = 0.552_284_8;

const PRINT_SCRIPT: &[u8] = b"this.print({bUI: true, bSilent: false, bShrinkToFit: true});";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PdfOptions {
    /// Adds an open action asking the viewer to show its print dialog.
    pub print_on_open: bool,
}

pub fn write_pdf(doc: &Document, options: PdfOptions) -> Result<Vec<u8>> {
    if !(doc.width > 0.0 && doc.height > 0.0) {
        return Err(ReceiptError::Render(format!(
            "page size {}x{} mm is not drawable",
            doc.width, doc.height
        )));
    }

    let catalog_id = Ref::new(1);
    let tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let content_id = Ref::new(4);
    let font_ids: Vec<(FontFace, Ref)> = FontFace::ALL
        .iter()
        .enumerate()
        .map(|(idx, face)| (*face, Ref::new(5 + idx as i32)))
        .collect();
    let images: Vec<&EmbeddedImage> = doc.images().collect();
    let image_ids: Vec<Ref> = (0..images.len())
        .map(|idx| Ref::new(5 + FontFace::ALL.len() as i32 + idx as i32))
        .collect();
    let image_names: Vec<String> = (1..=images.len()).map(|n| format!("Im{n}")).collect();

    let mut pdf = Pdf::new();
    {
        let mut catalog = pdf.catalog(catalog_id);
        catalog.pages(tree_id);
        if options.print_on_open {
            catalog
                .insert(Name(b"OpenAction"))
                .dict()
                .pair(Name(b"S"), Name(b"JavaScript"))
                .pair(Name(b"JS"), Str(PRINT_SCRIPT));
        }
    }
    pdf.pages(tree_id).kids([page_id]).count(1);

    {
        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, to_pt(doc.width), to_pt(doc.height)));
        page.parent(tree_id);
        page.contents(content_id);
        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            for (face, id) in &font_ids {
                fonts.pair(Name(font_resource(*face)), *id);
            }
        }
        if !images.is_empty() {
            let mut x_objects = resources.x_objects();
            for (name, id) in image_names.iter().zip(&image_ids) {
                x_objects.pair(Name(name.as_bytes()), *id);
            }
        }
    }

    for (face, id) in &font_ids {
        pdf.type1_font(*id)
            .base_font(Name(face.base_font().as_bytes()))
            .pair(Name(b"Encoding"), Name(b"WinAnsiEncoding"));
    }

    for (image, id) in images.iter().zip(&image_ids) {
        let expected = image.pixel_width as usize * image.pixel_height as usize * 3;
        if image.rgb.len() != expected {
            return Err(ReceiptError::Render(format!(
                "image buffer holds {} bytes, expected {expected}",
                image.rgb.len()
            )));
        }
        let mut xobject = pdf.image_xobject(*id, &image.rgb);
        xobject.width(image.pixel_width as i32);
        xobject.height(image.pixel_height as i32);
        xobject.color_space().device_rgb();
        xobject.bits_per_component(8);
    }

    let stream = content_stream(doc, &image_names);
    pdf.stream(content_id, &stream);
    Ok(pdf.finish())
}

fn content_stream(doc: &Document, image_names: &[String]) -> Vec<u8> {
    let mut content = Content::new();
    let mut next_image = image_names.iter();
    for element in doc.elements() {
        match element {
            Element::Text {
                text,
                x,
                y,
                face,
                size,
                color,
            } => {
                set_fill(&mut content, *color);
                content.begin_text();
                content.set_font(Name(font_resource(*face)), *size);
                content.next_line(to_pt(*x), to_pt(doc.height - y));
                content.show(Str(&encode_win_ansi(text)));
                content.end_text();
            }
            Element::ArcText {
                text,
                cx,
                cy,
                radius,
                face,
                size,
                color,
            } => {
                set_fill(&mut content, *color);
                content.begin_text();
                content.set_font(Name(font_resource(*face)), *size);
                let total = metrics::text_width(text, *face, *size);
                let mut offset = 0.0;
                for code in encode_win_ansi(text) {
                    let glyph = face.glyph_width(code) as f32 / 1000.0 * size * MM_PER_PT;
                    let theta = (offset - total / 2.0) / radius;
                    let tilt = theta + glyph / (2.0 * radius);
                    let gx = cx + radius * theta.sin();
                    let gy = cy - radius * theta.cos();
                    let (sin, cos) = tilt.sin_cos();
                    content.set_text_matrix([
                        cos,
                        -sin,
                        sin,
                        cos,
                        to_pt(gx),
                        to_pt(doc.height - gy),
                    ]);
                    content.show(Str(&[code]));
                    offset += glyph;
                }
                content.end_text();
            }
            Element::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                set_stroke(&mut content, *color, *width);
                content.move_to(to_pt(*x1), to_pt(doc.height - y1));
                content.line_to(to_pt(*x2), to_pt(doc.height - y2));
                content.stroke();
            }
            Element::Circle {
                cx,
                cy,
                radius,
                width,
                color,
            } => {
                set_stroke(&mut content, *color, *width);
                let (x, y, r) = (to_pt(*cx), to_pt(doc.height - cy), to_pt(*radius));
                let k = KAPPA * r;
                content.move_to(x + r, y);
                content.cubic_to(x + r, y + k, x + k, y + r, x, y + r);
                content.cubic_to(x - k, y + r, x - r, y + k, x - r, y);
                content.cubic_to(x - r, y - k, x - k, y - r, x, y - r);
                content.cubic_to(x + k, y - r, x + r, y - k, x + r, y);
                content.close_path();
                content.stroke();
            }
            Element::Image {
                x,
                y,
                width,
                height,
                ..
            } => {
                if let Some(name) = next_image.next() {
                    content.save_state();
                    content.transform([
                        to_pt(*width),
                        0.0,
                        0.0,
                        to_pt(*height),
                        to_pt(*x),
                        to_pt(doc.height - y - height),
                    ]);
                    content.x_object(Name(name.as_bytes()));
                    content.restore_state();
                }
            }
        }
    }
    content.finish().to_vec()
}

fn set_fill(content: &mut Content, color: Rgb) {
    let (r, g, b) = color.components();
    content.set_fill_rgb(r, g, b);
}

fn set_stroke(content: &mut Content, color: Rgb, width: f32) {
    let (r, g, b) = color.components();
    content.set_stroke_rgb(r, g, b);
    content.set_line_width(to_pt(width));
}

fn font_resource(face: FontFace) -> &'static [u8] {
    match face {
        FontFace::Regular => b"F1",
        FontFace::Bold => b"F2",
        FontFace::Italic => b"F3",
    }
}

fn to_pt(mm: f32) -> f32 {
    mm / MM_PER_PT
}
