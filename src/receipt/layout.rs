//! Coordinate layout of a receipt onto a [`Canvas`].
//!
//! The engine walks a vertical cursor down the page, section by section. All
//! spacing is derived from the active [`PageGeometry`], so the three formats
//! share one code path and differ only where the row, amount and signature
//! treatments genuinely diverge.

use tracing::debug;

use crate::currency::{format_currency_value, format_date};
use crate::domain::{Organization, Payer, Transaction};
use crate::receipt::details::{detail_rows, DetailRow};
use crate::receipt::format::{PageGeometry, ReceiptFormat};
use crate::receipt::ReceiptSettings;
use crate::render::metrics::{self, FontFace};
use crate::render::{Canvas, Document, EmbeddedImage, Rgb};

pub const RECEIPT_TITLE: &str = "PAYMENT RECEIPT";
pub const AMOUNT_LABEL: &str = "AMOUNT PAID:";
pub const RECEIVED_BY_CAPTION: &str = "Received By (Name & Signature)";
pub const AUTHORIZED_BY_CAPTION: &str = "Authorized By (Name & Signature)";
pub const DATE_CAPTION: &str = "Date";
pub const RECEIVER_CAPTION: &str = "Money Receiver (Signature)";
pub const THERMAL_SIGNATURE_LINE: &str = "Signature: _______________";
pub const THERMAL_DATE_LINE: &str = "Date: _______________";
pub const SEAL_OFFICIAL: &str = "OFFICIAL";
pub const SEAL_RECEIPT: &str = "RECEIPT";

const SEAL_BLUE: Rgb = Rgb(0, 80, 160);
const RULE_WIDTH: f32 = 0.3;
const VALUE_COLUMN: f32 = 45.0;
const WRAP_INDENT: f32 = 2.0;
const SIGNATURE_LINE_LENGTH: f32 = 55.0;
const THERMAL_SEAL_NAME_CHARS: usize = 20;

/// Everything the engine needs for one receipt.
pub struct ReceiptInput<'a> {
    pub transaction: &'a Transaction,
    pub organization: &'a Organization,
    pub payer: Option<&'a Payer>,
    pub format: ReceiptFormat,
    pub logo: Option<&'a EmbeddedImage>,
}

/// Lays out a full receipt. Pure: identical inputs give identical documents.
pub fn lay_out(input: &ReceiptInput<'_>, settings: &ReceiptSettings) -> Document {
    let geometry = input.format.geometry();
    let mut layout = Layout {
        canvas: Canvas::new(geometry.width, geometry.height),
        geometry,
        format: input.format,
        y: geometry.top_offset,
    };

    if let Some(logo) = input.logo {
        layout.logo(logo);
    }
    layout.header(input.organization);
    layout.title();
    let rows = detail_rows(input.transaction, input.payer, &settings.locale);
    layout.details(&rows);
    layout.amount(input, settings);
    layout.footer(settings);
    layout.signature(input, settings);

    let mut document = layout.canvas.finish();
    if input.format.is_thermal() {
        // a roll has no fixed length; grow the strip to fit the signature block
        let needed = document.content_bottom() + geometry.margin_x;
        document.height = document.height.max(needed);
    }
    document
}

struct Layout {
    canvas: Canvas,
    geometry: PageGeometry,
    format: ReceiptFormat,
    y: f32,
}

impl Layout {
    fn logo(&mut self, logo: &EmbeddedImage) {
        if logo.pixel_width == 0 || logo.pixel_height == 0 {
            return;
        }
        let size = self.geometry.logo_size;
        let aspect = logo.pixel_width as f32 / logo.pixel_height as f32;
        let (width, height) = if aspect >= 1.0 {
            (size, size / aspect)
        } else {
            (size * aspect, size)
        };
        let x = (self.geometry.width - width) / 2.0;
        self.canvas.image(logo, x, self.y, width, height);
        self.y += height + 2.0;
    }

    fn header(&mut self, organization: &Organization) {
        let fonts = self.geometry.fonts;
        self.canvas.set_font(FontFace::Bold, fonts.title);
        let name = organization.parish_name.trim().to_uppercase();
        self.centered_block(&name, fonts.title * 0.5);

        self.canvas.set_font(FontFace::Regular, fonts.small);
        let phone = organization.phone().map(|phone| format!("Tel: {phone}"));
        let contact_lines = [
            organization.address().map(str::to_string),
            phone,
            organization.email().map(str::to_string),
        ];
        for line in contact_lines.into_iter().flatten() {
            self.centered_block(&line, fonts.small * 0.45);
        }
        self.y += 2.0;
    }

    fn title(&mut self) {
        let subtitle = self.geometry.fonts.subtitle;
        self.canvas.set_font(FontFace::Bold, subtitle);
        self.canvas.text_centered(RECEIPT_TITLE, self.y);
        self.y += subtitle * 0.5;
        self.divider();
        self.y += 3.0;
    }

    fn details(&mut self, rows: &[DetailRow]) {
        let body = self.geometry.fonts.body;
        let line_height = self.line_height();
        let margin = self.geometry.margin_x;
        for row in rows {
            self.canvas.set_font(FontFace::Bold, body);
            self.canvas.text(row.label, margin, self.y);
            let label_width = self.canvas.text_width(&format!("{} ", row.label));
            self.canvas.set_font(FontFace::Regular, body);

            if self.format.is_thermal() {
                let available = self.geometry.content_width() - label_width;
                if self.canvas.text_width(&row.value) <= available {
                    self.canvas
                        .text_right(&row.value, self.geometry.right_edge(), self.y);
                } else {
                    debug!(label = row.label, "wrapping detail value below its label");
                    let indent = margin + WRAP_INDENT;
                    let width = self.geometry.content_width() - WRAP_INDENT;
                    for line in metrics::wrap_text(&row.value, FontFace::Regular, body, width) {
                        self.y += line_height;
                        self.canvas.text(&line, indent, self.y);
                    }
                }
            } else {
                let column = margin + VALUE_COLUMN;
                let width = self.geometry.right_edge() - column;
                let lines = metrics::wrap_text(&row.value, FontFace::Regular, body, width);
                for (idx, line) in lines.iter().enumerate() {
                    if idx > 0 {
                        self.y += line_height;
                    }
                    self.canvas.text(line, column, self.y);
                }
            }
            self.y += line_height;
        }
        self.y += 2.0;
        self.divider();
        self.y += 3.0;
    }

    fn amount(&mut self, input: &ReceiptInput<'_>, settings: &ReceiptSettings) {
        let currency = input
            .organization
            .currency
            .as_ref()
            .unwrap_or(&settings.currency);
        let value = format_currency_value(
            input.transaction.amount,
            currency,
            &settings.locale,
            &settings.format_options,
        );
        let size = self.geometry.amount_size;
        let line_height = self.line_height();
        self.canvas.set_font(FontFace::Bold, size);

        if self.format.is_thermal() {
            self.canvas.text_centered(AMOUNT_LABEL, self.y);
            self.y += line_height + 1.0;
            let fitted = fit_size(&value, FontFace::Bold, size, self.geometry.content_width());
            self.canvas.set_font_size(fitted);
            self.canvas.text_centered(&value, self.y);
        } else {
            self.canvas
                .text(AMOUNT_LABEL, self.geometry.margin_x, self.y);
            self.canvas
                .text_right(&value, self.geometry.right_edge(), self.y);
        }
        self.y += line_height + 2.0;
        self.divider();
        self.y += 4.0;
    }

    fn footer(&mut self, settings: &ReceiptSettings) {
        let small = self.geometry.fonts.small;
        self.canvas.set_font(FontFace::Italic, small);
        for line in [&settings.footer_text, &settings.blessing_text] {
            let line = line.trim();
            if !line.is_empty() {
                self.centered_block(line, small * 0.5);
            }
        }
        self.y += 3.0;
    }

    fn signature(&mut self, input: &ReceiptInput<'_>, settings: &ReceiptSettings) {
        let seal_date = format_date(&settings.locale, input.transaction.transaction_date);
        if self.format.is_thermal() {
            self.thermal_signature(input.organization);
        } else {
            self.full_page_signature(input.organization, &seal_date);
        }
    }

    fn full_page_signature(&mut self, organization: &Organization, seal_date: &str) {
        self.y += 8.0;
        let radius = self.geometry.seal_radius;
        let cx = self.geometry.width / 2.0;
        let cy = self.y + 18.0;

        self.canvas.set_draw_color(SEAL_BLUE);
        self.canvas.set_line_width(0.8);
        self.canvas.circle(cx, cy, radius);
        self.canvas.set_line_width(0.4);
        self.canvas.circle(cx, cy, radius - 3.0);

        self.canvas.set_text_color(SEAL_BLUE);
        let name = organization.parish_name.trim().to_uppercase();
        let arc_radius = radius - 5.5;
        // keep the arc within roughly 160 degrees
        let max_arc = arc_radius * 2.8;
        self.canvas
            .set_font(FontFace::Bold, fit_size(&name, FontFace::Bold, 5.5, max_arc));
        self.canvas.arc_text(&name, cx, cy, arc_radius);
        self.canvas.set_font(FontFace::Bold, 7.0);
        self.canvas.text_centered_at(SEAL_OFFICIAL, cx, cy + 1.0);
        self.canvas.set_font_size(5.0);
        self.canvas.text_centered_at(SEAL_RECEIPT, cx, cy + 5.0);
        self.canvas.set_font(FontFace::Regular, 4.5);
        self.canvas.text_centered_at(seal_date, cx, cy + 10.0);

        self.canvas.set_text_color(Rgb::BLACK);
        self.canvas.set_draw_color(Rgb::BLACK);
        self.canvas.set_line_width(RULE_WIDTH);
        self.y = cy + radius + 8.0;

        let small = self.geometry.fonts.small;
        self.canvas.set_font(FontFace::Regular, small);
        let left = self.geometry.margin_x;
        let right = self.geometry.width / 2.0 + 10.0;
        for (left_caption, right_caption) in [
            (RECEIVED_BY_CAPTION, AUTHORIZED_BY_CAPTION),
            (DATE_CAPTION, RECEIVER_CAPTION),
        ] {
            let y = self.y;
            self.canvas.line(left, y, left + SIGNATURE_LINE_LENGTH, y);
            self.canvas.text(left_caption, left, y + 4.0);
            self.canvas.line(right, y, right + SIGNATURE_LINE_LENGTH, y);
            self.canvas.text(right_caption, right, y + 4.0);
            self.y += 12.0;
        }
    }

    fn thermal_signature(&mut self, organization: &Organization) {
        self.y += 3.0;
        let radius = self.geometry.seal_radius;
        let cx = self.geometry.width / 2.0;
        let cy = self.y + radius;

        self.canvas.set_draw_color(SEAL_BLUE);
        self.canvas.set_line_width(0.4);
        self.canvas.circle(cx, cy, radius);

        self.canvas.set_text_color(SEAL_BLUE);
        let upper = organization.parish_name.trim().to_uppercase();
        let abbreviated: String = upper.chars().take(THERMAL_SEAL_NAME_CHARS).collect();
        let abbreviated = abbreviated.trim_end();
        let inner_width = radius * 1.7;
        self.canvas.set_font(
            FontFace::Bold,
            fit_size(abbreviated, FontFace::Bold, 4.0, inner_width),
        );
        self.canvas.text_centered_at(abbreviated, cx, cy - 3.0);
        self.canvas.set_font(FontFace::Bold, 5.0);
        self.canvas.text_centered_at(SEAL_RECEIPT, cx, cy + 2.0);

        self.canvas.set_text_color(Rgb::BLACK);
        self.canvas.set_draw_color(Rgb::BLACK);
        self.canvas.set_line_width(RULE_WIDTH);
        self.y += radius * 2.0 + 4.0;

        let small = self.geometry.fonts.small;
        let margin = self.geometry.margin_x;
        self.canvas.set_font(FontFace::Regular, small);
        self.canvas
            .line(margin, self.y, self.geometry.right_edge(), self.y);
        self.y += 3.0;
        self.canvas.text(THERMAL_SIGNATURE_LINE, margin, self.y);
        self.y += small * 0.5 + 1.0;
        self.canvas.text(THERMAL_DATE_LINE, margin, self.y);
    }

    fn divider(&mut self) {
        self.canvas.set_draw_color(Rgb::BLACK);
        self.canvas.set_line_width(RULE_WIDTH);
        self.canvas.line(
            self.geometry.margin_x,
            self.y,
            self.geometry.right_edge(),
            self.y,
        );
    }

    /// Centred text in the current font, wrapped to the content width.
    fn centered_block(&mut self, text: &str, step: f32) {
        let size = self.canvas.font_size();
        let face = self.canvas.face();
        for line in metrics::wrap_text(text, face, size, self.geometry.content_width()) {
            self.canvas.text_centered(&line, self.y);
            self.y += step;
        }
    }

    fn line_height(&self) -> f32 {
        self.geometry.fonts.body * 0.5
    }
}

/// Largest size not above `preferred` at which `text` fits in `max_width`.
fn fit_size(text: &str, face: FontFace, preferred: f32, max_width: f32) -> f32 {
    let width = metrics::text_width(text, face, preferred);
    if width <= max_width || width <= f32::EPSILON {
        preferred
    } else {
        preferred * max_width / width
    }
}
