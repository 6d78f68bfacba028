mod common;

use std::{
    io::Cursor,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use common::{
    full_parish, full_transaction, minimal_parish, minimal_transaction, payer, PARISH_NAME,
};
use image::{ImageFormat, Rgba, RgbaImage};
use insta::assert_snapshot;
use parish_receipts::{
    logo::{LogoSource, NoLogoSource},
    present::{PresentOutcome, Presenter},
    receipt::{
        details::{DESCRIPTION, LABELS, REFERENCE},
        layout::{
            AMOUNT_LABEL, RECEIPT_TITLE, RECEIVED_BY_CAPTION, THERMAL_DATE_LINE,
            THERMAL_SIGNATURE_LINE,
        },
        ReceiptRequest, ReceiptSettings,
    },
    render::{metrics, Element, FontFace},
    to_bytes, Document, ReceiptBuilder, ReceiptFormat,
};
use rust_decimal::Decimal;

struct StaticLogo(Vec<u8>);

#[async_trait]
impl LogoSource for StaticLogo {
    async fn fetch(&self, _location: &str) -> Option<Vec<u8>> {
        Some(self.0.clone())
    }
}

#[derive(Default)]
struct RecordingPresenter {
    shown: Mutex<Vec<(String, Vec<u8>)>>,
}

impl Presenter for RecordingPresenter {
    fn show(&self, pdf: &[u8], file_name: &str) -> PresentOutcome {
        self.shown
            .lock()
            .unwrap()
            .push((file_name.to_string(), pdf.to_vec()));
        PresentOutcome::Skipped("recorded".into())
    }
}

fn png_logo() -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    RgbaImage::from_pixel(40, 20, Rgba([120, 20, 20, 255]))
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn offline_builder() -> ReceiptBuilder {
    ReceiptBuilder::default().with_logo_source(Arc::new(NoLogoSource))
}

fn text_origin(document: &Document, needle: &str) -> (f32, f32) {
    document
        .elements()
        .iter()
        .find_map(|element| match element {
            Element::Text { text, x, y, .. } if text == needle => Some((*x, *y)),
            _ => None,
        })
        .unwrap_or_else(|| panic!("`{needle}` missing from {:?}", document.texts()))
}

/// Text runs drawn after `label` and before the next detail label or the amount.
fn value_lines_after<'a>(document: &'a Document, label: &str) -> Vec<&'a Element> {
    document
        .elements()
        .iter()
        .filter(|element| matches!(element, Element::Text { .. }))
        .skip_while(|element| !matches!(element, Element::Text { text, .. } if text == label))
        .skip(1)
        .take_while(|element| match element {
            Element::Text { text, .. } => {
                !LABELS.contains(&text.as_str()) && text != AMOUNT_LABEL
            }
            _ => false,
        })
        .collect()
}

fn position(texts: &[&str], needle: &str) -> usize {
    texts
        .iter()
        .position(|text| *text == needle)
        .unwrap_or_else(|| panic!("`{needle}` missing from {texts:?}"))
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

async fn full_receipt(format: ReceiptFormat) -> Document {
    let payer = payer();
    offline_builder()
        .build(&full_transaction(), &full_parish(), Some(&payer), format)
        .await
        .unwrap()
}

#[tokio::test]
async fn sections_keep_their_order_in_every_format() {
    for format in ReceiptFormat::ALL {
        let document = full_receipt(format).await;
        let texts = document.texts();
        let signature = if format.is_thermal() {
            THERMAL_SIGNATURE_LINE
        } else {
            RECEIVED_BY_CAPTION
        };

        let name = PARISH_NAME.to_uppercase();
        let mut expected = vec![name.as_str(), RECEIPT_TITLE];
        expected.extend(LABELS);
        expected.push(AMOUNT_LABEL);
        expected.push(signature);

        let positions: Vec<usize> = expected.iter().map(|text| position(&texts, text)).collect();
        assert!(
            positions.windows(2).all(|pair| pair[0] < pair[1]),
            "{format}: out of order {positions:?} in {texts:?}"
        );
    }
}

#[tokio::test]
async fn absent_optional_fields_leave_no_trace() {
    for format in ReceiptFormat::ALL {
        let document = offline_builder()
            .build(&minimal_transaction(), &minimal_parish(), None, format)
            .await
            .unwrap();
        for label in ["Received From", "Member/Payer Code", "Reference", "Description"] {
            assert!(!document.contains_text(label), "{format}: found {label}");
        }
        assert!(!document.texts().iter().any(|text| text.starts_with("Tel:")));
        assert_eq!(document.images().count(), 0);
    }
}

#[tokio::test]
async fn contact_lines_are_printed_when_present() {
    let document = full_receipt(ReceiptFormat::FullPage).await;
    assert!(document.contains_text("P.O. Box 12, Moshi"));
    assert!(document.contains_text("Tel: +255 700 000 000"));
    assert!(document.contains_text("office@stjude.example"));
    assert!(document.contains_text("Grace Mushi"));
    assert!(document.contains_text("M-0042"));
    assert!(document.contains_text("Mass Offering"));
    assert!(document.contains_text("Mpesa"));
}

#[tokio::test]
async fn thermal_transcript() {
    let document = offline_builder()
        .build(
            &minimal_transaction(),
            &minimal_parish(),
            None,
            ReceiptFormat::ThermalWide,
        )
        .await
        .unwrap();
    assert_snapshot!(document.texts().join("\n"), @r"
    ST. JUDE PARISH
    PAYMENT RECEIPT
    Receipt No.
    OR-2026-00045
    Date
    05 Mar 2026
    Category
    Tithe
    Payment Method
    Cash
    AMOUNT PAID:
    TZS 12,345.50
    Thank you for your generous contribution!
    God bless you abundantly.
    ST. JUDE PARISH
    RECEIPT
    Signature: _______________
    Date: _______________
    ");
}

#[tokio::test]
async fn full_page_carries_the_official_seal() {
    let document = full_receipt(ReceiptFormat::FullPage).await;
    let arcs: Vec<&Element> = document
        .elements()
        .iter()
        .filter(|element| matches!(element, Element::ArcText { .. }))
        .collect();
    assert_eq!(arcs.len(), 1);
    assert!(document.contains_text("OFFICIAL"));
    assert!(document.contains_text("Authorized By (Name & Signature)"));
    assert!(document.contains_text("Money Receiver (Signature)"));
}

#[tokio::test]
async fn identical_inputs_give_identical_bytes() {
    let first = to_bytes(&full_receipt(ReceiptFormat::FullPage).await).unwrap();
    let second = to_bytes(&full_receipt(ReceiptFormat::FullPage).await).unwrap();
    assert!(first.starts_with(b"%PDF-"));
    assert_eq!(first, second);
}

#[tokio::test]
async fn inputs_are_left_untouched() {
    let transaction = full_transaction();
    let parish = full_parish();
    let payer = payer();
    let (before_tx, before_org, before_payer) =
        (transaction.clone(), parish.clone(), payer.clone());
    offline_builder()
        .build(&transaction, &parish, Some(&payer), ReceiptFormat::ThermalNarrow)
        .await
        .unwrap();
    assert_eq!(transaction, before_tx);
    assert_eq!(parish, before_org);
    assert_eq!(payer, before_payer);
}

#[tokio::test]
async fn amounts_follow_the_organisation_currency() {
    let mut transaction = minimal_transaction();
    transaction.amount = Decimal::new(25_000, 0);
    let parish = minimal_parish().with_currency("ugx");
    let document = offline_builder()
        .build(&transaction, &parish, None, ReceiptFormat::FullPage)
        .await
        .unwrap();
    assert!(document.contains_text("UGX 25,000"));

    let document = offline_builder()
        .build(
            &minimal_transaction(),
            &minimal_parish(),
            None,
            ReceiptFormat::FullPage,
        )
        .await
        .unwrap();
    assert!(document.contains_text("TZS 12,345.50"));
}

#[tokio::test]
async fn narrow_slips_keep_text_inside_the_paper() {
    let transaction = full_transaction().with_description(
        "Contribution towards the renovation of the outstation chapel roof and new benches",
    );
    let payer = payer();
    let document = offline_builder()
        .build(
            &transaction,
            &full_parish(),
            Some(&payer),
            ReceiptFormat::ThermalNarrow,
        )
        .await
        .unwrap();

    for element in document.elements() {
        if let Element::Text {
            text, x, face, size, ..
        } = element
        {
            let right = x + metrics::text_width(text, *face, *size);
            assert!(*x >= -0.01, "`{text}` starts at {x}");
            assert!(right <= document.width + 0.01, "`{text}` ends at {right}");
        }
    }
    assert!(document.content_bottom() <= document.height);
    let wrapped: Vec<&str> = document
        .texts()
        .into_iter()
        .skip_while(|text| !text.starts_with("Contribution"))
        .take_while(|text| *text != AMOUNT_LABEL)
        .collect();
    assert!(wrapped.len() > 1, "description should wrap: {wrapped:?}");

    let (label_x, label_y) = text_origin(&document, DESCRIPTION);
    let indent = label_x + 2.0;
    let mut previous_y = label_y;
    for element in value_lines_after(&document, DESCRIPTION) {
        let Element::Text { text, x, y, .. } = element else {
            continue;
        };
        assert!((x - indent).abs() < 0.01, "`{text}` indented to {x}");
        assert!(*y > previous_y, "`{text}` at {y} is not below {previous_y}");
        previous_y = *y;
    }
}

#[tokio::test]
async fn values_too_wide_for_their_label_drop_to_one_indented_line() {
    let reference = "4402026030512345678901234";
    let transaction = minimal_transaction().with_reference(reference);
    let geometry = ReceiptFormat::ThermalNarrow.geometry();
    let body = geometry.fonts.body;
    let label_width = metrics::text_width(&format!("{REFERENCE} "), FontFace::Bold, body);
    let value_width = metrics::text_width(reference, FontFace::Regular, body);
    assert!(value_width > geometry.content_width() - label_width);
    assert!(value_width <= geometry.content_width() - 2.0);

    let document = offline_builder()
        .build(&transaction, &minimal_parish(), None, ReceiptFormat::ThermalNarrow)
        .await
        .unwrap();

    let (label_x, label_y) = text_origin(&document, REFERENCE);
    let lines = value_lines_after(&document, REFERENCE);
    assert_eq!(lines.len(), 1, "{lines:?}");
    let Element::Text { text, x, y, .. } = lines[0] else {
        panic!("expected a text run, got {:?}", lines[0]);
    };
    assert_eq!(text, reference);
    assert!((x - (label_x + 2.0)).abs() < 0.01, "value at x={x}");
    assert!(*y > label_y, "value at y={y}, label at {label_y}");
}

#[tokio::test]
async fn long_descriptions_stretch_the_thermal_strip() {
    let description = "Contribution towards the outstation chapel roof. ".repeat(25);
    let transaction = full_transaction().with_description(description.trim());
    let payer = payer();
    for format in [ReceiptFormat::ThermalWide, ReceiptFormat::ThermalNarrow] {
        let document = offline_builder()
            .build(&transaction, &full_parish(), Some(&payer), format)
            .await
            .unwrap();
        assert!(document.height > format.geometry().height, "{format}");
        assert!(
            document.content_bottom() <= document.height,
            "{format}: content ends at {} on a {} mm strip",
            document.content_bottom(),
            document.height
        );
        for caption in [THERMAL_SIGNATURE_LINE, THERMAL_DATE_LINE] {
            let (_, y) = text_origin(&document, caption);
            assert!(y < document.height, "{format}: `{caption}` at {y}");
        }
    }

    let short = offline_builder()
        .build(&minimal_transaction(), &minimal_parish(), None, ReceiptFormat::ThermalNarrow)
        .await
        .unwrap();
    assert_eq!(short.height, ReceiptFormat::ThermalNarrow.geometry().height);
}

#[tokio::test]
async fn logo_is_embedded_when_it_decodes() {
    let mut parish = minimal_parish();
    parish.logo_url = Some("https://parish.example/logo.png".into());
    for format in ReceiptFormat::ALL {
        let document = ReceiptBuilder::default()
            .with_logo_source(Arc::new(StaticLogo(png_logo())))
            .build(&minimal_transaction(), &parish, None, format)
            .await
            .unwrap();
        let logo = document.images().next().expect("logo embedded");
        assert_eq!((logo.pixel_width, logo.pixel_height), (40, 20));
    }
}

#[tokio::test]
async fn logo_failures_still_produce_a_receipt() {
    let mut parish = minimal_parish();
    parish.logo_url = Some("http://127.0.0.1:9/logo.png".into());
    let document = ReceiptBuilder::default()
        .build(&minimal_transaction(), &parish, None, ReceiptFormat::FullPage)
        .await
        .unwrap();
    assert_eq!(document.images().count(), 0);
    assert!(document.contains_text(RECEIPT_TITLE));

    let document = ReceiptBuilder::default()
        .with_logo_source(Arc::new(StaticLogo(b"<html>not found</html>".to_vec())))
        .build(&minimal_transaction(), &parish, None, ReceiptFormat::ThermalWide)
        .await
        .unwrap();
    assert_eq!(document.images().count(), 0);
}

#[tokio::test]
async fn invalid_inputs_are_rejected() {
    let builder = offline_builder();
    let mut transaction = minimal_transaction();
    transaction.transaction_number = "  ".into();
    let err = builder
        .build(&transaction, &minimal_parish(), None, ReceiptFormat::FullPage)
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());

    let err = builder
        .build(
            &minimal_transaction(),
            &parish_receipts::Organization::new(""),
            None,
            ReceiptFormat::FullPage,
        )
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());

    let request = ReceiptRequest {
        transaction: Some(minimal_transaction()),
        ..ReceiptRequest::default()
    };
    let err = builder.build_request(&request, None).await.unwrap_err();
    assert!(err.is_invalid_argument());

    let request = ReceiptRequest {
        transaction: Some(minimal_transaction()),
        organization: Some(minimal_parish()),
        payer: None,
        format: Some("letter".into()),
    };
    let err = builder.build_request(&request, None).await.unwrap_err();
    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn requests_decode_from_backend_json() {
    let request: ReceiptRequest = serde_json::from_str(common::REQUEST_JSON).unwrap();
    let document = offline_builder().build_request(&request, None).await.unwrap();
    assert_eq!(document.width, 72.0);
    assert_eq!(document.file_name, "receipt_OR-2026-00045.pdf");
    assert!(document.contains_text("Grace Mushi"));
}

#[tokio::test]
async fn present_requests_printing_but_download_does_not() {
    let document = full_receipt(ReceiptFormat::ThermalWide).await;
    let presenter = RecordingPresenter::default();
    let outcome = parish_receipts::present(&document, &presenter).unwrap();
    assert!(!outcome.was_opened());

    let shown = presenter.shown.lock().unwrap();
    let (name, pdf) = &shown[0];
    assert_eq!(name, "receipt_OR-2026-00045.pdf");
    assert!(contains_bytes(pdf, b"/OpenAction"));
    assert!(!contains_bytes(&to_bytes(&document).unwrap(), b"/OpenAction"));
}

#[test]
fn custom_footer_texts_replace_the_defaults() {
    let settings = ReceiptSettings {
        footer_text: "Asante kwa mchango wako".into(),
        blessing_text: String::new(),
        ..ReceiptSettings::default()
    };
    let document = ReceiptBuilder::new(settings)
        .layout(
            &minimal_transaction(),
            &minimal_parish(),
            None,
            ReceiptFormat::ThermalWide,
            None,
        )
        .unwrap();
    assert!(document.contains_text("Asante kwa mchango wako"));
    assert!(!document.contains_text("God bless you abundantly."));
}
