//! Payment receipt generation.
//!
//! [`ReceiptBuilder::build`] awaits the optional logo, then hands everything
//! to the synchronous layout engine in [`layout`]. The resulting
//! [`Document`] can be serialized with [`to_bytes`] or shown with [`present`].

pub mod details;
pub mod format;
pub mod layout;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::currency::{CurrencyCode, FormatOptions, LocaleConfig};
use crate::domain::{Organization, Payer, Transaction};
use crate::errors::{ReceiptError, Result};
use crate::logo::{load_logo, DefaultLogoSource, LogoSource};
use crate::present::{PresentOutcome, Presenter};
use crate::render::{write_pdf, Document, EmbeddedImage, PdfOptions};

pub use details::{detail_rows, DetailRow};
pub use format::{FontScale, PageGeometry, ReceiptFormat};
pub use layout::{lay_out, ReceiptInput};

pub const DEFAULT_FOOTER_TEXT: &str = "Thank you for your generous contribution!";
pub const DEFAULT_BLESSING_TEXT: &str = "God bless you abundantly.";

/// Presentation preferences shared by every receipt.
#[derive(Debug, Clone)]
pub struct ReceiptSettings {
    /// Used when the organisation does not name its own currency.
    pub currency: CurrencyCode,
    pub locale: LocaleConfig,
    pub format_options: FormatOptions,
    pub footer_text: String,
    pub blessing_text: String,
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::default(),
            locale: LocaleConfig::default(),
            format_options: FormatOptions::default(),
            footer_text: DEFAULT_FOOTER_TEXT.into(),
            blessing_text: DEFAULT_BLESSING_TEXT.into(),
        }
    }
}

/// Wire shape of a receipt request as handed over by the UI layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceiptRequest {
    #[serde(default)]
    pub transaction: Option<Transaction>,
    #[serde(default, alias = "parish")]
    pub organization: Option<Organization>,
    #[serde(default, alias = "member")]
    pub payer: Option<Payer>,
    #[serde(default)]
    pub format: Option<String>,
}

impl ReceiptRequest {
    /// Checks that the required parts are present; `fallback_format` applies
    /// when the request names none.
    pub fn resolve(
        &self,
        fallback_format: Option<ReceiptFormat>,
    ) -> Result<(&Transaction, &Organization, Option<&Payer>, ReceiptFormat)> {
        let transaction = self
            .transaction
            .as_ref()
            .ok_or_else(|| ReceiptError::invalid("receipt request has no transaction"))?;
        let organization = self
            .organization
            .as_ref()
            .ok_or_else(|| ReceiptError::invalid("receipt request has no organization"))?;
        let format = match (&self.format, fallback_format) {
            (Some(tag), _) => tag.parse()?,
            (None, Some(format)) => format,
            (None, None) => return Err(ReceiptError::invalid("receipt request has no format")),
        };
        Ok((transaction, organization, self.payer.as_ref(), format))
    }
}

/// Builds receipt documents. Cheap to clone and safe to share across tasks;
/// every build is independent.
#[derive(Clone)]
pub struct ReceiptBuilder {
    settings: ReceiptSettings,
    logo_source: Arc<dyn LogoSource>,
}

impl Default for ReceiptBuilder {
    fn default() -> Self {
        Self::new(ReceiptSettings::default())
    }
}

impl ReceiptBuilder {
    pub fn new(settings: ReceiptSettings) -> Self {
        Self {
            settings,
            logo_source: Arc::new(DefaultLogoSource::new()),
        }
    }

    pub fn with_logo_source(mut self, source: Arc<dyn LogoSource>) -> Self {
        self.logo_source = source;
        self
    }

    pub fn settings(&self) -> &ReceiptSettings {
        &self.settings
    }

    /// Fetches the organisation logo (if any) and lays out the receipt.
    #[instrument(
        name = "build_receipt",
        skip_all,
        fields(number = %transaction.transaction_number, format = %format)
    )]
    pub async fn build(
        &self,
        transaction: &Transaction,
        organization: &Organization,
        payer: Option<&Payer>,
        format: ReceiptFormat,
    ) -> Result<Document> {
        validate(transaction, organization)?;
        let logo = match organization.logo() {
            Some(location) => load_logo(self.logo_source.as_ref(), location).await,
            None => None,
        };
        let document = self.layout(transaction, organization, payer, format, logo.as_ref())?;
        info!(
            elements = document.elements().len(),
            logo = logo.is_some(),
            "receipt laid out"
        );
        Ok(document)
    }

    /// Builds from a request, failing fast on missing parts.
    pub async fn build_request(
        &self,
        request: &ReceiptRequest,
        fallback_format: Option<ReceiptFormat>,
    ) -> Result<Document> {
        let (transaction, organization, payer, format) = request.resolve(fallback_format)?;
        self.build(transaction, organization, payer, format).await
    }

    /// Synchronous layout with an already decoded logo.
    pub fn layout(
        &self,
        transaction: &Transaction,
        organization: &Organization,
        payer: Option<&Payer>,
        format: ReceiptFormat,
        logo: Option<&EmbeddedImage>,
    ) -> Result<Document> {
        validate(transaction, organization)?;
        let input = ReceiptInput {
            transaction,
            organization,
            payer,
            format,
            logo,
        };
        let mut document = lay_out(&input, &self.settings);
        document.title = format!("Payment Receipt {}", transaction.transaction_number.trim());
        document.file_name = file_name(transaction);
        Ok(document)
    }
}

fn validate(transaction: &Transaction, organization: &Organization) -> Result<()> {
    if transaction.transaction_number.trim().is_empty() {
        return Err(ReceiptError::invalid("transaction has no reference number"));
    }
    if transaction.amount.is_sign_negative() && !transaction.amount.is_zero() {
        return Err(ReceiptError::invalid(format!(
            "transaction {} has a negative amount",
            transaction.transaction_number
        )));
    }
    if organization.parish_name.trim().is_empty() {
        return Err(ReceiptError::invalid("organization has no name"));
    }
    Ok(())
}

/// `receipt_<reference with '/' replaced by '-'>.pdf`
pub fn file_name(transaction: &Transaction) -> String {
    format!(
        "receipt_{}.pdf",
        transaction.transaction_number.trim().replace('/', "-")
    )
}

/// Serializes a receipt for download.
pub fn to_bytes(document: &Document) -> Result<Vec<u8>> {
    write_pdf(document, PdfOptions::default())
}

/// Opens the receipt on `presenter` with a print dialog requested on load.
/// Never fails for lack of a display; serialization errors still surface.
pub fn present(document: &Document, presenter: &dyn Presenter) -> Result<PresentOutcome> {
    let bytes = write_pdf(
        document,
        PdfOptions {
            print_on_open: true,
        },
    )?;
    let name = if document.file_name.is_empty() {
        "receipt.pdf"
    } else {
        document.file_name.as_str()
    };
    Ok(presenter.show(&bytes, name))
}

/// One-shot convenience using default settings and logo source.
pub async fn build_receipt(
    transaction: &Transaction,
    organization: &Organization,
    payer: Option<&Payer>,
    format: ReceiptFormat,
) -> Result<Document> {
    ReceiptBuilder::default()
        .build(transaction, organization, payer, format)
        .await
}
