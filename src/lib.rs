#![doc(test(attr(deny(warnings))))]

//! Parish Receipts lays out and renders payment receipts for parish
//! contributions: a full-page A4 receipt with an official seal, or a narrow
//! slip for 80 mm and 58 mm thermal printers.
//!
//! ```no_run
//! # #[allow(dead_code)]
//! # async fn demo() -> parish_receipts::errors::Result<()> {
//! use chrono::NaiveDate;
//! use parish_receipts::{
//!     build_receipt, to_bytes, Organization, PaymentMethod, ReceiptFormat, Transaction,
//!     TransactionCategory,
//! };
//! use rust_decimal::Decimal;
//!
//! let transaction = Transaction::new(
//!     "OR-2026-00045",
//!     TransactionCategory::Tithe,
//!     Decimal::new(1234550, 2),
//!     PaymentMethod::Cash,
//!     NaiveDate::from_ymd_opt(2026, 3, 5).unwrap_or_default(),
//! );
//! let parish = Organization::new("St. Joseph Parish");
//! let document = build_receipt(&transaction, &parish, None, ReceiptFormat::FullPage).await?;
//! let _pdf = to_bytes(&document)?;
//! # Ok(())
//! # }
//! # fn main() {}
//! ```

pub mod cli;
pub mod config;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod logo;
pub mod present;
pub mod receipt;
pub mod render;
pub mod utils;

pub use domain::{Organization, Payer, PaymentMethod, Transaction, TransactionCategory};
pub use errors::{ReceiptError, Result};
pub use receipt::{
    build_receipt, file_name, present, to_bytes, ReceiptBuilder, ReceiptFormat, ReceiptRequest,
    ReceiptSettings,
};
pub use render::Document;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Parish receipts tracing initialized.");
    });
}
