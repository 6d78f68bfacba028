//! Labelled rows printed between the title and the amount.

use crate::currency::{format_date, LocaleConfig};
use crate::domain::common::present_text;
use crate::domain::{Displayable, Payer, Transaction};

pub const RECEIPT_NO: &str = "Receipt No.";
pub const DATE: &str = "Date";
pub const CATEGORY: &str = "Category";
pub const PAYMENT_METHOD: &str = "Payment Method";
pub const RECEIVED_FROM: &str = "Received From";
pub const PAYER_CODE: &str = "Member/Payer Code";
pub const REFERENCE: &str = "Reference";
pub const DESCRIPTION: &str = "Description";

/// Every label in print order.
pub const LABELS: [&str; 8] = [
    RECEIPT_NO,
    DATE,
    CATEGORY,
    PAYMENT_METHOD,
    RECEIVED_FROM,
    PAYER_CODE,
    REFERENCE,
    DESCRIPTION,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

/// Collects the rows whose values are present, in print order.
pub fn detail_rows(
    transaction: &Transaction,
    payer: Option<&Payer>,
    locale: &LocaleConfig,
) -> Vec<DetailRow> {
    let payer_name = payer
        .map(|payer| payer.display_label())
        .filter(|name| !name.is_empty());
    let candidates: [(&'static str, Option<String>); 8] = [
        (
            RECEIPT_NO,
            present_text(Some(transaction.transaction_number.as_str())).map(str::to_string),
        ),
        (
            DATE,
            Some(format_date(locale, transaction.transaction_date)),
        ),
        (CATEGORY, Some(transaction.category.display_label())),
        (
            PAYMENT_METHOD,
            Some(transaction.payment_method.display_label()),
        ),
        (RECEIVED_FROM, payer_name),
        (PAYER_CODE, payer.and_then(Payer::code).map(str::to_string)),
        (
            REFERENCE,
            present_text(transaction.reference_number.as_deref()).map(str::to_string),
        ),
        (
            DESCRIPTION,
            present_text(transaction.description.as_deref()).map(str::to_string),
        ),
    ];
    candidates
        .into_iter()
        .filter_map(|(label, value)| value.map(|value| DetailRow { label, value }))
        .collect()
}
