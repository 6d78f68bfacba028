#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use parish_receipts::{
    config::ConfigManager, Organization, Payer, PaymentMethod, Transaction, TransactionCategory,
};
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub const PARISH_NAME: &str = "St. Jude Parish";

/// Creates a unique directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Config manager backed by an isolated directory.
pub fn setup_config() -> (ConfigManager, PathBuf) {
    let base = temp_dir();
    let manager = ConfigManager::with_base_dir(base.clone()).expect("create config manager");
    (manager, base)
}

pub fn march_fifth() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 5).expect("valid date")
}

pub fn minimal_transaction() -> Transaction {
    Transaction::new(
        "OR-2026-00045",
        TransactionCategory::Tithe,
        Decimal::new(1_234_550, 2),
        PaymentMethod::Cash,
        march_fifth(),
    )
}

/// Every optional field populated.
pub fn full_transaction() -> Transaction {
    Transaction::new(
        "OR/2026/00045",
        TransactionCategory::MassOffering,
        Decimal::new(1_234_550, 2),
        PaymentMethod::Mpesa,
        march_fifth(),
    )
    .with_reference("MP-7781")
    .with_description("Easter vigil collection")
}

pub fn minimal_parish() -> Organization {
    Organization::new(PARISH_NAME)
}

pub fn full_parish() -> Organization {
    let mut parish = Organization::new(PARISH_NAME);
    parish.physical_address = Some("P.O. Box 12, Moshi".into());
    parish.contact_phone = Some("+255 700 000 000".into());
    parish.contact_email = Some("office@stjude.example".into());
    parish
}

pub fn payer() -> Payer {
    Payer::new("Grace", "Mushi").with_code("M-0042")
}

pub const REQUEST_JSON: &str = r#"{
    "transaction": {
        "transaction_number": "OR/2026/00045",
        "category": "TITHE",
        "amount": "12345.50",
        "payment_method": "CASH",
        "transaction_date": "2026-03-05"
    },
    "organization": {
        "parish_name": "St. Jude Parish",
        "physical_address": "P.O. Box 12, Moshi",
        "contact_phone": "+255 700 000 000"
    },
    "payer": { "first_name": "Grace", "last_name": "Mushi", "member_code": "M-0042" },
    "format": "thermal-80"
}"#;

/// Writes a request file into `dir` and returns its path.
pub fn write_request(dir: &std::path::Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, json).expect("write request");
    path
}
