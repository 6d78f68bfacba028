//! Income transactions as recorded by the parish finance desk.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{humanize_tag, Displayable};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionCategory {
    Tithe,
    Offertory,
    Thanksgiving,
    Donation,
    Fundraising,
    MassOffering,
    WeddingFee,
    BaptismFee,
    FuneralFee,
    CertificateFee,
    RentIncome,
    InvestmentIncome,
    OtherIncome,
    SalaryExpense,
    UtilitiesExpense,
    MaintenanceExpense,
    SuppliesExpense,
    DiocesanLevy,
    CharityExpense,
    ConstructionExpense,
    OtherExpense,
}

impl TransactionCategory {
    /// Wire tag used by the REST backend.
    pub fn as_tag(&self) -> &'static str {
        match self {
            TransactionCategory::Tithe => "TITHE",
            TransactionCategory::Offertory => "OFFERTORY",
            TransactionCategory::Thanksgiving => "THANKSGIVING",
            TransactionCategory::Donation => "DONATION",
            TransactionCategory::Fundraising => "FUNDRAISING",
            TransactionCategory::MassOffering => "MASS_OFFERING",
            TransactionCategory::WeddingFee => "WEDDING_FEE",
            TransactionCategory::BaptismFee => "BAPTISM_FEE",
            TransactionCategory::FuneralFee => "FUNERAL_FEE",
            TransactionCategory::CertificateFee => "CERTIFICATE_FEE",
            TransactionCategory::RentIncome => "RENT_INCOME",
            TransactionCategory::InvestmentIncome => "INVESTMENT_INCOME",
            TransactionCategory::OtherIncome => "OTHER_INCOME",
            TransactionCategory::SalaryExpense => "SALARY_EXPENSE",
            TransactionCategory::UtilitiesExpense => "UTILITIES_EXPENSE",
            TransactionCategory::MaintenanceExpense => "MAINTENANCE_EXPENSE",
            TransactionCategory::SuppliesExpense => "SUPPLIES_EXPENSE",
            TransactionCategory::DiocesanLevy => "DIOCESAN_LEVY",
            TransactionCategory::CharityExpense => "CHARITY_EXPENSE",
            TransactionCategory::ConstructionExpense => "CONSTRUCTION_EXPENSE",
            TransactionCategory::OtherExpense => "OTHER_EXPENSE",
        }
    }
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl Displayable for TransactionCategory {
    fn display_label(&self) -> String {
        humanize_tag(self.as_tag())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Cheque,
    BankTransfer,
    Mpesa,
    TigoPesa,
    AirtelMoney,
    Halopesa,
    CreditCard,
    Other,
}

impl PaymentMethod {
    pub fn as_tag(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Cheque => "CHEQUE",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::Mpesa => "MPESA",
            PaymentMethod::TigoPesa => "TIGO_PESA",
            PaymentMethod::AirtelMoney => "AIRTEL_MONEY",
            PaymentMethod::Halopesa => "HALOPESA",
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::Other => "OTHER",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl Displayable for PaymentMethod {
    fn display_label(&self) -> String {
        humanize_tag(self.as_tag())
    }
}

/// A single recorded income payment, read-only for the receipt builder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub transaction_number: String,
    pub category: TransactionCategory,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub transaction_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<Uuid>,
}

impl Transaction {
    pub fn new(
        transaction_number: impl Into<String>,
        category: TransactionCategory,
        amount: Decimal,
        payment_method: PaymentMethod,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            transaction_number: transaction_number.into(),
            category,
            amount,
            payment_method,
            transaction_date,
            description: None,
            reference_number: None,
            member_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_number = Some(reference.into());
        self
    }
}
