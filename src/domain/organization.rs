//! The issuing parish whose identity heads every receipt.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::CurrencyCode;
use crate::domain::common::present_text;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub parish_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Overrides the configured default currency when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
}

impl Organization {
    pub fn new(parish_name: impl Into<String>) -> Self {
        Self {
            id: None,
            parish_name: parish_name.into(),
            physical_address: None,
            contact_phone: None,
            contact_email: None,
            logo_url: None,
            currency: None,
        }
    }

    pub fn with_currency(mut self, code: impl Into<String>) -> Self {
        self.currency = Some(CurrencyCode::new(code));
        self
    }

    pub fn address(&self) -> Option<&str> {
        present_text(self.physical_address.as_deref())
    }

    pub fn phone(&self) -> Option<&str> {
        present_text(self.contact_phone.as_deref())
    }

    pub fn email(&self) -> Option<&str> {
        present_text(self.contact_email.as_deref())
    }

    pub fn logo(&self) -> Option<&str> {
        present_text(self.logo_url.as_deref())
    }
}
