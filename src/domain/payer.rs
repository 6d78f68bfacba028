use serde::{Deserialize, Serialize};

use crate::domain::common::{present_text, Displayable};

/// The member a payment was received from, when known.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payer {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_code: Option<String>,
}

impl Payer {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            member_code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.member_code = Some(code.into());
        self
    }

    pub fn code(&self) -> Option<&str> {
        present_text(self.member_code.as_deref())
    }
}

impl Displayable for Payer {
    fn display_label(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}
