use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{
    currency::{CurrencyCode, LocaleConfig},
    errors::{ReceiptError, Result},
    receipt::{ReceiptFormat, ReceiptSettings, DEFAULT_BLESSING_TEXT, DEFAULT_FOOTER_TEXT},
    utils::{app_data_dir, config_file_in, ensure_dir, receipts_dir_in},
};

/// Keys accepted by [`ReceiptConfig::set`].
pub const CONFIG_KEYS: [&str; 6] = [
    "currency",
    "default_format",
    "auto_print",
    "footer_text",
    "blessing_text",
    "output_dir",
];

/// Persisted receipt preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptConfig {
    pub currency: String,
    pub default_format: ReceiptFormat,
    pub auto_print: bool,
    pub footer_text: String,
    pub blessing_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<LocaleConfig>,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            currency: "TZS".into(),
            default_format: ReceiptFormat::FullPage,
            auto_print: false,
            footer_text: DEFAULT_FOOTER_TEXT.into(),
            blessing_text: DEFAULT_BLESSING_TEXT.into(),
            output_dir: None,
            locale: None,
        }
    }
}

impl ReceiptConfig {
    /// Settings handed to the receipt builder.
    pub fn receipt_settings(&self) -> ReceiptSettings {
        ReceiptSettings {
            currency: CurrencyCode::new(&self.currency),
            locale: self.locale.clone().unwrap_or_default(),
            footer_text: self.footer_text.clone(),
            blessing_text: self.blessing_text.clone(),
            ..ReceiptSettings::default()
        }
    }

    /// Updates one preference from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "currency" => {
                if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(ReceiptError::Config(format!(
                        "`{value}` is not a three-letter currency code"
                    )));
                }
                self.currency = CurrencyCode::new(value).0;
            }
            "default_format" | "printer_type" => {
                self.default_format = value
                    .parse()
                    .map_err(|err: ReceiptError| ReceiptError::Config(err.to_string()))?;
            }
            "auto_print" => {
                self.auto_print = match value.to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    other => {
                        return Err(ReceiptError::Config(format!(
                            "`{other}` is not a boolean"
                        )))
                    }
                };
            }
            "footer_text" => self.footer_text = value.to_string(),
            "blessing_text" => self.blessing_text = value.to_string(),
            "output_dir" => {
                self.output_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            other => {
                return Err(ReceiptError::Config(format!(
                    "unknown setting `{other}` (expected one of: {})",
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

/// Loads and saves [`ReceiptConfig`] under the application data directory.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
            base,
        })
    }

    /// Returns defaults when no configuration has been saved yet.
    pub fn load(&self) -> Result<ReceiptConfig> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            debug!(path = %self.path.display(), "no config file, using defaults");
            Ok(ReceiptConfig::default())
        }
    }

    /// Writes through a temporary file in the same directory, then renames.
    pub fn save(&self, config: &ReceiptConfig) -> Result<()> {
        ensure_dir(&self.base)?;
        let json = serde_json::to_string_pretty(config)?;
        let mut tmp = NamedTempFile::new_in(&self.base)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }

    /// Configured output directory, or `<base>/receipts`.
    pub fn output_dir(&self, config: &ReceiptConfig) -> PathBuf {
        config
            .output_dir
            .clone()
            .unwrap_or_else(|| receipts_dir_in(&self.base))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
