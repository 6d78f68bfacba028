//! Money and date rendering for receipts.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Upper-case ISO 4217 code, e.g. `TZS`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Printed symbol; shillings and francs print their code.
    pub fn symbol(&self) -> &str {
        lookup(self.as_str()).map_or(self.as_str(), |info| info.symbol)
    }

    /// Decimal places printed after the separator.
    pub fn minor_units(&self) -> u32 {
        lookup(self.as_str()).map_or(2, |info| info.minor_units)
    }
}

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("TZS")
    }
}

struct CurrencyInfo {
    code: &'static str,
    symbol: &'static str,
    minor_units: u32,
}

const KNOWN_CURRENCIES: &[CurrencyInfo] = &[
    CurrencyInfo { code: "TZS", symbol: "TZS", minor_units: 2 },
    CurrencyInfo { code: "KES", symbol: "KSh", minor_units: 2 },
    CurrencyInfo { code: "UGX", symbol: "UGX", minor_units: 0 },
    CurrencyInfo { code: "RWF", symbol: "RWF", minor_units: 0 },
    CurrencyInfo { code: "USD", symbol: "$", minor_units: 2 },
    CurrencyInfo { code: "EUR", symbol: "\u{20ac}", minor_units: 2 },
    CurrencyInfo { code: "GBP", symbol: "\u{a3}", minor_units: 2 },
    CurrencyInfo { code: "JPY", symbol: "\u{a5}", minor_units: 0 },
];

fn lookup(code: &str) -> Option<&'static CurrencyInfo> {
    KNOWN_CURRENCIES.iter().find(|info| info.code == code)
}

/// Separators and date style used when printing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub date_format: DateFormatStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-TZ".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            date_format: DateFormatStyle::Medium,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FormatOptions {
    pub currency_display: CurrencyDisplay,
    pub negative_style: NegativeStyle,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum NegativeStyle {
    #[default]
    Sign,
    Parentheses,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CurrencyDisplay {
    #[default]
    Symbol,
    Code,
}

/// `Short` is `05/03/2026`, `Medium` is `05 Mar 2026`, `Long` is `5 March 2026`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateFormatStyle {
    Short,
    Medium,
    Long,
}

impl DateFormatStyle {
    fn pattern(&self) -> &'static str {
        match self {
            DateFormatStyle::Short => "%d/%m/%Y",
            DateFormatStyle::Medium => "%d %b %Y",
            DateFormatStyle::Long => "%-d %B %Y",
        }
    }
}

/// Absolute value of `value`, rounded half away from zero to `precision`
/// places, with thousands grouped.
pub fn format_number(locale: &LocaleConfig, value: Decimal, precision: u32) -> String {
    let mut rounded = value
        .abs()
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(precision);
    let text = rounded.to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let digits: Vec<char> = whole.chars().collect();
    let lead = match digits.len() % 3 {
        0 => 3,
        rem => rem,
    };
    let mut out = String::with_capacity(text.len() + digits.len() / 3);
    for (idx, digit) in digits.iter().enumerate() {
        if idx >= lead && (idx - lead) % 3 == 0 {
            out.push(locale.grouping_separator);
        }
        out.push(*digit);
    }
    if !fraction.is_empty() {
        out.push(locale.decimal_separator);
        out.push_str(fraction);
    }
    out
}

/// `TZS 12,345.50`, `$12.00`, `UGX 25,000`.
pub fn format_currency_value(
    amount: Decimal,
    code: &CurrencyCode,
    locale: &LocaleConfig,
    options: &FormatOptions,
) -> String {
    let number = format_number(locale, amount, code.minor_units());
    let negative = amount.is_sign_negative() && !amount.is_zero();
    let signed = match (negative, options.negative_style) {
        (false, _) => number,
        (true, NegativeStyle::Sign) => format!("-{number}"),
        (true, NegativeStyle::Parentheses) => format!("({number})"),
    };
    let prefix = match options.currency_display {
        CurrencyDisplay::Symbol => code.symbol(),
        CurrencyDisplay::Code => code.as_str(),
    };
    if prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        format!("{prefix} {signed}")
    } else {
        format!("{prefix}{signed}")
    }
}

pub fn format_date(locale: &LocaleConfig, date: NaiveDate) -> String {
    date.format(locale.date_format.pattern()).to_string()
}
