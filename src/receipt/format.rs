use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ReceiptError;

/// Four-step type scale, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontScale {
    pub title: f32,
    pub subtitle: f32,
    pub body: f32,
    pub small: f32,
}

/// Fixed page geometry for one paper format. Lengths are millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_x: f32,
    pub fonts: FontScale,
    /// Initial baseline offset from the top edge.
    pub top_offset: f32,
    pub logo_size: f32,
    /// Font size of the AMOUNT PAID line.
    pub amount_size: f32,
    pub seal_radius: f32,
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_x * 2.0
    }

    pub fn right_edge(&self) -> f32 {
        self.width - self.margin_x
    }
}

/// Physical receipt layouts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ReceiptFormat {
    /// A4 sheet.
    #[serde(alias = "a4")]
    FullPage,
    /// 80 mm thermal roll.
    #[serde(alias = "thermal-80")]
    ThermalWide,
    /// 58 mm thermal roll.
    #[serde(alias = "thermal-58")]
    ThermalNarrow,
}

impl Default for ReceiptFormat {
    fn default() -> Self {
        ReceiptFormat::FullPage
    }
}

impl ReceiptFormat {
    pub const ALL: [ReceiptFormat; 3] = [
        ReceiptFormat::FullPage,
        ReceiptFormat::ThermalWide,
        ReceiptFormat::ThermalNarrow,
    ];

    pub fn geometry(&self) -> PageGeometry {
        match self {
            ReceiptFormat::FullPage => PageGeometry {
                width: 210.0,
                height: 297.0,
                margin_x: 20.0,
                fonts: FontScale {
                    title: 18.0,
                    subtitle: 12.0,
                    body: 10.0,
                    small: 8.0,
                },
                top_offset: 20.0,
                logo_size: 20.0,
                amount_size: 16.0,
                seal_radius: 16.0,
            },
            ReceiptFormat::ThermalWide => PageGeometry {
                width: 72.0,
                height: 200.0,
                margin_x: 4.0,
                fonts: FontScale {
                    title: 12.0,
                    subtitle: 9.0,
                    body: 8.0,
                    small: 7.0,
                },
                top_offset: 5.0,
                logo_size: 12.0,
                amount_size: 9.0,
                seal_radius: 10.0,
            },
            ReceiptFormat::ThermalNarrow => PageGeometry {
                width: 48.0,
                height: 200.0,
                margin_x: 3.0,
                fonts: FontScale {
                    title: 10.0,
                    subtitle: 8.0,
                    body: 7.0,
                    small: 6.0,
                },
                top_offset: 5.0,
                logo_size: 12.0,
                amount_size: 8.0,
                seal_radius: 8.0,
            },
        }
    }

    pub fn is_thermal(&self) -> bool {
        !matches!(self, ReceiptFormat::FullPage)
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            ReceiptFormat::FullPage => "full-page",
            ReceiptFormat::ThermalWide => "thermal-wide",
            ReceiptFormat::ThermalNarrow => "thermal-narrow",
        }
    }
}

impl fmt::Display for ReceiptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for ReceiptFormat {
    type Err = ReceiptError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full-page" | "a4" => Ok(ReceiptFormat::FullPage),
            "thermal-wide" | "thermal-80" => Ok(ReceiptFormat::ThermalWide),
            "thermal-narrow" | "thermal-58" => Ok(ReceiptFormat::ThermalNarrow),
            other => Err(ReceiptError::invalid(format!(
                "unknown receipt format `{other}` (expected full-page, thermal-wide or thermal-narrow)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tags_and_printer_aliases() {
        assert_eq!("full-page".parse::<ReceiptFormat>().unwrap(), ReceiptFormat::FullPage);
        assert_eq!("A4".parse::<ReceiptFormat>().unwrap(), ReceiptFormat::FullPage);
        assert_eq!(
            "thermal-80".parse::<ReceiptFormat>().unwrap(),
            ReceiptFormat::ThermalWide
        );
        assert_eq!(
            " thermal-58 ".parse::<ReceiptFormat>().unwrap(),
            ReceiptFormat::ThermalNarrow
        );
    }

    #[test]
    fn unknown_tag_is_an_invalid_argument() {
        let err = "letter".parse::<ReceiptFormat>().unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn serde_accepts_aliases() {
        let format: ReceiptFormat = serde_json::from_str("\"thermal-58\"").unwrap();
        assert_eq!(format, ReceiptFormat::ThermalNarrow);
        assert_eq!(
            serde_json::to_string(&ReceiptFormat::ThermalWide).unwrap(),
            "\"thermal-wide\""
        );
    }

    #[test]
    fn presets_keep_the_type_scale_ordered() {
        for format in ReceiptFormat::ALL {
            let geometry = format.geometry();
            let fonts = geometry.fonts;
            assert!(fonts.title > fonts.subtitle);
            assert!(fonts.subtitle > fonts.body);
            assert!(fonts.body > fonts.small);
            assert!(geometry.amount_size > fonts.body);
            assert!(geometry.amount_size <= fonts.title);
            assert!(geometry.content_width() > 0.0);
        }
    }
}
