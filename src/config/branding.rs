use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ReportError;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub branding: Branding,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Names and colors printed on every report.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Branding {
    pub company: String,
    pub title: String,
    pub primary_color: Rgb,
    pub accent_color: Rgb,
    pub summary_color: Rgb,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            company: "Ilume Finanças".to_string(),
            title: "Relatório de Contas a Receber".to_string(),
            primary_color: Rgb(0x6F, 0x38, 0x7C),
            accent_color: Rgb(0xF5, 0x9D, 0x30),
            summary_color: Rgb(0xF7, 0xE8, 0xC9),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputSettings {
    pub dir: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
        }
    }
}

/// 8-bit RGB color, written as `#RRGGBB` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    pub const fn gray(level: u8) -> Rgb {
        Rgb(level, level, level)
    }

    /// Components scaled to 0.0..=1.0 for PDF color operators.
    pub fn unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ReportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| ReportError::InvalidColor(value.clone()))?;

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| ReportError::InvalidColor(value.clone()))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}
