//! Symbology registry - maps barcode scheme names to their encoders.
//!
//! Every supported scheme is a variant of the closed [`Symbology`] enum. Each variant is
//! bound to exactly one encoder function through [`Symbology::encoder`], so adding a
//! scheme without an encoder is a compile error rather than a runtime lookup failure.
//!
//! Encoders turn a payload into an [`EncodedBarcode`]: a flat run of modules
//! (`true` = bar, `false` = space) plus the human-readable text printed under the bars.
//! Quiet zones are not part of the module run; renderers add them.
//!
//! # Supported schemes
//!
//! | Name      | Charset                     | Check                          |
//! |-----------|-----------------------------|--------------------------------|
//! | `Code128` | ASCII 0..=127               | mod 103                        |
//! | `Code39`  | `0-9 A-Z - . space $ / + %` | mod 43                         |
//! | `EAN13`   | 12 or 13 digits             | mod 10, verified when supplied |
//! | `EAN8`    | 7 or 8 digits               | mod 10, verified when supplied |
//! | `UPC-A`   | 11 or 12 digits             | mod 10, verified when supplied |
//! | `ISBN13`  | `978`/`979` + digits        | mod 10, verified when supplied |
//! | `ITF`     | digits                      | none                           |
//! | `Codabar` | `0-9 - $ : / . +`           | none                           |

pub mod codabar;
pub mod code128;
pub mod code39;
pub mod ean;
pub mod itf;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Output of an encoder: module pattern plus the text to print under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBarcode {
    pub modules: Vec<bool>,
    pub human_readable: String,
}

impl EncodedBarcode {
    /// Number of modules in the symbol, quiet zones excluded.
    pub fn width(&self) -> usize {
        self.modules.len()
    }

    /// Append a binary pattern such as `"1011"` to a module run.
    pub(crate) fn push_pattern(modules: &mut Vec<bool>, pattern: &str) {
        modules.extend(pattern.bytes().map(|b| b == b'1'));
    }

    /// Append a bar/space width sequence such as `[2, 1, 2, 2, 2, 2]`, starting with a bar.
    pub(crate) fn push_widths(modules: &mut Vec<bool>, widths: &[u8]) {
        for (i, &w) in widths.iter().enumerate() {
            let bar = i % 2 == 0;
            modules.extend(std::iter::repeat_n(bar, w as usize));
        }
    }
}

/// Errors reported by the encoders when a payload does not fit a symbology
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Text is empty")]
    Empty,

    #[error("Character {ch:?} at position {position} is not supported")]
    InvalidCharacter { ch: char, position: usize },

    #[error("Expected {expected} digits, got {actual}")]
    InvalidLength { expected: String, actual: usize },

    #[error("Wrong check digit: expected {expected}, found {found}")]
    ChecksumMismatch { expected: u8, found: u8 },

    #[error("Invalid prefix: {0}")]
    InvalidPrefix(String),
}

/// Encoder entry point shared by every symbology
pub type EncoderFn = fn(&str) -> Result<EncodedBarcode, EncodeError>;

/// Barcode scheme supported by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbology {
    Code128,
    Code39,
    #[serde(rename = "EAN13")]
    Ean13,
    #[serde(rename = "EAN8")]
    Ean8,
    #[serde(rename = "UPC-A", alias = "UPC")]
    UpcA,
    #[serde(rename = "ISBN13")]
    Isbn13,
    #[serde(rename = "ITF")]
    Itf,
    #[serde(alias = "CODABAR")]
    Codabar,
}

impl Symbology {
    /// Every registered symbology, in menu order
    pub const ALL: [Symbology; 8] = [
        Symbology::Code128,
        Symbology::Code39,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::UpcA,
        Symbology::Isbn13,
        Symbology::Itf,
        Symbology::Codabar,
    ];

    /// Display name, also used in the settings file
    pub fn name(self) -> &'static str {
        match self {
            Symbology::Code128 => "Code128",
            Symbology::Code39 => "Code39",
            Symbology::Ean13 => "EAN13",
            Symbology::Ean8 => "EAN8",
            Symbology::UpcA => "UPC-A",
            Symbology::Isbn13 => "ISBN13",
            Symbology::Itf => "ITF",
            Symbology::Codabar => "Codabar",
        }
    }

    /// Encoder bound to this symbology
    pub fn encoder(self) -> EncoderFn {
        match self {
            Symbology::Code128 => code128::encode,
            Symbology::Code39 => code39::encode,
            Symbology::Ean13 => ean::encode_ean13,
            Symbology::Ean8 => ean::encode_ean8,
            Symbology::UpcA => ean::encode_upca,
            Symbology::Isbn13 => ean::encode_isbn13,
            Symbology::Itf => itf::encode,
            Symbology::Codabar => codabar::encode,
        }
    }

    /// Encode `text` with this symbology
    pub fn encode(self, text: &str) -> Result<EncodedBarcode, EncodeError> {
        if text.is_empty() {
            return Err(EncodeError::Empty);
        }
        (self.encoder())(text)
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Symbology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_uppercase();

        match key.as_str() {
            "CODE128" => Ok(Symbology::Code128),
            "CODE39" => Ok(Symbology::Code39),
            "EAN13" => Ok(Symbology::Ean13),
            "EAN8" => Ok(Symbology::Ean8),
            "UPCA" | "UPC" => Ok(Symbology::UpcA),
            "ISBN13" | "ISBN" => Ok(Symbology::Isbn13),
            "ITF" => Ok(Symbology::Itf),
            "CODABAR" => Ok(Symbology::Codabar),
            _ => Err(format!("Unknown barcode type: {}", s)),
        }
    }
}
