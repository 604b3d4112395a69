use crate::symbology::Symbology;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Narrowest bar width accepted, in millimetres
pub const MODULE_WIDTH_RANGE: RangeInclusive<f64> = 0.1..=10.0;
/// Bar height accepted, in millimetres
pub const MODULE_HEIGHT_RANGE: RangeInclusive<f64> = 5.0..=50.0;
/// Text size accepted, in points
pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 6..=24;
/// Gap between bars and text accepted, in millimetres
pub const TEXT_DISTANCE_RANGE: RangeInclusive<u32> = 0..=24;

/// File format of a single generated barcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    #[serde(rename = "PNG", alias = "png")]
    Png,
    #[serde(rename = "SVG", alias = "svg")]
    Svg,
    #[serde(rename = "PDF", alias = "pdf")]
    Pdf,
}

impl OutputFormat {
    /// File extension without the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "PNG"),
            OutputFormat::Svg => write!(f, "SVG"),
            OutputFormat::Pdf => write!(f, "PDF"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Barcode geometry and text options, persisted verbatim in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceSettings {
    /// Width of the narrowest bar in millimetres
    #[serde(rename = "barcode_width")]
    pub module_width: f64,

    /// Bar height in millimetres
    #[serde(rename = "barcode_height")]
    pub module_height: f64,

    /// Font size of the human-readable text in points
    pub font_size: u32,

    pub include_text: bool,

    /// Gap between the bars and the text in millimetres
    pub text_distance: u32,
}

impl AppearanceSettings {
    /// Check every value against its accepted range
    pub fn validate(&self) -> Result<(), String> {
        fn check<T: PartialOrd + fmt::Display>(
            key: &str,
            value: T,
            range: &RangeInclusive<T>,
        ) -> Result<(), String> {
            if range.contains(&value) {
                Ok(())
            } else {
                Err(format!(
                    "{} must be between {} and {} (got {})",
                    key,
                    range.start(),
                    range.end(),
                    value
                ))
            }
        }

        check("barcode_width", self.module_width, &MODULE_WIDTH_RANGE)?;
        check("barcode_height", self.module_height, &MODULE_HEIGHT_RANGE)?;
        check("font_size", self.font_size, &FONT_SIZE_RANGE)?;
        check("text_distance", self.text_distance, &TEXT_DISTANCE_RANGE)
    }
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            module_width: 0.2,
            module_height: 15.0,
            font_size: 10,
            include_text: true,
            text_distance: 5,
        }
    }
}

/// Application settings from barcode_generator_settings.json
///
/// Passed explicitly into every generation call; there is no global copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub default_barcode_type: Symbology,
    pub default_output_format: OutputFormat,
    pub default_output_dir: Utf8PathBuf,

    #[serde(flatten)]
    pub appearance: AppearanceSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_barcode_type: Symbology::Code128,
            default_output_format: OutputFormat::Png,
            default_output_dir: default_output_dir(),
            appearance: AppearanceSettings::default(),
        }
    }
}

/// The user's download directory, or the working directory when there is none
fn default_output_dir() -> Utf8PathBuf {
    dirs::download_dir()
        .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("."))
}

impl AppSettings {
    /// Update a single setting by its settings-file key.
    ///
    /// Used by `settings set`; values are parsed the same way the JSON file is. Appearance
    /// values outside their accepted range are rejected and leave the settings unchanged.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), String> {
        fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, String> {
            value
                .parse::<T>()
                .map_err(|_| format!("Invalid value for {}: {}", key, value))
        }

        let mut appearance = self.appearance.clone();
        match key {
            "default_barcode_type" => self.default_barcode_type = value.parse()?,
            "default_output_format" => self.default_output_format = value.parse()?,
            "default_output_dir" => self.default_output_dir = Utf8PathBuf::from(value),
            "barcode_width" => appearance.module_width = parse(key, value)?,
            "barcode_height" => appearance.module_height = parse(key, value)?,
            "include_text" => appearance.include_text = parse(key, value)?,
            "text_distance" => appearance.text_distance = parse(key, value)?,
            "font_size" => appearance.font_size = parse(key, value)?,
            _ => return Err(format!("Unknown setting: {}", key)),
        }
        appearance.validate()?;
        self.appearance = appearance;
        Ok(())
    }
}
