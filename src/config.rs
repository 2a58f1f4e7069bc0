//! Dashboard configuration.
//!
//! Paths, number formatting and the chart palette. Everything has a default,
//! so a missing config file just means the built-in dashboard layout.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CAMPAIGN_DASHBOARD_CONFIG";

/// Config file used when [`CONFIG_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

/// Message shown in place of the dashboard when the data cannot be loaded.
pub const DEFAULT_LOAD_ERROR_MESSAGE: &str = "Error al cargar los datos";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
}

/// An sRGB color written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor(text.to_string());
        let hex = text.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

/// Named chart colors plus the ordered scale for multi-series charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub crimson: HexColor,
    pub coral: HexColor,
    pub magenta: HexColor,
    pub purple: HexColor,
    pub steel: HexColor,
    pub muted: HexColor,
    pub subtle: HexColor,
    pub text_primary: HexColor,
    pub scale: Vec<HexColor>,
}

impl Default for Palette {
    fn default() -> Self {
        let crimson = HexColor::rgb(0xC0, 0x39, 0x2B);
        let coral = HexColor::rgb(0xE8, 0x52, 0x3F);
        let magenta = HexColor::rgb(0xA0, 0x28, 0x6E);
        let purple = HexColor::rgb(0x6B, 0x2F, 0xA0);
        let steel = HexColor::rgb(0x2D, 0x6F, 0xA0);

        Self {
            crimson,
            coral,
            magenta,
            purple,
            steel,
            muted: HexColor::rgb(0xB5, 0xA8, 0x98),
            subtle: HexColor::rgb(0xED, 0xE8, 0xDE),
            text_primary: HexColor::rgb(0x1C, 0x14, 0x10),
            scale: vec![crimson, magenta, purple, coral, steel],
        }
    }
}

impl Palette {
    /// Color for the n-th series, cycling through the scale.
    pub fn series(&self, index: usize) -> HexColor {
        if self.scale.is_empty() {
            return self.steel;
        }
        self.scale[index % self.scale.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Campaign CSV to load.
    pub data_path: PathBuf,
    /// Directory receiving the KPI file and chart images.
    pub output_dir: PathBuf,
    /// Thousands separator for the record count (es-CO uses '.').
    pub thousands_separator: char,
    pub chart_width: u32,
    pub chart_height: u32,
    pub palette: Palette,
    /// The single user-visible message of the error state.
    pub load_error_message: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/bank-full-clean.csv"),
            output_dir: PathBuf::from("dashboard"),
            thousands_separator: '.',
            chart_width: 800,
            chart_height: 480,
            palette: Palette::default(),
            load_error_message: DEFAULT_LOAD_ERROR_MESSAGE.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file. Absent keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Resolve the config file from [`CONFIG_ENV`] or [`DEFAULT_CONFIG_FILE`].
    /// Falls back to defaults when the default file does not exist; an
    /// explicitly named file must exist.
    pub fn discover() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::load(path)
                } else {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using default config");
                    Ok(Self::default())
                }
            }
        }
    }
}
