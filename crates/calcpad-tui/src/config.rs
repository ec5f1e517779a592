//! `calcpad.toml` loading.
//!
//! ```toml
//! [trigger]
//! mode = "enter"        # or "change"
//!
//! [styles]
//! handle = "#FFCACA"
//! hashtag = "#FFE564"
//! number = "#00FF2D"
//!
//! [view]
//! show_raw = false
//! ```
//!
//! Every key is optional; missing sections fall back to the defaults above.

use calcpad_eval::TriggerPolicy;
use ratatui::style::Color;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid color for styles.{key}: '{value}' (expected #RRGGBB)")]
    InvalidColor { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CalcpadConfig {
    pub trigger: TriggerConfig,
    pub styles: StyleConfig,
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub mode: TriggerPolicy,
}

/// Background colors of the pattern decorations, as `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub handle: String,
    pub hashtag: String,
    pub number: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            handle: "#FFCACA".to_string(),
            hashtag: "#FFE564".to_string(),
            number: "#00FF2D".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Open with the raw content pane visible.
    pub show_raw: bool,
}

/// Resolved decoration colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub handle: Color,
    pub hashtag: Color,
    pub number: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            handle: Color::Rgb(0xFF, 0xCA, 0xCA),
            hashtag: Color::Rgb(0xFF, 0xE5, 0x64),
            number: Color::Rgb(0x00, 0xFF, 0x2D),
        }
    }
}

impl StyleConfig {
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        Ok(Palette {
            handle: color("handle", &self.handle)?,
            hashtag: color("hashtag", &self.hashtag)?,
            number: color("number", &self.number)?,
        })
    }
}

fn color(key: &'static str, value: &str) -> Result<Color, ConfigError> {
    parse_hex_color(value).ok_or_else(|| ConfigError::InvalidColor {
        key,
        value: value.to_string(),
    })
}

/// Parse `#RRGGBB` (or `#RGB`) into an RGB color.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(Color::Rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

impl CalcpadConfig {
    pub fn from_toml(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.styles.palette()?;
        Ok(config)
    }

    /// Load from `path`, validating the colors.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(path, &content)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from an explicit path, or `./calcpad.toml` when it exists, or use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Self::load_from_path(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

pub const DEFAULT_CONFIG_FILE: &str = "calcpad.toml";
