//! Textual color encodings: hex, `rgb()`, and JSON array.

use crate::color::Rgb;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from decoding a textual color value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("unrecognized color format: {0:?}")]
    Unrecognized(String),
    #[error("malformed hex color: {0:?}")]
    MalformedHex(String),
    #[error("malformed rgb() color: {0:?}")]
    MalformedRgb(String),
    #[error("malformed color array: {0:?}")]
    MalformedArray(String),
    #[error("channel out of range in {0:?}")]
    ChannelOutOfRange(String),
}

/// A concrete textual encoding of a color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
    /// `#RRGGBB`
    Hex,
    /// `rgb(R, G, B)`
    Rgb,
    /// `[R, G, B]` (JSON array, extra elements ignored)
    Array,
}

impl ColorFormat {
    /// Detect the encoding of a raw value from its leading characters.
    ///
    /// Checked in order: `#` is hex, `rgb` is an rgb() call, a bracketed
    /// value is an array. Anything else is unrecognized.
    pub fn detect(value: &str) -> Option<ColorFormat> {
        if value.starts_with('#') {
            Some(ColorFormat::Hex)
        } else if value.starts_with("rgb") {
            Some(ColorFormat::Rgb)
        } else if value.starts_with('[') && value.ends_with(']') {
            Some(ColorFormat::Array)
        } else {
            None
        }
    }

    /// Decode a raw value in this encoding.
    pub fn decode(self, value: &str) -> Result<Rgb, ParseColorError> {
        match self {
            ColorFormat::Hex => decode_hex(value),
            ColorFormat::Rgb => decode_rgb(value),
            ColorFormat::Array => decode_array(value),
        }
    }

    /// Encode a color in this encoding.
    pub fn encode(self, color: Rgb) -> String {
        match self {
            ColorFormat::Hex => format!("#{:02X}{:02X}{:02X}", color.r, color.g, color.b),
            ColorFormat::Rgb => format!("rgb({}, {}, {})", color.r, color.g, color.b),
            ColorFormat::Array => format!("[{}, {}, {}]", color.r, color.g, color.b),
        }
    }
}

/// The `format` configuration value: a concrete encoding or auto-detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatSetting {
    #[default]
    Auto,
    Hex,
    Rgb,
    Array,
}

impl FormatSetting {
    /// The concrete encoding this setting names, or `None` for `Auto`.
    pub fn as_concrete(self) -> Option<ColorFormat> {
        match self {
            FormatSetting::Auto => None,
            FormatSetting::Hex => Some(ColorFormat::Hex),
            FormatSetting::Rgb => Some(ColorFormat::Rgb),
            FormatSetting::Array => Some(ColorFormat::Array),
        }
    }

    /// Resolve to a concrete encoding for output.
    ///
    /// `Auto` follows the detected format of the currently loaded external
    /// value, falling back to hex when that format is unknown.
    pub fn resolve(self, loaded: Option<ColorFormat>) -> ColorFormat {
        self.as_concrete()
            .or(loaded)
            .unwrap_or(ColorFormat::Hex)
    }
}

fn decode_hex(value: &str) -> Result<Rgb, ParseColorError> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ParseColorError::MalformedHex(value.to_string()));
    }
    let channel = |range| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| ParseColorError::MalformedHex(value.to_string()))
    };
    Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn decode_rgb(value: &str) -> Result<Rgb, ParseColorError> {
    let malformed = || ParseColorError::MalformedRgb(value.to_string());
    let inner = value
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(malformed)?;

    let mut channels = [0u8; 3];
    let mut parts = inner.split(',');
    for channel in &mut channels {
        let part = parts.next().ok_or_else(malformed)?.trim();
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed());
        }
        *channel = part
            .parse()
            .map_err(|_| ParseColorError::ChannelOutOfRange(value.to_string()))?;
    }
    if parts.next().is_some() {
        return Err(malformed());
    }
    Ok(Rgb::new(channels[0], channels[1], channels[2]))
}

fn decode_array(value: &str) -> Result<Rgb, ParseColorError> {
    let elements: Vec<f64> = serde_json::from_str(value)
        .map_err(|_| ParseColorError::MalformedArray(value.to_string()))?;
    if elements.len() < 3 {
        return Err(ParseColorError::MalformedArray(value.to_string()));
    }
    let mut channels = [0u8; 3];
    for (channel, &element) in channels.iter_mut().zip(&elements) {
        let rounded = element.round();
        if !(0.0..=255.0).contains(&rounded) {
            return Err(ParseColorError::ChannelOutOfRange(value.to_string()));
        }
        *channel = rounded as u8;
    }
    Ok(Rgb::new(channels[0], channels[1], channels[2]))
}
