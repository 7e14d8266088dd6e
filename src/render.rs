//! Rasterizer hand-off
//!
//! Symbol rendering itself happens outside the crate. This module builds
//! the request the rasterizer consumes: payload, size, colours, error
//! correction level and the optional centred logo.

use crate::config;
use crate::models::CanonicalPayload;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default module colour (teal)
pub const DEFAULT_FOREGROUND: Rgb = Rgb(0x00, 0x80, 0x80);
/// Default background colour (pale aqua)
pub const DEFAULT_BACKGROUND: Rgb = Rgb(0xE0, 0xF8, 0xF8);
/// Logo edge length in pixels
pub const LOGO_SIZE: u32 = 48;
/// Stem of exported file names
pub const EXPORT_STEM: &str = "qreator-code";

/// Error correction level handed to the rasterizer.
///
/// Symbols are always generated at the low level, so it is the only
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum EcLevel {
    /// Low (~7% recovery capacity)
    #[default]
    L,
}

/// 24-bit colour, written as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A colour string that is not `#RGB` or `#RRGGBB`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid colour {0:?}, expected #RRGGBB")]
pub struct ColorParseError(pub String);

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if !hex.is_ascii() {
            return Err(err());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| err());
        match hex.len() {
            6 => Ok(Rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Image drawn over the centre of the symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoOverlay {
    /// Image source (path or URL)
    pub src: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Clear the modules under the logo
    pub excavate: bool,
}

impl LogoOverlay {
    /// 48x48 excavated logo
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            width: LOGO_SIZE,
            height: LOGO_SIZE,
            excavate: true,
        }
    }

    /// Pixel rectangle `(x, y, width, height)` the logo covers on a
    /// `size_px` symbol, clipped to the symbol
    pub fn placement(&self, size_px: u32) -> (u32, u32, u32, u32) {
        let width = self.width.min(size_px);
        let height = self.height.min(size_px);
        ((size_px - width) / 2, (size_px - height) / 2, width, height)
    }
}

/// Everything the rasterizer needs to draw one symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRequest {
    payload: CanonicalPayload,
    size_px: u32,
    foreground: Rgb,
    background: Rgb,
    level: EcLevel,
    logo: Option<LogoOverlay>,
}

impl RenderRequest {
    /// Request with default colours and the configured size
    pub fn new(payload: CanonicalPayload) -> Self {
        Self {
            payload,
            size_px: config::settings().render_size,
            foreground: DEFAULT_FOREGROUND,
            background: DEFAULT_BACKGROUND,
            level: EcLevel::L,
            logo: None,
        }
    }

    /// Override the symbol size, clamped to the accepted range
    pub fn with_size(mut self, size_px: u32) -> Self {
        self.size_px = size_px.clamp(config::MIN_RENDER_SIZE, config::MAX_RENDER_SIZE);
        self
    }

    /// Override the colours
    pub fn with_colors(mut self, foreground: Rgb, background: Rgb) -> Self {
        self.foreground = foreground;
        self.background = background;
        self
    }

    /// Place a logo over the centre
    pub fn with_logo(mut self, logo: LogoOverlay) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Encoded text
    pub fn payload(&self) -> &CanonicalPayload {
        &self.payload
    }

    /// Edge length in pixels
    pub fn size_px(&self) -> u32 {
        self.size_px
    }

    /// Module colour
    pub fn foreground(&self) -> Rgb {
        self.foreground
    }

    /// Background colour
    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Error correction level (always low, to leave room for the payload)
    pub fn level(&self) -> EcLevel {
        self.level
    }

    /// Centred logo, if any
    pub fn logo(&self) -> Option<&LogoOverlay> {
        self.logo.as_ref()
    }
}

/// Download format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless PNG
    #[default]
    Png,
    /// JPEG
    Jpeg,
}

impl ExportFormat {
    /// File extension
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
        }
    }

    /// MIME type of the encoded image
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }

    /// Suggested download name, e.g. `qreator-code.png`
    pub fn file_name(&self) -> String {
        format!("{EXPORT_STEM}.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            other => Err(format!("unsupported export format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;
    use crate::models::PayloadSpec;

    #[test]
    fn test_color_parse() {
        assert_eq!("#008080".parse::<Rgb>(), Ok(DEFAULT_FOREGROUND));
        assert_eq!("e0f8f8".parse::<Rgb>(), Ok(DEFAULT_BACKGROUND));
        assert_eq!("#fff".parse::<Rgb>(), Ok(Rgb(255, 255, 255)));
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert!("#ééé".parse::<Rgb>().is_err());
        assert_eq!(DEFAULT_BACKGROUND.to_string(), "#E0F8F8");
    }

    #[test]
    fn test_request_defaults() {
        let payload = encode(&PayloadSpec::Text("hello".into()));
        let request = RenderRequest::new(payload.clone());
        assert_eq!(request.payload(), &payload);
        assert_eq!(request.level(), EcLevel::L);
        assert_eq!(request.foreground(), DEFAULT_FOREGROUND);
        assert_eq!(request.background(), DEFAULT_BACKGROUND);
        assert!(request.logo().is_none());
        assert_eq!(request.with_size(1).size_px(), config::MIN_RENDER_SIZE);
    }

    #[test]
    fn test_request_serializes() {
        let request = RenderRequest::new(encode(&PayloadSpec::Url("https://a.b".into())))
            .with_size(256)
            .with_logo(LogoOverlay::new("logo.png"));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["payload"], "https://a.b");
        assert_eq!(json["foreground"], "#008080");
        assert_eq!(json["level"], "L");
        assert_eq!(json["logo"]["width"], 48);
        assert_eq!(json["logo"]["excavate"], true);
    }

    #[test]
    fn test_logo_is_centred() {
        let logo = LogoOverlay::new("x");
        assert_eq!(logo.placement(256), (104, 104, 48, 48));
        assert_eq!(logo.placement(32), (0, 0, 32, 32));
    }

    #[test]
    fn test_export_names() {
        assert_eq!(ExportFormat::Png.file_name(), "qreator-code.png");
        assert_eq!("JPG".parse::<ExportFormat>(), Ok(ExportFormat::Jpeg));
        assert_eq!(ExportFormat::Jpeg.file_name(), "qreator-code.jpeg");
        assert_eq!(ExportFormat::Jpeg.mime_type(), "image/jpeg");
    }
}
