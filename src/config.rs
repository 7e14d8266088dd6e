//! Runtime settings read from the environment
//!
//! Values are parsed leniently: anything missing or malformed falls back
//! to its default. The process-wide [`settings`] are read once.

use std::sync::OnceLock;

/// Origin used for tour links when none is given
pub const DEFAULT_ORIGIN: &str = "http://localhost:9002";
/// Symbol size in pixels
pub const DEFAULT_RENDER_SIZE: u32 = 256;
/// Smallest accepted render size
pub const MIN_RENDER_SIZE: u32 = 64;
/// Largest accepted render size
pub const MAX_RENDER_SIZE: u32 = 2048;

/// Environment-derived settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL prefixed to tour links (`QREATOR_ORIGIN`)
    pub origin: String,
    /// Rendered symbol size in pixels (`QREATOR_RENDER_SIZE`)
    pub render_size: u32,
    /// Downscale still images whose longest side exceeds this (`QR_MAX_DIM`)
    pub max_image_dim: Option<u32>,
    /// Verbose logging (`QREATOR_DEBUG`)
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            render_size: DEFAULT_RENDER_SIZE,
            max_image_dim: None,
            debug: false,
        }
    }
}

impl Settings {
    /// Read from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let origin = lookup("QREATOR_ORIGIN")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

        Self {
            origin,
            render_size: parse_u32(&lookup, "QREATOR_RENDER_SIZE", DEFAULT_RENDER_SIZE)
                .clamp(MIN_RENDER_SIZE, MAX_RENDER_SIZE),
            max_image_dim: match parse_u32(&lookup, "QR_MAX_DIM", 0) {
                0 => None,
                v => Some(v),
            },
            debug: parse_bool(&lookup, "QREATOR_DEBUG", false),
        }
    }
}

fn parse_u32<F>(lookup: &F, name: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_bool<F>(lookup: &F, name: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(default)
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Process-wide settings, read on first use
pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(Settings::from_env)
}
