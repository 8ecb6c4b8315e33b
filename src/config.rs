//! # Bot Configuration Module
//!
//! Configuration structures for the bot: ASCII rendering geometry, image
//! transform parameters, download recovery settings and session expiry.
//! Values come from the environment (optionally via a `.env` file) and fall
//! back to the defaults below.

use anyhow::{anyhow, Context, Result};
use std::str::FromStr;
use std::time::Duration;

// Constants for bot configuration
pub const DEFAULT_ASCII_WIDTH: u32 = 40;
pub const DEFAULT_MESSAGE_LIMIT: usize = 4000;
/// Monospace glyphs are taller than wide; rows are squashed by this factor.
pub const GLYPH_HEIGHT_FACTOR: f64 = 0.55;
pub const DEFAULT_PIXEL_SIZE: u32 = 20;
pub const DEFAULT_JPEG_QUALITY: u8 = 90;
pub const MAX_FILE_SIZE: u32 = 10 * 1024 * 1024; // 10MB limit for image files

/// Which main menu the bot presents after a photo arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuVariant {
    /// Pixelate, ASCII art, invert and reflection
    #[default]
    Extended,
    /// Pixelate, ASCII art and invert
    Reduced,
}

impl FromStr for MenuVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "extended" | "full" => Ok(MenuVariant::Extended),
            "reduced" | "basic" => Ok(MenuVariant::Reduced),
            other => Err(anyhow!("unknown menu variant '{other}'")),
        }
    }
}

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("unknown log format '{other}'")),
        }
    }
}

/// ASCII rendering geometry
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiSettings {
    /// Width of every rendered row in characters
    pub width: u32,
    /// Hard ceiling on the size of the outgoing message
    pub message_limit: usize,
    /// Vertical squash applied to the aspect ratio
    pub height_factor: f64,
}

impl Default for AsciiSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_ASCII_WIDTH,
            message_limit: DEFAULT_MESSAGE_LIMIT,
            height_factor: GLYPH_HEIGHT_FACTOR,
        }
    }
}

/// Recovery configuration for image downloads
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryConfig {
    /// Maximum number of retry attempts after the first failure
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Timeout for a single download attempt in seconds
    pub operation_timeout_secs: u64,
    /// Largest file the bot agrees to fetch, in bytes
    pub max_file_size: u32,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_retry_delay_ms: 500,
            max_retry_delay_ms: 5000,
            operation_timeout_secs: 30,
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl RecoveryConfig {
    /// Backoff before retry number `attempt` (1-based), without jitter.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        let delay = self.base_retry_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.max_retry_delay_ms))
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }
}

/// Top-level configuration of the bot
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub ascii: AsciiSettings,
    /// Block size used by the pixelate action
    pub pixel_size: u32,
    pub jpeg_quality: u8,
    pub menu_variant: MenuVariant,
    /// Sessions older than this are treated as missing; `None` keeps them forever
    pub session_ttl: Option<Duration>,
    pub recovery: RecoveryConfig,
    pub log_format: LogFormat,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            ascii: AsciiSettings::default(),
            pixel_size: DEFAULT_PIXEL_SIZE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            menu_variant: MenuVariant::default(),
            session_ttl: None,
            recovery: RecoveryConfig::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl BotConfig {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Unset keys keep their default; set but unparsable keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(width) = parse_var::<u32, _>(&lookup, "ASCII_WIDTH")? {
            if width == 0 || width as usize + 1 > config.ascii.message_limit / 2 {
                return Err(anyhow!("ASCII_WIDTH must be between 1 and {}", config.ascii.message_limit / 2 - 1));
            }
            config.ascii.width = width;
        }
        if let Some(pixel_size) = parse_var::<u32, _>(&lookup, "PIXEL_SIZE")? {
            if pixel_size == 0 {
                return Err(anyhow!("PIXEL_SIZE must be at least 1"));
            }
            config.pixel_size = pixel_size;
        }
        if let Some(quality) = parse_var::<u8, _>(&lookup, "JPEG_QUALITY")? {
            if !(1..=100).contains(&quality) {
                return Err(anyhow!("JPEG_QUALITY must be between 1 and 100"));
            }
            config.jpeg_quality = quality;
        }
        if let Some(variant) = parse_var::<MenuVariant, _>(&lookup, "MENU_VARIANT")? {
            config.menu_variant = variant;
        }
        if let Some(ttl) = parse_var::<u64, _>(&lookup, "SESSION_TTL_SECS")? {
            config.session_ttl = (ttl > 0).then(|| Duration::from_secs(ttl));
        }
        if let Some(timeout) = parse_var::<u64, _>(&lookup, "DOWNLOAD_TIMEOUT_SECS")? {
            config.recovery.operation_timeout_secs = timeout;
        }
        if let Some(retries) = parse_var::<u32, _>(&lookup, "DOWNLOAD_MAX_RETRIES")? {
            config.recovery.max_retries = retries;
        }
        if let Some(size) = parse_var::<u32, _>(&lookup, "MAX_FILE_SIZE")? {
            config.recovery.max_file_size = size;
        }
        if let Some(format) = parse_var::<LogFormat, _>(&lookup, "LOG_FORMAT")? {
            config.log_format = format;
        }

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("invalid value '{raw}' for {key}")),
        _ => Ok(None),
    }
}
