//! Shared configuration for sketchcast
//!
//! This crate provides the single source of truth for the canvas dimensions
//! used when rasterizing a drawing, and for the inference service settings
//! (model, endpoint, credentials). Everything is read once at process start.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default canvas width in logical pixels
pub const DEFAULT_WIDTH: u32 = 411;

/// Default canvas height in logical pixels
pub const DEFAULT_HEIGHT: u32 = 891;

/// Default scale factor (logical to physical pixels)
pub const DEFAULT_SCALE: f32 = 2.625;

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default service endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Prompt sent alongside every rasterized drawing
pub const DEFAULT_PROMPT: &str = "What is being drawn in this image? Guess the object or scene.";

/// Environment variable names
pub const ENV_WIDTH: &str = "SKETCHCAST_WIDTH";
pub const ENV_HEIGHT: &str = "SKETCHCAST_HEIGHT";
pub const ENV_SCALE: &str = "SKETCHCAST_SCALE";
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_MODEL: &str = "SKETCHCAST_MODEL";
pub const ENV_ENDPOINT: &str = "SKETCHCAST_ENDPOINT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Display configuration for the drawing canvas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Canvas width in logical pixels
    pub width: u32,
    /// Canvas height in logical pixels
    pub height: u32,
    /// Scale factor for DPI scaling
    pub scale: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
        }
    }
}

impl DisplayConfig {
    /// Create a new display config with the given dimensions and no scaling
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: 1.0,
        }
    }

    /// Read overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, falling back to defaults
    /// for missing or unparseable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            width: parse_or(&lookup, ENV_WIDTH, defaults.width),
            height: parse_or(&lookup, ENV_HEIGHT, defaults.height),
            scale: parse_or(&lookup, ENV_SCALE, defaults.scale),
        }
    }

    /// Get scaled width (physical pixels, the bitmap width)
    pub fn scaled_width(&self) -> u32 {
        (self.width as f32 * self.scale) as u32
    }

    /// Get scaled height (physical pixels, the bitmap height)
    pub fn scaled_height(&self) -> u32 {
        (self.height as f32 * self.scale) as u32
    }
}

/// Settings for the remote inference service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// API key; requests fail with an auth error when absent
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model identifier, e.g. `gemini-1.5-flash`
    pub model: String,
    /// Base URL of the service, without trailing slash
    pub endpoint: String,
    /// Natural-language prompt sent with each image
    pub prompt: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl InferenceConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_key: non_empty(ENV_API_KEY),
            model: non_empty(ENV_MODEL).unwrap_or(defaults.model),
            endpoint: non_empty(ENV_ENDPOINT)
                .map(|e| e.trim_end_matches('/').to_string())
                .unwrap_or(defaults.endpoint),
            prompt: defaults.prompt,
        }
    }
}

/// Parse a single value, returning an error describing the bad input
pub fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match parse_value(key, &raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("{}, using default", e);
            default
        }
    }
}
