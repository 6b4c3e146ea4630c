//! Application configuration

use sketchcast_config::{DisplayConfig, InferenceConfig};

/// Everything the host needs at start-up
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub inference: InferenceConfig,
}

impl AppConfig {
    /// Parse configuration from environment
    pub fn from_env() -> Self {
        Self {
            display: DisplayConfig::from_env(),
            inference: InferenceConfig::from_env(),
        }
    }

    /// Bitmap size sent to the service, in physical pixels
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.display.scaled_width(), self.display.scaled_height())
    }
}
