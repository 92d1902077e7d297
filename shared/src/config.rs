use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::{ApiBase, HttpError};
use crate::countdown::{Countdown, CountdownError};
use crate::error::{AppError, ErrorKind};
use crate::{
    DEFAULT_LOADED_IMAGE_CACHE, DEFAULT_MAX_IMAGE_RETRIES, DEFAULT_ROOT_MARGIN_PX,
    DEFAULT_VISIBILITY_THRESHOLD,
};

/// Runtime settings handed over by the shell in `Event::Configure`. Every
/// field except the API base has a working default, so a shell may send a
/// partial JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub countdown_start: Countdown,
    pub image_root_margin_px: u32,
    pub image_threshold: f32,
    pub max_image_retries: u32,
    pub loaded_image_cache: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            countdown_start: Countdown::default(),
            image_root_margin_px: DEFAULT_ROOT_MARGIN_PX,
            image_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            max_image_retries: DEFAULT_MAX_IMAGE_RETRIES,
            loaded_image_cache: DEFAULT_LOADED_IMAGE_CACHE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid API base URL: {0}")]
    ApiBase(#[from] HttpError),

    #[error("image visibility threshold must be within 0..=1, got {0}")]
    Threshold(f32),

    #[error("loaded image cache capacity must be at least 1")]
    EmptyCache,

    #[error("invalid countdown start: {0}")]
    Countdown(#[from] CountdownError),
}

impl AppConfig {
    pub fn with_api_base(url: impl Into<String>) -> Self {
        Self {
            api_base_url: url.into(),
            ..Self::default()
        }
    }

    /// Checks every field and returns the parsed API base on success.
    pub fn validate(&self) -> Result<ApiBase, ConfigError> {
        if !self.image_threshold.is_finite() || !(0.0..=1.0).contains(&self.image_threshold) {
            return Err(ConfigError::Threshold(self.image_threshold));
        }
        if self.loaded_image_cache == 0 {
            return Err(ConfigError::EmptyCache);
        }
        self.countdown_start.validate()?;
        Ok(ApiBase::new(self.api_base_url.as_str())?)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorKind::Validation, "The site is misconfigured").with_internal(err.to_string())
    }
}
