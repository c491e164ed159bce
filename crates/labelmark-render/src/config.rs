use crate::spans::SpanOptions;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const FONT_FAMILY_ENV: &str = "LABELMARK_FONT_FAMILY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelConfig {
    /// Comma-separated family preference list.
    pub font_family: String,
    pub font_size_px: f64,
    pub close_trailing: bool,
    pub escape_text: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size_px: 16.0,
            close_trailing: true,
            escape_text: false,
        }
    }
}

impl LabelConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.font_size_px.is_finite() && self.font_size_px > 0.0) {
            return Err(Error::InvalidConfig {
                message: format!("fontSizePx must be a positive number, got {}", self.font_size_px),
            });
        }
        Ok(())
    }

    /// Applies [`FONT_FAMILY_ENV`] from the process environment.
    pub fn apply_env(self) -> Self {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    pub fn apply_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(family) = lookup(FONT_FAMILY_ENV).filter(|v| !v.trim().is_empty()) {
            self.font_family = family;
        }
        self
    }

    pub fn span_options(&self) -> SpanOptions {
        SpanOptions {
            close_trailing: self.close_trailing,
            escape_text: self.escape_text,
        }
    }
}
