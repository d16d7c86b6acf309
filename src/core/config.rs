use std::env;

use anyhow::{Context, Result};

use crate::client::{ApiVariant, ParseMode};

pub const DEFAULT_BASE_URL: &str = "http://api.kisspush.net/";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub variant: ApiVariant,
    pub parse_mode: ParseMode,
    // Empty until the push provider hands out a token
    pub registration_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            variant: ApiVariant::default(),
            parse_mode: ParseMode::default(),
            registration_id: String::new(),
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `KISSPUSH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup("KISSPUSH_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(variant) = lookup("KISSPUSH_API_VARIANT") {
            config.variant = variant
                .parse()
                .context("Invalid KISSPUSH_API_VARIANT")?;
        }
        if let Some(mode) = lookup("KISSPUSH_PARSE_MODE") {
            config.parse_mode = mode.parse().context("Invalid KISSPUSH_PARSE_MODE")?;
        }
        if let Some(reg_id) = lookup("KISSPUSH_REG_ID") {
            config.registration_id = reg_id;
        }

        Ok(config)
    }
}
