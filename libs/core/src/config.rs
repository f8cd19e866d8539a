use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_GRAPH_BASE: &str = "https://graph.facebook.com/v2.6";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacebookConfig {
    #[serde(default)]
    pub token: Option<String>,
    /// Enables `X-Hub-Signature` validation when set.
    #[serde(default)]
    pub app_secret: Option<String>,
    #[serde(default = "default_graph_base")]
    pub graph_base: String,
}

impl Default for FacebookConfig {
    fn default() -> Self {
        Self {
            token: None,
            app_secret: None,
            graph_base: default_graph_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: Option<String>,
    /// Expected `X-Telegram-Bot-Api-Secret-Token`; validation is skipped when unset.
    #[serde(default)]
    pub webhook_secret: Option<String>,
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            webhook_secret: None,
            api_base: default_telegram_api_base(),
        }
    }
}

/// Read-only credentials shared by all drivers.
///
/// ```
/// use gsm_core::DriverConfig;
///
/// let cfg = DriverConfig::from_lookup(|key| match key {
///     "FACEBOOK_TOKEN" => Some("page-token".into()),
///     "TELEGRAM_TOKEN" => Some("".into()),
///     _ => None,
/// });
/// assert_eq!(cfg.facebook.token.as_deref(), Some("page-token"));
/// assert_eq!(cfg.telegram.token, None);
/// assert_eq!(cfg.facebook.graph_base, "https://graph.facebook.com/v2.6");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriverConfig {
    #[serde(default)]
    pub facebook: FacebookConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

impl DriverConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            facebook: FacebookConfig {
                token: get("FACEBOOK_TOKEN"),
                app_secret: get("FACEBOOK_APP_SECRET"),
                graph_base: get("FACEBOOK_GRAPH_BASE").unwrap_or_else(default_graph_base),
            },
            telegram: TelegramConfig {
                token: get("TELEGRAM_TOKEN"),
                webhook_secret: get("TELEGRAM_WEBHOOK_SECRET"),
                api_base: get("TELEGRAM_API_BASE").unwrap_or_else(default_telegram_api_base),
            },
        }
        .normalized()
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let cfg: Self = serde_yaml_bw::from_str(raw).context("parse driver config yaml")?;
        Ok(cfg.normalized())
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(raw).context("parse driver config json")?;
        Ok(cfg.normalized())
    }

    fn normalized(mut self) -> Self {
        for slot in [
            &mut self.facebook.token,
            &mut self.facebook.app_secret,
            &mut self.telegram.token,
            &mut self.telegram.webhook_secret,
        ] {
            if slot.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *slot = None;
            }
        }
        self
    }
}

fn default_graph_base() -> String {
    DEFAULT_GRAPH_BASE.to_string()
}

fn default_telegram_api_base() -> String {
    DEFAULT_TELEGRAM_API_BASE.to_string()
}
