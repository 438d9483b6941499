use crate::util::atomic_write;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

const KEY_PREFIX: &str = "gsk_";
const KEY_MIN_LEN: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_requests: u32,
    pub window_secs: u64,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            max_requests: 10,
            window_secs: 60,
            timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).context("read settings")?;
        let parsed = toml::from_str::<Settings>(&raw).context("parse settings")?;
        Ok(parsed)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let data = toml::to_string_pretty(self)?;
        atomic_write(path, data.as_bytes())
    }

    /// Settings entry wins over the environment. Returns `None` when
    /// neither source yields a key; the caller decides whether it can
    /// recover interactively.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            if !key.trim().is_empty() {
                return Some(key.trim().to_string());
            }
        }
        std::env::var("GROQ_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

/// Shape check for a vendor key before persisting one supplied by the user.
pub fn key_looks_valid(key: &str) -> bool {
    key.starts_with(KEY_PREFIX) && key.len() >= KEY_MIN_LEN
}
