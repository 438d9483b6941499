use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("rate limit exceeded, retry in {}s", wait_secs(.wait))]
    RateLimited { wait: Duration },

    #[error("no API key configured")]
    MissingCredential,

    #[error("{0}")]
    InvalidInput(String),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] anyhow::Error),
}

impl EnhanceError {
    /// Message safe to show the user. Upstream detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            EnhanceError::Upstream(_) => {
                "Failed to enhance prompt. Please try again or check your settings.".into()
            }
            other => other.to_string(),
        }
    }
}

// Waits are reported rounded up so "retry in 0s" never shows for a live
// window.
fn wait_secs(wait: &Duration) -> u64 {
    let secs = wait.as_secs();
    if wait.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
