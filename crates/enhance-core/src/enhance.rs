use crate::client::Completion;
use crate::error::EnhanceError;
use crate::rate::RateLimiter;
use crate::transform::{clean_response, sanitize_input, validate_input};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One enhancement pipeline: validation, the single rate-limit gate, the
/// upstream call, response cleanup. Owns its limiter; there are no ambient
/// counters anywhere else.
pub struct Enhancer {
    limiter: RateLimiter,
    backend: Arc<dyn Completion>,
}

impl Enhancer {
    pub fn new(backend: Arc<dyn Completion>, max_requests: u32, window: Duration) -> Self {
        Self {
            limiter: RateLimiter::new(max_requests, window),
            backend,
        }
    }

    /// Validation and rate-limit denial both fire before anything touches
    /// the network.
    pub async fn enhance(&mut self, input: &str) -> Result<String, EnhanceError> {
        let prompt = validate_input(input)?;

        if !self.limiter.check() {
            let wait = self.limiter.time_until_next();
            warn!(wait_ms = wait.as_millis() as u64, "rate limit denial");
            return Err(EnhanceError::RateLimited { wait });
        }
        debug!(prompt_len = prompt.len(), "request admitted");

        let raw = self.backend.complete(&prompt).await?;
        let cleaned = clean_response(&raw);
        let out = sanitize_input(&cleaned);

        info!(
            prompt_len = prompt.len(),
            response_len = out.len(),
            "prompt enhanced"
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeBackend {
        reply: String,
        calls: AtomicUsize,
    }

    impl FakeBackend {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.into(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Completion for FakeBackend {
        async fn complete(&self, _prompt: &str) -> Result<String, EnhanceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_backend() {
        let backend = FakeBackend::new("out");
        let mut enhancer = Enhancer::new(backend.clone(), 5, Duration::from_secs(60));
        let err = enhancer.enhance("   ").await.unwrap_err();
        assert!(matches!(err, EnhanceError::InvalidInput(_)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn quota_denial_never_reaches_backend() {
        let backend = FakeBackend::new("out");
        let mut enhancer = Enhancer::new(backend.clone(), 2, Duration::from_secs(60));
        assert!(enhancer.enhance("one").await.is_ok());
        assert!(enhancer.enhance("two").await.is_ok());
        let err = enhancer.enhance("three").await.unwrap_err();
        match err {
            EnhanceError::RateLimited { wait } => {
                assert!(wait > Duration::ZERO);
                assert!(wait <= Duration::from_secs(60));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn cleans_and_sanitizes_backend_output() {
        let backend =
            FakeBackend::new("Here's an enhanced prompt: Write a <T> generic function");
        let mut enhancer = Enhancer::new(backend, 5, Duration::from_secs(60));
        let out = enhancer.enhance("write fn").await.unwrap();
        assert_eq!(out, "Write a &lt;T&gt; generic function");
    }

    #[tokio::test]
    async fn input_is_trimmed_before_send() {
        struct Capture;
        #[async_trait]
        impl Completion for Capture {
            async fn complete(&self, prompt: &str) -> Result<String, EnhanceError> {
                assert_eq!(prompt, "hi");
                Ok("ok".into())
            }
        }
        let mut enhancer = Enhancer::new(Arc::new(Capture), 5, Duration::from_secs(60));
        assert_eq!(enhancer.enhance("  hi  ").await.unwrap(), "ok");
    }
}
