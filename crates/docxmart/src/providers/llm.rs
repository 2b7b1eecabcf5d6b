//! Text generator trait

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::{Error, Result};

/// Single-shot instruction → text generation
///
/// Implementations:
/// - `OpenAiGenerator`: OpenAI-compatible chat completions (AI71 by default)
/// - `OllamaGenerator`: Local Ollama server
/// - `MockGenerator`: Scripted responses for tests
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a response for one instruction
    async fn generate(&self, instruction: &str) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}

/// Retry a request with exponential backoff
pub(crate) async fn retry_request<F, Fut, T>(max_retries: u32, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error = None;

    for attempt in 0..=max_retries {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempt < max_retries {
                    let delay = Duration::from_secs(2u64.pow(attempt));
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {}, retrying in {:?}",
                        attempt + 1,
                        max_retries + 1,
                        e,
                        delay
                    );
                    sleep(delay).await;
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| Error::llm("Unknown error")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_no_retries_fails_once() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_request(0, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::llm("down")) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_then_success() {
        let calls = AtomicU32::new(0);
        let result = retry_request(2, || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(Error::llm("flaky"))
                } else {
                    Ok("ok")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
