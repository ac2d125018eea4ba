use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extraction::document::{ExtractedText, RawDocument, QUALITY_BAR_CHARS};
use crate::llm_client::LlmError;

/// Why a single strategy did not produce usable text.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("extracted {chars} characters, below the {QUALITY_BAR_CHARS}-character quality bar")]
    BelowQualityBar { chars: usize },

    #[error("no text found")]
    Empty,

    #[error("extraction failed: {0}")]
    Failed(String),

    #[error("parser crashed: {0}")]
    Crashed(String),

    #[error("vision call failed: {0}")]
    Upstream(#[from] LlmError),
}

/// One way of turning document bytes into text.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract(&self, document: &RawDocument) -> Result<ExtractedText, StrategyError>;
}

/// A strategy that did not succeed, kept for diagnostics.
#[derive(Debug)]
pub struct FailedAttempt {
    pub strategy: &'static str,
    pub error: StrategyError,
}

/// Serializable summary of a failed attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptSummary {
    pub strategy: &'static str,
    pub error: String,
}

impl From<&FailedAttempt> for AttemptSummary {
    fn from(attempt: &FailedAttempt) -> Self {
        Self {
            strategy: attempt.strategy,
            error: attempt.error.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct ChainSuccess {
    pub text: ExtractedText,
    /// Strategies that failed before the winner.
    pub skipped: Vec<AttemptSummary>,
}

/// Every strategy failed. Attempts are in the order they were tried.
#[derive(Debug)]
pub struct ChainFailure {
    pub attempts: Vec<FailedAttempt>,
}

impl ChainFailure {
    pub fn last_error(&self) -> Option<&StrategyError> {
        self.attempts.last().map(|a| &a.error)
    }

    pub fn summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| format!("{}: {}", a.strategy, a.error))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Ordered list of strategies. The first one to produce text wins.
#[derive(Clone, Default)]
pub struct ExtractionChain {
    strategies: Vec<Arc<dyn ExtractionStrategy>>,
}

impl ExtractionChain {
    pub fn new(strategies: Vec<Arc<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Tries each strategy in sequence. Strategies never run concurrently.
    pub async fn run(&self, document: &RawDocument) -> Result<ChainSuccess, ChainFailure> {
        let mut attempts: Vec<FailedAttempt> = Vec::new();

        for strategy in &self.strategies {
            debug!(strategy = strategy.name(), "Trying extraction strategy");

            match strategy.extract(document).await {
                Ok(text) => {
                    info!(
                        strategy = strategy.name(),
                        chars = text.char_count(),
                        failed_before = attempts.len(),
                        "Extraction strategy succeeded"
                    );
                    return Ok(ChainSuccess {
                        text,
                        skipped: attempts.iter().map(AttemptSummary::from).collect(),
                    });
                }
                Err(error) => {
                    warn!(
                        strategy = strategy.name(),
                        "Extraction strategy failed, falling through: {error}"
                    );
                    attempts.push(FailedAttempt {
                        strategy: strategy.name(),
                        error,
                    });
                }
            }
        }

        Err(ChainFailure { attempts })
    }
}

/// Runs a synchronous parser on the blocking pool.
/// A panic inside the parser becomes `StrategyError::Crashed`.
pub(crate) async fn run_blocking<F>(document: &RawDocument, parse: F) -> Result<String, StrategyError>
where
    F: FnOnce(&[u8]) -> Result<String, StrategyError> + Send + 'static,
{
    let content = document.content().clone();
    match tokio::task::spawn_blocking(move || parse(&content)).await {
        Ok(result) => result,
        Err(e) => Err(StrategyError::Crashed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        name: &'static str,
        output: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn ok(name: &'static str, output: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                output: Some(output),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                output: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ExtractionStrategy for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn extract(&self, _document: &RawDocument) -> Result<ExtractedText, StrategyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.output {
                Some(text) => ExtractedText::new(text.to_string(), self.name),
                None => Err(StrategyError::Failed("boom".to_string())),
            }
        }
    }

    fn doc() -> RawDocument {
        RawDocument::new(Vec::<u8>::new(), "cv.docx", "application/msword")
    }

    const LONG: &str = "Experienced engineer with a decade of distributed systems work.";

    #[tokio::test]
    async fn test_first_success_wins_and_later_strategies_not_called() {
        let first = Fixed::ok("first", LONG);
        let second = Fixed::ok("second", LONG);
        let strategies: Vec<Arc<dyn ExtractionStrategy>> = vec![first.clone(), second.clone()];
        let chain = ExtractionChain::new(strategies);

        let success = chain.run(&doc()).await.unwrap();
        assert_eq!(success.text.strategy(), "first");
        assert!(success.skipped.is_empty());
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_and_short_output_fall_through() {
        let crash = Fixed::failing("crash");
        let short = Fixed::ok("short", "too short");
        let good = Fixed::ok("good", LONG);
        let strategies: Vec<Arc<dyn ExtractionStrategy>> = vec![crash, short, good];
        let chain = ExtractionChain::new(strategies);

        let success = chain.run(&doc()).await.unwrap();
        assert_eq!(success.text.strategy(), "good");
        let skipped: Vec<_> = success.skipped.iter().map(|a| a.strategy).collect();
        assert_eq!(skipped, vec!["crash", "short"]);
        assert!(success.skipped[1].error.contains("quality bar"));
    }

    #[tokio::test]
    async fn test_all_failing_returns_every_attempt_in_order() {
        let strategies: Vec<Arc<dyn ExtractionStrategy>> =
            vec![Fixed::failing("a"), Fixed::ok("b", "tiny")];
        let chain = ExtractionChain::new(strategies);

        let failure = chain.run(&doc()).await.unwrap_err();
        assert_eq!(failure.attempts.len(), 2);
        assert_eq!(failure.attempts[0].strategy, "a");
        assert!(matches!(
            failure.last_error(),
            Some(StrategyError::BelowQualityBar { chars: 4 })
        ));
        assert!(failure.summary().starts_with("a: extraction failed: boom"));
    }

    #[tokio::test]
    async fn test_empty_chain_fails_with_no_attempts() {
        let chain = ExtractionChain::default();
        assert!(chain.is_empty());
        let failure = chain.run(&doc()).await.unwrap_err();
        assert!(failure.attempts.is_empty());
    }

    #[tokio::test]
    async fn test_run_blocking_turns_panic_into_crash() {
        let result = run_blocking(&doc(), |_| -> Result<String, StrategyError> {
            panic!("parser exploded")
        })
        .await;
        assert!(matches!(result, Err(StrategyError::Crashed(_))));
    }

    #[tokio::test]
    async fn test_run_blocking_passes_bytes_through() {
        let document = RawDocument::new(b"abc".to_vec(), "a.txt", "text/plain");
        let result = run_blocking(&document, |bytes| Ok(bytes.len().to_string())).await;
        assert_eq!(result.unwrap(), "3");
    }
}
