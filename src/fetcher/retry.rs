//! Bounded retry with credential rotation
//!
//! Wraps a [`RateFetcher`] with the per-item retry policy: up to
//! `max_retries + 1` attempts, rotating to the next credential after every
//! transient fault. `RateMissing` is terminal immediately - it is a
//! data-availability fact, not a fault. When attempts run out the outcome
//! becomes `Exhausted` and the date is dropped from output.

use crate::credentials::SharedRotator;
use crate::fetcher::{FetchOutcome, RateFetcher};
use crate::range::WorkItem;
use crate::scheduler::config::DEFAULT_MAX_RETRIES;
use std::sync::Arc;
use tracing::{info, warn};

/// Retry policy around a one-shot fetcher
pub struct RetryingFetcher {
    inner: Arc<dyn RateFetcher>,
    rotator: SharedRotator,
    max_retries: u32,
}

impl RetryingFetcher {
    /// Wrap `inner` with the default retry bound
    pub fn new(inner: Arc<dyn RateFetcher>, rotator: SharedRotator) -> Self {
        Self {
            inner,
            rotator,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set the number of retries after the initial attempt
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Fetch one work item, retrying transient faults with rotated credentials
    ///
    /// Concurrent callers share the rotator, so the credential index logged
    /// here may already reflect a sibling's rotation; that only shifts which
    /// quota is consumed, never the computed rate.
    pub async fn fetch(&self, item: &WorkItem) -> FetchOutcome {
        let mut credential = self.rotator.current().clone();

        for attempt in 0..=self.max_retries {
            let outcome = self.inner.fetch(item.date, &item.pair, &credential).await;

            match outcome {
                FetchOutcome::Transient { date, cause } => {
                    warn!(
                        %date,
                        credential_index = self.rotator.current_index(),
                        attempt = attempt + 1,
                        max_attempts = self.max_retries + 1,
                        cause = %cause,
                        "transient fetch failure"
                    );

                    if attempt == self.max_retries {
                        warn!(
                            %date,
                            credential_index = self.rotator.current_index(),
                            "retries exhausted - dropping date from output"
                        );
                        return FetchOutcome::Exhausted { date };
                    }

                    credential = self.rotator.advance().clone();
                    info!(
                        %date,
                        credential_index = self.rotator.current_index(),
                        "rotated to next credential"
                    );
                }
                outcome => return outcome,
            }
        }

        FetchOutcome::Exhausted { date: item.date }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{Credential, CredentialRotator};
    use crate::pair::CurrencyPair;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Fetcher that fails transiently a fixed number of times, then succeeds.
    struct FlakyFetcher {
        failures: AtomicUsize,
        credentials_seen: Mutex<Vec<String>>,
    }

    impl FlakyFetcher {
        fn new(failures: usize) -> Self {
            Self {
                failures: AtomicUsize::new(failures),
                credentials_seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RateFetcher for FlakyFetcher {
        async fn fetch(
            &self,
            date: NaiveDate,
            _pair: &CurrencyPair,
            credential: &Credential,
        ) -> FetchOutcome {
            self.credentials_seen
                .lock()
                .unwrap()
                .push(credential.secret().to_string());

            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                FetchOutcome::Transient {
                    date,
                    cause: "simulated fault".to_string(),
                }
            } else {
                FetchOutcome::Success { date, rate: 1.08 }
            }
        }
    }

    /// Fetcher that reports the symbol as unavailable.
    struct MissingFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RateFetcher for MissingFetcher {
        async fn fetch(
            &self,
            date: NaiveDate,
            _pair: &CurrencyPair,
            _credential: &Credential,
        ) -> FetchOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            FetchOutcome::RateMissing { date }
        }
    }

    fn rotator(n: usize) -> SharedRotator {
        let credentials = (0..n).map(|i| Credential::new(format!("key-{i}"))).collect();
        CredentialRotator::shared(credentials).unwrap()
    }

    fn item() -> WorkItem {
        WorkItem {
            date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            pair: CurrencyPair::parse("eur-usd").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_two_transient_failures_rotating_twice() {
        let inner = Arc::new(FlakyFetcher::new(2));
        let rotator = rotator(3);
        let fetcher = RetryingFetcher::new(inner.clone(), Arc::clone(&rotator));

        let outcome = fetcher.fetch(&item()).await;

        assert!(matches!(outcome, FetchOutcome::Success { rate, .. } if rate == 1.08));
        assert_eq!(
            *inner.credentials_seen.lock().unwrap(),
            vec!["key-0", "key-1", "key-2"]
        );
        // rotated exactly twice
        assert_eq!(rotator.current_index(), 2);
    }

    #[tokio::test]
    async fn test_exhausts_after_max_retries_plus_one_attempts() {
        let inner = Arc::new(FlakyFetcher::new(usize::MAX));
        let fetcher = RetryingFetcher::new(inner.clone(), rotator(2)).with_max_retries(2);

        let outcome = fetcher.fetch(&item()).await;

        assert_eq!(outcome, FetchOutcome::Exhausted { date: item().date });
        assert_eq!(inner.credentials_seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_rate_missing_is_terminal_without_retry() {
        let inner = Arc::new(MissingFetcher {
            calls: AtomicUsize::new(0),
        });
        let rotator = rotator(3);
        let fetcher = RetryingFetcher::new(inner.clone(), Arc::clone(&rotator));

        let outcome = fetcher.fetch(&item()).await;

        assert_eq!(outcome, FetchOutcome::RateMissing { date: item().date });
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(rotator.current_index(), 0);
    }

    #[tokio::test]
    async fn test_zero_retries_means_single_attempt() {
        let inner = Arc::new(FlakyFetcher::new(usize::MAX));
        let fetcher = RetryingFetcher::new(inner.clone(), rotator(2)).with_max_retries(0);

        let outcome = fetcher.fetch(&item()).await;

        assert!(matches!(outcome, FetchOutcome::Exhausted { .. }));
        assert_eq!(inner.credentials_seen.lock().unwrap().len(), 1);
    }
}
