//! Credential rotation shared across concurrent fetch workers
//!
//! Holds an ordered set of API access keys with a single "current" one.
//! Rotation is cyclic and process-local. The index is an atomic counter so
//! concurrent `advance()` calls never race; no ordering guarantee is made
//! about which work item observes which rotation when several happen at
//! once - credential choice only affects which quota is consumed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared handle to a credential rotator.
pub type SharedRotator = Arc<CredentialRotator>;

/// An opaque API access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token string
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw token, for use in request parameters
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Credential {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Credential {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Cyclic rotator over a non-empty ordered credential set
///
/// The rotation index is stored as a raw monotonic counter and reduced
/// modulo the set size on every access, so it is always within bounds.
#[derive(Debug)]
pub struct CredentialRotator {
    credentials: Vec<Credential>,
    counter: AtomicUsize,
}

impl CredentialRotator {
    /// Create a rotator starting at index 0
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::NoCredentials`] for an empty set.
    pub fn new(credentials: Vec<Credential>) -> Result<Self, CredentialError> {
        if credentials.is_empty() {
            return Err(CredentialError::NoCredentials);
        }
        Ok(Self {
            credentials,
            counter: AtomicUsize::new(0),
        })
    }

    /// Create a new shared rotator wrapped in [`Arc`]
    pub fn shared(credentials: Vec<Credential>) -> Result<SharedRotator, CredentialError> {
        Ok(Arc::new(Self::new(credentials)?))
    }

    /// Number of credentials in the set
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Whether the set is empty (never true for a constructed rotator)
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Index of the current credential
    pub fn current_index(&self) -> usize {
        self.counter.load(Ordering::SeqCst) % self.credentials.len()
    }

    /// The current credential
    pub fn current(&self) -> &Credential {
        &self.credentials[self.current_index()]
    }

    /// Advance to the next credential, wrapping around, and return it
    pub fn advance(&self) -> &Credential {
        let next = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        &self.credentials[next % self.credentials.len()]
    }
}

/// Errors that can occur during rotator construction
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// No credentials were configured
    #[error("credential error: no credentials configured")]
    NoCredentials,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotator(n: usize) -> CredentialRotator {
        let credentials = (0..n).map(|i| Credential::new(format!("key-{i}"))).collect();
        CredentialRotator::new(credentials).unwrap()
    }

    #[test]
    fn test_empty_set_is_rejected() {
        assert!(matches!(
            CredentialRotator::new(Vec::new()),
            Err(CredentialError::NoCredentials)
        ));
    }

    #[test]
    fn test_starts_at_index_zero() {
        let rotator = rotator(3);
        assert_eq!(rotator.current_index(), 0);
        assert_eq!(rotator.current().secret(), "key-0");
    }

    #[test]
    fn test_advance_wraps_modulo_len() {
        let rotator = rotator(3);
        assert_eq!(rotator.advance().secret(), "key-1");
        assert_eq!(rotator.advance().secret(), "key-2");
        assert_eq!(rotator.advance().secret(), "key-0");
        assert_eq!(rotator.current_index(), 0);
    }

    #[test]
    fn test_k_advances_from_i_yield_i_plus_k_mod_n() {
        let rotator = rotator(4);
        for k in 1..=13 {
            rotator.advance();
            assert_eq!(rotator.current_index(), k % 4);
        }
    }

    #[test]
    fn test_current_always_in_bounds_under_concurrency() {
        let rotator = Arc::new(rotator(3));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let rotator = Arc::clone(&rotator);
            handles.push(std::thread::spawn(move || {
                for _ in 0..1000 {
                    rotator.advance();
                    assert!(rotator.current_index() < rotator.len());
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        // 8 threads x 1000 advances from index 0
        assert_eq!(rotator.current_index(), 8000 % 3);
    }

    #[test]
    fn test_single_credential_set() {
        let rotator = rotator(1);
        assert_eq!(rotator.advance().secret(), "key-0");
        assert_eq!(rotator.current().secret(), "key-0");
    }
}
