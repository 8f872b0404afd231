//! Environment configuration
//!
//! Credentials are supplied out-of-band via the environment, never on the
//! command line. `EXCHANGE_RATES_API_KEYS` holds a comma-separated ordered
//! list; the single-key `EXCHANGE_RATES_API_KEY` is accepted as a fallback.

use crate::credentials::Credential;
use crate::fetcher::http::DEFAULT_API_URL;
use std::env;

/// Environment variable holding a comma-separated ordered credential list
pub const API_KEYS_VAR: &str = "EXCHANGE_RATES_API_KEYS";

/// Fallback environment variable holding a single credential
pub const API_KEY_VAR: &str = "EXCHANGE_RATES_API_KEY";

/// Environment variable overriding the rate-lookup endpoint
pub const API_URL_VAR: &str = "EXCHANGE_RATES_API_URL";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Neither credential variable is set to a usable value
    #[error(
        "configuration error: no credentials configured - set EXCHANGE_RATES_API_KEYS \
         (comma-separated) or EXCHANGE_RATES_API_KEY"
    )]
    MissingCredentials,
}

/// Load the ordered credential set from the environment
///
/// # Errors
///
/// Returns [`ConfigError::MissingCredentials`] when neither variable is set
/// or the value contains no non-empty entries.
pub fn load_credentials() -> Result<Vec<Credential>, ConfigError> {
    let raw = env::var(API_KEYS_VAR)
        .or_else(|_| env::var(API_KEY_VAR))
        .map_err(|_| ConfigError::MissingCredentials)?;

    let credentials = parse_credential_list(&raw);
    if credentials.is_empty() {
        return Err(ConfigError::MissingCredentials);
    }
    Ok(credentials)
}

/// Split a comma-separated credential list, dropping empty entries
pub fn parse_credential_list(raw: &str) -> Vec<Credential> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(Credential::new)
        .collect()
}

/// Resolve the rate-lookup endpoint, honoring the override variable
pub fn api_base_url() -> String {
    env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}
