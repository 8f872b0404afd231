//! Currency pair parsing and validation
//!
//! Implements the pair format BASE-QUOTE (e.g. "aud-try")

use std::fmt;

/// Ordered currency pair using format BASE-QUOTE
///
/// Both components are normalized to uppercase for consistency and are
/// immutable once parsed.
///
/// # Examples
///
/// ```
/// use fx_rate_downloader::pair::CurrencyPair;
///
/// let pair = CurrencyPair::parse("aud-try").unwrap();
/// assert_eq!(pair.base(), "AUD");
/// assert_eq!(pair.quote(), "TRY");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    base: String,
    quote: String,
}

impl CurrencyPair {
    /// Parse a pair string into a CurrencyPair
    ///
    /// Input is case-insensitive and will be normalized to uppercase.
    ///
    /// # Format
    ///
    /// `BASE-QUOTE`
    ///
    /// # Errors
    ///
    /// Returns an error unless the input has exactly two non-empty components.
    pub fn parse(s: &str) -> Result<Self, PairError> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 2 {
            return Err(PairError::InvalidFormat(
                "invalid pair format: expected BASE-QUOTE".to_string(),
            ));
        }

        let base = parts[0].trim().to_uppercase();
        let quote = parts[1].trim().to_uppercase();

        if base.is_empty() {
            return Err(PairError::InvalidFormat(
                "base component cannot be empty".to_string(),
            ));
        }
        if quote.is_empty() {
            return Err(PairError::InvalidFormat(
                "quote component cannot be empty".to_string(),
            ));
        }

        Ok(Self { base, quote })
    }

    /// Get the base currency code (uppercase)
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Get the quote currency code (uppercase)
    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// Comma-joined symbol list for the rate-lookup query string
    pub fn symbols_param(&self) -> String {
        format!("{},{}", self.base, self.quote)
    }

    /// Convert the pair to filesystem-safe format
    ///
    /// Returns lowercase with an underscore separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use fx_rate_downloader::pair::CurrencyPair;
    ///
    /// let pair = CurrencyPair::parse("AUD-TRY").unwrap();
    /// assert_eq!(pair.to_filesystem_safe(), "aud_try");
    /// ```
    pub fn to_filesystem_safe(&self) -> String {
        format!("{}_{}", self.base.to_lowercase(), self.quote.to_lowercase())
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}

/// Errors that can occur during pair parsing
#[derive(Debug, thiserror::Error)]
pub enum PairError {
    /// Invalid pair format
    #[error("pair error: {0}")]
    InvalidFormat(String),
}
