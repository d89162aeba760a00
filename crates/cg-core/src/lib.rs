pub mod config;
pub mod duration;
pub mod error;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Config;
pub use error::{Error, Result};

use std::time::Duration;

/// Base URL for the public CoinGecko API
pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Default cache TTL applied to every cached response
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Default upper bound on any outbound request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Advisory rate limit (requests per minute). Read from config, never enforced.
pub const DEFAULT_RATE_LIMIT: u32 = 30;

/// Interval of the background sweep that evicts expired cache entries
pub const CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// The only currency extracted from provider responses
pub const QUOTE_CURRENCY: &str = "usd";
