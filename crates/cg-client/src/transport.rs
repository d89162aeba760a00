//! HTTP transport layer for CoinGecko API requests

use cg_core::{Config, Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use url::Url;

/// The provider endpoints the dashboard reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
  /// Whole-market aggregate
  Global,
  /// Detail for one coin id
  CoinDetail(String),
  /// Free-text coin search
  Search(String),
}

impl fmt::Display for Endpoint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Endpoint::Global => write!(f, "global"),
      Endpoint::CoinDetail(id) => write!(f, "coins/{}", id),
      Endpoint::Search(query) => write!(f, "search?query={}", query),
    }
  }
}

impl Endpoint {
  fn path_segments(&self) -> Vec<&str> {
    match self {
      Endpoint::Global => vec!["global"],
      Endpoint::CoinDetail(id) => vec!["coins", id.as_str()],
      Endpoint::Search(_) => vec!["search"],
    }
  }

  fn query_params(&self) -> Vec<(&'static str, &str)> {
    match self {
      Endpoint::Global => Vec::new(),
      Endpoint::CoinDetail(_) => vec![
        ("localization", "false"),
        ("tickers", "false"),
        ("market_data", "true"),
        ("community_data", "false"),
        ("developer_data", "false"),
      ],
      Endpoint::Search(query) => vec![("query", query.as_str())],
    }
  }
}

/// HTTP transport for the provider. One request per call: no retries.
pub struct Transport {
  client: Client,
  base_url: String,
  timeout: Duration,
}

impl Transport {
  /// Create a transport from config. The configured timeout bounds every request.
  pub fn new(config: &Config) -> Result<Self> {
    Self::with_base_url(&config.api.base_url, config.timeout())
  }

  /// Create a transport against an explicit base URL
  pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
    Url::parse(base_url).map_err(|e| Error::Config(format!("Invalid base URL: {}", e)))?;
    if timeout.is_zero() {
      return Err(Error::Config("Request timeout must be greater than zero".to_string()));
    }

    let client = Client::builder()
      .timeout(timeout)
      .user_agent(concat!("neongecko/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string(), timeout })
  }

  /// Issue a GET and deserialize the body.
  ///
  /// Status is checked before the body is read; a non-success status becomes
  /// `Error::UpstreamStatus` carrying the numeric code.
  #[instrument(skip(self), fields(endpoint = %endpoint))]
  pub async fn get<T>(&self, endpoint: &Endpoint) -> Result<T>
  where
    T: DeserializeOwned,
  {
    let url = self.build_url(endpoint)?;
    debug!("Making request to: {}", url);

    let response = self.client.get(url).send().await.map_err(|e| {
      warn!("Request failed: {}", e);
      classify(e)
    })?;

    let status = response.status();
    if !status.is_success() {
      error!("Request failed with status: {}", status);
      return Err(Error::UpstreamStatus { status: status.as_u16() });
    }

    let text = response.text().await.map_err(|e| match classify(e) {
      Error::Network(msg) => Error::Network(msg),
      other => Error::Decode(format!("failed to read response body: {}", other)),
    })?;
    debug!("Response body length: {} bytes", text.len());

    serde_json::from_str::<T>(&text).map_err(|e| {
      error!("Failed to parse JSON response: {}", e);
      Error::Decode(format!("{}. Response: {}", e, snippet(&text, 200)))
    })
  }

  /// Build the full URL for an endpoint
  pub fn build_url(&self, endpoint: &Endpoint) -> Result<Url> {
    let mut url =
      Url::parse(&self.base_url).map_err(|e| Error::Config(format!("Invalid base URL: {}", e)))?;

    url
      .path_segments_mut()
      .map_err(|_| Error::Config(format!("Base URL cannot be a base: {}", self.base_url)))?
      .pop_if_empty()
      .extend(endpoint.path_segments());

    let params = endpoint.query_params();
    if !params.is_empty() {
      url.query_pairs_mut().extend_pairs(params);
    }

    Ok(url)
  }

  /// Get the base URL being used
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Get request timeout duration
  pub fn timeout(&self) -> Duration {
    self.timeout
  }
}

impl fmt::Debug for Transport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Transport")
      .field("base_url", &self.base_url)
      .field("timeout", &self.timeout)
      .finish()
  }
}

/// Map a reqwest failure into the error taxonomy
fn classify(e: reqwest::Error) -> Error {
  if e.is_timeout() {
    Error::Network(format!("request timed out: {}", e))
  } else if e.is_decode() || e.is_body() {
    Error::Decode(e.to_string())
  } else {
    Error::Network(e.to_string())
  }
}

fn snippet(text: &str, max_chars: usize) -> &str {
  match text.char_indices().nth(max_chars) {
    Some((idx, _)) => &text[..idx],
    None => text,
  }
}
