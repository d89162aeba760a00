/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use crate::cache::{keys, CachedPayload, TtlCache};
use crate::source::MarketDataSource;
use crate::transport::{Endpoint, Transport};
use async_trait::async_trait;
use cg_core::{Config, Result};
use cg_models::{
  CoinDetailResponse, CoinRecord, GlobalMarketSnapshot, GlobalResponse, SearchResponse,
  SearchResultSummary,
};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Cache-through CoinGecko client
///
/// Every fetch checks the shared cache first. On a miss it makes exactly one
/// request, normalizes the response to USD figures, stores it, and returns it.
/// Failed fetches leave the cache untouched.
///
/// # Examples
///
/// ```rust,no_run
/// use cg_client::{CoinGeckoClient, MarketDataSource};
/// use cg_core::Config;
///
/// # async fn run() -> cg_core::Result<()> {
/// let client = CoinGeckoClient::new(&Config::default())?;
/// let hits = client.search_coins("eth").await?;
/// println!("{} matches", hits.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CoinGeckoClient {
  transport: Transport,
  cache: TtlCache<CachedPayload>,
  rate_limit: u32,
}

impl CoinGeckoClient {
  /// Create a new client from configuration
  ///
  /// Must be called inside a tokio runtime: the cache starts its sweep task here.
  ///
  /// # Errors
  ///
  /// Returns an error if the base URL is invalid or the HTTP client cannot be created.
  pub fn new(config: &Config) -> Result<Self> {
    let transport = Transport::new(config)?;
    let cache = TtlCache::new(config.cache_ttl());
    let rate_limit = config.api.rate_limit;

    info!(
      "CoinGecko client ready (base_url: {}, ttl: {:?}, timeout: {:?})",
      transport.base_url(),
      cache.ttl(),
      transport.timeout()
    );
    Ok(Self { transport, cache, rate_limit })
  }

  /// Create a client against an explicit base URL, bypassing config
  pub fn with_base_url(base_url: &str, cache_ttl: Duration, timeout: Duration) -> Result<Self> {
    Ok(Self {
      transport: Transport::with_base_url(base_url, timeout)?,
      cache: TtlCache::new(cache_ttl),
      rate_limit: cg_core::DEFAULT_RATE_LIMIT,
    })
  }

  /// The shared response cache
  pub fn cache(&self) -> &TtlCache<CachedPayload> {
    &self.cache
  }

  /// Configured requests-per-minute hint. Advisory only; never enforced.
  pub fn rate_limit(&self) -> u32 {
    self.rate_limit
  }

  async fn cached(&self, key: &str) -> Option<CachedPayload> {
    let hit = self.cache.get(key).await;
    if hit.is_some() {
      debug!("Cache hit: {}", key);
    } else {
      debug!("Cache miss: {}", key);
    }
    hit
  }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
  #[instrument(skip(self))]
  async fn fetch_global_snapshot(&self) -> Result<GlobalMarketSnapshot> {
    if let Some(CachedPayload::Global(snapshot)) = self.cached(keys::GLOBAL).await {
      return Ok(snapshot);
    }

    let response: GlobalResponse = self.transport.get(&Endpoint::Global).await?;
    let snapshot = GlobalMarketSnapshot::from(response);

    self.cache.set(keys::GLOBAL, CachedPayload::Global(snapshot.clone())).await;
    Ok(snapshot)
  }

  #[instrument(skip(self))]
  async fn fetch_coin(&self, coin_id: &str) -> Result<CoinRecord> {
    let key = keys::coin(coin_id);
    if let Some(CachedPayload::Coin(coin)) = self.cached(&key).await {
      return Ok(coin);
    }

    let response: CoinDetailResponse =
      self.transport.get(&Endpoint::CoinDetail(coin_id.to_string())).await?;
    let coin = CoinRecord::from(response);

    self.cache.set(key, CachedPayload::Coin(coin.clone())).await;
    Ok(coin)
  }

  #[instrument(skip(self))]
  async fn search_coins(&self, query: &str) -> Result<Vec<SearchResultSummary>> {
    let key = keys::search(query);
    if let Some(CachedPayload::Search(hits)) = self.cached(&key).await {
      return Ok(hits);
    }

    let response: SearchResponse = self.transport.get(&Endpoint::Search(query.to_string())).await?;
    let hits = response.into_summaries();
    debug!("Search '{}' returned {} coins", query, hits.len());

    self.cache.set(key, CachedPayload::Search(hits.clone())).await;
    Ok(hits)
  }
}
