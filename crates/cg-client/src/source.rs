//! Trait seam between the dashboard and its market data provider

use async_trait::async_trait;
use cg_core::{Error, Result};
use cg_models::{CoinRecord, GlobalMarketSnapshot, SearchResultSummary};
use tracing::debug;

/// Read-only market data operations.
///
/// Implemented by [`crate::CoinGeckoClient`]; tests substitute their own.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
  /// Whole-market aggregate
  async fn fetch_global_snapshot(&self) -> Result<GlobalMarketSnapshot>;

  /// Detail for one coin id
  async fn fetch_coin(&self, coin_id: &str) -> Result<CoinRecord>;

  /// Free-text search. Zero hits is `Ok(vec![])`, not an error.
  async fn search_coins(&self, query: &str) -> Result<Vec<SearchResultSummary>>;

  /// Search, then load the first hit.
  ///
  /// Zero hits (or a first hit without an id) is `Error::NotFound`; no detail
  /// request is made in that case.
  async fn resolve_coin(&self, query: &str) -> Result<CoinRecord> {
    let hits = self.search_coins(query).await?;
    let coin_id = match hits.first() {
      Some(hit) if !hit.id.is_empty() => hit.id.clone(),
      _ => return Err(Error::NotFound { query: query.to_string() }),
    };

    debug!("Resolved '{}' to coin id {}", query, coin_id);
    self.fetch_coin(&coin_id).await
  }
}
