//! Free-text coin search (`/search`)

use serde::{Deserialize, Serialize};

/// Lightweight projection of a search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultSummary {
  pub id: String,
  pub symbol: String,
  pub name: String,
}

/// Raw `/search` response. Exchanges, categories and NFTs are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
  pub coins: Vec<SearchCoin>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCoin {
  pub id: String,
  pub symbol: String,
  pub name: String,
}

impl From<SearchCoin> for SearchResultSummary {
  fn from(coin: SearchCoin) -> Self {
    Self { id: coin.id, symbol: coin.symbol, name: coin.name }
  }
}

impl SearchResponse {
  /// Project every coin hit, keeping provider order
  pub fn into_summaries(self) -> Vec<SearchResultSummary> {
    self.coins.into_iter().map(SearchResultSummary::from).collect()
  }
}
