//! Global market aggregate (`/global`)

use crate::common::{usd_value, CurrencyMap};
use serde::{Deserialize, Serialize};

/// Whole-market figures in USD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalMarketSnapshot {
  /// Total market capitalization
  pub total_market_cap_usd: f64,

  /// Total 24h trading volume
  pub total_volume_usd: f64,

  /// Market cap change over 24h, in percent
  pub market_cap_change_pct_24h: f64,
}

/// Raw `/global` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalResponse {
  pub data: GlobalData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalData {
  #[serde(default)]
  pub total_market_cap: CurrencyMap,

  #[serde(default)]
  pub total_volume: CurrencyMap,

  #[serde(default, alias = "market_cap_change_percentage_24h")]
  pub market_cap_change_percentage_24h_usd: Option<f64>,
}

impl From<GlobalResponse> for GlobalMarketSnapshot {
  fn from(response: GlobalResponse) -> Self {
    let data = response.data;
    Self {
      total_market_cap_usd: usd_value(&data.total_market_cap),
      total_volume_usd: usd_value(&data.total_volume),
      market_cap_change_pct_24h: data.market_cap_change_percentage_24h_usd.unwrap_or_default(),
    }
  }
}
