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

//! Single-coin detail (`/coins/{id}`)

use crate::common::{usd_date, usd_value, CurrencyDateMap, CurrencyMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Detailed market record for one coin, USD figures only.
///
/// Percentage changes use zero for both "no change" and "unknown"; the provider
/// does not let us tell them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
  /// Provider-stable slug, e.g. `bitcoin`
  pub id: String,
  pub symbol: String,
  pub name: String,

  pub current_price: f64,
  pub market_cap: f64,
  pub total_volume: f64,
  pub circulating_supply: f64,

  /// `None` means unlimited or unknown supply
  pub total_supply: Option<f64>,

  pub all_time_high: f64,
  /// `None` when the provider date was missing or malformed
  pub all_time_high_date: Option<DateTime<Utc>>,
  pub all_time_low: f64,
  pub all_time_low_date: Option<DateTime<Utc>>,

  pub price_change_pct_24h: f64,
  pub price_change_pct_7d: f64,
  pub price_change_pct_30d: f64,
  pub price_change_pct_90d: f64,
}

impl CoinRecord {
  /// True when the coin has no known supply cap
  pub fn has_unlimited_supply(&self) -> bool {
    self.total_supply.is_none()
  }
}

/// Raw `/coins/{id}` response (market data subset)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetailResponse {
  pub id: String,
  pub symbol: String,
  pub name: String,
  pub market_data: MarketData,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketData {
  pub current_price: CurrencyMap,
  pub market_cap: CurrencyMap,
  pub total_volume: CurrencyMap,
  pub circulating_supply: Option<f64>,
  pub total_supply: Option<f64>,
  pub ath: CurrencyMap,
  pub ath_date: CurrencyDateMap,
  pub atl: CurrencyMap,
  pub atl_date: CurrencyDateMap,
  pub price_change_percentage_24h: Option<f64>,
  pub price_change_percentage_7d: Option<f64>,
  pub price_change_percentage_30d: Option<f64>,
  pub price_change_percentage_90d: Option<f64>,
}

impl From<CoinDetailResponse> for CoinRecord {
  fn from(response: CoinDetailResponse) -> Self {
    let md = response.market_data;
    Self {
      id: response.id,
      symbol: response.symbol,
      name: response.name,
      current_price: usd_value(&md.current_price),
      market_cap: usd_value(&md.market_cap),
      total_volume: usd_value(&md.total_volume),
      circulating_supply: md.circulating_supply.unwrap_or_default(),
      total_supply: md.total_supply,
      all_time_high: usd_value(&md.ath),
      all_time_high_date: usd_date(&md.ath_date),
      all_time_low: usd_value(&md.atl),
      all_time_low_date: usd_date(&md.atl_date),
      price_change_pct_24h: md.price_change_percentage_24h.unwrap_or_default(),
      price_change_pct_7d: md.price_change_percentage_7d.unwrap_or_default(),
      price_change_pct_30d: md.price_change_percentage_30d.unwrap_or_default(),
      price_change_pct_90d: md.price_change_percentage_90d.unwrap_or_default(),
    }
  }
}
