//! Helpers shared by the provider response models

use cg_core::QUOTE_CURRENCY;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::HashMap;

/// Per-currency figures as CoinGecko returns them (`{"usd": 1.0, "eur": 0.9}`).
/// Individual values may be `null`.
pub type CurrencyMap = HashMap<String, Option<f64>>;

/// Per-currency timestamps (`{"usd": "2021-11-10T14:24:11.849Z"}`)
pub type CurrencyDateMap = HashMap<String, Option<String>>;

/// Fixed timestamp format used by the provider for ATH/ATL dates
pub const PROVIDER_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// USD figure from a currency map; absent or `null` reads as zero.
pub fn usd_value(values: &CurrencyMap) -> f64 {
  values.get(QUOTE_CURRENCY).copied().flatten().unwrap_or_default()
}

/// Parse a provider timestamp. Malformed input yields `None` rather than an error.
pub fn parse_provider_date(raw: &str) -> Option<DateTime<Utc>> {
  NaiveDateTime::parse_from_str(raw, PROVIDER_DATE_FORMAT).ok().map(|naive| naive.and_utc())
}

/// USD timestamp from a currency date map
pub fn usd_date(values: &CurrencyDateMap) -> Option<DateTime<Utc>> {
  values.get(QUOTE_CURRENCY).and_then(|v| v.as_deref()).and_then(parse_provider_date)
}
