//! Display formatting for market figures

use chrono::{DateTime, Utc};

/// Direction of a percentage change, used to pick its color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
  Up,
  Down,
  Flat,
}

/// `$1.23T`, `$4.56B`, `$7.89M`, `$1.00K`, or plain `$12.34`
pub fn format_currency(value: f64) -> String {
  if value >= 1e12 {
    format!("${:.2}T", value / 1e12)
  } else if value >= 1e9 {
    format!("${:.2}B", value / 1e9)
  } else if value >= 1e6 {
    format!("${:.2}M", value / 1e6)
  } else if value >= 1e3 {
    format!("${:.2}K", value / 1e3)
  } else {
    format!("${:.2}", value)
  }
}

/// `+1.23%`, `-4.56%`, or `0.00%` for exactly zero
pub fn format_change(pct: f64) -> (String, Trend) {
  if pct > 0.0 {
    (format!("+{:.2}%", pct), Trend::Up)
  } else if pct < 0.0 {
    (format!("{:.2}%", pct), Trend::Down)
  } else {
    ("0.00%".to_string(), Trend::Flat)
  }
}

/// Supply in millions with the upper-cased symbol, e.g. `19M BTC`
pub fn format_supply(amount: f64, symbol: &str) -> String {
  format!("{:.0}M {}", amount / 1e6, symbol.to_uppercase())
}

/// Like [`format_supply`], but unlimited supply renders as `∞`
pub fn format_total_supply(total: Option<f64>, symbol: &str) -> String {
  match total {
    Some(amount) => format_supply(amount, symbol),
    None => "∞".to_string(),
  }
}

/// `Jan 2, 2006` style; unknown dates render as `Unknown`
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
  match date {
    Some(date) => date.format("%b %-d, %Y").to_string(),
    None => "Unknown".to_string(),
  }
}
