//! # cg-models
//!
//! Domain records for the neongecko dashboard and the CoinGecko response
//! shapes they are normalized from.
//!
//! Every provider response is deserialized into a raw `*Response` struct and
//! converted with `From` into an immutable domain record. Only USD-denominated
//! figures are extracted.
//!
//! ## Usage
//!
//! ```ignore
//! use cg_models::{CoinDetailResponse, CoinRecord};
//!
//! let raw: CoinDetailResponse = serde_json::from_str(&body)?;
//! let coin = CoinRecord::from(raw);
//! ```

#![warn(clippy::all)]

pub mod coin;
pub mod common;
pub mod global;
pub mod search;

pub use coin::*;
pub use common::*;
pub use global::*;
pub use search::*;
