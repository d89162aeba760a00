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

//! # cg-client
//!
//! Market data access for the neongecko dashboard.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cg_client::{CoinGeckoClient, MarketDataSource};
//! use cg_core::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CoinGeckoClient::new(&Config::default())?;
//!
//!     let global = client.fetch_global_snapshot().await?;
//!     println!("Total market cap: {}", global.total_market_cap_usd);
//!
//!     // Second call within the TTL is served from the cache
//!     let bitcoin = client.fetch_coin("bitcoin").await?;
//!     println!("BTC: {}", bitcoin.current_price);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! - [`transport`]: one reqwest call per request, status and decode mapping
//! - [`cache`]: TTL store shared by every fetch
//! - [`client`]: cache-through fetch operations
//! - [`dispatcher`]: runs fetches off the UI loop and delivers one event each
//! - [`commands`]: the UI intents and events carried through the dispatcher
//!
//! ## Rate Limiting
//!
//! The configured rate limit is advisory. Nothing throttles outbound calls.

pub mod cache;
pub mod client;
pub mod commands;
pub mod dispatcher;
pub mod source;
pub mod transport;

pub use cache::{CachedPayload, TtlCache};
pub use cg_core::{Config, Error, Result};
pub use client::CoinGeckoClient;
pub use commands::{FetchEvent, FetchIntent};
pub use dispatcher::{Delivery, Dispatcher, IntentKind, PanicEvent, Ticket};
pub use source::MarketDataSource;
