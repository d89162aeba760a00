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

//! In-memory response cache with a fixed TTL and background eviction.
//!
//! Entries are readable only while `now < expires_at`. Expired entries are
//! dropped lazily when a read encounters them, and a sweep task removes the
//! rest on a fixed interval so entries that are never re-read do not pile up.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cg_client::cache::TtlCache;
//! use std::time::Duration;
//!
//! let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(300));
//! cache.set("global_data", "snapshot".to_string()).await;
//! assert_eq!(cache.get("global_data").await.as_deref(), Some("snapshot"));
//! ```

use cg_models::{CoinRecord, GlobalMarketSnapshot, SearchResultSummary};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// A cached value and the instant it stops being readable
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
  pub value: V,
  pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
  /// True once `now` has reached `expires_at`
  pub fn is_expired_at(&self, now: Instant) -> bool {
    now >= self.expires_at
  }
}

type EntryMap<V> = HashMap<String, CacheEntry<V>>;

/// Key/value store with one TTL for every write.
///
/// Reads take a shared lock; writes, lazy removals and sweeps take the
/// exclusive one, so a reader always sees a whole entry. The tokio lock is
/// fair: a waiting writer holds back later readers, which is fine for a few
/// fetches a minute. Must be created inside
/// a tokio runtime: construction spawns the sweep task, which stops when the
/// cache is dropped.
#[derive(Debug)]
pub struct TtlCache<V> {
  entries: Arc<RwLock<EntryMap<V>>>,
  ttl: Duration,
  sweeper: JoinHandle<()>,
}

impl<V> TtlCache<V>
where
  V: Clone + Send + Sync + 'static,
{
  /// Create a cache sweeping on the default interval
  pub fn new(ttl: Duration) -> Self {
    Self::with_sweep_interval(ttl, cg_core::CACHE_SWEEP_INTERVAL)
  }

  /// Create a cache with a custom sweep interval
  pub fn with_sweep_interval(ttl: Duration, sweep_interval: Duration) -> Self {
    let entries = Arc::new(RwLock::new(EntryMap::new()));
    let sweeper = tokio::spawn(sweep_loop(Arc::downgrade(&entries), sweep_interval));
    Self { entries, ttl, sweeper }
  }

  /// TTL stamped on every write
  pub fn ttl(&self) -> Duration {
    self.ttl
  }

  /// Live value for `key`, if any. An expired entry found here is removed.
  pub async fn get(&self, key: &str) -> Option<V> {
    let now = Instant::now();
    {
      let entries = self.entries.read().await;
      match entries.get(key) {
        None => return None,
        Some(entry) if !entry.is_expired_at(now) => return Some(entry.value.clone()),
        Some(_) => {}
      }
    }

    // Re-check under the write lock: a concurrent set may have refreshed it.
    let mut entries = self.entries.write().await;
    if entries.get(key).is_some_and(|entry| entry.is_expired_at(now)) {
      entries.remove(key);
      debug!("Evicted expired cache entry on read: {}", key);
    }
    None
  }

  /// Insert or replace `key`, expiring `ttl` from now
  pub async fn set(&self, key: impl Into<String>, value: V) {
    let key = key.into();
    let expires_at = Instant::now() + self.ttl;
    debug!("Cached {} (ttl: {:?})", key, self.ttl);
    self.entries.write().await.insert(key, CacheEntry { value, expires_at });
  }

  /// Remove every expired entry now. Returns how many were removed.
  pub async fn sweep(&self) -> usize {
    sweep_entries(&self.entries).await
  }

  /// Number of stored entries, including expired ones not yet evicted
  pub async fn len(&self) -> usize {
    self.entries.read().await.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.entries.read().await.is_empty()
  }

  /// True if `key` is stored, live or not
  pub async fn contains_key(&self, key: &str) -> bool {
    self.entries.read().await.contains_key(key)
  }
}

impl<V> Drop for TtlCache<V> {
  fn drop(&mut self) {
    self.sweeper.abort();
  }
}

async fn sweep_entries<V>(entries: &RwLock<EntryMap<V>>) -> usize {
  let now = Instant::now();
  let mut entries = entries.write().await;
  let before = entries.len();
  entries.retain(|_, entry| !entry.is_expired_at(now));
  let removed = before - entries.len();
  if removed > 0 {
    debug!("Cache sweep removed {} expired entries", removed);
  }
  removed
}

async fn sweep_loop<V>(entries: Weak<RwLock<EntryMap<V>>>, period: Duration) {
  let mut ticker = tokio::time::interval(period);
  ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
  // The first tick completes immediately; nothing can have expired yet.
  ticker.tick().await;

  loop {
    ticker.tick().await;
    let Some(entries) = entries.upgrade() else {
      break;
    };
    sweep_entries(&entries).await;
  }
}

/// Payloads the fetch client stores, one variant per key space
#[derive(Debug, Clone, PartialEq)]
pub enum CachedPayload {
  Global(GlobalMarketSnapshot),
  Coin(CoinRecord),
  Search(Vec<SearchResultSummary>),
}

/// Cache key construction. Prefixes keep the key spaces disjoint.
pub mod keys {
  /// The global snapshot is a process-wide singleton
  pub const GLOBAL: &str = "global_data";
  /// Prefix for coin detail records
  pub const COIN_PREFIX: &str = "coin_data_";
  /// Prefix for search results
  pub const SEARCH_PREFIX: &str = "search_";

  /// Key for a coin id
  pub fn coin(coin_id: &str) -> String {
    format!("{}{}", COIN_PREFIX, coin_id)
  }

  /// Key for a raw search query. No normalization: `"BTC"` and `"btc "` are distinct.
  pub fn search(query: &str) -> String {
    format!("{}{}", SEARCH_PREFIX, query)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  const FIVE_MIN: Duration = Duration::from_secs(300);

  #[tokio::test]
  async fn test_set_then_get() {
    let cache: TtlCache<String> = TtlCache::new(FIVE_MIN);
    cache.set("k", "v".to_string()).await;

    assert_eq!(cache.get("k").await, Some("v".to_string()));
    assert_eq!(cache.get("missing").await, None);
  }

  #[tokio::test]
  async fn test_set_replaces_value() {
    let cache: TtlCache<u32> = TtlCache::new(FIVE_MIN);
    cache.set("k", 1).await;
    cache.set("k", 2).await;

    assert_eq!(cache.get("k").await, Some(2));
    assert_eq!(cache.len().await, 1);
  }

  #[tokio::test(start_paused = true)]
  async fn test_ttl_boundary() {
    let cache: TtlCache<&'static str> = TtlCache::new(FIVE_MIN);
    cache.set(keys::GLOBAL, "snapshot_a").await;

    tokio::time::advance(Duration::from_secs(4 * 60 + 59)).await;
    assert_eq!(cache.get(keys::GLOBAL).await, Some("snapshot_a"));

    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(cache.get(keys::GLOBAL).await, None);
  }

  #[tokio::test(start_paused = true)]
  async fn test_expired_read_removes_entry() {
    // Sweep far in the future so only the lazy path can remove it.
    let cache: TtlCache<u8> =
      TtlCache::with_sweep_interval(Duration::from_secs(10), Duration::from_secs(3600));
    cache.set("k", 7).await;

    tokio::time::advance(Duration::from_secs(11)).await;
    assert!(cache.contains_key("k").await);
    assert_eq!(cache.get("k").await, None);
    assert!(!cache.contains_key("k").await);
  }

  #[tokio::test(start_paused = true)]
  async fn test_background_sweep_removes_only_expired() {
    let cache: TtlCache<u8> =
      TtlCache::with_sweep_interval(Duration::from_secs(30), Duration::from_secs(60));
    cache.set("old", 1).await;

    tokio::time::sleep(Duration::from_secs(45)).await;
    cache.set("fresh", 2).await;

    // The sweep at t=60 runs before this sleep returns at t=61.
    tokio::time::sleep(Duration::from_secs(16)).await;

    assert!(!cache.contains_key("old").await);
    assert!(cache.contains_key("fresh").await);
    assert_eq!(cache.get("fresh").await, Some(2));
  }

  #[tokio::test(start_paused = true)]
  async fn test_manual_sweep_counts() {
    let cache: TtlCache<u8> =
      TtlCache::with_sweep_interval(Duration::from_secs(5), Duration::from_secs(3600));
    cache.set("a", 1).await;
    cache.set("b", 2).await;
    tokio::time::advance(Duration::from_secs(6)).await;
    cache.set("c", 3).await;

    assert_eq!(cache.sweep().await, 2);
    assert_eq!(cache.len().await, 1);
    assert_eq!(cache.sweep().await, 0);
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn test_concurrent_sets_never_tear() {
    let cache: Arc<TtlCache<Vec<u32>>> = Arc::new(TtlCache::new(FIVE_MIN));
    let v1 = vec![1u32; 64];
    let v2 = vec![2u32; 64];

    let mut handles = Vec::new();
    for i in 0..50 {
      let cache = cache.clone();
      let value = if i % 2 == 0 { v1.clone() } else { v2.clone() };
      handles.push(tokio::spawn(async move {
        cache.set("k", value).await;
        cache.get("k").await
      }));
    }

    for handle in handles {
      let seen = handle.await.unwrap().unwrap();
      assert!(seen == v1 || seen == v2);
    }
    let last = cache.get("k").await.unwrap();
    assert!(last == v1 || last == v2);
  }

  #[test]
  fn test_keys_are_disjoint() {
    assert_eq!(keys::coin("bitcoin"), "coin_data_bitcoin");
    assert_eq!(keys::search("btc"), "search_btc");
    assert_ne!(keys::search("BTC"), keys::search("btc "));
    assert_ne!(keys::coin("x"), keys::search("x"));
  }
}
