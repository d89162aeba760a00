//! Intents the UI issues and the events it gets back

use crate::dispatcher::{Dispatcher, IntentKind, PanicEvent, Ticket};
use crate::source::MarketDataSource;
use cg_core::Error;
use cg_models::{CoinRecord, GlobalMarketSnapshot};
use std::sync::Arc;
use tracing::info;

/// Work the UI can request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchIntent {
  /// Load (or refresh) the global market snapshot
  LoadGlobal,
  /// Search for `query` and load the first hit
  SearchCoin { query: String },
}

impl FetchIntent {
  pub fn kind(&self) -> IntentKind {
    match self {
      FetchIntent::LoadGlobal => IntentKind::Global,
      FetchIntent::SearchCoin { .. } => IntentKind::Coin,
    }
  }
}

/// Outcome of one intent
#[derive(Debug)]
pub enum FetchEvent {
  GlobalReady(GlobalMarketSnapshot),
  CoinReady(CoinRecord),
  /// The fetch failed; `error` is forwarded unchanged from the client
  Failed { kind: IntentKind, error: Error },
}

impl PanicEvent for FetchEvent {
  fn from_panic(kind: IntentKind, reason: String) -> Self {
    FetchEvent::Failed { kind, error: Error::Internal(reason) }
  }
}

/// Dispatch `intent` against `source`
pub fn issue(
  dispatcher: &mut Dispatcher<FetchEvent>,
  source: Arc<dyn MarketDataSource>,
  intent: FetchIntent,
) -> Ticket {
  let kind = intent.kind();
  info!("Dispatching {:?}", intent);

  match intent {
    FetchIntent::LoadGlobal => dispatcher.dispatch(kind, move |_token| async move {
      match source.fetch_global_snapshot().await {
        Ok(snapshot) => FetchEvent::GlobalReady(snapshot),
        Err(error) => FetchEvent::Failed { kind, error },
      }
    }),
    FetchIntent::SearchCoin { query } => dispatcher.dispatch(kind, move |_token| async move {
      match source.resolve_coin(&query).await {
        Ok(coin) => FetchEvent::CoinReady(coin),
        Err(error) => FetchEvent::Failed { kind, error },
      }
    }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;
  use cg_core::Result;
  use cg_models::SearchResultSummary;
  use tokio::runtime::Handle;

  struct FixedSource;

  #[async_trait]
  impl MarketDataSource for FixedSource {
    async fn fetch_global_snapshot(&self) -> Result<GlobalMarketSnapshot> {
      Ok(GlobalMarketSnapshot {
        total_market_cap_usd: 2.5e12,
        total_volume_usd: 9.0e10,
        market_cap_change_pct_24h: 1.25,
      })
    }

    async fn fetch_coin(&self, _coin_id: &str) -> Result<CoinRecord> {
      Err(Error::UpstreamStatus { status: 500 })
    }

    async fn search_coins(&self, query: &str) -> Result<Vec<SearchResultSummary>> {
      if query == "btc" {
        Ok(vec![SearchResultSummary {
          id: "bitcoin".to_string(),
          symbol: "BTC".to_string(),
          name: "Bitcoin".to_string(),
        }])
      } else {
        Ok(Vec::new())
      }
    }
  }

  struct PanickingSource;

  #[async_trait]
  impl MarketDataSource for PanickingSource {
    async fn fetch_global_snapshot(&self) -> Result<GlobalMarketSnapshot> {
      panic!("global exploded")
    }

    async fn fetch_coin(&self, _coin_id: &str) -> Result<CoinRecord> {
      panic!("coin exploded")
    }

    async fn search_coins(&self, _query: &str) -> Result<Vec<SearchResultSummary>> {
      panic!("search exploded")
    }
  }

  #[test]
  fn test_intent_kinds() {
    assert_eq!(FetchIntent::LoadGlobal.kind(), IntentKind::Global);
    assert_eq!(FetchIntent::SearchCoin { query: "x".to_string() }.kind(), IntentKind::Coin);
  }

  #[tokio::test]
  async fn test_load_global_delivers_snapshot() {
    let (mut dispatcher, mut rx) = Dispatcher::new(Handle::current());
    let ticket = issue(&mut dispatcher, Arc::new(FixedSource), FetchIntent::LoadGlobal);

    let delivery = rx.recv().await.unwrap();
    assert_eq!(delivery.ticket, ticket);
    match delivery.event {
      FetchEvent::GlobalReady(snapshot) => assert_eq!(snapshot.market_cap_change_pct_24h, 1.25),
      other => panic!("unexpected event: {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_search_failures_forwarded_verbatim() {
    let (mut dispatcher, mut rx) = Dispatcher::new(Handle::current());
    let source: Arc<dyn MarketDataSource> = Arc::new(FixedSource);

    issue(&mut dispatcher, source.clone(), FetchIntent::SearchCoin { query: "nope".to_string() });
    match rx.recv().await.unwrap().event {
      FetchEvent::Failed { kind, error } => {
        assert_eq!(kind, IntentKind::Coin);
        assert!(error.is_not_found());
      }
      other => panic!("unexpected event: {:?}", other),
    }

    issue(&mut dispatcher, source, FetchIntent::SearchCoin { query: "btc".to_string() });
    match rx.recv().await.unwrap().event {
      FetchEvent::Failed { error, .. } => assert_eq!(error.status(), Some(500)),
      other => panic!("unexpected event: {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_panicking_source_reports_failure() {
    let (mut dispatcher, mut rx) = Dispatcher::new(Handle::current());
    let ticket = issue(&mut dispatcher, Arc::new(PanickingSource), FetchIntent::LoadGlobal);

    let delivery = rx.recv().await.unwrap();
    assert_eq!(delivery.ticket, ticket);
    assert!(dispatcher.accept(&delivery.ticket));
    match delivery.event {
      FetchEvent::Failed { kind, error: Error::Internal(reason) } => {
        assert_eq!(kind, IntentKind::Global);
        assert!(reason.contains("panicked"), "reason: {}", reason);
      }
      other => panic!("unexpected event: {:?}", other),
    }
  }
}
