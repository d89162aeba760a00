//! Fetch client behaviour against a mock CoinGecko server

use cg_client::cache::keys;
use cg_client::{CoinGeckoClient, Config, Error, MarketDataSource};
use cg_core::test_utils::assert_market_eq;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TTL: Duration = Duration::from_secs(300);

fn client_for(server: &MockServer) -> CoinGeckoClient {
  CoinGeckoClient::with_base_url(&server.uri(), TTL, Duration::from_secs(2)).unwrap()
}

fn global_body() -> serde_json::Value {
  json!({
    "data": {
      "total_market_cap": {"usd": 2.5e12, "eur": 2.3e12},
      "total_volume": {"usd": 8.75e10},
      "market_cap_change_percentage_24h_usd": 3.5
    }
  })
}

fn coin_body(total_supply: serde_json::Value) -> serde_json::Value {
  json!({
    "id": "bitcoin",
    "symbol": "btc",
    "name": "Bitcoin",
    "market_data": {
      "current_price": {"usd": 67000.5},
      "market_cap": {"usd": 1.32e12},
      "total_volume": {"usd": 3.1e10},
      "circulating_supply": 19700000.0,
      "total_supply": total_supply,
      "ath": {"usd": 73738.0},
      "ath_date": {"usd": "2024-03-14T07:10:36.635Z"},
      "atl": {"usd": 67.81},
      "atl_date": {"usd": "2013-07-06T00:00:00.000Z"},
      "price_change_percentage_24h": 1.5,
      "price_change_percentage_7d": -3.25,
      "price_change_percentage_30d": 8.0,
      "price_change_percentage_90d": 22.4
    }
  })
}

#[tokio::test]
async fn test_global_snapshot_cached_within_ttl() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/global"))
    .respond_with(ResponseTemplate::new(200).set_body_json(global_body()))
    .expect(1)
    .mount(&server)
    .await;

  let client = client_for(&server);
  let first = client.fetch_global_snapshot().await.unwrap();
  let second = client.fetch_global_snapshot().await.unwrap();

  assert_eq!(first, second);
  assert_market_eq(first.total_market_cap_usd, 2.5e12);
  assert_market_eq(first.total_volume_usd, 8.75e10);
  assert_market_eq(first.market_cap_change_pct_24h, 3.5);
  assert!(client.cache().contains_key(keys::GLOBAL).await);
}

#[tokio::test]
async fn test_fetch_coin_sends_detail_params() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/coins/bitcoin"))
    .and(query_param("localization", "false"))
    .and(query_param("tickers", "false"))
    .and(query_param("market_data", "true"))
    .and(query_param("community_data", "false"))
    .and(query_param("developer_data", "false"))
    .respond_with(ResponseTemplate::new(200).set_body_json(coin_body(json!(21000000.0))))
    .expect(1)
    .mount(&server)
    .await;

  let client = client_for(&server);
  let coin = client.fetch_coin("bitcoin").await.unwrap();

  assert_eq!(coin.id, "bitcoin");
  assert_eq!(coin.symbol, "btc");
  assert_market_eq(coin.current_price, 67000.5);
  assert_eq!(coin.total_supply, Some(21000000.0));
  assert_market_eq(coin.price_change_pct_7d, -3.25);
  assert!(coin.all_time_high_date.is_some());

  // Served from cache the second time
  assert_eq!(client.fetch_coin("bitcoin").await.unwrap(), coin);
}

#[tokio::test]
async fn test_fetch_coin_null_supply_is_none() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/coins/ethereum"))
    .respond_with(ResponseTemplate::new(200).set_body_json(coin_body(serde_json::Value::Null)))
    .mount(&server)
    .await;

  let coin = client_for(&server).fetch_coin("ethereum").await.unwrap();
  assert_eq!(coin.total_supply, None);
  assert!(coin.has_unlimited_supply());
}

#[tokio::test]
async fn test_server_error_is_not_cached() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/coins/bitcoin"))
    .respond_with(ResponseTemplate::new(500))
    .expect(2)
    .mount(&server)
    .await;

  let client = client_for(&server);
  let err = client.fetch_coin("bitcoin").await.unwrap_err();
  assert_eq!(err.status(), Some(500));
  assert_eq!(err.to_string(), "API returned status code: 500");
  assert!(!client.cache().contains_key(&keys::coin("bitcoin")).await);

  // No negative caching: the next call goes back to the server
  assert!(client.fetch_coin("bitcoin").await.is_err());
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/global"))
    .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
    .mount(&server)
    .await;

  let client = client_for(&server);
  let err = client.fetch_global_snapshot().await.unwrap_err();
  assert!(matches!(err, Error::Decode(_)));
  assert!(client.cache().is_empty().await);
}

#[tokio::test]
async fn test_timeout_is_network_error() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/global"))
    .respond_with(
      ResponseTemplate::new(200).set_body_json(global_body()).set_delay(Duration::from_secs(2)),
    )
    .mount(&server)
    .await;

  let client =
    CoinGeckoClient::with_base_url(&server.uri(), TTL, Duration::from_millis(200)).unwrap();
  let err = client.fetch_global_snapshot().await.unwrap_err();
  assert!(matches!(err, Error::Network(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_search_preserves_order_and_caches() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/search"))
    .and(query_param("query", "btc"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "coins": [
        {"id": "bitcoin", "symbol": "BTC", "name": "Bitcoin"},
        {"id": "wrapped-bitcoin", "symbol": "WBTC", "name": "Wrapped Bitcoin"}
      ],
      "exchanges": []
    })))
    .expect(1)
    .mount(&server)
    .await;

  let client = client_for(&server);
  let hits = client.search_coins("btc").await.unwrap();
  let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
  assert_eq!(ids, vec!["bitcoin", "wrapped-bitcoin"]);

  assert_eq!(client.search_coins("btc").await.unwrap(), hits);
  assert!(client.cache().contains_key(&keys::search("btc")).await);
}

#[tokio::test]
async fn test_empty_search_then_resolve_is_not_found() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/search"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"coins": []})))
    .mount(&server)
    .await;
  // Any detail request is a failure of the composite
  Mock::given(method("GET"))
    .and(path_regex(r"^/coins/.*"))
    .respond_with(ResponseTemplate::new(200))
    .expect(0)
    .mount(&server)
    .await;

  let client = client_for(&server);
  assert!(client.search_coins("zzzzqqq").await.unwrap().is_empty());

  let err = client.resolve_coin("zzzzqqq").await.unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn test_resolve_loads_first_hit() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/search"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "coins": [
        {"id": "bitcoin", "symbol": "BTC", "name": "Bitcoin"},
        {"id": "bitcoin-cash", "symbol": "BCH", "name": "Bitcoin Cash"}
      ]
    })))
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/coins/bitcoin"))
    .respond_with(ResponseTemplate::new(200).set_body_json(coin_body(json!(21000000.0))))
    .expect(1)
    .mount(&server)
    .await;

  let coin = client_for(&server).resolve_coin("bitcoin").await.unwrap();
  assert_eq!(coin.name, "Bitcoin");
}

#[tokio::test]
async fn test_concurrent_misses_make_at_most_two_calls() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/coins/bitcoin"))
    .respond_with(
      ResponseTemplate::new(200)
        .set_body_json(coin_body(json!(21000000.0)))
        .set_delay(Duration::from_millis(50)),
    )
    .expect(1..=2)
    .mount(&server)
    .await;

  let client = client_for(&server);
  let (a, b) = tokio::join!(client.fetch_coin("bitcoin"), client.fetch_coin("bitcoin"));

  assert_eq!(a.unwrap(), b.unwrap());
  assert!(client.cache().contains_key(&keys::coin("bitcoin")).await);
}

#[tokio::test]
async fn test_zero_timeout_in_config_still_fetches() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/global"))
    .respond_with(ResponseTemplate::new(200).set_body_json(global_body()))
    .expect(1)
    .mount(&server)
    .await;

  let mut config = Config::default();
  config.api.base_url = server.uri();
  config.api.timeout = "0s".to_string();
  let client = CoinGeckoClient::new(&config).unwrap();

  let snapshot = client.fetch_global_snapshot().await.unwrap();
  assert_market_eq(snapshot.total_market_cap_usd, 2.5e12);
}
