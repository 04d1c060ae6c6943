//! HTTP API tests
//!
//! Each test binds the router to an ephemeral port on localhost and talks to
//! it with reqwest, the same way an external client would.

use account_ledger::core::EngineConfig;
use account_ledger::{http, Account, AccountStore, ClientId, LedgerEngine};
use reqwest::StatusCode;
use rstest::rstest;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

struct TestServer {
    base_url: String,
    engine: LedgerEngine,
    client: reqwest::Client,
}

impl TestServer {
    async fn start(accounts: &[(ClientId, i64, i64)]) -> Self {
        Self::start_with(accounts, EngineConfig::default(), Duration::from_secs(30)).await
    }

    async fn start_with(
        accounts: &[(ClientId, i64, i64)],
        config: EngineConfig,
        request_timeout: Duration,
    ) -> Self {
        let store = AccountStore::new();
        for &(client, limit, balance) in accounts {
            store.provision(Account::new(client, limit, balance)).unwrap();
        }
        let engine = LedgerEngine::new(Arc::new(store), config);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(http::serve(
            listener,
            engine.clone(),
            request_timeout,
            std::future::pending(),
        ));

        Self {
            base_url: format!("http://{}", addr),
            engine,
            client: reqwest::Client::new(),
        }
    }

    async fn post_transaction(&self, id: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .client
            .post(format!("{}/clientes/{}/transacoes", self.base_url, id))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    async fn get_statement(&self, id: &str) -> (StatusCode, Value) {
        let response = self
            .client
            .get(format!("{}/clientes/{}/extrato", self.base_url, id))
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.json().await.unwrap_or(Value::Null))
    }
}

#[tokio::test]
async fn test_ping() {
    let server = TestServer::start(&[]).await;

    let response = server
        .client
        .get(format!("{}/ping", server.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap(), json!({"message": "pong"}));
}

#[tokio::test]
async fn test_transaction_round_trip() {
    let server = TestServer::start(&[(1, 1000, 0)]).await;

    let (status, body) = server
        .post_transaction("1", json!({"valor": 1000, "tipo": "c", "descricao": "shop"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"limite": 1000, "saldo": 1000}));

    let (status, body) = server
        .post_transaction("1", json!({"valor": 2500, "tipo": "d", "descricao": "rent"}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "limit_exceeded");

    let (status, body) = server
        .post_transaction("1", json!({"valor": 1500, "tipo": "d", "descricao": "food"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"limite": 1000, "saldo": -500}));
}

#[tokio::test]
async fn test_statement_body() {
    let server = TestServer::start(&[(2, 80000, 0)]).await;
    for (amount, kind, description) in [(100, "c", "first"), (40, "d", "second")] {
        let (status, _) = server
            .post_transaction(
                "2",
                json!({"valor": amount, "tipo": kind, "descricao": description}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = server.get_statement("2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["saldo"]["total"], 60);
    assert_eq!(body["saldo"]["limite"], 80000);
    assert!(body["saldo"]["data_extrato"].is_string());

    let entries = body["ultimas_transacoes"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["valor"], 40);
    assert_eq!(entries[0]["tipo"], "d");
    assert_eq!(entries[0]["descricao"], "second");
    assert!(entries[0]["realizada_em"].is_string());
    assert_eq!(entries[1]["tipo"], "c");
}

#[tokio::test]
async fn test_statement_for_fresh_account() {
    let server = TestServer::start(&[(5, 500000, 0)]).await;

    let (status, body) = server.get_statement("5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["saldo"]["total"], 0);
    assert_eq!(body["ultimas_transacoes"], json!([]));
}

#[rstest]
#[case::unknown_account("6")]
#[case::non_numeric_id("abc")]
#[case::negative_id("-1")]
#[tokio::test]
async fn test_unknown_ids_are_not_found(#[case] id: &str) {
    let server = TestServer::start(&[(1, 1000, 0)]).await;

    let (status, _) = server
        .post_transaction(id, json!({"valor": 1, "tipo": "c", "descricao": "x"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server.get_statement(id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case::unknown_kind(json!({"valor": 1, "tipo": "x", "descricao": "x"}), "invalid_kind")]
#[case::full_kind_name(json!({"valor": 1, "tipo": "credit", "descricao": "x"}), "invalid_kind")]
#[case::empty_description(json!({"valor": 1, "tipo": "c", "descricao": ""}), "invalid_description")]
#[case::long_description(
    json!({"valor": 1, "tipo": "c", "descricao": "elevenchars"}),
    "invalid_description"
)]
#[case::negative_amount(json!({"valor": -1, "tipo": "c", "descricao": "x"}), "invalid_amount")]
#[case::fractional_amount(json!({"valor": 1.2, "tipo": "c", "descricao": "x"}), "invalid_body")]
#[case::missing_field(json!({"valor": 1, "tipo": "c"}), "invalid_body")]
#[tokio::test]
async fn test_invalid_bodies_are_unprocessable(#[case] body: Value, #[case] code: &str) {
    let server = TestServer::start(&[(1, 1000, 0)]).await;

    let (status, response) = server.post_transaction("1", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["error"], code);
    assert!(server.engine.log().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_unprocessable() {
    let server = TestServer::start(&[(1, 1000, 0)]).await;

    let response = server
        .client
        .post(format!("{}/clientes/1/transacoes", server.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_closed_pool_is_service_unavailable() {
    let server = TestServer::start(&[(1, 1000, 0)]).await;
    server.engine.pool().close();

    let (status, body) = server
        .post_transaction("1", json!({"valor": 1, "tipo": "c", "descricao": "x"}))
        .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "transient_failure");
}

#[tokio::test]
async fn test_request_deadline_cancels_waiting_work() {
    let config = EngineConfig {
        pool_size: 1,
        pool_timeout: Duration::from_secs(10),
        ..EngineConfig::default()
    };
    let server = TestServer::start_with(&[(1, 1000, 0)], config, Duration::from_millis(50)).await;

    // Starve the pool so the request waits until its deadline.
    let held = server.engine.pool().acquire().await.unwrap();

    let (status, body) = server
        .post_transaction("1", json!({"valor": 1, "tipo": "c", "descricao": "late"}))
        .await;
    drop(held);

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body["error"], "cancelled");
    assert!(server.engine.log().is_empty());
}
