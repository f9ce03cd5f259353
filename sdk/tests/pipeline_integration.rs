//! End-to-end pipeline test against a mocked Thor node (spec.md §4.7).

use vet_sdk::address::Address;
use vet_sdk::clause::vet_transfer;
use vet_sdk::config::{NetworkConfig, PipelineOptions};
use vet_sdk::pipeline::{NoopObserver, TransactionBuilder};
use vet_sdk::secp256k1::PrivateKey;
use vet_sdk::thor::ThorClient;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn full_pipeline_signs_broadcasts_and_awaits_receipt() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blocks/best"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": format!("0x{}", "ab".repeat(32)),
            "number": 100,
            "parentID": format!("0x{}", "cd".repeat(32)),
            "timestamp": 1_700_000_000u64,
        })))
        .mount(&server)
        .await;

    let tx_id = format!("0x{}", "11".repeat(32));

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": tx_id })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/transactions/{tx_id}/receipt")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "gasUsed": 21_000,
            "reverted": false,
            "outputs": [],
            "meta": {
                "blockID": format!("0x{}", "ab".repeat(32)),
                "blockNumber": 101,
                "blockTimestamp": 1_700_000_010u64,
            },
        })))
        .mount(&server)
        .await;

    let client = ThorClient::new(server.uri());
    let origin = PrivateKey::generate();
    let clauses = vec![vet_transfer(Address([0x42; 20]), 1)];
    let network = NetworkConfig::custom(0x27, server.uri());
    let options = PipelineOptions {
        poll_interval_ms: 5,
        timeout_ms: 1_000,
        ..PipelineOptions::default()
    };

    let outcome = TransactionBuilder::new(clauses, network, options)
        .origin(origin)
        .run(&client, &NoopObserver)
        .await
        .expect("pipeline should complete against the mocked node");

    assert_eq!(outcome.tx_id.len(), 32);
    let receipt = outcome.receipt.expect("AwaitReceipt ran");
    assert_eq!(receipt.gas_used, 21_000);
    assert!(!receipt.reverted);
}

#[tokio::test]
async fn await_receipt_times_out_when_node_never_confirms() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blocks/best"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": format!("0x{}", "ab".repeat(32)),
            "number": 100,
            "parentID": format!("0x{}", "cd".repeat(32)),
            "timestamp": 1_700_000_000u64,
        })))
        .mount(&server)
        .await;

    let tx_id = format!("0x{}", "22".repeat(32));
    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": tx_id })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/transactions/{tx_id}/receipt")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = ThorClient::new(server.uri());
    let origin = PrivateKey::generate();
    let clauses = vec![vet_transfer(Address([0x43; 20]), 1)];
    let network = NetworkConfig::custom(0x27, server.uri());
    let options = PipelineOptions {
        poll_interval_ms: 5,
        timeout_ms: 30,
        ..PipelineOptions::default()
    };

    let result = TransactionBuilder::new(clauses, network, options)
        .origin(origin)
        .run(&client, &NoopObserver)
        .await;

    assert!(matches!(result, Err(vet_sdk::Error::Timeout)));
}
