mod common;

use common::{send_json, TestApp, CHECKING_ACCOUNT};
use reqwest::StatusCode;
use serde_json::Value;

fn ids<'a>(transactions: impl Iterator<Item = &'a Value>) -> Vec<String> {
    transactions
        .map(|txn| txn["transactionId"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn lists_seeded_transactions_newest_first() {
    let app = TestApp::spawn().await;

    let (status, body) = send_json(app.get("/transactions?limit=100")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalRecords"], 20);

    let dates: Vec<chrono::DateTime<chrono::Utc>> = body["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|txn| txn["transactionDate"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(dates.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn type_filter_returns_only_matching_transactions_for_the_account() {
    let app = TestApp::spawn().await;

    let (_, all) = send_json(app.get(&format!(
        "/transactions?accountId={}&limit=100",
        CHECKING_ACCOUNT
    )))
    .await;
    let all = all["transactions"].as_array().unwrap().clone();
    assert!(!all.is_empty());
    for txn in &all {
        if txn["transactionType"] == "DEBIT" {
            assert!(txn["amount"].as_f64().unwrap() < 0.0);
        }
    }

    let wanted = all[0]["transactionType"].as_str().unwrap().to_string();
    let expected = ids(all.iter().filter(|txn| txn["transactionType"] == wanted.as_str()));

    let (status, body) = send_json(app.get(&format!(
        "/transactions?accountId={}&transactionType={}&limit=100",
        CHECKING_ACCOUNT, wanted
    )))
    .await;

    assert_eq!(status, StatusCode::OK);
    let transactions = body["transactions"].as_array().unwrap();
    assert!(!transactions.is_empty());
    for txn in transactions {
        assert_eq!(txn["accountId"], CHECKING_ACCOUNT);
        assert_eq!(txn["transactionType"], wanted.as_str());
    }
    assert_eq!(ids(transactions.iter()), expected);
}

#[tokio::test]
async fn amount_range_applies_to_magnitude() {
    let app = TestApp::spawn().await;

    let (_, all) = send_json(app.get("/transactions?limit=100")).await;
    let all = all["transactions"].as_array().unwrap().clone();
    let ceiling = all[0]["amount"].as_f64().unwrap().abs();
    let expected = ids(all.iter().filter(|txn| {
        let magnitude = txn["amount"].as_f64().unwrap().abs();
        (10.0..=ceiling).contains(&magnitude)
    }));

    let (status, body) = send_json(app.get(&format!(
        "/transactions?minAmount=10&maxAmount={}&limit=100",
        ceiling
    )))
    .await;

    assert_eq!(status, StatusCode::OK);
    let transactions = body["transactions"].as_array().unwrap();
    assert!(!transactions.is_empty());
    for txn in transactions {
        let magnitude = txn["amount"].as_f64().unwrap().abs();
        assert!((10.0..=ceiling).contains(&magnitude), "amount {}", magnitude);
    }
    assert_eq!(ids(transactions.iter()), expected);
}

#[tokio::test]
async fn inverted_or_malformed_ranges_are_rejected() {
    let app = TestApp::spawn().await;

    for query in [
        "startDate=2024-02-01&endDate=2024-01-01",
        "minAmount=50&maxAmount=10",
        "startDate=2024/01/01",
        "minAmount=lots",
    ] {
        let (status, body) = send_json(app.get(&format!("/transactions?{}", query))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "query {}", query);
        assert_eq!(body["error"]["code"], "INVALID_PARAMETER");
    }
}

#[tokio::test]
async fn unknown_filter_value_matches_nothing() {
    let app = TestApp::spawn().await;

    let (status, body) = send_json(app.get("/transactions?transactionType=REFUND")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["transactions"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["totalPages"], 0);
}

#[tokio::test]
async fn fetches_seeded_transaction() {
    let app = TestApp::spawn().await;

    let (status, body) = send_json(app.get("/transactions/txn-20260109-001")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transactionId"], "txn-20260109-001");
    assert_eq!(body["accountId"], CHECKING_ACCOUNT);
}

#[tokio::test]
async fn unknown_transaction_is_not_found() {
    let app = TestApp::spawn().await;

    let (status, body) = send_json(app.get("/transactions/txn-missing")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "TRANSACTION_NOT_FOUND");
}

#[tokio::test]
async fn wrong_prefix_is_an_invalid_transaction_id() {
    let app = TestApp::spawn().await;

    let (status, body) = send_json(app.get("/transactions/pmt-20260109-001")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_TRANSACTION_ID");
}
