mod common;

use common::{
    detail_fields, send_json, TestApp, CANCELLED_PAYMENT, CHECKING_ACCOUNT, COMPLETED_PAYMENT,
    FIRST_BENEFICIARY, PENDING_PAYMENT, PROCESSING_PAYMENT,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

fn payment_body(amount: f64) -> Value {
    json!({
        "fromAccountId": CHECKING_ACCOUNT,
        "toBeneficiaryId": FIRST_BENEFICIARY,
        "amount": amount,
        "currency": "GBP",
        "paymentType": "DOMESTIC",
        "reference": "Invoice 4471",
    })
}

#[tokio::test]
async fn creates_pending_payment() {
    let app = TestApp::spawn().await;

    let (status, body) = send_json(app.post("/payments", &payment_body(250.5))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["amount"], 250.5);
    assert_eq!(body["fromAccountId"], CHECKING_ACCOUNT);
    assert_eq!(body["urgency"], "NORMAL");
    assert_eq!(body["reference"], "Invoice 4471");

    let payment_id = body["paymentId"].as_str().unwrap().to_string();
    assert!(payment_id.starts_with("pmt-"));

    let (status, fetched) = send_json(app.get(&format!("/payments/{}", payment_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn scheduled_date_drives_estimated_completion() {
    let app = TestApp::spawn().await;

    let mut request = payment_body(75.0);
    request["scheduledDate"] = json!("2030-05-10");
    request["urgency"] = json!("HIGH");

    let (status, body) = send_json(app.post("/payments", &request)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["scheduledDate"], "2030-05-10");
    assert_eq!(body["estimatedCompletionDate"], "2030-05-11");
    assert_eq!(body["urgency"], "HIGH");
}

#[tokio::test]
async fn negative_amount_is_invalid_amount() {
    let app = TestApp::spawn().await;

    let (status, body) = send_json(app.post("/payments", &payment_body(-5.0))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "INVALID_AMOUNT");
}

#[tokio::test]
async fn amount_rounding_to_zero_is_invalid_amount() {
    let app = TestApp::spawn().await;

    let (status, body) = send_json(app.post("/payments", &payment_body(0.004))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "INVALID_AMOUNT");
}

#[tokio::test]
async fn amount_over_limit_is_a_field_error() {
    let app = TestApp::spawn().await;

    let (status, body) = send_json(app.post("/payments", &payment_body(2_000_000.0))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(detail_fields(&body), vec!["amount"]);
    assert_eq!(
        body["error"]["details"][0]["message"],
        "Amount exceeds maximum payment limit of 1000000"
    );
}

#[tokio::test]
async fn empty_body_lists_required_fields() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/payments"))
        .header("Authorization", common::TEST_TOKEN)
        .header("content-type", "application/json")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        detail_fields(&body),
        vec![
            "fromAccountId",
            "toBeneficiaryId",
            "amount",
            "currency",
            "paymentType",
            "reference"
        ]
    );
}

#[tokio::test]
async fn wrongly_typed_amount_is_listed_with_missing_fields() {
    let app = TestApp::spawn().await;

    let (status, body) = send_json(app.post(
        "/payments",
        &json!({"amount": "100", "currency": "gbp"}),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        detail_fields(&body),
        vec![
            "fromAccountId",
            "toBeneficiaryId",
            "amount",
            "currency",
            "paymentType",
            "reference"
        ]
    );
    assert_eq!(body["error"]["details"][2]["message"], "Amount must be a number");
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = TestApp::spawn().await;

    let (status, body) = send_json(
        app.client
            .post(app.url("/payments"))
            .header("Authorization", common::TEST_TOKEN)
            .header("content-type", "application/json")
            .body("{not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(detail_fields(&body), vec!["body"]);
}

#[tokio::test]
async fn unknown_payment_is_not_found() {
    let app = TestApp::spawn().await;

    let (status, body) = send_json(app.get("/payments/pmt-does-not-exist")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "PAYMENT_NOT_FOUND");
}

#[tokio::test]
async fn cancels_pending_and_processing_payments() {
    let app = TestApp::spawn().await;

    for payment_id in [PENDING_PAYMENT, PROCESSING_PAYMENT] {
        let (status, body) = send_json(app.put(
            &format!("/payments/{}/cancel", payment_id),
            &json!({ "reason": "Customer request" }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK, "payment {}", payment_id);
        assert_eq!(body["status"], "CANCELLED");
        assert_eq!(body["cancellationReason"], "Customer request");
        assert!(body["cancelledAt"].is_string());
    }
}

#[tokio::test]
async fn cancelling_twice_returns_the_same_payment() {
    let app = TestApp::spawn().await;
    let path = format!("/payments/{}/cancel", PENDING_PAYMENT);

    let (_, first) = send_json(app.put(&path, &json!({ "reason": "Changed my mind" }))).await;
    let (status, second) = send_json(app.put(&path, &json!({ "reason": "Another reason" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(second["cancellationReason"], "Changed my mind");
}

#[tokio::test]
async fn seeded_cancelled_payment_stays_cancelled() {
    let app = TestApp::spawn().await;

    let (status, body) = send_json(app.put(
        &format!("/payments/{}/cancel", CANCELLED_PAYMENT),
        &json!({}),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CANCELLED");
    assert_eq!(body["cancellationReason"], "Customer request");
}

#[tokio::test]
async fn completed_payment_cannot_be_cancelled() {
    let app = TestApp::spawn().await;

    let (status, body) = send_json(app.put(
        &format!("/payments/{}/cancel", COMPLETED_PAYMENT),
        &json!({ "reason": "Too late now" }),
    ))
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "PAYMENT_ALREADY_COMPLETED");

    let (_, payment) = send_json(app.get(&format!("/payments/{}", COMPLETED_PAYMENT))).await;
    assert_eq!(payment["status"], "COMPLETED");
}

#[tokio::test]
async fn short_cancellation_reason_is_rejected() {
    let app = TestApp::spawn().await;

    let (status, body) = send_json(app.put(
        &format!("/payments/{}/cancel", PENDING_PAYMENT),
        &json!({ "reason": "no" }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(detail_fields(&body), vec!["reason"]);

    let (_, payment) = send_json(app.get(&format!("/payments/{}", PENDING_PAYMENT))).await;
    assert_eq!(payment["status"], "PENDING");
}
