use serde_json::json;
use sheetpay::domain::ports::SessionEndpoint;
use sheetpay::domain::product::MinorUnits;
use sheetpay::error::AppError;
use sheetpay::infrastructure::functions::HttpSessionEndpoint;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_payment_session_request_and_decoding() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getPaymentIntent"))
        .and(query_param("price", "500"))
        .and(query_param("currency", "eur"))
        .and(query_param("productID", "p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paymentIntent": "pi_secret",
            "ephemeralKey": "ek_secret",
            "customer": "cus_1",
            "displayName": "Demo Shop"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = HttpSessionEndpoint::new(server.uri(), "eur");
    let session = endpoint.payment_session(MinorUnits(500), "p1").await.unwrap();

    assert_eq!(session.payment_intent_secret, "pi_secret");
    assert_eq!(session.ephemeral_key_secret, "ek_secret");
    assert_eq!(session.customer_id, "cus_1");
    assert_eq!(session.merchant_display_name, "Demo Shop");
}

#[tokio::test]
async fn test_missing_session_field_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getPaymentIntent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paymentIntent": "pi_secret"
        })))
        .mount(&server)
        .await;

    let endpoint = HttpSessionEndpoint::new(server.uri(), "eur");
    let err = endpoint.payment_session(MinorUnits(500), "p1").await.unwrap_err();
    assert!(matches!(err, AppError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_server_error_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getEphemeralSecret"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let endpoint = HttpSessionEndpoint::new(server.uri(), "eur");
    let err = endpoint.customer_credentials().await.unwrap_err();
    match err {
        AppError::Network(message) => assert!(message.contains("500")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_customer_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getEphemeralSecret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ephemeralKey": "ek_secret",
            "customer": "cus_1"
        })))
        .mount(&server)
        .await;

    let endpoint = HttpSessionEndpoint::new(format!("{}/", server.uri()), "eur");
    let credentials = endpoint.customer_credentials().await.unwrap();
    assert_eq!(credentials.customer_id, "cus_1");
    assert_eq!(credentials.ephemeral_key_secret, "ek_secret");
}
