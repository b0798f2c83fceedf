use httpmock::prelude::*;
use pledge_backends::backends::stripe::FAILURE_EMAIL;
use pledge_backends::{
    AppConfig, BufferDispatcher, Environment, OutgoingEmail, SubscribeRequest,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn signup(email: &str) -> SubscribeRequest {
    SubscribeRequest {
        email: email.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        amount_cents: Some(500),
        request_ip: "203.0.113.9".to_string(),
        source: Some("pledge_page".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_local_environment_runs_a_pledge_fully_offline() {
    let mut config_file = NamedTempFile::new().unwrap();
    config_file
        .write_all(b"[app]\nname = \"local\"\n")
        .unwrap();

    let config = AppConfig::from_file(config_file.path()).unwrap();
    let dispatcher = Arc::new(BufferDispatcher::new());
    let env = Environment::from_config(&config, dispatcher.clone()).unwrap();

    let payment = env.payment();
    let customer_id = payment
        .create_customer("donor@example.com", "tok_visa")
        .await
        .unwrap();
    let charge_id = payment.charge(&customer_id, 500).await.unwrap();
    assert_eq!(charge_id, "fake_charge_1234");

    env.subscriber()
        .subscribe(signup("donor@example.com"))
        .await
        .unwrap();
    env.mail()
        .send(OutgoingEmail::new(
            "donor@example.com",
            "Thank you",
            "Thanks!",
            "<p>Thanks!</p>",
        ))
        .await
        .unwrap();

    // fakes never defer anything
    assert!(dispatcher.is_empty());
}

#[tokio::test]
async fn test_local_environment_decline_path() {
    let config = AppConfig::from_toml_str("[app]\nname = \"local\"\n").unwrap();
    let dispatcher = Arc::new(BufferDispatcher::new());
    let env = Environment::from_config(&config, dispatcher).unwrap();

    let payment = env.payment();
    let doomed = payment
        .create_customer(FAILURE_EMAIL, "tok_visa")
        .await
        .unwrap();
    let err = payment.charge(&doomed, 500).await.unwrap_err();
    assert!(err.is_payment());
}

#[tokio::test]
async fn test_live_environment_pledge_against_mock_services() {
    let server = MockServer::start();

    let customer_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/customers")
            .body_contains("email=donor%40example.com");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"id": "cus_live_1"}));
    });
    let charge_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/charges")
            .body_contains("customer=cus_live_1")
            .body_contains("statement_descriptor=MayOne.US");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"id": "ch_live_1"}));
    });
    let subscribe_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/2.0/lists/subscribe.json")
            .json_body_partial(r#"{"id": "f00dcafe11", "email": {"email": "donor@example.com"}}"#);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"euid": "e1"}));
    });
    let mail_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v3/mail.mayone.us/messages")
            .body_contains("to=donor%40example.com");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"message": "Queued."}));
    });

    let toml = format!(
        r#"
[app]
name = "pledge-prod"
statement_descriptor = "MayOne.US"

[stripe]
publishable_key = "pk_live_1"
secret_key = "sk_live_2"
api_base = "{base}"

[mailchimp]
api_key = "abc-us5"
list_id = "f00dcafe11"
api_base = "{base}"

[mail]
domain = "mail.mayone.us"
api_key = "key-123"
display_name = "MayOne no-reply"
api_base = "{base}"
"#,
        base = server.base_url()
    );
    let config = AppConfig::from_toml_str(&toml).unwrap();

    let dispatcher = Arc::new(BufferDispatcher::new());
    let env = Environment::from_config(&config, dispatcher.clone()).unwrap();

    let payment = env.payment();
    let customer_id = payment
        .create_customer("donor@example.com", "tok_visa")
        .await
        .unwrap();
    assert_eq!(customer_id, "cus_live_1");
    let charge_id = payment.charge(&customer_id, 500).await.unwrap();
    assert_eq!(charge_id, "ch_live_1");

    env.subscriber()
        .subscribe(signup("donor@example.com"))
        .await
        .unwrap();
    env.mail()
        .send(OutgoingEmail::new(
            "donor@example.com",
            "Thank you",
            "Thanks!",
            "<p>Thanks!</p>",
        ))
        .await
        .unwrap();

    // the two deferred calls have not gone out yet
    subscribe_mock.assert_hits(0);
    mail_mock.assert_hits(0);
    assert_eq!(dispatcher.len(), 2);

    let results = dispatcher.drain().await;
    assert!(results.iter().all(|(_, r)| r.is_ok()));

    customer_mock.assert();
    charge_mock.assert();
    subscribe_mock.assert();
    mail_mock.assert();
}

#[tokio::test]
async fn test_live_card_decline_reaches_the_caller() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/customers");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"id": "cus_live_2"}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/v1/charges");
        then.status(402)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "error": {"type": "card_error", "message": "Your card was declined."}
            }));
    });

    let toml = format!(
        r#"
[app]
name = "pledge-prod"

[stripe]
publishable_key = "pk_live_1"
secret_key = "sk_live_2"
api_base = "{base}"

[mailchimp]
api_key = "abc-us5"
list_id = "f00dcafe11"

[mail]
domain = "mail.mayone.us"
api_key = "key-123"
"#,
        base = server.base_url()
    );
    let config = AppConfig::from_toml_str(&toml).unwrap();
    let dispatcher = Arc::new(BufferDispatcher::new());
    let env = Environment::from_config(&config, dispatcher).unwrap();

    let payment = env.payment();
    let customer_id = payment
        .create_customer("donor@example.com", "tok_visa")
        .await
        .unwrap();
    let err = payment.charge(&customer_id, 500).await.unwrap_err();
    assert!(err.is_payment());
    assert!(err.to_string().contains("Your card was declined."));
}
