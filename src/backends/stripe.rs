use crate::domain::ports::PaymentBackend;
use crate::utils::error::{BackendError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Sentinel address the fake backend maps to a customer whose charges
/// always fail. Lets manual testing exercise the decline path.
pub const FAILURE_EMAIL: &str = "failure@failure.biz";
pub const FAKE_CUSTOMER_ID: &str = "fake_1234";
pub const DOOMED_CUSTOMER_ID: &str = "doomed_customer";
pub const FAKE_CHARGE_ID: &str = "fake_charge_1234";

/// Live payment gateway client. Form-encoded POSTs authenticated with the
/// secret key, per the gateway's v1 wire format.
pub struct StripePayments {
    client: Client,
    secret_key: String,
    statement_descriptor: String,
    api_base: String,
}

impl StripePayments {
    pub fn new(client: Client, secret_key: String, statement_descriptor: String) -> Self {
        Self {
            client,
            secret_key,
            statement_descriptor,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base<S: Into<String>>(mut self, api_base: S) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn id_from(body: &Value) -> Result<String> {
        body.get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BackendError::UnexpectedResponseError {
                service: "stripe",
                detail: "response missing object id".to_string(),
            })
    }
}

#[async_trait]
impl PaymentBackend for StripePayments {
    async fn create_customer(&self, email: &str, card_token: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/v1/customers", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&[("card", card_token), ("email", email)])
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let customer_id = Self::id_from(&body)?;
        tracing::debug!("created customer {}", customer_id);
        Ok(customer_id)
    }

    async fn charge(&self, customer_id: &str, amount_cents: i64) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/v1/charges", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&[
                ("amount", amount_cents.to_string()),
                ("currency", "usd".to_string()),
                ("customer", customer_id.to_string()),
                ("statement_descriptor", self.statement_descriptor.clone()),
            ])
            .send()
            .await?;

        // A declined card comes back as 402 with a card_error payload.
        // That one failure belongs to the caller; everything else is ours.
        if response.status() == StatusCode::PAYMENT_REQUIRED {
            let body: Value = response.json().await?;
            let error = body.get("error").cloned().unwrap_or(Value::Null);
            if error.get("type").and_then(Value::as_str) == Some("card_error") {
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Your card was declined.")
                    .to_string();
                return Err(BackendError::PaymentError { message });
            }
            return Err(BackendError::UnexpectedResponseError {
                service: "stripe",
                detail: format!("402 without card_error: {}", error),
            });
        }

        let body: Value = response.error_for_status()?.json().await?;
        let charge_id = Self::id_from(&body)?;
        tracing::info!(
            "charged customer {} {} cents (charge {})",
            customer_id,
            amount_cents,
            charge_id
        );
        Ok(charge_id)
    }
}

/// In-memory stand-in installed when the app runs as `local`. Logs at
/// error level so a production deployment wired to it is unmissable.
#[derive(Debug, Default)]
pub struct FakePayments;

impl FakePayments {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentBackend for FakePayments {
    async fn create_customer(&self, email: &str, _card_token: &str) -> Result<String> {
        tracing::error!("USING FAKE PAYMENT BACKEND");
        if email == FAILURE_EMAIL {
            Ok(DOOMED_CUSTOMER_ID.to_string())
        } else {
            Ok(FAKE_CUSTOMER_ID.to_string())
        }
    }

    async fn charge(&self, customer_id: &str, amount_cents: i64) -> Result<String> {
        tracing::error!("USING FAKE PAYMENT BACKEND");
        if customer_id == DOOMED_CUSTOMER_ID {
            return Err(BackendError::payment(
                "You have no chance to survive make your time",
            ));
        }
        tracing::error!("CHARGED CUSTOMER {} {} cents", customer_id, amount_cents);
        Ok(FAKE_CHARGE_ID.to_string())
    }
}
