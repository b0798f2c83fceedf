use crate::domain::model::SubscribeRequest;
use crate::domain::ports::{MailingListSubscriber, TaskDispatcher};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Longest SKILLS value the list service accepts.
const MAX_SKILLS_BYTES: usize = 255;

fn api_base_for_key(api_key: &str) -> String {
    // keys carry their data center as a suffix, e.g. "...-us5"
    match api_key.rsplit_once('-') {
        Some((_, dc)) if !dc.is_empty() => format!("https://{}.api.mailchimp.com", dc),
        _ => "https://us1.api.mailchimp.com".to_string(),
    }
}

fn truncate_to_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Marshal a signup into the list service's merge-var dictionary.
pub(crate) fn merge_vars(request: &SubscribeRequest, optin_time: DateTime<Utc>) -> Map<String, Value> {
    let mut vars = Map::new();
    vars.insert("FNAME".to_string(), json!(request.first_name));
    vars.insert("LNAME".to_string(), json!(request.last_name));
    vars.insert("optin_ip".to_string(), json!(request.request_ip));
    vars.insert("optin_time".to_string(), json!(optin_time.to_rfc3339()));

    if let Some(source) = request.source.as_deref().filter(|s| !s.is_empty()) {
        vars.insert("SOURCE".to_string(), json!(source));
    }

    if let Some(amount_cents) = request.amount_cents.filter(|a| *a != 0) {
        let amount_dollars = format!("{:.2}", amount_cents as f64 / 100.0);
        vars.insert("LASTPLEDGE".to_string(), json!(amount_dollars));
    }

    if request.volunteer.as_deref() == Some("Yes") {
        vars.insert("VOLN".to_string(), json!("Yes"));
    }

    if let Some(nonce) = &request.nonce {
        vars.insert("UUT".to_string(), json!(nonce));
    }

    if let Some(skills) = request.skills.as_deref().filter(|s| !s.is_empty()) {
        vars.insert(
            "SKILLS".to_string(),
            json!(truncate_to_boundary(skills, MAX_SKILLS_BYTES)),
        );
    }

    if let Some(phone) = &request.phone {
        vars.insert("PHONE".to_string(), json!(phone));
    }

    if let Some(zipcode) = &request.zipcode {
        vars.insert("ZIPCODE".to_string(), json!(zipcode));
    }

    if let Some(rootstrikers) = &request.rootstrikers {
        vars.insert("ROOTS".to_string(), json!(rootstrikers));
    }

    if let Some(slug) = &request.pledge_page_slug {
        vars.insert("PPURL".to_string(), json!(slug));
    }

    vars
}

/// Live mailing-list client. `subscribe` only marshals the payload and
/// defers the network call; signup latency never blocks the caller.
pub struct MailchimpSubscriber {
    client: Client,
    api_key: String,
    list_id: String,
    api_base: String,
    dispatcher: Arc<dyn TaskDispatcher>,
}

impl MailchimpSubscriber {
    pub fn new(
        client: Client,
        api_key: String,
        list_id: String,
        dispatcher: Arc<dyn TaskDispatcher>,
    ) -> Self {
        let api_base = api_base_for_key(&api_key);
        Self {
            client,
            api_key,
            list_id,
            api_base,
            dispatcher,
        }
    }

    pub fn with_api_base<S: Into<String>>(mut self, api_base: S) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn payload(&self, request: &SubscribeRequest, optin_time: DateTime<Utc>) -> Value {
        json!({
            "apikey": self.api_key,
            "id": self.list_id,
            "email": {"email": request.email},
            "merge_vars": merge_vars(request, optin_time),
            "double_optin": false,
            "update_existing": true,
            "send_welcome": false,
        })
    }
}

#[async_trait]
impl MailingListSubscriber for MailchimpSubscriber {
    async fn subscribe(&self, request: SubscribeRequest) -> Result<()> {
        tracing::info!("Subscribing: {}", request.email);
        let payload = self.payload(&request, Utc::now());
        let url = format!("{}/2.0/lists/subscribe.json", self.api_base);
        let client = self.client.clone();

        self.dispatcher.dispatch(
            "mailing_list_subscribe",
            Box::pin(async move {
                let response = client.post(&url).json(&payload).send().await?;
                response.error_for_status()?;
                Ok(())
            }),
        );

        Ok(())
    }
}

/// Local stand-in: logs the signup and succeeds unconditionally.
#[derive(Debug, Default)]
pub struct FakeSubscriber;

impl FakeSubscriber {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MailingListSubscriber for FakeSubscriber {
    async fn subscribe(&self, request: SubscribeRequest) -> Result<()> {
        tracing::info!("Subscribing {:?}", request);
        Ok(())
    }
}
