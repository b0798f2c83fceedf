use crate::domain::model::OutgoingEmail;
use crate::domain::ports::{MailSender, TaskDispatcher};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

pub const DEFAULT_API_BASE: &str = "https://api.mailgun.net";

async fn post_message(
    client: Client,
    url: String,
    api_key: String,
    form: Vec<(&'static str, String)>,
) -> Result<()> {
    let response = client
        .post(&url)
        .basic_auth("api", Some(&api_key))
        .form(&form)
        .send()
        .await?;
    response.error_for_status()?;
    Ok(())
}

/// Live transactional-mail client. Sends are deferred by default; inline
/// mode exists for the paths where the caller must observe a delivery
/// failure (e.g. replies that bounce back to a human).
pub struct HttpMailSender {
    client: Client,
    domain: String,
    api_key: String,
    from_address: String,
    api_base: String,
    dispatcher: Arc<dyn TaskDispatcher>,
    defer: bool,
}

impl HttpMailSender {
    pub fn new(
        client: Client,
        domain: String,
        api_key: String,
        display_name: Option<String>,
        dispatcher: Arc<dyn TaskDispatcher>,
    ) -> Self {
        let display_name = display_name.unwrap_or_else(|| "no-reply".to_string());
        let from_address = format!("{} <no-reply@{}>", display_name, domain);
        Self {
            client,
            domain,
            api_key,
            from_address,
            api_base: DEFAULT_API_BASE.to_string(),
            dispatcher,
            defer: true,
        }
    }

    pub fn with_api_base<S: Into<String>>(mut self, api_base: S) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_defer(mut self, defer: bool) -> Self {
        self.defer = defer;
        self
    }

    pub fn from_address(&self) -> &str {
        &self.from_address
    }

    fn form_for(&self, email: &OutgoingEmail) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("from", self.from_address.clone()),
            ("to", email.to.clone()),
            ("subject", email.subject.clone()),
            ("text", email.text_body.clone()),
            ("html", email.html_body.clone()),
        ];
        if let Some(reply_to) = &email.reply_to {
            form.push(("h:Reply-To", reply_to.clone()));
        }
        form
    }
}

#[async_trait]
impl MailSender for HttpMailSender {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        let form = self.form_for(&email);
        let url = format!("{}/v3/{}/messages", self.api_base, self.domain);
        tracing::info!("sending mail to {} ({})", email.to, email.subject);

        if self.defer {
            self.dispatcher.dispatch(
                "send_mail",
                Box::pin(post_message(
                    self.client.clone(),
                    url,
                    self.api_key.clone(),
                    form,
                )),
            );
            return Ok(());
        }

        post_message(self.client.clone(), url, self.api_key.clone(), form).await
    }
}

/// Local stand-in: logs the envelope and succeeds.
#[derive(Debug, Default)]
pub struct FakeMailSender;

impl FakeMailSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MailSender for FakeMailSender {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        tracing::info!("FAKE MAIL to {}: {}", email.to, email.subject);
        Ok(())
    }
}
