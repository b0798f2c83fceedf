use crate::backends::mail::{FakeMailSender, HttpMailSender};
use crate::backends::mailchimp::{FakeSubscriber, MailchimpSubscriber};
use crate::backends::stripe::{FakePayments, StripePayments};
use crate::config::AppConfig;
use crate::domain::ports::{MailSender, MailingListSubscriber, PaymentBackend, TaskDispatcher};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_required_field, Validate};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Everything environment-dependent, resolved once at startup. Call sites
/// hold this and never ask which deployment they are in again.
pub struct Environment {
    app_name: String,
    stripe_publishable_key: String,
    payment: Arc<dyn PaymentBackend>,
    subscriber: Arc<dyn MailingListSubscriber>,
    mail: Arc<dyn MailSender>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("app_name", &self.app_name)
            .field("stripe_publishable_key", &self.stripe_publishable_key)
            .finish_non_exhaustive()
    }
}

impl Environment {
    /// Select backends from configuration: the `local` app name installs
    /// the in-memory fakes, anything else the live clients. Live selection
    /// fails fast on missing credentials rather than 401-ing at first use.
    pub fn from_config(config: &AppConfig, dispatcher: Arc<dyn TaskDispatcher>) -> Result<Self> {
        config.validate()?;

        if config.is_local() {
            tracing::warn!("app '{}' is local, installing fake backends", config.app.name);
            let publishable_key = config
                .stripe
                .as_ref()
                .and_then(|s| s.publishable_key.clone())
                .unwrap_or_else(|| "pk_test_local".to_string());

            return Ok(Self {
                app_name: config.app.name.clone(),
                stripe_publishable_key: publishable_key,
                payment: Arc::new(FakePayments::new()),
                subscriber: Arc::new(FakeSubscriber::new()),
                mail: Arc::new(FakeMailSender::new()),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds()))
            .build()?;

        let stripe_config = validate_required_field("stripe", &config.stripe)?;
        let secret_key = validate_required_field("stripe.secret_key", &stripe_config.secret_key)?;
        validate_non_empty_string("stripe.secret_key", secret_key)?;
        let publishable_key =
            validate_required_field("stripe.publishable_key", &stripe_config.publishable_key)?;

        let mut payment = StripePayments::new(
            client.clone(),
            secret_key.clone(),
            config.statement_descriptor().to_string(),
        );
        if let Some(api_base) = &stripe_config.api_base {
            payment = payment.with_api_base(api_base.clone());
        }

        let mailchimp_config = validate_required_field("mailchimp", &config.mailchimp)?;
        let mailchimp_key =
            validate_required_field("mailchimp.api_key", &mailchimp_config.api_key)?;
        validate_non_empty_string("mailchimp.api_key", mailchimp_key)?;
        let list_id = validate_required_field("mailchimp.list_id", &mailchimp_config.list_id)?;

        let mut subscriber = MailchimpSubscriber::new(
            client.clone(),
            mailchimp_key.clone(),
            list_id.clone(),
            dispatcher.clone(),
        );
        if let Some(api_base) = &mailchimp_config.api_base {
            subscriber = subscriber.with_api_base(api_base.clone());
        }

        let mail_config = validate_required_field("mail", &config.mail)?;
        let mail_domain = validate_required_field("mail.domain", &mail_config.domain)?;
        validate_non_empty_string("mail.domain", mail_domain)?;
        let mail_key = validate_required_field("mail.api_key", &mail_config.api_key)?;

        let mut mail = HttpMailSender::new(
            client,
            mail_domain.clone(),
            mail_key.clone(),
            mail_config.display_name.clone(),
            dispatcher,
        );
        if let Some(api_base) = &mail_config.api_base {
            mail = mail.with_api_base(api_base.clone());
        }

        tracing::info!("app '{}' using live backends", config.app.name);
        Ok(Self {
            app_name: config.app.name.clone(),
            stripe_publishable_key: publishable_key.clone(),
            payment: Arc::new(payment),
            subscriber: Arc::new(subscriber),
            mail: Arc::new(mail),
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Handed to the checkout JS; never secret.
    pub fn stripe_publishable_key(&self) -> &str {
        &self.stripe_publishable_key
    }

    pub fn payment(&self) -> Arc<dyn PaymentBackend> {
        Arc::clone(&self.payment)
    }

    pub fn subscriber(&self) -> Arc<dyn MailingListSubscriber> {
        Arc::clone(&self.subscriber)
    }

    pub fn mail(&self) -> Arc<dyn MailSender> {
        Arc::clone(&self.mail)
    }
}
