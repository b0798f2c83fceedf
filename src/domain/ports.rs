use crate::domain::model::{OutgoingEmail, SubscribeRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

/// A unit of deferred work. Errors are the dispatcher's to log; nothing
/// upstream waits on the outcome.
pub type TaskFuture = Pin<Box<dyn Future<Output = Result<()>> + Send + 'static>>;

/// Fire-and-forget handoff to the hosting platform's background execution.
/// At-least-once, unordered, no cancellation.
pub trait TaskDispatcher: Send + Sync {
    fn dispatch(&self, label: &'static str, task: TaskFuture);
}

#[async_trait]
pub trait PaymentBackend: Send + Sync {
    /// Turn a card token into a chargeable customer, returning the
    /// gateway's customer id.
    async fn create_customer(&self, email: &str, card_token: &str) -> Result<String>;

    /// Charge a previously created customer. A card decline surfaces as
    /// `BackendError::PaymentError`; everything else propagates as-is.
    async fn charge(&self, customer_id: &str, amount_cents: i64) -> Result<String>;
}

#[async_trait]
pub trait MailingListSubscriber: Send + Sync {
    async fn subscribe(&self, request: SubscribeRequest) -> Result<()>;
}

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<()>;
}
