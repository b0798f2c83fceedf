pub mod environment;
pub mod tasks;

pub use crate::domain::model::{OutgoingEmail, SubscribeRequest};
pub use crate::domain::ports::{
    MailSender, MailingListSubscriber, PaymentBackend, TaskDispatcher,
};
pub use crate::utils::error::Result;
