pub mod backends;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;

pub use crate::config::AppConfig;
pub use crate::core::environment::Environment;
pub use crate::core::tasks::{BufferDispatcher, SpawnDispatcher};
pub use crate::domain::model::{OutgoingEmail, SubscribeRequest};
pub use crate::domain::ports::{MailSender, MailingListSubscriber, PaymentBackend, TaskDispatcher};
pub use crate::utils::error::{BackendError, Result};
