use serde::{Deserialize, Serialize};

/// Everything the mailing-list service wants to know about a new signup.
/// Serializable because it travels as a deferred-task payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Pledge amount in cents, if the signup came from a pledge.
    pub amount_cents: Option<i64>,
    /// Address the opt-in request arrived from.
    pub request_ip: String,
    pub source: Option<String>,
    pub phone: Option<String>,
    pub zipcode: Option<String>,
    /// The upstream form sends the literal string "Yes".
    pub volunteer: Option<String>,
    pub skills: Option<String>,
    pub rootstrikers: Option<String>,
    pub nonce: Option<String>,
    pub pledge_page_slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub reply_to: Option<String>,
}

impl OutgoingEmail {
    pub fn new<S: Into<String>>(to: S, subject: S, text_body: S, html_body: S) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text_body: text_body.into(),
            html_body: html_body.into(),
            reply_to: None,
        }
    }

    pub fn with_reply_to<S: Into<String>>(mut self, reply_to: S) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }
}
