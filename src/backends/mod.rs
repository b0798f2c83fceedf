// Adapters layer: one module per external service, each with a live HTTP
// client and the in-memory fake the local environment installs instead.

pub mod mail;
pub mod mailchimp;
pub mod stripe;
