#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{BackendError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The name that switches every backend to its in-memory fake.
pub const LOCAL_APP_NAME: &str = "local";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSection,
    pub stripe: Option<StripeConfig>,
    pub mailchimp: Option<MailchimpConfig>,
    pub mail: Option<MailConfig>,
    pub http: Option<HttpConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSection {
    pub name: String,
    /// What shows up on the donor's card statement.
    pub statement_descriptor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeConfig {
    pub publishable_key: Option<String>,
    pub secret_key: Option<String>,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailchimpConfig {
    pub api_key: Option<String>,
    pub list_id: Option<String>,
    /// Normally derived from the api key's data-center suffix.
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub domain: Option<String>,
    pub api_key: Option<String>,
    pub display_name: Option<String>,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BackendError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BackendError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` placeholders so secrets can stay out of
    /// checked-in config files. Unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is well-formed");

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn is_local(&self) -> bool {
        self.app.name == LOCAL_APP_NAME
    }

    pub fn statement_descriptor(&self) -> &str {
        self.app
            .statement_descriptor
            .as_deref()
            .unwrap_or("MayOne.US")
    }

    pub fn http_timeout_seconds(&self) -> u64 {
        self.http
            .as_ref()
            .and_then(|h| h.timeout_seconds)
            .unwrap_or(30)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("app.name", &self.app.name)?;

        if let Some(stripe) = &self.stripe {
            if let Some(api_base) = &stripe.api_base {
                validation::validate_url("stripe.api_base", api_base)?;
            }
        }
        if let Some(mailchimp) = &self.mailchimp {
            if let Some(api_base) = &mailchimp.api_base {
                validation::validate_url("mailchimp.api_base", api_base)?;
            }
        }
        if let Some(mail) = &self.mail {
            if let Some(api_base) = &mail.api_base {
                validation::validate_url("mail.api_base", api_base)?;
            }
        }
        if let Some(http) = &self.http {
            if let Some(timeout) = http.timeout_seconds {
                validation::validate_positive_number("http.timeout_seconds", timeout, 1)?;
            }
        }

        Ok(())
    }
}
