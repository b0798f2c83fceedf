use crate::utils::error::{BackendError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(BackendError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(BackendError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(BackendError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(BackendError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| BackendError::MissingConfigError {
            field: field_name.to_string(),
        })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BackendError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    // Good enough to catch swapped or truncated addresses; the mail and
    // list services do their own authoritative validation.
    let re = regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is well-formed");
    if !re.is_match(value) {
        return Err(BackendError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Not a valid email address".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("stripe.api_base", "https://api.stripe.com").is_ok());
        assert!(validate_url("stripe.api_base", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("stripe.api_base", "").is_err());
        assert!(validate_url("stripe.api_base", "not-a-url").is_err());
        assert!(validate_url("stripe.api_base", "ftp://api.stripe.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("http.timeout_seconds", 30, 1).is_ok());
        assert!(validate_positive_number("http.timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "donor@example.com").is_ok());
        assert!(validate_email("email", "failure@failure.biz").is_ok());
        assert!(validate_email("email", "donor").is_err());
        assert!(validate_email("email", "donor@nodot").is_err());
        assert!(validate_email("email", "two words@example.com").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("sk_test_123".to_string());
        let absent: Option<String> = None;
        assert_eq!(
            validate_required_field("stripe.secret_key", &present).unwrap(),
            "sk_test_123"
        );
        assert!(validate_required_field("stripe.secret_key", &absent).is_err());
    }
}
