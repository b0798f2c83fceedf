use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "pledge-smoke")]
#[command(about = "Run one pledge through the configured backends")]
pub struct CliArgs {
    #[arg(long, default_value = "config.toml")]
    pub config: String,

    #[arg(long, default_value = "donor@example.com")]
    pub email: String,

    #[arg(long, default_value = "Test")]
    pub first_name: String,

    #[arg(long, default_value = "Donor")]
    pub last_name: String,

    /// Card token as issued by the payment gateway's checkout JS.
    #[arg(long, default_value = "tok_visa")]
    pub card_token: String,

    #[arg(long, default_value = "500")]
    pub amount_cents: i64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliArgs {
    fn validate(&self) -> Result<()> {
        validation::validate_email("email", &self.email)?;
        validation::validate_non_empty_string("card_token", &self.card_token)?;
        validation::validate_positive_number("amount_cents", self.amount_cents.max(0) as u64, 50)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CliArgs {
        CliArgs {
            config: "config.toml".to_string(),
            email: "donor@example.com".to_string(),
            first_name: "Test".to_string(),
            last_name: "Donor".to_string(),
            card_token: "tok_visa".to_string(),
            amount_cents: 500,
            verbose: false,
        }
    }

    #[test]
    fn test_valid_args_pass() {
        assert!(args().validate().is_ok());
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut bad = args();
        bad.email = "not-an-address".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_sub_minimum_amount_rejected() {
        // the gateway refuses charges under 50 cents anyway
        let mut bad = args();
        bad.amount_cents = 49;
        assert!(bad.validate().is_err());
    }
}
