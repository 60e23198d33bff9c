use crate::error::{AppError, Result};
use crate::infrastructure::firestore::DEFAULT_BASE_URL;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Host serving `getPaymentIntent` and `getEphemeralSecret`.
    pub functions_url: Option<String>,
    pub firestore_url: String,
    pub project_id: Option<String>,
    pub api_key: Option<String>,
    pub currency: String,
    /// Write a `payments` document whenever a session is bootstrapped.
    pub record_payments: bool,
    /// Unset means the payment sheet may wait for the user indefinitely.
    pub payment_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            functions_url: None,
            firestore_url: DEFAULT_BASE_URL.to_string(),
            project_id: None,
            api_key: None,
            currency: "eur".to_string(),
            record_payments: false,
            payment_timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys take defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let record_payments = var("SHEETPAY_RECORD_PAYMENTS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(defaults.record_payments);

        let payment_timeout = var("SHEETPAY_PAYMENT_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            functions_url: var("SHEETPAY_FUNCTIONS_URL"),
            firestore_url: var("SHEETPAY_FIRESTORE_URL").unwrap_or(defaults.firestore_url),
            project_id: var("SHEETPAY_PROJECT_ID"),
            api_key: var("SHEETPAY_API_KEY"),
            currency: var("SHEETPAY_CURRENCY")
                .map(|c| c.to_lowercase())
                .unwrap_or(defaults.currency),
            record_payments,
            payment_timeout,
        }
    }

    pub fn require_functions_url(&self) -> Result<&str> {
        self.functions_url
            .as_deref()
            .ok_or_else(|| AppError::Config("SHEETPAY_FUNCTIONS_URL is not set".to_string()))
    }

    pub fn require_project_id(&self) -> Result<&str> {
        self.project_id
            .as_deref()
            .ok_or_else(|| AppError::Config("SHEETPAY_PROJECT_ID is not set".to_string()))
    }
}
