use super::product::MinorUnits;
use serde::{Deserialize, Serialize};

/// Error code the hosted payment UI reports when the user dismisses it.
pub const CANCELED_CODE: &str = "Canceled";

/// Credentials minted by the remote function for one payment attempt.
///
/// Consumed once by the hosted payment UI and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentSession {
    #[serde(rename = "paymentIntent")]
    pub payment_intent_secret: String,
    #[serde(rename = "ephemeralKey")]
    pub ephemeral_key_secret: String,
    #[serde(rename = "customer")]
    pub customer_id: String,
    #[serde(rename = "displayName")]
    pub merchant_display_name: String,
}

/// Customer-scoped credentials used by the payment-method editor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerCredentials {
    #[serde(rename = "ephemeralKey")]
    pub ephemeral_key_secret: String,
    #[serde(rename = "customer")]
    pub customer_id: String,
}

/// Document written to the `payments` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub name: String,
    pub price: MinorUnits,
}

/// What the hosted payment UI is initialized with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSheetConfig {
    pub merchant_display_name: String,
    pub customer_id: String,
    pub customer_ephemeral_key_secret: String,
    pub payment_intent_client_secret: String,
    /// Accept methods that settle after a delay (SEPA Debit, Sofort).
    pub allows_delayed_payment_methods: bool,
}

impl From<PaymentSession> for PaymentSheetConfig {
    fn from(session: PaymentSession) -> Self {
        Self {
            merchant_display_name: session.merchant_display_name,
            customer_id: session.customer_id,
            customer_ephemeral_key_secret: session.ephemeral_key_secret,
            payment_intent_client_secret: session.payment_intent_secret,
            allows_delayed_payment_methods: true,
        }
    }
}

/// An error reported by the hosted payment UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetError {
    pub code: String,
    pub message: String,
}

impl SheetError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn canceled() -> Self {
        Self::new(CANCELED_CODE, "The payment flow has been canceled")
    }

    pub fn is_canceled(&self) -> bool {
        self.code == CANCELED_CODE
    }
}

impl std::fmt::Display for SheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Terminal result of one payment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success,
    Cancelled,
    Failed(String),
}

/// Read-only view of the orchestrator's active-payment state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivePayment {
    pub is_active: bool,
    pub product_id: Option<String>,
}

impl ActivePayment {
    /// Whether the row for `product_id` should render as the one being paid.
    pub fn is_paying(&self, product_id: &str) -> bool {
        self.product_id.as_deref() == Some(product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_deserializes_from_function_payload() {
        let body = r#"{"paymentIntent":"pi_secret","ephemeralKey":"ek_secret","customer":"cus_1","displayName":"Shop"}"#;
        let session: PaymentSession = serde_json::from_str(body).unwrap();
        assert_eq!(session.payment_intent_secret, "pi_secret");
        assert_eq!(session.customer_id, "cus_1");

        let config = PaymentSheetConfig::from(session);
        assert_eq!(config.merchant_display_name, "Shop");
        assert_eq!(config.customer_ephemeral_key_secret, "ek_secret");
        assert!(config.allows_delayed_payment_methods);
    }

    #[test]
    fn test_session_missing_field_is_rejected() {
        let body = r#"{"paymentIntent":"pi_secret","customer":"cus_1"}"#;
        assert!(serde_json::from_str::<PaymentSession>(body).is_err());
    }

    #[test]
    fn test_sheet_error_cancel_detection() {
        assert!(SheetError::canceled().is_canceled());
        assert!(!SheetError::new("Failed", "card declined").is_canceled());
    }

    #[test]
    fn test_active_payment_is_paying() {
        let state = ActivePayment {
            is_active: true,
            product_id: Some("p1".to_string()),
        };
        assert!(state.is_paying("p1"));
        assert!(!state.is_paying("p2"));
        assert!(!ActivePayment::default().is_paying("p1"));
    }
}
