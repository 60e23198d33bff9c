#![allow(dead_code)]

use async_trait::async_trait;
use sheetpay::domain::payment::{
    CustomerCredentials, PaymentSession, PaymentSheetConfig, SheetError,
};
use sheetpay::domain::ports::{AlertSink, PaymentSheet, SessionEndpoint};
use sheetpay::domain::product::{MinorUnits, Product};
use sheetpay::error::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn product(id: &str, price: i64) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {}", id),
        price: MinorUnits(price),
    }
}

pub fn session() -> PaymentSession {
    PaymentSession {
        payment_intent_secret: "pi_123_secret_456".to_string(),
        ephemeral_key_secret: "ek_test_789".to_string(),
        customer_id: "cus_42".to_string(),
        merchant_display_name: "Demo Shop".to_string(),
    }
}

/// Session endpoint that always succeeds and counts calls.
#[derive(Default)]
pub struct CountingEndpoint {
    calls: AtomicUsize,
}

impl CountingEndpoint {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionEndpoint for CountingEndpoint {
    async fn payment_session(&self, _price: MinorUnits, _product_id: &str) -> Result<PaymentSession> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(session())
    }

    async fn customer_credentials(&self) -> Result<CustomerCredentials> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CustomerCredentials {
            ephemeral_key_secret: "ek_test_789".to_string(),
            customer_id: "cus_42".to_string(),
        })
    }
}

/// Payment sheet whose presentation blocks until released.
#[derive(Default)]
pub struct GatedSheet {
    pub presenting: Arc<Notify>,
    pub release: Arc<Notify>,
    pub configs: Arc<Mutex<Vec<PaymentSheetConfig>>>,
    pub presented: Arc<AtomicUsize>,
}

#[async_trait]
impl PaymentSheet for GatedSheet {
    async fn init(&self, config: PaymentSheetConfig) -> std::result::Result<(), SheetError> {
        self.configs.lock().unwrap().push(config);
        Ok(())
    }

    async fn present(&self) -> std::result::Result<(), SheetError> {
        self.presented.fetch_add(1, Ordering::SeqCst);
        self.presenting.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingAlerts {
    pub alerts: Mutex<Vec<(String, String)>>,
}

impl RecordingAlerts {
    pub fn titles(&self) -> Vec<String> {
        self.alerts
            .lock()
            .unwrap()
            .iter()
            .map(|(title, _)| title.clone())
            .collect()
    }
}

impl AlertSink for RecordingAlerts {
    fn alert(&self, title: &str, message: &str) {
        self.alerts
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}
