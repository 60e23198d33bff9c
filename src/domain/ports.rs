use super::payment::{CustomerCredentials, PaymentRecord, PaymentSession, PaymentSheetConfig, SheetError};
use super::product::{MinorUnits, NewProduct, Product};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Read/write access to the `products` collection.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Returns every product in store iteration order.
    async fn list_products(&self) -> Result<Vec<Product>>;
    /// Creates a document and returns the store-assigned id.
    async fn add_product(&self, product: NewProduct) -> Result<String>;
}

/// Write-only access to the `payments` collection.
#[async_trait]
pub trait PaymentRecordStore: Send + Sync {
    async fn add_payment(&self, record: PaymentRecord) -> Result<String>;
}

/// The remote functions that mint payment intents and ephemeral keys.
#[async_trait]
pub trait SessionEndpoint: Send + Sync {
    async fn payment_session(&self, price: MinorUnits, product_id: &str) -> Result<PaymentSession>;
    async fn customer_credentials(&self) -> Result<CustomerCredentials>;
}

/// The hosted payment UI.
#[async_trait]
pub trait PaymentSheet: Send + Sync {
    async fn init(&self, config: PaymentSheetConfig) -> std::result::Result<(), SheetError>;
    /// Presents the sheet and waits for the user to finish with it.
    async fn present(&self) -> std::result::Result<(), SheetError>;
}

/// The hosted "manage payment methods" sheet.
#[async_trait]
pub trait CustomerSheet: Send + Sync {
    /// Presents the sheet bound to `credentials`; returns once it is closed.
    async fn present(&self, credentials: &CustomerCredentials) -> std::result::Result<(), SheetError>;
}

/// Blocking user-facing alert dialogs.
pub trait AlertSink: Send + Sync {
    fn alert(&self, title: &str, message: &str);
}

pub type PaymentRecordStoreBox = Box<dyn PaymentRecordStore>;
pub type SharedProductStore = Arc<dyn ProductStore>;
pub type SharedSessionEndpoint = Arc<dyn SessionEndpoint>;
pub type SharedAlertSink = Arc<dyn AlertSink>;
