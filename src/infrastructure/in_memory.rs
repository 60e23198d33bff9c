use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{PaymentRecordStore, ProductStore};
use crate::domain::product::{NewProduct, Product};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory `products` collection.
///
/// Keeps insertion order so listing is deterministic. Ideal for tests and
/// for running the CLI without a backend.
#[derive(Default, Clone)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductStore {
    /// Creates a new, empty product store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `products`.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
        }
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products.clone())
    }

    async fn add_product(&self, product: NewProduct) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        let mut products = self.products.write().await;
        products.push(product.with_id(id.clone()));
        Ok(id)
    }
}

/// A thread-safe in-memory `payments` collection.
#[derive(Default, Clone)]
pub struct InMemoryPaymentRecordStore {
    payments: Arc<RwLock<Vec<(String, PaymentRecord)>>>,
}

impl InMemoryPaymentRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every record written so far, oldest first.
    pub async fn records(&self) -> Vec<PaymentRecord> {
        let payments = self.payments.read().await;
        payments.iter().map(|(_, record)| record.clone()).collect()
    }
}

#[async_trait]
impl PaymentRecordStore for InMemoryPaymentRecordStore {
    async fn add_payment(&self, record: PaymentRecord) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        let mut payments = self.payments.write().await;
        payments.push((id.clone(), record));
        Ok(id)
    }
}
