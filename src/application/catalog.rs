use crate::domain::ports::SharedProductStore;
use crate::domain::product::Product;
use crate::error::Result;
use tracing::{debug, warn};

/// Loads the product list shown on the catalog screen.
pub struct CatalogLoader {
    store: SharedProductStore,
}

impl CatalogLoader {
    pub fn new(store: SharedProductStore) -> Self {
        Self { store }
    }

    /// Reads every product from the store.
    ///
    /// No sorting or filtering is applied; the order is whatever the store
    /// iterates in. Failures are returned to the caller, which decides
    /// whether to re-invoke on a user-initiated refresh.
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        match self.store.list_products().await {
            Ok(products) => {
                debug!(count = products.len(), "loaded products");
                Ok(products)
            }
            Err(e) => {
                warn!(error = %e, "failed to load products");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ProductStore;
    use crate::domain::product::{MinorUnits, NewProduct};
    use crate::infrastructure::in_memory::InMemoryProductStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_empty_store_yields_empty_list() {
        let loader = CatalogLoader::new(Arc::new(InMemoryProductStore::new()));
        let products = loader.list_products().await.unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_lists_in_store_order() {
        let store = Arc::new(InMemoryProductStore::new());
        for (name, price) in [("Mug", 1250), ("Shirt", 2000), ("Cap", 900)] {
            store
                .add_product(NewProduct {
                    name: name.to_string(),
                    price: MinorUnits(price),
                })
                .await
                .unwrap();
        }

        let loader = CatalogLoader::new(store);
        let names: Vec<String> = loader
            .list_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Mug", "Shirt", "Cap"]);
    }
}
