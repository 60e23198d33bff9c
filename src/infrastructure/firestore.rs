use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{PaymentRecordStore, ProductStore};
use crate::domain::product::{MinorUnits, NewProduct, Product};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

/// Collection holding the catalog.
pub const PRODUCTS_COLLECTION: &str = "products";
/// Collection payment records are appended to.
pub const PAYMENTS_COLLECTION: &str = "payments";

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

#[derive(Debug, Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Document {
    /// Full resource path; the document id is the last segment.
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl Document {
    fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    fn string_field(&self, field: &str) -> Option<String> {
        self.fields
            .get(field)?
            .get("stringValue")?
            .as_str()
            .map(str::to_string)
    }

    /// Reads an integer field. Whole doubles are accepted since clients
    /// that write through a JS number may store prices as `doubleValue`.
    fn integer_field(&self, field: &str) -> Option<i64> {
        let value = self.fields.get(field)?;
        if let Some(raw) = value.get("integerValue") {
            return match raw {
                Value::String(s) => s.parse().ok(),
                other => other.as_i64(),
            };
        }
        let double = value.get("doubleValue")?.as_f64()?;
        (double.fract() == 0.0).then_some(double as i64)
    }

    fn into_product(self) -> Result<Product> {
        let name = self
            .string_field("name")
            .ok_or_else(|| AppError::MalformedResponse(format!("document {} has no name", self.id())))?;
        let price = self
            .integer_field("price")
            .ok_or_else(|| AppError::MalformedResponse(format!("document {} has no price", self.id())))?;
        Ok(Product {
            id: self.id().to_string(),
            name,
            price: MinorUnits(price),
        })
    }
}

fn encode_fields(name: &str, price: MinorUnits) -> Value {
    json!({
        "fields": {
            "name": { "stringValue": name },
            "price": { "integerValue": price.value().to_string() },
        }
    })
}

/// Document store backed by the Firestore REST API.
///
/// Implements both the `products` and `payments` collections over a single
/// HTTP client.
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: Client,
    base_url: String,
    project_id: String,
    api_key: Option<String>,
}

impl FirestoreStore {
    pub fn new(base_url: impl Into<String>, project_id: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            api_key,
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.base_url, self.project_id, collection
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.authorize(self.client.get(self.collection_url(collection)));
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                return Err(AppError::Network(format!("HTTP {}: {}", status, body)));
            }
            let page: ListDocumentsResponse = serde_json::from_str(&body)
                .map_err(|e| AppError::MalformedResponse(e.to_string()))?;

            documents.extend(page.documents);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(%collection, count = documents.len(), "listed documents");
        Ok(documents)
    }

    async fn create_document(&self, collection: &str, body: Value) -> Result<String> {
        let response = self
            .authorize(self.client.post(self.collection_url(collection)))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Write(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Write(e.to_string()))?;
        if !status.is_success() {
            return Err(AppError::Write(format!("HTTP {}: {}", status, text)));
        }

        let document: Document =
            serde_json::from_str(&text).map_err(|e| AppError::Write(e.to_string()))?;
        debug!(%collection, id = document.id(), "created document");
        Ok(document.id().to_string())
    }
}

#[async_trait]
impl ProductStore for FirestoreStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        self.list_documents(PRODUCTS_COLLECTION)
            .await?
            .into_iter()
            .map(Document::into_product)
            .collect()
    }

    async fn add_product(&self, product: NewProduct) -> Result<String> {
        self.create_document(PRODUCTS_COLLECTION, encode_fields(&product.name, product.price))
            .await
    }
}

#[async_trait]
impl PaymentRecordStore for FirestoreStore {
    async fn add_payment(&self, record: PaymentRecord) -> Result<String> {
        self.create_document(PAYMENTS_COLLECTION, encode_fields(&record.name, record.price))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(body: Value) -> Document {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_document_to_product() {
        let doc = document(json!({
            "name": "projects/demo/databases/(default)/documents/products/abc123",
            "fields": {
                "name": { "stringValue": "Mug" },
                "price": { "integerValue": "1250" }
            }
        }));

        let product = doc.into_product().unwrap();
        assert_eq!(product.id, "abc123");
        assert_eq!(product.name, "Mug");
        assert_eq!(product.price, MinorUnits(1250));
    }

    #[test]
    fn test_whole_double_price_is_accepted() {
        let doc = document(json!({
            "name": "projects/demo/databases/(default)/documents/products/x",
            "fields": {
                "name": { "stringValue": "Cap" },
                "price": { "doubleValue": 900.0 }
            }
        }));
        assert_eq!(doc.into_product().unwrap().price, MinorUnits(900));
    }

    #[test]
    fn test_missing_price_is_malformed() {
        let doc = document(json!({
            "name": "projects/demo/databases/(default)/documents/products/x",
            "fields": { "name": { "stringValue": "Cap" } }
        }));
        assert!(matches!(doc.into_product(), Err(AppError::MalformedResponse(_))));
    }

    #[test]
    fn test_encode_fields_uses_integer_value() {
        let body = encode_fields("Mug", MinorUnits(1250));
        assert_eq!(body["fields"]["price"]["integerValue"], "1250");
        assert_eq!(body["fields"]["name"]["stringValue"], "Mug");
    }

    #[test]
    fn test_empty_list_response() {
        let page: ListDocumentsResponse = serde_json::from_str("{}").unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
