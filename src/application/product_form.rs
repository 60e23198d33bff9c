use crate::domain::ports::SharedProductStore;
use crate::domain::product::{MinorUnits, NewProduct};
use crate::error::ValidationErrors;
use tracing::{error, info};

pub const FIELD_REQUIRED: &str = "This field is required";
pub const INVALID_PRICE: &str = "Invalid price";

pub const NAME_FIELD: &str = "name";
pub const PRICE_FIELD: &str = "price";

/// Icon rendered next to the submit button once a submission finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Checkmark,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Created(String),
    Failed(String),
}

impl SubmissionOutcome {
    pub fn glyph(&self) -> Glyph {
        match self {
            SubmissionOutcome::Created(_) => Glyph::Checkmark,
            SubmissionOutcome::Failed(_) => Glyph::Alert,
        }
    }
}

/// The "add product" form.
pub struct ProductForm {
    store: SharedProductStore,
}

impl ProductForm {
    pub fn new(store: SharedProductStore) -> Self {
        Self { store }
    }

    /// Applies the client-side field rules and converts the price to minor units.
    pub fn validate(name: &str, price: &str) -> Result<NewProduct, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if name.is_empty() {
            errors.add(NAME_FIELD, FIELD_REQUIRED);
        }

        let units = if price.is_empty() {
            errors.add(PRICE_FIELD, FIELD_REQUIRED);
            None
        } else {
            let parsed = MinorUnits::parse_price(price);
            if parsed.is_none() {
                errors.add(PRICE_FIELD, INVALID_PRICE);
            }
            parsed
        };

        match units {
            Some(price) if errors.is_empty() => Ok(NewProduct {
                name: name.to_string(),
                price,
            }),
            _ => Err(errors),
        }
    }

    /// Validates and writes a new product.
    ///
    /// Validation failures are returned as `Err` and never reach the store.
    /// Store failures become [`SubmissionOutcome::Failed`]; there is no retry.
    pub async fn submit(
        &self,
        name: &str,
        price: &str,
    ) -> Result<SubmissionOutcome, ValidationErrors> {
        let product = Self::validate(name, price)?;
        let price = product.price;

        match self.store.add_product(product).await {
            Ok(id) => {
                info!(product_id = %id, %price, "created product");
                Ok(SubmissionOutcome::Created(id))
            }
            Err(e) => {
                error!(error = %e, "failed to create product");
                Ok(SubmissionOutcome::Failed(e.to_string()))
            }
        }
    }
}
