use crate::domain::product::Product;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct ProductRow<'a> {
    id: &'a str,
    name: &'a str,
    price: String,
}

/// Writes the catalog as CSV, one row per product.
///
/// `price` is rendered in major units with two decimals.
pub struct ProductWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ProductWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_products(&mut self, products: &[Product]) -> Result<()> {
        for product in products {
            self.writer.serialize(ProductRow {
                id: &product.id,
                name: &product.name,
                price: product.price.to_price_string(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
