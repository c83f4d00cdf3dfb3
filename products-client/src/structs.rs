use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque product identifier.
///
/// The backend may hand ids out as JSON numbers or strings; either way the
/// value is only ever compared and echoed back into URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(u64),
            Str(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => ProductId(n.to_string()),
            RawId::Str(s) => ProductId(s),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub quantity: u64,
    pub price: f64,
}

/// Body of `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub quantity: u64,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_accepts_numeric_and_string_ids() {
        let json = r#"[
            {"id": 1, "name": "Pen", "quantity": 10, "price": 1.5},
            {"id": "a7", "name": "Book", "quantity": 2, "price": 9.99}
        ]"#;
        let products: Vec<Product> = serde_json::from_str(json).unwrap();

        assert_eq!(products[0].id, ProductId::from(1));
        assert_eq!(products[1].id.as_str(), "a7");
        assert_eq!(products[1].price, 9.99);
    }

    #[test]
    fn test_negative_quantity_is_rejected() {
        let json = r#"{"id": 1, "name": "Pen", "quantity": -1, "price": 1.5}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }
}
