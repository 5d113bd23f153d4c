//! Product catalog types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use local_shop_core::{CategoryId, CurrencyCode, Price, ProductId};

/// A product in the local catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Sequentially assigned product ID.
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    /// Category the product is listed under, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// Units on hand.
    #[serde(default)]
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Product {
    /// Case-insensitive substring match over name and description.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

/// New product input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial product update. `None` leaves a field untouched.
///
/// `category_id: Some(None)` detaches the product from its category.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<CurrencyCode>,
    pub category_id: Option<Option<CategoryId>>,
    pub stock: Option<u32>,
    pub image_url: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Trail Shoe".into(),
            description: Some("Lightweight running shoe".into()),
            price: Price::parse("89.00", CurrencyCode::USD).unwrap(),
            category_id: Some(CategoryId::new(5)),
            stock: 4,
            image_url: None,
        }
    }

    #[test]
    fn test_matches_name_and_description() {
        let p = product();
        assert!(p.matches("trail"));
        assert!(p.matches("RUNNING"));
        assert!(p.matches("  "));
        assert!(!p.matches("sandal"));
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(product()).unwrap();
        assert_eq!(json["categoryId"], 5);
        assert!(json.get("imageUrl").is_none());
    }
}
