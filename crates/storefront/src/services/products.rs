//! Product catalog service.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use local_shop_core::{CategoryId, Price, ProductId};

use crate::db::{CATEGORIES, KeyValueStore, PRODUCTS, StoreError, Table};
use crate::models::{Category, CreateProductRequest, Product, UpdateProductRequest};

const MIN_PRODUCT_NAME_LENGTH: usize = 2;
const MAX_PRODUCT_NAME_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Errors returned by [`ProductService`].
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Category with ID {0} does not exist")]
    UnknownCategory(CategoryId),

    #[error("Product with ID {0} not found")]
    NotFound(ProductId),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl ProductError {
    fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

/// Product CRUD and lookups over the `products` table.
pub struct ProductService {
    store: Arc<dyn KeyValueStore>,
}

impl ProductService {
    /// Create the service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn products(&self) -> Table<'_, Product> {
        Table::new(self.store.as_ref(), PRODUCTS)
    }

    fn ensure_category(&self, id: Option<CategoryId>) -> Result<(), ProductError> {
        let Some(id) = id else {
            return Ok(());
        };
        let categories: Vec<Category> = Table::new(self.store.as_ref(), CATEGORIES).load()?;
        if categories.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(ProductError::UnknownCategory(id))
        }
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Validation` for a bad name, an overlong
    /// description or a negative price.
    /// Returns `ProductError::UnknownCategory` if the category does not exist.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub fn create_product(&self, request: &CreateProductRequest) -> Result<Product, ProductError> {
        let name = validate_name(&request.name)?;
        let description = validate_description(request.description.as_deref())?;
        let price = Price::new(request.price, request.currency)
            .map_err(|e| ProductError::validation("price", e.to_string()))?;
        self.ensure_category(request.category_id)?;

        let table = self.products();
        let mut records = table.load()?;
        let product = Product {
            id: ProductId::new(table.next_id()?),
            name,
            description,
            price,
            category_id: request.category_id,
            stock: request.stock,
            image_url: non_blank(request.image_url.as_deref()),
        };
        records.push(product.clone());
        table.save(&records)?;

        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if no product has this ID.
    /// Returns `ProductError::Validation` or `ProductError::UnknownCategory`
    /// for invalid changes.
    #[instrument(skip(self, changes))]
    pub fn update_product(
        &self,
        id: ProductId,
        changes: &UpdateProductRequest,
    ) -> Result<Product, ProductError> {
        let table = self.products();
        let mut records = table.load()?;
        let Some(index) = records.iter().position(|p| p.id == id) else {
            return Err(ProductError::NotFound(id));
        };

        let name = changes.name.as_deref().map(validate_name).transpose()?;
        let description = changes
            .description
            .as_deref()
            .map(|d| validate_description(Some(d)))
            .transpose()?;
        if let Some(category_id) = changes.category_id {
            self.ensure_category(category_id)?;
        }

        let product = records.get_mut(index).ok_or(ProductError::NotFound(id))?;
        if changes.price.is_some() || changes.currency.is_some() {
            let amount = changes.price.unwrap_or(product.price.amount);
            let currency = changes.currency.unwrap_or(product.price.currency_code);
            product.price = Price::new(amount, currency)
                .map_err(|e| ProductError::validation("price", e.to_string()))?;
        }
        if let Some(name) = name {
            product.name = name;
        }
        if let Some(description) = description {
            product.description = description;
        }
        if let Some(category_id) = changes.category_id {
            product.category_id = category_id;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        if let Some(image_url) = &changes.image_url {
            product.image_url = non_blank(Some(image_url.as_str()));
        }
        let updated = product.clone();
        table.save(&records)?;

        info!(product_id = %id, "Product updated");
        Ok(updated)
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if no product has this ID.
    #[instrument(skip(self))]
    pub fn delete_product(&self, id: ProductId) -> Result<(), ProductError> {
        let table = self.products();
        let mut records = table.load()?;
        let before = records.len();
        records.retain(|p| p.id != id);
        if records.len() == before {
            return Err(ProductError::NotFound(id));
        }
        table.save(&records)?;

        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Look up one product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Store` if the table cannot be read.
    pub fn get_product(&self, id: ProductId) -> Result<Option<Product>, ProductError> {
        Ok(self.products().load()?.into_iter().find(|p| p.id == id))
    }

    /// Every product, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Store` if the table cannot be read.
    pub fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.products().load()?)
    }

    /// Products listed under `category_id`.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Store` if the table cannot be read.
    pub fn list_by_category(&self, category_id: CategoryId) -> Result<Vec<Product>, ProductError> {
        let mut records = self.products().load()?;
        records.retain(|p| p.category_id == Some(category_id));
        Ok(records)
    }

    /// Case-insensitive substring search over name and description.
    /// A blank query returns everything.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Store` if the table cannot be read.
    pub fn search(&self, query: &str) -> Result<Vec<Product>, ProductError> {
        let mut records = self.products().load()?;
        records.retain(|p| p.matches(query));
        Ok(records)
    }
}

fn validate_name(raw: &str) -> Result<String, ProductError> {
    let name = raw.trim();
    let length = name.chars().count();
    if length < MIN_PRODUCT_NAME_LENGTH {
        return Err(ProductError::validation(
            "name",
            format!("must be at least {MIN_PRODUCT_NAME_LENGTH} characters"),
        ));
    }
    if length > MAX_PRODUCT_NAME_LENGTH {
        return Err(ProductError::validation(
            "name",
            format!("cannot exceed {MAX_PRODUCT_NAME_LENGTH} characters"),
        ));
    }
    Ok(name.to_owned())
}

fn validate_description(raw: Option<&str>) -> Result<Option<String>, ProductError> {
    let description = non_blank(raw);
    if description
        .as_ref()
        .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LENGTH)
    {
        return Err(ProductError::validation(
            "description",
            format!("cannot exceed {MAX_DESCRIPTION_LENGTH} characters"),
        ));
    }
    Ok(description)
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::MemoryStore;
    use crate::services::categories::CategoryService;

    fn services() -> (ProductService, CategoryService) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let categories = CategoryService::new(store.clone(), true).unwrap();
        (ProductService::new(store), categories)
    }

    fn request(name: &str, cents: i64, category: Option<i32>) -> CreateProductRequest {
        CreateProductRequest {
            name: name.into(),
            description: Some("  ".into()),
            price: Decimal::new(cents, 2),
            category_id: category.map(CategoryId::new),
            stock: 3,
            ..CreateProductRequest::default()
        }
    }

    #[test]
    fn test_create_product() {
        let (products, _) = services();
        let product = products.create_product(&request(" Headphones ", 4999, Some(1))).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.name, "Headphones");
        assert_eq!(product.price.display(), "$49.99");
        assert!(product.description.is_none());
        assert_eq!(products.get_product(product.id).unwrap(), Some(product));
    }

    #[test]
    fn test_create_product_rejections() {
        let (products, _) = services();
        assert!(matches!(
            products.create_product(&request("X", 100, None)),
            Err(ProductError::Validation { field: "name", .. })
        ));
        assert!(matches!(
            products.create_product(&request("Lamp", -100, None)),
            Err(ProductError::Validation { field: "price", .. })
        ));
        assert!(matches!(
            products.create_product(&request("Lamp", 100, Some(42))),
            Err(ProductError::UnknownCategory(id)) if id == CategoryId::new(42)
        ));
        assert!(products.list_products().unwrap().is_empty());
    }

    #[test]
    fn test_description_length_limit() {
        let (products, _) = services();
        let mut long = request("Lamp", 1500, None);
        long.description = Some("x".repeat(1001));
        assert!(matches!(
            products.create_product(&long),
            Err(ProductError::Validation { field: "description", .. })
        ));

        long.description = Some("x".repeat(1000));
        assert!(products.create_product(&long).is_ok());
    }

    #[test]
    fn test_update_rejects_long_description() {
        let (products, _) = services();
        let lamp = products.create_product(&request("Lamp", 1500, None)).unwrap();

        let changes = UpdateProductRequest {
            description: Some("x".repeat(5000)),
            ..UpdateProductRequest::default()
        };
        assert!(matches!(
            products.update_product(lamp.id, &changes),
            Err(ProductError::Validation { field: "description", .. })
        ));
        assert!(products.get_product(lamp.id).unwrap().unwrap().description.is_none());
    }

    #[test]
    fn test_update_product() {
        let (products, _) = services();
        let lamp = products.create_product(&request("Lamp", 1500, Some(4))).unwrap();

        let changes = UpdateProductRequest {
            price: Some(Decimal::new(1250, 2)),
            category_id: Some(None),
            stock: Some(0),
            ..UpdateProductRequest::default()
        };
        let updated = products.update_product(lamp.id, &changes).unwrap();
        assert_eq!(updated.price.amount, Decimal::new(1250, 2));
        assert_eq!(updated.category_id, None);
        assert_eq!(updated.stock, 0);
        assert_eq!(updated.name, "Lamp");

        let err = products
            .update_product(ProductId::new(8), &UpdateProductRequest::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Product with ID 8 not found");
    }

    #[test]
    fn test_listing_and_search() {
        let (products, _) = services();
        products.create_product(&request("Phone", 39900, Some(1))).unwrap();
        products.create_product(&request("Novel", 1299, Some(3))).unwrap();
        let mut sweater = request("Wool Sweater", 5900, Some(2));
        sweater.description = Some("Warm knit for winter".into());
        products.create_product(&sweater).unwrap();

        assert_eq!(products.list_by_category(CategoryId::new(3)).unwrap().len(), 1);
        let found = products.search("KNIT").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found.first().unwrap().name, "Wool Sweater");
        assert_eq!(products.search("").unwrap().len(), 3);
    }

    #[test]
    fn test_delete_product() {
        let (products, _) = services();
        let phone = products.create_product(&request("Phone", 39900, None)).unwrap();
        products.delete_product(phone.id).unwrap();
        assert!(matches!(
            products.delete_product(phone.id),
            Err(ProductError::NotFound(_))
        ));
    }
}
