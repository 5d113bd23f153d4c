//! Product catalog commands.

use local_shop_core::{CategoryId, ProductId};
use local_shop_storefront::ShopState;
use local_shop_storefront::models::{CreateProductRequest, Product};

use super::CliError;

fn report(product: &Product) {
    tracing::info!(
        product_id = %product.id,
        name = %product.name,
        price = %product.price.display(),
        category_id = ?product.category_id,
        stock = product.stock,
        "Product"
    );
}

/// Add a product.
pub fn add(state: &ShopState, request: &CreateProductRequest) -> Result<(), CliError> {
    let product = state.products().create_product(request)?;
    report(&product);
    Ok(())
}

/// List products. A search query takes precedence over the category filter.
pub fn list(
    state: &ShopState,
    category: Option<CategoryId>,
    search: Option<&str>,
) -> Result<(), CliError> {
    let products = match (search, category) {
        (Some(query), _) => state.products().search(query)?,
        (None, Some(category_id)) => state.products().list_by_category(category_id)?,
        (None, None) => state.products().list_products()?,
    };
    tracing::info!(count = products.len(), "Products");
    products.iter().for_each(report);
    Ok(())
}

/// Remove a product.
pub fn remove(state: &ShopState, id: ProductId) -> Result<(), CliError> {
    state.products().delete_product(id)?;
    tracing::info!(product_id = %id, "Product removed");
    Ok(())
}
