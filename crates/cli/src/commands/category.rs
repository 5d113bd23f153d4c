//! Category commands.

use local_shop_core::CategoryId;
use local_shop_storefront::ShopState;

use super::CliError;

/// Log every category.
pub fn list(state: &ShopState) -> Result<(), CliError> {
    for category in state.categories().get_categories()? {
        tracing::info!(category_id = %category.id, name = %category.name, "Category");
    }
    Ok(())
}

/// Create a category.
pub fn create(state: &ShopState, name: &str) -> Result<(), CliError> {
    let category = state.categories().create_category(name)?;
    tracing::info!(category_id = %category.id, "Category created");
    Ok(())
}

/// Rename a category.
pub fn rename(state: &ShopState, id: CategoryId, name: &str) -> Result<(), CliError> {
    state.categories().update_category(id, name)?;
    Ok(())
}

/// Delete a category.
pub fn delete(state: &ShopState, id: CategoryId) -> Result<(), CliError> {
    state.categories().delete_category(id)?;
    Ok(())
}
