//! Category catalog service.
//!
//! Categories are kept in the `categories` table and mirrored into a
//! [`watch`] channel so views can react to changes without polling. The
//! channel is refreshed after every successful mutation and on every
//! explicit [`CategoryService::get_categories`] call.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, instrument};

use local_shop_core::CategoryId;

use crate::db::{CATEGORIES, KeyValueStore, StoreError, Table};
use crate::models::Category;

/// Minimum category name length (after trimming).
pub const MIN_CATEGORY_NAME_LENGTH: usize = 2;
/// Maximum category name length (after trimming).
pub const MAX_CATEGORY_NAME_LENGTH: usize = 50;

/// Categories written to a fresh store when seeding is enabled.
pub const DEMO_CATEGORIES: [&str; 5] = [
    "Electronics",
    "Clothing",
    "Books",
    "Home & Garden",
    "Sports",
];

/// Errors returned by [`CategoryService`].
#[derive(Debug, Error)]
pub enum CategoryError {
    /// Name rejected by validation.
    #[error("{0}")]
    Validation(String),

    /// Another category already uses this name.
    #[error("Category \"{0}\" already exists")]
    Duplicate(String),

    /// No category with this ID.
    #[error("Category with ID {0} not found")]
    NotFound(CategoryId),

    /// Underlying store failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Validate and trim a category name.
///
/// # Errors
///
/// Returns `CategoryError::Validation` if the name is blank, too short or too long.
pub fn validate_category_name(raw: &str) -> Result<String, CategoryError> {
    let name = raw.trim();
    let length = name.chars().count();
    if length == 0 {
        return Err(CategoryError::Validation("Category name is required".to_owned()));
    }
    if length < MIN_CATEGORY_NAME_LENGTH {
        return Err(CategoryError::Validation(format!(
            "Category name must be at least {MIN_CATEGORY_NAME_LENGTH} characters"
        )));
    }
    if length > MAX_CATEGORY_NAME_LENGTH {
        return Err(CategoryError::Validation(format!(
            "Category name cannot exceed {MAX_CATEGORY_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_owned())
}

/// Category CRUD with a reactive snapshot of the full list.
pub struct CategoryService {
    store: Arc<dyn KeyValueStore>,
    snapshot: watch::Sender<Vec<Category>>,
}

impl CategoryService {
    /// Open the category table and publish the initial snapshot.
    ///
    /// With `seed` set, demo categories are written to a store that has never
    /// held a category table. A table emptied by deletes is left empty.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::Store` if the table cannot be read or seeded.
    pub fn new(store: Arc<dyn KeyValueStore>, seed: bool) -> Result<Self, CategoryError> {
        let (snapshot, _) = watch::channel(Vec::new());
        let service = Self { store, snapshot };

        let table = service.table();
        let records = if seed && !table.exists()? {
            seed_demo_categories(&table)?
        } else {
            table.load()?
        };
        service.publish(records);

        Ok(service)
    }

    fn table(&self) -> Table<'_, Category> {
        Table::new(self.store.as_ref(), CATEGORIES)
    }

    fn publish(&self, records: Vec<Category>) {
        self.snapshot.send_replace(records);
    }

    /// Read all categories from the store and refresh the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::Store` if the table cannot be read.
    pub fn get_categories(&self) -> Result<Vec<Category>, CategoryError> {
        let records = self.table().load()?;
        self.publish(records.clone());
        Ok(records)
    }

    /// Same as [`CategoryService::get_categories`].
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::Store` if the table cannot be read.
    pub fn get_all_categories(&self) -> Result<Vec<Category>, CategoryError> {
        self.get_categories()
    }

    /// Last published snapshot, without touching the store.
    #[must_use]
    pub fn current(&self) -> Vec<Category> {
        self.snapshot.borrow().clone()
    }

    /// Watch the category list. A new value is sent after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Category>> {
        self.snapshot.subscribe()
    }

    /// Look up one category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::Store` if the table cannot be read.
    pub fn get_category(&self, id: CategoryId) -> Result<Option<Category>, CategoryError> {
        Ok(self.table().load()?.into_iter().find(|c| c.id == id))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::Validation` if the name is invalid.
    /// Returns `CategoryError::Duplicate` if the name is taken (case-insensitive).
    #[instrument(skip(self))]
    pub fn create_category(&self, name: &str) -> Result<Category, CategoryError> {
        let name = validate_category_name(name)?;

        let table = self.table();
        let mut records = table.load()?;
        if records.iter().any(|c| c.has_name(&name)) {
            return Err(CategoryError::Duplicate(name));
        }

        let category = Category {
            id: CategoryId::new(table.next_id()?),
            name,
        };
        records.push(category.clone());
        table.save(&records)?;
        self.publish(records);

        info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Rename a category. Renaming to its own name (in any case) succeeds.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::Validation` if the name is invalid.
    /// Returns `CategoryError::NotFound` if no category has this ID.
    /// Returns `CategoryError::Duplicate` if another category uses the name.
    #[instrument(skip(self))]
    pub fn update_category(&self, id: CategoryId, name: &str) -> Result<Category, CategoryError> {
        let name = validate_category_name(name)?;

        let table = self.table();
        let mut records = table.load()?;
        if !records.iter().any(|c| c.id == id) {
            return Err(CategoryError::NotFound(id));
        }
        if records.iter().any(|c| c.id != id && c.has_name(&name)) {
            return Err(CategoryError::Duplicate(name));
        }

        let category = records
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CategoryError::NotFound(id))?;
        category.name = name;
        let updated = category.clone();
        table.save(&records)?;
        self.publish(records);

        info!(category_id = %id, name = %updated.name, "Category renamed");
        Ok(updated)
    }

    /// Delete a category. Products keep their (now dangling) category ID.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if no category has this ID.
    #[instrument(skip(self))]
    pub fn delete_category(&self, id: CategoryId) -> Result<(), CategoryError> {
        let table = self.table();
        let mut records = table.load()?;
        let before = records.len();
        records.retain(|c| c.id != id);
        if records.len() == before {
            return Err(CategoryError::NotFound(id));
        }
        table.save(&records)?;
        self.publish(records);

        info!(category_id = %id, "Category deleted");
        Ok(())
    }
}

fn seed_demo_categories(table: &Table<'_, Category>) -> Result<Vec<Category>, StoreError> {
    let records = DEMO_CATEGORIES
        .iter()
        .map(|name| {
            Ok(Category {
                id: CategoryId::new(table.next_id()?),
                name: (*name).to_owned(),
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;
    table.save(&records)?;
    info!(count = records.len(), "Seeded demo categories");
    Ok(records)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn empty() -> CategoryService {
        CategoryService::new(Arc::new(MemoryStore::new()), false).unwrap()
    }

    #[test]
    fn test_validate_category_name() {
        assert_eq!(validate_category_name("  Toys ").unwrap(), "Toys");
        assert_eq!(
            validate_category_name("   ").unwrap_err().to_string(),
            "Category name is required"
        );
        assert_eq!(
            validate_category_name("A").unwrap_err().to_string(),
            "Category name must be at least 2 characters"
        );
        assert_eq!(
            validate_category_name(&"x".repeat(51)).unwrap_err().to_string(),
            "Category name cannot exceed 50 characters"
        );
        assert!(validate_category_name(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn test_seeds_demo_categories_once() {
        let store = Arc::new(MemoryStore::new());
        let service = CategoryService::new(store.clone(), true).unwrap();
        let names: Vec<_> = service.current().into_iter().map(|c| c.name).collect();
        assert_eq!(names, DEMO_CATEGORIES);

        let next = service.create_category("Toys").unwrap();
        assert_eq!(next.id, CategoryId::new(6));

        let reopened = CategoryService::new(store, true).unwrap();
        assert_eq!(reopened.current().len(), 6);
    }

    #[test]
    fn test_emptied_table_is_not_reseeded() {
        let store = Arc::new(MemoryStore::new());
        let service = CategoryService::new(store.clone(), true).unwrap();
        let toys = service.create_category("Toys").unwrap();
        for category in service.get_categories().unwrap() {
            service.delete_category(category.id).unwrap();
        }

        let reopened = CategoryService::new(store, true).unwrap();
        assert!(reopened.current().is_empty());
        let garden = reopened.create_category("Garden Tools").unwrap();
        assert!(garden.id > toys.id);
    }

    #[test]
    fn test_seeding_continues_existing_counter() {
        let store = Arc::new(MemoryStore::with_entries([("category_counter", "10")]));
        let service = CategoryService::new(store, true).unwrap();
        let ids: Vec<_> = service.current().into_iter().map(|c| c.id).collect();
        assert_eq!(ids.first(), Some(&CategoryId::new(11)));
        assert_eq!(ids.last(), Some(&CategoryId::new(15)));
    }

    #[test]
    fn test_seeding_disabled() {
        let service = empty();
        assert!(service.get_categories().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_is_case_insensitive_and_trimmed() {
        let service = empty();
        service.create_category("Books").unwrap();
        let err = service.create_category("  bOOKS ").unwrap_err();
        assert!(matches!(err, CategoryError::Duplicate(ref name) if name == "bOOKS"));
    }

    #[test]
    fn test_rename_to_own_name_succeeds() {
        let service = empty();
        let books = service.create_category("Books").unwrap();
        service.create_category("Sports").unwrap();

        let renamed = service.update_category(books.id, "BOOKS").unwrap();
        assert_eq!(renamed.name, "BOOKS");
        assert!(matches!(
            service.update_category(books.id, "sports"),
            Err(CategoryError::Duplicate(_))
        ));
    }

    #[test]
    fn test_missing_ids() {
        let service = empty();
        let missing = CategoryId::new(9);
        assert!(matches!(
            service.update_category(missing, "Toys"),
            Err(CategoryError::NotFound(id)) if id == missing
        ));
        assert_eq!(
            service.delete_category(missing).unwrap_err().to_string(),
            "Category with ID 9 not found"
        );
        assert!(service.get_category(missing).unwrap().is_none());
    }

    #[test]
    fn test_subscribers_see_mutations() {
        let service = empty();
        let mut rx = service.subscribe();

        let toys = service.create_category("Toys").unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        service.delete_category(toys.id).unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }

    #[test]
    fn test_get_categories_refreshes_snapshot() {
        let store = Arc::new(MemoryStore::new());
        let service = CategoryService::new(store.clone(), false).unwrap();
        let other = CategoryService::new(store, false).unwrap();
        other.create_category("Toys").unwrap();

        assert!(service.current().is_empty());
        assert_eq!(service.get_all_categories().unwrap().len(), 1);
        assert_eq!(service.current().len(), 1);
    }
}
