//! Category domain type.

use serde::{Deserialize, Serialize};

use local_shop_core::CategoryId;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Sequentially assigned category ID.
    pub id: CategoryId,
    /// Unique (case-insensitively) display name, 2-50 characters.
    pub name: String,
}

impl Category {
    /// Whether `name` collides with this category's name once both are
    /// trimmed and compared case-insensitively.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}
