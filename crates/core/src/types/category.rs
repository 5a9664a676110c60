//! Recipe categories.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;

/// A recipe classification such as dairy or pastries. Read-only for clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    #[must_use]
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(id),
            name: name.into(),
        }
    }

    /// Built-in categories used when the server's list cannot be fetched.
    #[must_use]
    pub fn fallback() -> Vec<Self> {
        vec![
            Self::new(1, "Dairy"),
            Self::new(2, "Meat"),
            Self::new(3, "Parve"),
            Self::new(4, "Desserts"),
            Self::new(5, "Pastries"),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_has_five_distinct_categories() {
        let categories = Category::fallback();
        assert_eq!(categories.len(), 5);
        let ids: Vec<i32> = categories.iter().map(|c| c.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_wire_format() {
        let category: Category = serde_json::from_str(r#"{"Id": 2, "Name": "Meat"}"#).unwrap();
        assert_eq!(category, Category::new(2, "Meat"));
    }
}
