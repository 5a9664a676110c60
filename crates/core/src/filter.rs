//! Recipe list filtering.

use crate::types::{CategoryId, Recipe, UserId};

/// Criteria for narrowing a recipe list. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Case-insensitive substring of the name or description.
    pub search: Option<String>,
    pub category: Option<CategoryId>,
    /// Upper bound on duration, inclusive.
    pub max_duration: Option<u32>,
    /// Compared against the difficulty's textual form ("2", "tricky").
    pub difficulty: Option<String>,
    pub owner: Option<UserId>,
}

impl RecipeFilter {
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.matches_search(recipe)
            && self.category.is_none_or(|c| recipe.category_id == c)
            && self.max_duration.is_none_or(|max| recipe.duration <= max)
            && self
                .difficulty
                .as_deref()
                .is_none_or(|d| recipe.difficulty.to_string() == d)
            && self.owner.is_none_or(|u| recipe.user_id == u)
    }

    fn matches_search(&self, recipe: &Recipe) -> bool {
        let Some(term) = self.search.as_deref().map(str::to_lowercase) else {
            return true;
        };
        term.is_empty()
            || recipe.name.to_lowercase().contains(&term)
            || recipe.description.to_lowercase().contains(&term)
    }

    /// Apply the filter, keeping list order.
    pub fn apply<'a>(&'a self, recipes: &'a [Recipe]) -> impl Iterator<Item = &'a Recipe> + 'a {
        recipes.iter().filter(|r| self.matches(r))
    }
}
