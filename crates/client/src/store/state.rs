//! Immutable snapshots of the store's state.
//!
//! Every transition is a pure function from one snapshot to the next. The
//! store publishes each result; consumers hold snapshots without locking.

use recipe_book_core::{Category, Recipe, RecipeFilter, RecipeId};

/// One consistent view of the recipe store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    recipes: Vec<Recipe>,
    categories: Vec<Category>,
    selected_recipe: Option<Recipe>,
    loading: bool,
    last_error: Option<String>,
}

impl StoreState {
    /// Cached recipes, in server order.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Detail view-model; independent of the entry in [`Self::recipes`].
    #[must_use]
    pub const fn selected_recipe(&self) -> Option<&Recipe> {
        self.selected_recipe.as_ref()
    }

    /// Whether a recipe list fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the most recent failed list fetch.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn recipe(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn filtered<'a>(&'a self, filter: &'a RecipeFilter) -> impl Iterator<Item = &'a Recipe> + 'a {
        filter.apply(&self.recipes)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    #[must_use]
    pub fn with_categories(&self, categories: Vec<Category>) -> Self {
        Self {
            categories,
            ..self.clone()
        }
    }

    /// Mark a list fetch as started (clears the previous error) or finished.
    #[must_use]
    pub fn with_loading(&self, loading: bool) -> Self {
        Self {
            loading,
            last_error: if loading { None } else { self.last_error.clone() },
            ..self.clone()
        }
    }

    /// Replace the whole list with a fresh server response.
    #[must_use]
    pub fn with_recipes(&self, recipes: Vec<Recipe>) -> Self {
        Self {
            recipes,
            last_error: None,
            ..self.clone()
        }
    }

    /// A failed list fetch leaves no data behind, only the error.
    #[must_use]
    pub fn with_fetch_failure(&self, message: String) -> Self {
        Self {
            recipes: Vec::new(),
            last_error: Some(message),
            ..self.clone()
        }
    }

    /// A failed re-fetch keeps the current list but reports the error.
    #[must_use]
    pub fn with_stale_list(&self, message: String) -> Self {
        Self {
            last_error: Some(message),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_recipe_appended(&self, recipe: Recipe) -> Self {
        let mut next = self.clone();
        next.recipes.push(recipe);
        next
    }

    /// Swap the entry with `id` for `recipe`, keeping its position, and
    /// refresh the selection if it shows the same recipe.
    #[must_use]
    pub fn with_recipe_replaced(&self, id: RecipeId, recipe: &Recipe) -> Self {
        let mut next = self.clone();
        if let Some(slot) = next.recipes.iter_mut().find(|r| r.id == id) {
            slot.clone_from(recipe);
        }
        if next.selected_recipe.as_ref().is_some_and(|s| s.id == id) {
            next.selected_recipe = Some(recipe.clone());
        }
        next
    }

    /// Drop the entry with `id` and clear the selection if it showed it.
    #[must_use]
    pub fn with_recipe_removed(&self, id: RecipeId) -> Self {
        let mut next = self.clone();
        next.recipes.retain(|r| r.id != id);
        if next.selected_recipe.as_ref().is_some_and(|s| s.id == id) {
            next.selected_recipe = None;
        }
        next
    }

    /// Select a copy of the freshest cached version of `recipe`, or of
    /// `recipe` itself when it is not cached. `None` clears the selection.
    #[must_use]
    pub fn with_selection(&self, recipe: Option<&Recipe>) -> Self {
        let selected_recipe =
            recipe.map(|given| self.recipe(given.id).unwrap_or(given).clone());
        Self {
            selected_recipe,
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use recipe_book_core::{CategoryId, UserId};

    use super::*;

    fn recipe(id: i32, name: &str) -> Recipe {
        let mut r = Recipe::draft(name, UserId::new(1), CategoryId::new(1));
        r.id = RecipeId::new(id);
        r
    }

    fn ids(state: &StoreState) -> Vec<i32> {
        state.recipes().iter().map(|r| r.id.as_i32()).collect()
    }

    #[test]
    fn test_transitions_leave_the_original_untouched() {
        let before = StoreState::default().with_recipes(vec![recipe(1, "Soup")]);
        let after = before.with_recipe_removed(RecipeId::new(1));
        assert_eq!(ids(&before), vec![1]);
        assert!(after.recipes().is_empty());
    }

    #[test]
    fn test_replace_keeps_position() {
        let state = StoreState::default().with_recipes(vec![
            recipe(1, "Soup"),
            recipe(2, "Cake"),
            recipe(3, "Bread"),
        ]);
        let next = state.with_recipe_replaced(RecipeId::new(2), &recipe(2, "Carrot cake"));
        assert_eq!(ids(&next), vec![1, 2, 3]);
        assert_eq!(next.recipes()[1].name, "Carrot cake");
        assert_eq!(next.recipes()[0], state.recipes()[0]);
        assert_eq!(next.recipes()[2], state.recipes()[2]);
    }

    #[test]
    fn test_replace_unknown_id_changes_nothing() {
        let state = StoreState::default().with_recipes(vec![recipe(1, "Soup")]);
        let next = state.with_recipe_replaced(RecipeId::new(9), &recipe(9, "Ghost"));
        assert_eq!(next, state);
    }

    #[test]
    fn test_selection_prefers_cached_copy() {
        let state = StoreState::default().with_recipes(vec![recipe(1, "Soup")]);
        let stale = recipe(1, "Old soup");
        let selected = state.with_selection(Some(&stale));
        assert_eq!(selected.selected_recipe().unwrap().name, "Soup");

        let uncached = recipe(5, "Draft");
        let selected = state.with_selection(Some(&uncached));
        assert_eq!(selected.selected_recipe().unwrap().name, "Draft");

        assert!(selected.with_selection(None).selected_recipe().is_none());
    }

    #[test]
    fn test_loading_start_clears_error() {
        let failed = StoreState::default().with_fetch_failure("boom".into());
        assert_eq!(failed.last_error(), Some("boom"));
        let loading = failed.with_loading(true);
        assert!(loading.is_loading());
        assert!(loading.last_error().is_none());
    }

    #[test]
    fn test_stale_list_keeps_recipes() {
        let state = StoreState::default().with_recipes(vec![recipe(1, "Soup")]);
        let stale = state.with_stale_list("timed out".into());
        assert_eq!(stale.recipes(), state.recipes());
        assert_eq!(stale.last_error(), Some("timed out"));
    }
}
