//! Recipe store: an in-memory cache of recipes and categories kept in sync
//! with the recipe API.
//!
//! # Architecture
//!
//! - [`StoreState`] is an immutable snapshot; transitions build a new one
//! - [`RecipeStore`] owns the API handle and publishes snapshots through a
//!   `tokio::sync::watch` channel
//! - Reads (`fetch_*`) absorb failures into state; writes (`add`, `edit`,
//!   `delete`) return them to the caller
//!
//! # Usage
//!
//! ```ignore
//! let store = RecipeStore::create(Arc::new(HttpRecipeApi::new(&config)?)).await;
//! store.fetch_recipes().await;
//! for recipe in store.recipes() {
//!     println!("{}", recipe.name);
//! }
//! store.dispose();
//! ```

pub mod state;

pub use state::StoreState;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use recipe_book_core::{
    Category, Recipe, RecipeFilter, RecipeId, UserId, find_duplicate, validation::validate_recipe,
};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::api::RecipeApi;
use crate::error::StoreError;

/// How the cache is brought back in line with the server after an edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditReconciliation {
    /// Replace the edited entry with the server's response.
    #[default]
    Patch,
    /// Patch, then re-fetch the whole list.
    PatchAndRefetch,
}

/// Cache of recipes and categories backed by a [`RecipeApi`].
#[derive(Debug)]
pub struct RecipeStore {
    api: Arc<dyn RecipeApi>,
    state: watch::Sender<StoreState>,
    reconciliation: EditReconciliation,
    fetches_in_flight: AtomicUsize,
}

impl RecipeStore {
    /// Create a store and load the category list.
    pub async fn create(api: Arc<dyn RecipeApi>) -> Self {
        Self::create_with(api, EditReconciliation::default()).await
    }

    /// Create a store with an explicit edit reconciliation policy.
    pub async fn create_with(api: Arc<dyn RecipeApi>, reconciliation: EditReconciliation) -> Self {
        let store = Self {
            api,
            state: watch::Sender::new(StoreState::default()),
            reconciliation,
            fetches_in_flight: AtomicUsize::new(0),
        };
        store.fetch_categories().await;
        store
    }

    /// Tear the store down. Subscribers see the channel close.
    pub fn dispose(self) {
        debug!(
            subscribers = self.state.receiver_count(),
            "Disposing recipe store"
        );
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn recipes(&self) -> Vec<Recipe> {
        self.state.borrow().recipes().to_vec()
    }

    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.state.borrow().categories().to_vec()
    }

    #[must_use]
    pub fn selected_recipe(&self) -> Option<Recipe> {
        self.state.borrow().selected_recipe().cloned()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().last_error().map(str::to_owned)
    }

    /// Cached recipes matching `filter`, in list order.
    #[must_use]
    pub fn filtered(&self, filter: &RecipeFilter) -> Vec<Recipe> {
        self.state.borrow().filtered(filter).cloned().collect()
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Load categories, falling back to the built-in list on failure.
    #[instrument(skip(self))]
    pub async fn fetch_categories(&self) {
        let categories = match self.api.list_categories().await {
            Ok(categories) => {
                debug!(count = categories.len(), "Fetched categories");
                categories
            }
            Err(e) => {
                warn!(error = %e, "Category fetch failed, using built-in categories");
                Category::fallback()
            }
        };
        self.apply(|s| s.with_categories(categories));
    }

    /// Reload the recipe list. On failure the list is emptied and the
    /// error message kept in [`StoreState::last_error`].
    #[instrument(skip(self))]
    pub async fn fetch_recipes(&self) {
        let _loading = LoadingGuard::start(self);

        match self.api.list_recipes().await {
            Ok(recipes) => {
                info!(count = recipes.len(), "Fetched recipes");
                self.apply(|s| s.with_recipes(recipes));
            }
            Err(e) => {
                warn!(error = %e, "Recipe fetch failed");
                self.apply(|s| s.with_fetch_failure(e.to_string()));
            }
        }
    }

    /// Fetch one recipe from the server. The cache is not touched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` if the request fails.
    #[instrument(skip(self), fields(recipe_id = %id))]
    pub async fn fetch_recipe_by_id(&self, id: RecipeId) -> Result<Recipe, StoreError> {
        Ok(self.api.get_recipe(id).await?)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Create `draft` on the server and append the stored recipe.
    ///
    /// Duplicate names are not checked here; see
    /// [`Self::check_name_available`] and [`Self::check_submission`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotADraft` if `draft` already has an ID, or
    /// `StoreError::Api` if the server rejects it.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn add_recipe(&self, draft: &Recipe) -> Result<Recipe, StoreError> {
        if !draft.is_draft() {
            return Err(StoreError::NotADraft(draft.id));
        }

        let created = self.api.create_recipe(draft).await?;
        info!(recipe_id = %created.id, "Recipe created");
        self.apply(|s| s.with_recipe_appended(created.clone()));
        Ok(created)
    }

    /// Save `updated` and patch the cached entry and selection with the
    /// server's version.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnsavedRecipe` for a draft, or `StoreError::Api`
    /// if the server rejects the edit.
    #[instrument(skip(self, updated), fields(recipe_id = %updated.id))]
    pub async fn edit_recipe(&self, updated: &Recipe) -> Result<Recipe, StoreError> {
        if updated.is_draft() {
            return Err(StoreError::UnsavedRecipe);
        }

        let saved = self.api.update_recipe(updated).await?;
        info!("Recipe updated");
        self.apply(|s| s.with_recipe_replaced(updated.id, &saved));

        if self.reconciliation == EditReconciliation::PatchAndRefetch {
            self.refetch_after_edit().await;
        }

        Ok(saved)
    }

    /// Delete recipe `id` on behalf of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RecipeNotFound` or `StoreError::NotOwner` without
    /// contacting the server, or `StoreError::Api` if the request fails.
    #[instrument(skip(self), fields(recipe_id = %id, user_id = %user_id))]
    pub async fn delete_recipe(&self, id: RecipeId, user_id: UserId) -> Result<(), StoreError> {
        self.authorize(id, user_id)?;

        self.api.delete_recipe(id).await?;
        info!("Recipe deleted");
        self.apply(|s| s.with_recipe_removed(id));
        Ok(())
    }

    /// Show a copy of `recipe` in the detail slot, or clear it with `None`.
    pub fn select_recipe(&self, recipe: Option<&Recipe>) {
        self.apply(|s| s.with_selection(recipe));
    }

    // =========================================================================
    // Checks
    // =========================================================================

    /// Whether `user_id` may modify cached recipe `id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RecipeNotFound` if `id` is not cached, or
    /// `StoreError::NotOwner` if another user owns it.
    pub fn authorize(&self, id: RecipeId, user_id: UserId) -> Result<(), StoreError> {
        let state = self.state.borrow();
        let recipe = state.recipe(id).ok_or(StoreError::RecipeNotFound(id))?;
        if !recipe.is_owned_by(user_id) {
            warn!(recipe_id = %id, user_id = %user_id, "Rejected modification by non-owner");
            return Err(StoreError::NotOwner {
                recipe_id: id,
                user_id,
            });
        }
        Ok(())
    }

    /// Whether `name` is free among cached recipes, ignoring `exclude`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateName` with the colliding recipe's name.
    pub fn check_name_available(
        &self,
        name: &str,
        exclude: Option<RecipeId>,
    ) -> Result<(), StoreError> {
        let state = self.state.borrow();
        match find_duplicate(state.recipes(), name, exclude) {
            Some(existing) => Err(StoreError::DuplicateName(existing.name.clone())),
            None => Ok(()),
        }
    }

    /// Validate `recipe` and check its name against the cache, the way a
    /// form does before submitting.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` or `StoreError::DuplicateName`.
    pub fn check_submission(&self, recipe: &Recipe) -> Result<(), StoreError> {
        validate_recipe(recipe).map_err(StoreError::Validation)?;
        let exclude = (!recipe.is_draft()).then_some(recipe.id);
        self.check_name_available(&recipe.name, exclude)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn apply(&self, transition: impl FnOnce(&StoreState) -> StoreState) {
        self.state.send_modify(|state| *state = transition(state));
    }

    /// Reload the list after an edit. A failed reload keeps the patched
    /// cache instead of emptying it, but still reports the error.
    async fn refetch_after_edit(&self) {
        let _loading = LoadingGuard::start(self);

        match self.api.list_recipes().await {
            Ok(recipes) => {
                debug!(count = recipes.len(), "Re-fetched recipes after edit");
                self.apply(|s| s.with_recipes(recipes));
            }
            Err(e) => {
                warn!(error = %e, "Re-fetch after edit failed, keeping patched cache");
                self.apply(|s| s.with_stale_list(e.to_string()));
            }
        }
    }
}

/// Holds `loading` up while a list fetch runs.
///
/// Cleared when the last overlapping fetch finishes, including when its
/// future is dropped mid-request.
struct LoadingGuard<'a> {
    store: &'a RecipeStore,
}

impl<'a> LoadingGuard<'a> {
    fn start(store: &'a RecipeStore) -> Self {
        store.fetches_in_flight.fetch_add(1, Ordering::SeqCst);
        store.apply(|s| s.with_loading(true));
        Self { store }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.store.fetches_in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.store.apply(|s| s.with_loading(false));
        }
    }
}
