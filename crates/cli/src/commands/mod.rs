//! Command implementations.

pub mod auth;
pub mod recipes;

use std::sync::Arc;

use recipe_book_client::{
    ApiError, ClientConfig, ConfigError, HttpRecipeApi, RecipeApi, RecipeStore, Session,
    SessionError, StoreError,
};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// The recipe list could not be loaded.
    #[error("Could not load recipes: {0}")]
    Fetch(String),

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid recipe JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Store and session sharing one API connection.
pub struct Context {
    pub store: RecipeStore,
    pub session: Session,
}

impl Context {
    /// Connect to the API named by the environment and load categories.
    pub async fn connect() -> Result<Self, CliError> {
        let config = ClientConfig::from_env()?;
        info!(base_url = %config.base_url, "Using recipe API");

        let api: Arc<dyn RecipeApi> = Arc::new(HttpRecipeApi::new(&config)?);
        let store = RecipeStore::create_with(Arc::clone(&api), config.edit_reconciliation).await;

        Ok(Self {
            store,
            session: Session::new(api),
        })
    }

    /// Reload the recipe list, failing if the server could not be reached.
    pub async fn load_recipes(&self) -> Result<(), CliError> {
        self.store.fetch_recipes().await;
        match self.store.last_error() {
            Some(message) => Err(CliError::Fetch(message)),
            None => Ok(()),
        }
    }

    pub fn close(self) {
        self.session.logout();
        self.store.dispose();
    }
}
