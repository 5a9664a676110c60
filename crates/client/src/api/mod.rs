//! Recipe REST API access.
//!
//! # Architecture
//!
//! - [`RecipeApi`] is the seam between the store and the network
//! - [`HttpRecipeApi`] talks to the real server with `reqwest`
//! - [`FakeRecipeApi`] keeps an in-memory server for tests and offline use
//!
//! # Endpoints
//!
//! | Operation | Method & Path |
//! |---|---|
//! | List categories | `GET api/category` |
//! | List recipes | `GET api/recipe` |
//! | Get recipe | `GET api/recipe/{id}` |
//! | Create recipe | `POST api/recipe` |
//! | Update recipe | `POST api/recipe/edit` |
//! | Delete recipe | `POST api/recipe/delete/{id}` |
//! | Login | `POST api/user/login` |
//! | Register | `POST api/user/sighin` |

mod fake;
mod http;

pub use fake::{ApiCall, ApiOp, FakeRecipeApi, Failure};
pub use http::HttpRecipeApi;

use std::fmt;

use async_trait::async_trait;
use recipe_book_core::{Category, Credentials, Recipe, RecipeId, Registration, User};
use thiserror::Error;

/// Errors that can occur when talking to the recipe API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server could not be reached.
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status of a rejected request.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Body of a rejected request.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Operations the recipe API offers.
///
/// Implementations must be thread-safe; the store shares one instance across
/// all of its operations.
#[async_trait]
pub trait RecipeApi: Send + Sync + fmt::Debug {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;

    async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiError>;

    async fn get_recipe(&self, id: RecipeId) -> Result<Recipe, ApiError>;

    /// Store a draft (ID 0); the returned recipe carries the assigned ID.
    async fn create_recipe(&self, draft: &Recipe) -> Result<Recipe, ApiError>;

    async fn update_recipe(&self, recipe: &Recipe) -> Result<Recipe, ApiError>;

    async fn delete_recipe(&self, id: RecipeId) -> Result<(), ApiError>;

    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError>;

    async fn register(&self, registration: &Registration) -> Result<User, ApiError>;
}
