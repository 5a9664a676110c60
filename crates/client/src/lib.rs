//! Recipe Book client library.
//!
//! Keeps a local cache of recipes and categories in sync with the recipe
//! REST API and tracks the signed-in user.
//!
//! # Modules
//!
//! - [`api`] - The `RecipeApi` seam, its HTTP implementation, and a fake
//! - [`store`] - Recipe cache with a selected-recipe slot
//! - [`session`] - Login, registration, and the current user
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod store;

pub use api::{ApiError, FakeRecipeApi, HttpRecipeApi, RecipeApi};
pub use config::{ClientConfig, ConfigError};
pub use error::{SessionError, StoreError};
pub use session::Session;
pub use store::{EditReconciliation, RecipeStore, StoreState};
