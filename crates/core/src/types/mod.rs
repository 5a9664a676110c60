//! Core types for Recipe Book.
//!
//! This module provides type-safe wrappers and the API's data model.

pub mod category;
pub mod email;
pub mod id;
pub mod recipe;
pub mod user;

pub use category::Category;
pub use email::{Email, EmailError};
pub use id::*;
pub use recipe::{
    Difficulty, Ingredient, Instruction, Quantity, Recipe, find_duplicate, is_remote_url, name_key,
};
pub use user::{Credentials, Registration, User};
