//! Recipe Book Core - Shared types library.
//!
//! This crate provides the domain model used across all Recipe Book components:
//! - `client` - Recipe store and session over the recipe REST API
//! - `cli` - Command-line front end for the store
//!
//! # Architecture
//!
//! The core crate contains only types and rules - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, recipes, categories, users, emails
//! - [`validation`] - Client-side checks for recipe drafts and registrations
//! - [`filter`] - Recipe list filtering
//! - [`field`] - Attribution of server validation errors to form fields

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod field;
pub mod filter;
pub mod types;
pub mod validation;

pub use field::{RecipeField, RegistrationField};
pub use filter::RecipeFilter;
pub use types::*;
pub use validation::{DraftViolation, PasswordStrength, RegistrationViolation};
