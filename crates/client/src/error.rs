//! Error types for store and session operations.
//!
//! Read failures are absorbed into store state; everything here is what the
//! write paths hand back so the caller can present it per field.

use recipe_book_core::{
    DraftViolation, RecipeField, RecipeId, RegistrationField, RegistrationViolation, UserId,
};
use thiserror::Error;

use crate::api::ApiError;

/// Errors returned by [`crate::RecipeStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The API request failed or was rejected.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Another cached recipe already uses this name.
    #[error("A recipe named {0:?} already exists")]
    DuplicateName(String),

    /// No cached recipe has this ID.
    #[error("Recipe not found: {0}")]
    RecipeNotFound(RecipeId),

    /// The user does not own the recipe.
    #[error("User {user_id} is not authorized to modify recipe {recipe_id}")]
    NotOwner { recipe_id: RecipeId, user_id: UserId },

    /// Create was called with a recipe that already has an ID.
    #[error("Recipe {0} is already saved; drafts must have ID 0")]
    NotADraft(RecipeId),

    /// Edit was called with a draft.
    #[error("Recipe has not been saved yet")]
    UnsavedRecipe,

    /// The recipe failed client-side validation.
    #[error("Invalid recipe: {}", join(.0))]
    Validation(Vec<DraftViolation>),
}

impl StoreError {
    /// Whether the error was raised by the ownership check.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::RecipeNotFound(_) | Self::NotOwner { .. })
    }

    /// The form field this error should be shown next to, if any.
    #[must_use]
    pub fn field_hint(&self) -> Option<RecipeField> {
        match self {
            Self::DuplicateName(_) => Some(RecipeField::Name),
            Self::Api(e) => e.body().and_then(RecipeField::from_error_body),
            Self::Validation(violations) => violations.first().map(violation_field),
            _ => None,
        }
    }
}

const fn violation_field(violation: &DraftViolation) -> RecipeField {
    match violation {
        DraftViolation::MissingName => RecipeField::Name,
        DraftViolation::MissingDescription => RecipeField::Description,
        DraftViolation::MissingCategory => RecipeField::Category,
        DraftViolation::NoIngredients | DraftViolation::IncompleteIngredient(_) => {
            RecipeField::Ingredients
        }
        DraftViolation::NoInstructions | DraftViolation::BlankInstruction(_) => {
            RecipeField::Instructions
        }
        DraftViolation::ZeroDuration => RecipeField::Duration,
        DraftViolation::DifficultyOutOfRange(_) => RecipeField::Difficulty,
        DraftViolation::ImageNotRemote => RecipeField::Image,
    }
}

/// Errors returned by [`crate::Session`] operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// User name or password left empty.
    #[error("User name and password are required")]
    MissingCredentials,

    /// Wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No account with this user name.
    #[error("User not found")]
    UserNotFound,

    /// The server rejected a registration because a unique field is taken.
    #[error("The {0} is already registered")]
    Conflict(RegistrationField),

    /// The registration failed client-side validation.
    #[error("Invalid registration: {}", join(.0))]
    Validation(Vec<RegistrationViolation>),

    /// The API request failed or was rejected.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_field_hint_from_server_body() {
        let err = StoreError::Api(ApiError::Api {
            status: 400,
            message: "Recipe Name already exists".to_string(),
        });
        assert_eq!(err.field_hint(), Some(RecipeField::Name));
    }

    #[test]
    fn test_field_hint_for_transport_failure() {
        let err = StoreError::Api(ApiError::Unreachable("refused".to_string()));
        assert_eq!(err.field_hint(), None);
    }

    #[test]
    fn test_validation_message_lists_violations() {
        let err = StoreError::Validation(vec![
            DraftViolation::MissingName,
            DraftViolation::NoIngredients,
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid recipe: recipe name is required; a recipe needs at least one ingredient"
        );
        assert_eq!(err.field_hint(), Some(RecipeField::Name));
    }

    #[test]
    fn test_field_hint_for_row_violations() {
        let err = StoreError::Validation(vec![DraftViolation::IncompleteIngredient(0)]);
        assert_eq!(err.field_hint(), Some(RecipeField::Ingredients));
        let err = StoreError::Validation(vec![DraftViolation::MissingCategory]);
        assert_eq!(err.field_hint(), Some(RecipeField::Category));
    }

    #[test]
    fn test_authorization_errors() {
        assert!(StoreError::RecipeNotFound(RecipeId::new(1)).is_unauthorized());
        assert!(!StoreError::UnsavedRecipe.is_unauthorized());
    }
}
