//! Client-side validation for recipe drafts and registrations.
//!
//! These checks give fast feedback before a request is sent. The server
//! remains the authority and may still reject a payload that passes here.

use core::fmt;

use secrecy::ExposeSecret;
use thiserror::Error;

use crate::types::{Difficulty, Email, Ingredient, Quantity, Recipe, Registration, is_remote_url};

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A reason a recipe cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftViolation {
    #[error("recipe name is required")]
    MissingName,
    #[error("description is required")]
    MissingDescription,
    #[error("pick a category")]
    MissingCategory,
    #[error("a recipe needs at least one ingredient")]
    NoIngredients,
    /// Position in the ingredient list, from 0.
    #[error("ingredient {} needs a name, a positive amount and a unit", .0 + 1)]
    IncompleteIngredient(usize),
    #[error("a recipe needs at least one instruction")]
    NoInstructions,
    /// Position in the instruction list, from 0.
    #[error("step {} is empty", .0 + 1)]
    BlankInstruction(usize),
    #[error("duration must be at least one minute")]
    ZeroDuration,
    #[error("difficulty level must be between 1 and 3 (got {0})")]
    DifficultyOutOfRange(u8),
    #[error("image must be an http(s) URL")]
    ImageNotRemote,
}

/// Check a recipe before create or update.
///
/// # Errors
///
/// Returns every violation found, in field order.
pub fn validate_recipe(recipe: &Recipe) -> Result<(), Vec<DraftViolation>> {
    let mut violations = Vec::new();

    if recipe.name.trim().is_empty() {
        violations.push(DraftViolation::MissingName);
    }
    if recipe.description.trim().is_empty() {
        violations.push(DraftViolation::MissingDescription);
    }
    if recipe.category_id.is_zero() {
        violations.push(DraftViolation::MissingCategory);
    }
    if recipe.duration == 0 {
        violations.push(DraftViolation::ZeroDuration);
    }
    if let Difficulty::Level(level) = recipe.difficulty
        && !(1..=3).contains(&level)
    {
        violations.push(DraftViolation::DifficultyOutOfRange(level));
    }
    if recipe.image_url.as_deref().is_some_and(|url| !is_remote_url(url)) {
        violations.push(DraftViolation::ImageNotRemote);
    }
    if recipe.ingredients.is_empty() {
        violations.push(DraftViolation::NoIngredients);
    }
    violations.extend(
        recipe
            .ingredients
            .iter()
            .enumerate()
            .filter(|(_, ingredient)| !is_complete(ingredient))
            .map(|(i, _)| DraftViolation::IncompleteIngredient(i)),
    );
    if recipe.instructions.is_empty() {
        violations.push(DraftViolation::NoInstructions);
    }
    violations.extend(
        recipe
            .instructions
            .iter()
            .enumerate()
            .filter(|(_, step)| step.text.trim().is_empty())
            .map(|(i, _)| DraftViolation::BlankInstruction(i)),
    );

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn is_complete(ingredient: &Ingredient) -> bool {
    let amount_ok = match &ingredient.quantity {
        Quantity::Number(n) => *n > 0.0,
        Quantity::Text(s) => !s.trim().is_empty(),
    };
    amount_ok && !ingredient.name.trim().is_empty() && !ingredient.unit.trim().is_empty()
}

/// A reason a registration form cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationViolation {
    #[error("user name is required")]
    MissingUserName,
    #[error("name is required")]
    MissingName,
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] crate::types::EmailError),
    #[error("phone number must contain 9-10 digits")]
    InvalidPhone,
    #[error("password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    PasswordTooShort,
    #[error("national ID must contain exactly 9 digits")]
    InvalidNationalId,
}

/// Check a registration form before sending it.
///
/// # Errors
///
/// Returns every violation found, in form order.
pub fn validate_registration(registration: &Registration) -> Result<(), Vec<RegistrationViolation>> {
    let mut violations = Vec::new();

    if registration.user_name.trim().is_empty() {
        violations.push(RegistrationViolation::MissingUserName);
    }
    if registration.name.trim().is_empty() {
        violations.push(RegistrationViolation::MissingName);
    }
    if let Err(e) = Email::parse(&registration.email) {
        violations.push(e.into());
    }
    if !all_digits_within(&registration.phone, 9, 10) {
        violations.push(RegistrationViolation::InvalidPhone);
    }
    if registration.password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        violations.push(RegistrationViolation::PasswordTooShort);
    }
    if !all_digits_within(&registration.tz, 9, 9) {
        violations.push(RegistrationViolation::InvalidNationalId);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn all_digits_within(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Coarse password strength shown while the user types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    VeryWeak,
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    /// One point each for: length >= 6, length >= 8, an uppercase ASCII
    /// letter, a digit, and a character that is not an ASCII letter or digit.
    #[must_use]
    pub fn score(password: &str) -> u8 {
        let len = password.chars().count();
        let checks = [
            len >= 6,
            len >= 8,
            password.chars().any(|c| c.is_ascii_uppercase()),
            password.chars().any(|c| c.is_ascii_digit()),
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
        ];
        #[allow(clippy::cast_possible_truncation)] // at most 5
        let score = checks.iter().filter(|&&passed| passed).count() as u8;
        score
    }

    #[must_use]
    pub fn of(password: &str) -> Self {
        match Self::score(password) {
            0 => Self::VeryWeak,
            1 | 2 => Self::Weak,
            3 | 4 => Self::Medium,
            _ => Self::Strong,
        }
    }
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::VeryWeak => "very weak",
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::types::{CategoryId, Ingredient, Instruction, UserId};

    fn complete_draft() -> Recipe {
        let mut recipe = Recipe::draft("Lentil soup", UserId::new(1), CategoryId::new(3));
        recipe.description = "Thick and warming".into();
        recipe.duration = 40;
        recipe.ingredients.push(Ingredient::new("Lentils", 1_u32, "cup"));
        recipe.instructions.push(Instruction::new("Simmer for 30 minutes"));
        recipe
    }

    fn registration() -> Registration {
        Registration {
            user_name: "dana".into(),
            name: "Dana Levi".into(),
            password: SecretString::from("abc123".to_owned()),
            phone: "0501234567".into(),
            email: "dana@example.com".into(),
            tz: "123456789".into(),
        }
    }

    #[test]
    fn test_complete_draft_is_valid() {
        assert!(validate_recipe(&complete_draft()).is_ok());
    }

    #[test]
    fn test_empty_draft_reports_everything() {
        let mut recipe = Recipe::draft("  ", UserId::new(1), CategoryId::default());
        recipe.difficulty = Difficulty::Level(4);
        recipe.image_url = Some("/placeholder.svg".into());
        let violations = validate_recipe(&recipe).unwrap_err();
        assert_eq!(
            violations,
            vec![
                DraftViolation::MissingName,
                DraftViolation::MissingDescription,
                DraftViolation::MissingCategory,
                DraftViolation::ZeroDuration,
                DraftViolation::DifficultyOutOfRange(4),
                DraftViolation::ImageNotRemote,
                DraftViolation::NoIngredients,
                DraftViolation::NoInstructions,
            ]
        );
    }

    #[test]
    fn test_ingredient_and_step_rows_are_checked() {
        let mut recipe = complete_draft();
        recipe.ingredients.push(Ingredient::new("Salt", 0_u32, "tsp"));
        recipe.ingredients.push(Ingredient::new(" ", 1_u32, "cup"));
        recipe.ingredients.push(Ingredient::new("Cumin", "a pinch", ""));
        recipe.ingredients.push(Ingredient::new("Lemon", 0.5, "unit"));
        recipe.instructions.push(Instruction::new("   "));
        let violations = validate_recipe(&recipe).unwrap_err();
        assert_eq!(
            violations,
            vec![
                DraftViolation::IncompleteIngredient(1),
                DraftViolation::IncompleteIngredient(2),
                DraftViolation::IncompleteIngredient(3),
                DraftViolation::BlankInstruction(1),
            ]
        );
        assert_eq!(
            violations[0].to_string(),
            "ingredient 2 needs a name, a positive amount and a unit"
        );
        assert_eq!(violations[3].to_string(), "step 2 is empty");
    }

    #[test]
    fn test_text_difficulty_is_accepted() {
        let mut recipe = complete_draft();
        recipe.difficulty = Difficulty::Text("weekend project".into());
        assert!(validate_recipe(&recipe).is_ok());
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration(&registration()).is_ok());
    }

    #[test]
    fn test_registration_field_rules() {
        let mut form = registration();
        form.phone = "050-123".into();
        form.tz = "12345678".into();
        form.password = SecretString::from("abc".to_owned());
        form.email = "dana@localhost".into();
        let violations = validate_registration(&form).unwrap_err();
        assert_eq!(violations.len(), 4);
        assert!(violations.contains(&RegistrationViolation::InvalidPhone));
        assert!(violations.contains(&RegistrationViolation::InvalidNationalId));
        assert!(violations.contains(&RegistrationViolation::PasswordTooShort));
    }

    #[test]
    fn test_phone_accepts_nine_or_ten_digits() {
        let mut form = registration();
        form.phone = "031234567".into();
        assert!(validate_registration(&form).is_ok());
        form.phone = "05012345678".into();
        assert!(validate_registration(&form).is_err());
    }

    #[test]
    fn test_password_strength() {
        assert_eq!(PasswordStrength::of(""), PasswordStrength::VeryWeak);
        assert_eq!(PasswordStrength::of("abcdef"), PasswordStrength::Weak);
        assert_eq!(PasswordStrength::score("abcdefg1"), 3);
        assert_eq!(PasswordStrength::of("abcdefg1"), PasswordStrength::Medium);
        assert_eq!(PasswordStrength::of("Abcdefg1!"), PasswordStrength::Strong);
    }
}
