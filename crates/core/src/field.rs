//! Attribution of server-side validation errors to form fields.
//!
//! The API reports rejected input as a plain-text 400 body that mentions the
//! offending field by its wire name ("Name already exists", "UserName is
//! taken"). Matching is by substring, first match wins, so more specific
//! names are listed before names they contain.

use core::fmt;

/// A recipe form field a server error can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeField {
    Category,
    Ingredients,
    Instructions,
    Description,
    Duration,
    Difficulty,
    Image,
    Name,
}

impl RecipeField {
    const MARKERS: &'static [(&'static str, Self)] = &[
        ("Categoryid", Self::Category),
        ("Ingridents", Self::Ingredients),
        ("Instructions", Self::Instructions),
        ("Description", Self::Description),
        ("Duration", Self::Duration),
        ("Difficulty", Self::Difficulty),
        ("Img", Self::Image),
        ("Name", Self::Name),
    ];

    /// The field named in a server error body, if any.
    #[must_use]
    pub fn from_error_body(body: &str) -> Option<Self> {
        Self::MARKERS
            .iter()
            .find(|(marker, _)| body.contains(marker))
            .map(|&(_, field)| field)
    }
}

impl fmt::Display for RecipeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Category => "category",
            Self::Ingredients => "ingredients",
            Self::Instructions => "instructions",
            Self::Description => "description",
            Self::Duration => "duration",
            Self::Difficulty => "difficulty",
            Self::Image => "image",
            Self::Name => "name",
        })
    }
}

/// A registration form field a server error can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationField {
    UserName,
    Email,
    NationalId,
    Phone,
}

impl RegistrationField {
    // The server spells the phone field in lower case in its messages.
    const MARKERS: &'static [(&'static str, Self)] = &[
        ("UserName", Self::UserName),
        ("Email", Self::Email),
        ("Tz", Self::NationalId),
        ("phone", Self::Phone),
        ("Phone", Self::Phone),
    ];

    /// The field named in a server error body, if any.
    #[must_use]
    pub fn from_error_body(body: &str) -> Option<Self> {
        Self::MARKERS
            .iter()
            .find(|(marker, _)| body.contains(marker))
            .map(|&(_, field)| field)
    }
}

impl fmt::Display for RegistrationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UserName => "user name",
            Self::Email => "email",
            Self::NationalId => "national ID",
            Self::Phone => "phone",
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_field_from_body() {
        assert_eq!(
            RecipeField::from_error_body("Recipe Name already exists"),
            Some(RecipeField::Name)
        );
        assert_eq!(
            RecipeField::from_error_body("Categoryid is invalid"),
            Some(RecipeField::Category)
        );
        assert_eq!(RecipeField::from_error_body("Internal error"), None);
    }

    #[test]
    fn test_registration_field_prefers_user_name() {
        assert_eq!(
            RegistrationField::from_error_body("UserName already exists"),
            Some(RegistrationField::UserName)
        );
        assert_eq!(
            RegistrationField::from_error_body("duplicate phone"),
            Some(RegistrationField::Phone)
        );
        assert_eq!(
            RegistrationField::from_error_body("Tz must be unique"),
            Some(RegistrationField::NationalId)
        );
        assert_eq!(RegistrationField::from_error_body("bad request"), None);
    }
}
