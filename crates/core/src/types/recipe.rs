//! Recipe model and its JSON wire mapping.
//!
//! The recipe API speaks PascalCase JSON and keeps a few historical field
//! spellings (`Ingridents`, `Categoryid`, `Img`). The Rust field names are the
//! corrected ones; serde attributes carry the wire names.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::id::{CategoryId, RecipeId, UserId};

/// A recipe as stored by the API.
///
/// `Clone` produces a fully independent copy: every field is owned data, so
/// the store hands out clones as detached snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Recipe {
    /// Server-assigned ID, [`RecipeId::DRAFT`] until created.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: RecipeId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Preparation time in minutes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub difficulty: Difficulty,
    #[serde(
        rename = "Img",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    /// Owner; only this user may edit or delete the recipe.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: UserId,
    #[serde(rename = "Categoryid", default, deserialize_with = "null_as_default")]
    pub category_id: CategoryId,
    #[serde(rename = "Ingridents", default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<Ingredient>,
    /// Steps in order; position is the step number.
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: Vec<Instruction>,
}

impl Recipe {
    /// Start a draft owned by `user_id`.
    #[must_use]
    pub fn draft(name: impl Into<String>, user_id: UserId, category_id: CategoryId) -> Self {
        Self {
            id: RecipeId::DRAFT,
            name: name.into(),
            description: String::new(),
            duration: 0,
            difficulty: Difficulty::default(),
            image_url: None,
            user_id,
            category_id,
            ingredients: Vec::new(),
            instructions: Vec::new(),
        }
    }

    /// Whether the server has not assigned an ID yet.
    #[must_use]
    pub const fn is_draft(&self) -> bool {
        self.id.is_zero()
    }

    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// The image URL if it points at a remote http(s) resource.
    ///
    /// Anything else (relative placeholders, data URIs) is not displayable.
    #[must_use]
    pub fn displayable_image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .filter(|url| is_remote_url(url))
    }
}

/// One ingredient line: "2 cups flour".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ingredient {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "Count", default, deserialize_with = "null_as_default")]
    pub quantity: Quantity,
    /// Unit of measure.
    #[serde(rename = "Type", default, deserialize_with = "null_as_default")]
    pub unit: String,
}

impl Ingredient {
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: impl Into<Quantity>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            unit: unit.into(),
        }
    }
}

/// One preparation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instruction {
    /// Row ID some servers attach; preserved but never relied on for order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(rename = "Name", default, deserialize_with = "null_as_default")]
    pub text: String,
}

impl Instruction {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
        }
    }
}

/// Ingredient amount, numeric or free text ("a pinch").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl Default for Quantity {
    fn default() -> Self {
        Self::Number(1.0)
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Quantity {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // `{}` on f64 already drops a trailing ".0"
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Recipe difficulty: a level from 1 (easy) to 3 (hard), or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Difficulty {
    Level(u8),
    Text(String),
}

impl Difficulty {
    pub const EASY: Self = Self::Level(1);
    pub const MEDIUM: Self = Self::Level(2);
    pub const HARD: Self = Self::Level(3);

    /// Human-readable label; unknown levels fall back to the number.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Level(1) => "Easy".to_owned(),
            Self::Level(2) => "Medium".to_owned(),
            Self::Level(3) => "Hard".to_owned(),
            Self::Level(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::EASY
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Comparison key for recipe-name uniqueness: trimmed and case-folded.
#[must_use]
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Find a recipe whose name collides with `name`.
///
/// `exclude` skips the recipe being edited so it does not collide with
/// itself. A blank name never collides.
#[must_use]
pub fn find_duplicate<'a>(
    recipes: &'a [Recipe],
    name: &str,
    exclude: Option<RecipeId>,
) -> Option<&'a Recipe> {
    let key = name_key(name);
    if key.is_empty() {
        return None;
    }
    recipes
        .iter()
        .filter(|r| Some(r.id) != exclude)
        .find(|r| name_key(&r.name) == key)
}

/// Whether `url` is an absolute http(s) URL.
#[must_use]
pub fn is_remote_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Servers send `null` for unset fields; treat it like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn named(id: i32, name: &str) -> Recipe {
        let mut recipe = Recipe::draft(name, UserId::new(1), CategoryId::new(1));
        recipe.id = RecipeId::new(id);
        recipe
    }

    #[test]
    fn test_deserialize_wire_names() {
        let json = r#"{
            "Id": 3,
            "Name": "Shakshuka",
            "Description": "Eggs in tomato sauce",
            "Duration": 25,
            "Difficulty": 2,
            "Img": "https://example.com/s.jpg",
            "UserId": 5,
            "Categoryid": 3,
            "Ingridents": [{"Name": "Eggs", "Count": "4", "Type": "units"}],
            "Instructions": [{"Id": 9, "Name": "Simmer the sauce"}, {"Name": "Crack eggs"}]
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.id, RecipeId::new(3));
        assert_eq!(recipe.user_id, UserId::new(5));
        assert_eq!(recipe.category_id, CategoryId::new(3));
        assert_eq!(recipe.difficulty, Difficulty::MEDIUM);
        assert_eq!(recipe.ingredients[0].quantity, Quantity::Text("4".into()));
        assert_eq!(recipe.ingredients[0].unit, "units");
        assert_eq!(recipe.instructions[0].id, Some(9));
        assert_eq!(recipe.instructions[1].text, "Crack eggs");
    }

    #[test]
    fn test_deserialize_tolerates_nulls_and_blank_image() {
        let json = r#"{"Id": 1, "Name": "Toast", "Img": "", "Ingridents": null, "Instructions": null, "Difficulty": "tricky"}"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert!(recipe.image_url.is_none());
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.instructions.is_empty());
        assert_eq!(recipe.difficulty, Difficulty::Text("tricky".into()));
    }

    #[test]
    fn test_null_fields_do_not_spoil_the_list() {
        let json = r#"[
            {"Id": 1, "Name": "Soup", "Description": "Hot", "Difficulty": 2},
            {"Id": 2, "Name": null, "Description": null, "Duration": null, "Difficulty": null,
             "UserId": null, "Categoryid": null,
             "Ingridents": [{"Name": null, "Count": null, "Type": null}],
             "Instructions": [{"Name": null}]}
        ]"#;
        let recipes: Vec<Recipe> = serde_json::from_str(json).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].difficulty, Difficulty::MEDIUM);

        let sparse = &recipes[1];
        assert_eq!(sparse.id, RecipeId::new(2));
        assert!(sparse.name.is_empty());
        assert!(sparse.description.is_empty());
        assert_eq!(sparse.duration, 0);
        assert_eq!(sparse.difficulty, Difficulty::default());
        assert_eq!(sparse.user_id, UserId::GUEST);
        assert!(sparse.category_id.is_zero());
        assert_eq!(sparse.ingredients[0], Ingredient::new("", Quantity::default(), ""));
        assert!(sparse.instructions[0].text.is_empty());
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let mut recipe = Recipe::draft("Soup", UserId::new(2), CategoryId::new(4));
        recipe.ingredients.push(Ingredient::new("Water", 2_u32, "l"));
        recipe.instructions.push(Instruction::new("Boil"));
        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["Id"], 0);
        assert_eq!(value["Categoryid"], 4);
        assert_eq!(value["Ingridents"][0]["Count"], 2.0);
        assert_eq!(value["Instructions"][0], serde_json::json!({"Name": "Boil"}));
        assert!(value.get("Img").is_none());
    }

    #[test]
    fn test_name_key_trims_and_folds_case() {
        assert_eq!(name_key("  Pasta "), "pasta");
        assert_eq!(name_key("PASTA"), name_key("pasta"));
    }

    #[test]
    fn test_find_duplicate_ignores_whitespace_and_case() {
        let recipes = vec![named(1, "pasta"), named(2, "Soup")];
        assert_eq!(find_duplicate(&recipes, "Pasta ", None).unwrap().id, RecipeId::new(1));
        assert!(find_duplicate(&recipes, "Pastas", None).is_none());
        assert!(find_duplicate(&recipes, "   ", None).is_none());
    }

    #[test]
    fn test_find_duplicate_excludes_self() {
        let recipes = vec![named(1, "pasta"), named(2, "Soup")];
        assert!(find_duplicate(&recipes, "PASTA", Some(RecipeId::new(1))).is_none());
        assert!(find_duplicate(&recipes, "soup", Some(RecipeId::new(1))).is_some());
    }

    #[test]
    fn test_displayable_image() {
        let mut recipe = named(1, "Cake");
        recipe.image_url = Some("/placeholder.svg?height=240".into());
        assert!(recipe.displayable_image().is_none());
        recipe.image_url = Some("HTTPS://cdn.example.com/cake.png".into());
        assert!(recipe.displayable_image().is_some());
    }

    #[test]
    fn test_difficulty_labels() {
        assert_eq!(Difficulty::EASY.label(), "Easy");
        assert_eq!(Difficulty::HARD.label(), "Hard");
        assert_eq!(Difficulty::Level(7).label(), "7");
        assert_eq!(Difficulty::Text("chef".into()).label(), "chef");
    }

    #[test]
    fn test_quantity_display() {
        assert_eq!(Quantity::Number(2.0).to_string(), "2");
        assert_eq!(Quantity::Number(0.5).to_string(), "0.5");
        assert_eq!(Quantity::from("a pinch").to_string(), "a pinch");
    }
}
