//! Recipe commands.
//!
//! Recipe files use the API's JSON shape:
//!
//! ```json
//! {
//!   "Id": 0,
//!   "Name": "Lentil soup",
//!   "Description": "Warming and cheap",
//!   "Duration": 45,
//!   "Difficulty": 1,
//!   "Categoryid": 3,
//!   "Img": "https://example.com/soup.jpg",
//!   "Ingridents": [{ "Name": "Lentils", "Count": 2, "Type": "cups" }],
//!   "Instructions": [{ "Name": "Simmer for 40 minutes" }]
//! }
//! ```

use std::path::Path;

use recipe_book_core::{Recipe, RecipeFilter, RecipeId};
use tracing::info;

use super::{CliError, Context};

/// Print the cached categories.
#[allow(clippy::print_stdout)]
pub fn categories(ctx: &Context) {
    for category in ctx.store.categories() {
        println!("{:>4}  {}", category.id, category.name);
    }
}

/// Print recipes matching `filter`.
#[allow(clippy::print_stdout)]
pub async fn list(ctx: &Context, filter: &RecipeFilter) -> Result<(), CliError> {
    ctx.load_recipes().await?;

    let recipes = ctx.store.filtered(filter);
    info!(count = recipes.len(), "Matching recipes");
    for recipe in &recipes {
        println!(
            "{:>4}  {}  ({} min, {})",
            recipe.id,
            recipe.name,
            recipe.duration,
            recipe.difficulty.label()
        );
    }
    Ok(())
}

/// Print one recipe in full.
#[allow(clippy::print_stdout)]
pub async fn show(ctx: &Context, id: RecipeId) -> Result<(), CliError> {
    let recipe = ctx.store.fetch_recipe_by_id(id).await?;
    let category = ctx
        .store
        .categories()
        .into_iter()
        .find(|c| c.id == recipe.category_id)
        .map_or_else(|| recipe.category_id.to_string(), |c| c.name);

    println!("{} (#{})", recipe.name, recipe.id);
    if !recipe.description.is_empty() {
        println!("{}", recipe.description);
    }
    println!();
    println!("Category:   {category}");
    println!("Duration:   {} min", recipe.duration);
    println!("Difficulty: {}", recipe.difficulty.label());
    if let Some(image) = recipe.displayable_image() {
        println!("Image:      {image}");
    }

    println!();
    println!("Ingredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {} {} {}", ingredient.quantity, ingredient.unit, ingredient.name);
    }

    println!();
    println!("Instructions:");
    for (step, instruction) in recipe.instructions.iter().enumerate() {
        println!("  {}. {}", step + 1, instruction.text);
    }
    Ok(())
}

/// Create the recipe in `file`, owned by the signed-in user.
pub async fn add(ctx: &Context, file: &Path) -> Result<(), CliError> {
    let mut draft = read_recipe(file).await?;
    draft.user_id = ctx.session.user_id();

    ctx.load_recipes().await?;
    ctx.store.check_submission(&draft)?;

    let created = ctx.store.add_recipe(&draft).await?;
    info!(recipe_id = %created.id, "Created {}", created.name);
    Ok(())
}

/// Save the recipe in `file` over the signed-in user's stored copy.
pub async fn edit(ctx: &Context, file: &Path) -> Result<(), CliError> {
    let mut recipe = read_recipe(file).await?;
    let user_id = ctx.session.user_id();

    ctx.load_recipes().await?;
    ctx.store.authorize(recipe.id, user_id)?;
    recipe.user_id = user_id;
    ctx.store.check_submission(&recipe)?;

    let saved = ctx.store.edit_recipe(&recipe).await?;
    info!(recipe_id = %saved.id, "Updated {}", saved.name);
    Ok(())
}

/// Delete one of the signed-in user's recipes.
pub async fn delete(ctx: &Context, id: RecipeId) -> Result<(), CliError> {
    ctx.load_recipes().await?;
    ctx.store.delete_recipe(id, ctx.session.user_id()).await?;
    info!(recipe_id = %id, "Deleted");
    Ok(())
}

async fn read_recipe(file: &Path) -> Result<Recipe, CliError> {
    let path = file.display().to_string();
    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
    serde_json::from_str(&content).map_err(|source| CliError::Json { path, source })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use recipe_book_core::{CategoryId, Difficulty, Quantity};

    #[test]
    fn test_documented_file_shape_parses() {
        let json = r#"{
            "Id": 0,
            "Name": "Lentil soup",
            "Description": "Warming and cheap",
            "Duration": 45,
            "Difficulty": 1,
            "Categoryid": 3,
            "Img": "https://example.com/soup.jpg",
            "Ingridents": [{ "Name": "Lentils", "Count": 2, "Type": "cups" }],
            "Instructions": [{ "Name": "Simmer for 40 minutes" }]
        }"#;
        let recipe: recipe_book_core::Recipe = serde_json::from_str(json).unwrap();
        assert!(recipe.is_draft());
        assert_eq!(recipe.category_id, CategoryId::new(3));
        assert_eq!(recipe.difficulty, Difficulty::EASY);
        assert_eq!(recipe.ingredients[0].quantity, Quantity::Number(2.0));
        assert_eq!(recipe.instructions[0].text, "Simmer for 40 minutes");
    }
}
