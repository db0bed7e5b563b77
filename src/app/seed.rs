use std::path::Path;

use tracing::info;

use crate::app::RecipeService;
use crate::domain::CreateRecipeRequest;
use crate::utils::error::{RecipeError, Result};
use crate::utils::validation::Validate;

/// Reads a JSON array of recipes. Fields other than the four content fields
/// (old ids, timestamps) are ignored.
pub fn read_seed_file<P: AsRef<Path>>(path: P) -> Result<Vec<CreateRecipeRequest>> {
    let bytes = std::fs::read(&path)?;
    let recipes: Vec<CreateRecipeRequest> = serde_json::from_slice(&bytes)?;

    for (index, recipe) in recipes.iter().enumerate() {
        recipe.validate().map_err(|e| RecipeError::ConfigError {
            message: format!(
                "seed recipe #{index} in {} is invalid: {e}",
                path.as_ref().display()
            ),
        })?;
    }

    Ok(recipes)
}

/// Creates every seed recipe through the service, so each gets a fresh id and timestamp.
pub async fn seed_recipes(service: &RecipeService, recipes: Vec<CreateRecipeRequest>) -> Result<usize> {
    let mut inserted = 0;
    for recipe in recipes {
        service.new_recipe(recipe).await?;
        inserted += 1;
    }
    info!("Inserted {inserted} seed recipes");
    Ok(inserted)
}
