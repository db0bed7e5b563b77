use crate::domain::model::{Recipe, RecipeUpdate};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persistence contract for recipes.
///
/// Ids arrive as raw strings: an implementation reports `BadId` for a string
/// that is not a well-formed id and `NotFound` for a well-formed id with no
/// stored recipe. Any other failure is a `StorageError`.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Every stored recipe, in store order.
    async fn list(&self) -> Result<Vec<Recipe>>;

    async fn create(&self, recipe: Recipe) -> Result<Recipe>;

    async fn get_by_id(&self, id: &str) -> Result<Recipe>;

    /// Replaces name, tags, ingredients and instructions only.
    async fn update(&self, id: &str, update: RecipeUpdate) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Recipes whose tag list contains `tag`. No match is an empty list, not an error.
    async fn search_by_tag(&self, tag: &str) -> Result<Vec<Recipe>>;
}
