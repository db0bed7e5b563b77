use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Recipe, RecipeId, RecipeRepository, RecipeUpdate, TagMatch};
use crate::utils::error::{RecipeError, Result};

/// Recipes held in process memory, in insertion order.
///
/// Each instance owns its own list; nothing is shared between instances.
#[derive(Debug, Default)]
pub struct MemoryRecipeRepository {
    recipes: RwLock<Vec<Recipe>>,
    tag_match: TagMatch,
}

impl MemoryRecipeRepository {
    pub fn new(tag_match: TagMatch) -> Self {
        Self {
            recipes: RwLock::new(Vec::new()),
            tag_match,
        }
    }
}

#[async_trait]
impl RecipeRepository for MemoryRecipeRepository {
    async fn list(&self) -> Result<Vec<Recipe>> {
        Ok(self.recipes.read().await.clone())
    }

    async fn create(&self, recipe: Recipe) -> Result<Recipe> {
        let mut recipes = self.recipes.write().await;
        if recipes.iter().any(|r| r.id == recipe.id) {
            return Err(RecipeError::StorageError(format!(
                "duplicate key: recipe {} already exists",
                recipe.id
            )));
        }
        recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn get_by_id(&self, id: &str) -> Result<Recipe> {
        let id = RecipeId::parse(id)?;
        self.recipes
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(RecipeError::NotFound)
    }

    async fn update(&self, id: &str, update: RecipeUpdate) -> Result<()> {
        let id = RecipeId::parse(id)?;
        let mut recipes = self.recipes.write().await;
        let recipe = recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RecipeError::NotFound)?;
        update.apply_to(recipe);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = RecipeId::parse(id)?;
        let mut recipes = self.recipes.write().await;
        let index = recipes
            .iter()
            .position(|r| r.id == id)
            .ok_or(RecipeError::NotFound)?;
        recipes.remove(index);
        Ok(())
    }

    async fn search_by_tag(&self, tag: &str) -> Result<Vec<Recipe>> {
        Ok(self
            .recipes
            .read()
            .await
            .iter()
            .filter(|r| r.has_tag(tag, self.tag_match))
            .cloned()
            .collect())
    }
}
