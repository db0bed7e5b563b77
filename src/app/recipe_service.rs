use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{SubsecRound, Utc};
use tracing::warn;

use crate::domain::{
    CreateRecipeRequest, Recipe, RecipeId, RecipeRepository, RecipeUpdate, UpdateRecipeRequest,
};
use crate::utils::error::{RecipeError, Result};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Id and timestamp policy on top of a [`RecipeRepository`].
///
/// Holds no per-request state. Every repository call runs under
/// `request_timeout`; when it elapses the call is dropped and the
/// operation fails with [`RecipeError::Cancelled`].
#[derive(Clone)]
pub struct RecipeService {
    repo: Arc<dyn RecipeRepository>,
    request_timeout: Duration,
}

impl RecipeService {
    pub fn new(repo: Arc<dyn RecipeRepository>) -> Self {
        Self::with_timeout(repo, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(repo: Arc<dyn RecipeRepository>, request_timeout: Duration) -> Self {
        Self {
            repo,
            request_timeout,
        }
    }

    async fn bounded<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.request_timeout, operation)
            .await
            .map_err(|_| RecipeError::Cancelled {
                after: self.request_timeout,
            })?
    }

    /// Store failures become [`RecipeError::ListUnavailable`]; an elapsed
    /// deadline stays [`RecipeError::Cancelled`].
    pub async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        self.bounded(async {
            self.repo.list().await.map_err(|e| {
                warn!("Listing recipes failed: {e}");
                RecipeError::ListUnavailable(Box::new(e))
            })
        })
        .await
    }

    pub async fn get_recipe_by_id(&self, id: &str) -> Result<Recipe> {
        self.bounded(self.repo.get_by_id(id)).await
    }

    pub async fn new_recipe(&self, request: CreateRecipeRequest) -> Result<Recipe> {
        let recipe = Recipe {
            id: RecipeId::generate(),
            name: request.name,
            tags: request.tags,
            ingredients: request.ingredients,
            instructions: request.instructions,
            // the document store keeps milliseconds
            published_at: Utc::now().trunc_subsecs(3),
        };
        self.bounded(self.repo.create(recipe)).await
    }

    /// Replaces the four content fields, then returns the stored record so
    /// `id` and `publishedAt` come from the store rather than the caller.
    pub async fn update_recipe_by_id(&self, id: &str, request: UpdateRecipeRequest) -> Result<Recipe> {
        self.bounded(async move {
            self.repo.update(id, RecipeUpdate::from(request)).await?;
            self.repo.get_by_id(id).await
        })
        .await
    }

    pub async fn delete_recipe_by_id(&self, id: &str) -> Result<()> {
        self.bounded(self.repo.delete(id)).await
    }

    pub async fn search_by_tag(&self, tag: &str) -> Result<Vec<Recipe>> {
        self.bounded(self.repo.search_by_tag(tag)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryRecipeRepository;
    use async_trait::async_trait;

    fn service() -> RecipeService {
        RecipeService::new(Arc::new(MemoryRecipeRepository::default()))
    }

    fn tea() -> CreateRecipeRequest {
        CreateRecipeRequest {
            name: "Tea".to_string(),
            tags: vec!["drink".to_string(), "hot".to_string()],
            ingredients: vec!["water".to_string(), "tea leaves".to_string()],
            instructions: vec!["Boil water".to_string(), "Steep leaves".to_string()],
        }
    }

    /// Fails every call, or never answers when `hang` is set.
    struct BrokenRepository {
        hang: bool,
    }

    impl BrokenRepository {
        async fn fail<T>(&self) -> Result<T> {
            if self.hang {
                std::future::pending::<()>().await;
            }
            Err(RecipeError::StorageError("connection refused".to_string()))
        }
    }

    #[async_trait]
    impl RecipeRepository for BrokenRepository {
        async fn list(&self) -> Result<Vec<Recipe>> {
            self.fail().await
        }
        async fn create(&self, _recipe: Recipe) -> Result<Recipe> {
            self.fail().await
        }
        async fn get_by_id(&self, _id: &str) -> Result<Recipe> {
            self.fail().await
        }
        async fn update(&self, _id: &str, _update: RecipeUpdate) -> Result<()> {
            self.fail().await
        }
        async fn delete(&self, _id: &str) -> Result<()> {
            self.fail().await
        }
        async fn search_by_tag(&self, _tag: &str) -> Result<Vec<Recipe>> {
            self.fail().await
        }
    }

    #[tokio::test]
    async fn test_new_recipe_assigns_id_and_timestamp() {
        let service = service();
        let before = Utc::now().trunc_subsecs(3);
        let recipe = service.new_recipe(tea()).await.unwrap();
        let after = Utc::now();

        assert!(!recipe.id.to_string().is_empty());
        assert!(recipe.published_at >= before && recipe.published_at <= after);
        assert_eq!(recipe.name, "Tea");
        assert_eq!(recipe.tags, tea().tags);
        assert_eq!(recipe.ingredients, tea().ingredients);
        assert_eq!(recipe.instructions, tea().instructions);
    }

    #[tokio::test]
    async fn test_new_recipes_get_distinct_ids() {
        let service = service();
        let first = service.new_recipe(tea()).await.unwrap();
        let second = service.new_recipe(tea()).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_update_returns_stored_record() {
        let service = service();
        let created = service.new_recipe(tea()).await.unwrap();

        let updated = service
            .update_recipe_by_id(
                &created.id.to_string(),
                UpdateRecipeRequest {
                    name: "Tea".to_string(),
                    tags: vec!["drink".to_string(), "cold".to_string()],
                    ingredients: tea().ingredients,
                    instructions: tea().instructions,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.tags, vec!["drink", "cold"]);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.published_at, created.published_at);
    }

    #[tokio::test]
    async fn test_errors_pass_through_unchanged() {
        let service = service();
        let absent = RecipeId::generate().to_string();

        assert!(matches!(service.get_recipe_by_id("123").await, Err(RecipeError::BadId)));
        assert!(matches!(
            service.get_recipe_by_id(&absent).await,
            Err(RecipeError::NotFound)
        ));
        assert!(matches!(
            service.delete_recipe_by_id(&absent).await,
            Err(RecipeError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_failure_is_wrapped() {
        let service = RecipeService::new(Arc::new(BrokenRepository { hang: false }));

        match service.list_recipes().await {
            Err(RecipeError::ListUnavailable(cause)) => {
                assert!(matches!(*cause, RecipeError::StorageError(_)))
            }
            other => panic!("expected ListUnavailable, got {:?}", other),
        }

        assert!(matches!(
            service.search_by_tag("vegan").await,
            Err(RecipeError::StorageError(_))
        ));
    }

    #[tokio::test]
    async fn test_hung_store_is_cancelled() {
        let timeout = Duration::from_millis(50);
        let service = RecipeService::with_timeout(Arc::new(BrokenRepository { hang: true }), timeout);

        let started = std::time::Instant::now();
        let result = service.get_recipe_by_id(&RecipeId::generate().to_string()).await;

        assert!(matches!(result, Err(RecipeError::Cancelled { after }) if after == timeout));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_hung_list_is_cancelled_not_wrapped() {
        let timeout = Duration::from_millis(50);
        let service = RecipeService::with_timeout(Arc::new(BrokenRepository { hang: true }), timeout);

        let result = service.list_recipes().await;
        assert!(matches!(result, Err(RecipeError::Cancelled { after }) if after == timeout));
        assert_eq!(
            result.unwrap_err().status_code(),
            axum::http::StatusCode::GATEWAY_TIMEOUT
        );
    }
}
