//! Recipe endpoints. Each handler validates, delegates to the service and
//! maps the outcome; status codes come from [`RecipeError::status_code`].

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::debug;

use super::extract::ValidatedJson;
use super::response::MessageBody;
use crate::app::RecipeService;
use crate::domain::{CreateRecipeRequest, UpdateRecipeRequest};
use crate::utils::error::RecipeError;

#[derive(Clone)]
pub struct AppState {
    pub service: RecipeService,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub tag: Option<String>,
}

/// `GET /recipes`
pub async fn list_recipes(State(state): State<AppState>) -> Result<impl IntoResponse, RecipeError> {
    let recipes = state.service.list_recipes().await?;
    Ok(Json(recipes))
}

/// `GET /recipes/{id}`
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, RecipeError> {
    let recipe = state.service.get_recipe_by_id(&id).await?;
    Ok(Json(recipe))
}

/// `POST /recipes`
pub async fn create_recipe(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateRecipeRequest>,
) -> Result<impl IntoResponse, RecipeError> {
    let recipe = state.service.new_recipe(request).await?;
    debug!("Created recipe {}", recipe.id);
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// `PUT /recipes/{id}`
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateRecipeRequest>,
) -> Result<impl IntoResponse, RecipeError> {
    let recipe = state.service.update_recipe_by_id(&id, request).await?;
    Ok(Json(recipe))
}

/// `DELETE /recipes/{id}`
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, RecipeError> {
    state.service.delete_recipe_by_id(&id).await?;
    debug!("Deleted recipe {id}");
    Ok(Json(MessageBody::new("Recipe has been deleted")))
}

/// `GET /recipes/search?tag=T`
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, RecipeError> {
    let tag = params
        .tag
        .filter(|tag| !tag.is_empty())
        .ok_or_else(|| RecipeError::validation("Tag parameter is required"))?;

    let recipes = state.service.search_by_tag(&tag).await?;
    Ok(Json(recipes))
}
