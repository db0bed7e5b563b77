use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::utils::error::RecipeError;
use crate::utils::validation::Validate;

/// JSON body that has been deserialized and passed [`Validate`].
///
/// Any failure becomes a `ValidationError`, which the handler layer turns
/// into `400 {"message": ...}`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = RecipeError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| RecipeError::validation(rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}
