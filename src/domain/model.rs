use std::fmt;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::error::{RecipeError, Result};
use crate::utils::validation::{validate_non_empty_items, validate_non_empty_string, Validate};

/// Identifier of a stored recipe: an ObjectId rendered as 24 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecipeId(ObjectId);

impl RecipeId {
    /// Time-ordered, practically unique.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn parse(raw: &str) -> Result<Self> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| RecipeError::BadId)
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for RecipeId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl TryFrom<String> for RecipeId {
    type Error = RecipeError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RecipeId> for String {
    fn from(id: RecipeId) -> Self {
        id.0.to_hex()
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub published_at: DateTime<Utc>,
}

impl Recipe {
    pub fn has_tag(&self, tag: &str, matching: TagMatch) -> bool {
        self.tags.iter().any(|t| matching.matches(t, tag))
    }
}

/// Body of `POST /recipes`. Anything besides the four content fields is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

/// Body of `PUT /recipes/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    pub name: String,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

fn validate_content(name: &str, tags: &[String], ingredients: &[String], instructions: &[String]) -> Result<()> {
    validate_non_empty_string("name", name)?;
    validate_non_empty_items("tags", tags)?;
    validate_non_empty_items("ingredients", ingredients)?;
    validate_non_empty_items("instructions", instructions)
}

impl Validate for CreateRecipeRequest {
    fn validate(&self) -> Result<()> {
        validate_content(&self.name, &self.tags, &self.ingredients, &self.instructions)
    }
}

impl Validate for UpdateRecipeRequest {
    fn validate(&self) -> Result<()> {
        validate_content(&self.name, &self.tags, &self.ingredients, &self.instructions)
    }
}

/// The mutable subset of a recipe. `id` and `publishedAt` have no place here.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeUpdate {
    pub name: String,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl RecipeUpdate {
    pub fn apply_to(self, recipe: &mut Recipe) {
        recipe.name = self.name;
        recipe.tags = self.tags;
        recipe.ingredients = self.ingredients;
        recipe.instructions = self.instructions;
    }
}

impl From<UpdateRecipeRequest> for RecipeUpdate {
    fn from(request: UpdateRecipeRequest) -> Self {
        Self {
            name: request.name,
            tags: request.tags,
            ingredients: request.ingredients,
            instructions: request.instructions,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagMatch {
    #[default]
    CaseInsensitive,
    CaseSensitive,
}

impl TagMatch {
    pub fn matches(self, stored: &str, wanted: &str) -> bool {
        match self {
            TagMatch::CaseInsensitive => stored.to_lowercase() == wanted.to_lowercase(),
            TagMatch::CaseSensitive => stored == wanted,
        }
    }
}
