//! # MongoDB
//!
//! Document store backing the service in production.
//!
//! ## Schema
//! - Database from configuration, collection `recipes`
//! - `_id` (**ObjectId**), `name` (**string**), `tags`, `ingredients`,
//!   `instructions` (**string arrays**), `publishedAt` (**date**)
//!
//! ## Tag search
//! Regex over the `tags` array, anchored with `^` and `\z`. The tag is
//! escaped, so a search for `c++` matches the literal tag only. Option `i`
//! is added unless case sensitive matching is configured.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document},
    Client, Collection, Database,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{Recipe, RecipeId, RecipeRepository, RecipeUpdate, TagMatch};
use crate::utils::error::{RecipeError, Result};

pub const RECIPES_COLLECTION: &str = "recipes";

/// Connected client plus the selected database.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Creates the client and pings the database so a bad URL fails at startup.
    pub async fn connect(url: &str, database_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(url).await?;
        let database = client.database(database_name);

        database.run_command(doc! { "ping": 1 }).await?;
        info!("Connected to MongoDB database {database_name}");

        Ok(Self { client, database })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RecipeDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    tags: Vec<String>,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    #[serde(rename = "publishedAt")]
    published_at: BsonDateTime,
}

impl From<&Recipe> for RecipeDocument {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.object_id(),
            name: recipe.name.clone(),
            tags: recipe.tags.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            published_at: BsonDateTime::from_millis(recipe.published_at.timestamp_millis()),
        }
    }
}

impl TryFrom<RecipeDocument> for Recipe {
    type Error = RecipeError;

    fn try_from(document: RecipeDocument) -> Result<Self> {
        let millis = document.published_at.timestamp_millis();
        let published_at = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
            RecipeError::StorageError(format!(
                "recipe {} has out of range publishedAt {millis}",
                document.id
            ))
        })?;

        Ok(Self {
            id: RecipeId::from(document.id),
            name: document.name,
            tags: document.tags,
            ingredients: document.ingredients,
            instructions: document.instructions,
            published_at,
        })
    }
}

fn id_filter(id: &RecipeId) -> Document {
    doc! { "_id": id.object_id() }
}

fn tag_filter(tag: &str, tag_match: TagMatch) -> Document {
    // `\z`, not `$`: PCRE's `$` also matches before a trailing newline
    let pattern = format!("^{}\\z", regex::escape(tag));
    match tag_match {
        TagMatch::CaseInsensitive => doc! { "tags": { "$regex": pattern, "$options": "i" } },
        TagMatch::CaseSensitive => doc! { "tags": { "$regex": pattern } },
    }
}

fn set_update(update: RecipeUpdate) -> Document {
    doc! {
        "$set": {
            "name": update.name,
            "tags": update.tags,
            "ingredients": update.ingredients,
            "instructions": update.instructions,
        }
    }
}

pub struct MongoRecipeRepository {
    collection: Collection<RecipeDocument>,
    tag_match: TagMatch,
}

impl MongoRecipeRepository {
    pub fn new(store: &MongoStore, tag_match: TagMatch) -> Self {
        Self {
            collection: store.database().collection(RECIPES_COLLECTION),
            tag_match,
        }
    }

    async fn find_all(&self, filter: Document) -> Result<Vec<Recipe>> {
        let documents: Vec<RecipeDocument> = self.collection.find(filter).await?.try_collect().await?;
        documents.into_iter().map(Recipe::try_from).collect()
    }
}

#[async_trait]
impl RecipeRepository for MongoRecipeRepository {
    async fn list(&self) -> Result<Vec<Recipe>> {
        self.find_all(doc! {}).await
    }

    async fn create(&self, recipe: Recipe) -> Result<Recipe> {
        let document = RecipeDocument::from(&recipe);
        self.collection.insert_one(&document).await?;
        debug!("Inserted recipe {}", recipe.id);
        Ok(recipe)
    }

    async fn get_by_id(&self, id: &str) -> Result<Recipe> {
        let id = RecipeId::parse(id)?;
        self.collection
            .find_one(id_filter(&id))
            .await?
            .ok_or(RecipeError::NotFound)
            .and_then(Recipe::try_from)
    }

    async fn update(&self, id: &str, update: RecipeUpdate) -> Result<()> {
        let id = RecipeId::parse(id)?;
        let result = self
            .collection
            .update_one(id_filter(&id), set_update(update))
            .await?;

        if result.matched_count == 0 {
            return Err(RecipeError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = RecipeId::parse(id)?;
        let result = self.collection.delete_one(id_filter(&id)).await?;

        if result.deleted_count == 0 {
            return Err(RecipeError::NotFound);
        }
        Ok(())
    }

    async fn search_by_tag(&self, tag: &str) -> Result<Vec<Recipe>> {
        self.find_all(tag_filter(tag, self.tag_match)).await
    }
}
