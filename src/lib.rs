pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod utils;

pub use adapters::http::create_router;
pub use adapters::storage::{MemoryRecipeRepository, MongoRecipeRepository, MongoStore};
pub use app::{RecipeServer, RecipeService};
pub use config::{AppConfig, CliArgs, StorageBackend};
pub use domain::{CreateRecipeRequest, Recipe, RecipeId, RecipeRepository, TagMatch, UpdateRecipeRequest};
pub use utils::error::{RecipeError, Result};
