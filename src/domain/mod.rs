// Domain layer: the recipe model and the repository port. Adapters depend on this, never the reverse.

pub mod model;
pub mod ports;

pub use model::{CreateRecipeRequest, Recipe, RecipeId, RecipeUpdate, TagMatch, UpdateRecipeRequest};
pub use ports::RecipeRepository;
