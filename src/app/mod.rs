// Application layer: orchestration (service), startup seeding and server bootstrap.

pub mod recipe_service;
pub mod seed;
pub mod server;

pub use recipe_service::RecipeService;
pub use server::{build_service, RecipeServer};
