pub mod memory;
pub mod mongo;

pub use memory::MemoryRecipeRepository;
pub use mongo::{MongoRecipeRepository, MongoStore};
