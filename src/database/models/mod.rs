pub mod category;
pub mod recipe;
pub mod user;

pub use category::Category;
pub use recipe::{Ingredient, Recipe, RecipeDraft, RecipeFilter, Step};
pub use user::{NewUser, User, UserChanges, UserProfile};
