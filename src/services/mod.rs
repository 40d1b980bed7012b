pub mod auth;
pub mod ingredient;
pub mod media;
pub mod membership;
pub mod recipe;
pub mod shopping_list;
pub mod subscription;
pub mod tag;
pub mod user;

pub use auth::AuthService;
pub use ingredient::IngredientService;
pub use media::MediaStorage;
pub use membership::{MembershipService, RecipeList};
pub use recipe::RecipeService;
pub use shopping_list::ShoppingListService;
pub use subscription::SubscriptionService;
pub use tag::TagService;
pub use user::UserService;
