pub mod auth;
pub mod ingredient;
pub mod recipe;
pub mod shopping_list;
pub mod subscription;
pub mod tag;
pub mod user;

pub use auth::*;
pub use ingredient::*;
pub use recipe::*;
pub use shopping_list::*;
pub use subscription::*;
pub use tag::*;
pub use user::*;
