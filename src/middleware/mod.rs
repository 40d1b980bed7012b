pub mod auth;

pub use auth::{AdminUser, AuthMiddleware, AuthUser};
