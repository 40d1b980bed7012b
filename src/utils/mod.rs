pub mod auth;
pub mod misc;
pub mod pagination;
pub mod password;
pub mod query;
pub mod time;
pub mod validation;
