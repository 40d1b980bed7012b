use serde::Serialize;

use crate::models::{RecipeSummary, User};

/// An author profile from the follower's point of view.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: i64,
}

impl SubscriptionResponse {
    pub fn new(author: User, recipes: Vec<RecipeSummary>, recipes_count: i64) -> Self {
        SubscriptionResponse {
            email: author.email,
            id: author.id,
            username: author.username,
            first_name: author.first_name,
            last_name: author.last_name,
            is_subscribed: true,
            recipes,
            recipes_count,
        }
    }
}
