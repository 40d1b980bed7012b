use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::validation::{COLOR_RE, SLUG_RE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TagForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 7), regex(path = *COLOR_RE, message = "Color must be in \"#RRGGBB\" format"))]
    pub color: String,

    #[validate(length(min = 1, max = 200), regex(path = *SLUG_RE, message = "Slug may only contain latin letters, digits, hyphens and underscores"))]
    pub slug: String,
}
