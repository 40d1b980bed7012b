use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

/// New catalogue entry; (name, measurement_unit) identifies an ingredient.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IngredientForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1, max = 200))]
    pub measurement_unit: String,
}
