use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const SHOPPING_LIST_HEADER: &str = "Shopping list:";

/// Summed amount of one (ingredient name, unit) group across the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Plain-text report: header, then one `name: amount unit` line per group.
pub fn render_shopping_list(items: &[ShoppingListItem]) -> String {
    let mut text = String::from(SHOPPING_LIST_HEADER);
    for item in items {
        text.push('\n');
        text.push_str(&format!(
            "{}: {} {}",
            item.name, item.total_amount, item.measurement_unit
        ));
    }
    text
}

pub fn shopping_list_filename(username: &str) -> String {
    format!("{}_shopping_list.txt", username)
}
