use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DishCreate {
    pub restaurant_id: i32,
    pub name: String,
    pub description: String,
    pub price: sqlx::types::Decimal,
    pub photo: Option<String>,
    pub extra: Option<serde_json::Value>,
}

/// Partial dish update; unset fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct DishUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<sqlx::types::Decimal>,
    pub photo: Option<String>,
    pub extra: Option<serde_json::Value>,
}
