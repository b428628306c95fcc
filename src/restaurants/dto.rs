use serde::Deserialize;

/// Partial restaurant update; unset fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub photo: Option<String>,
    pub reviews: Option<String>,
    pub telegram: Option<String>,
    pub rating: Option<sqlx::types::Decimal>,
    pub currency: Option<String>,
    pub tables_amount: Option<i32>,
}
