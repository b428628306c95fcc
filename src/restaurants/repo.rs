use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use super::dto::RestaurantUpdate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub photo: Option<String>,
    pub reviews: Option<String>,
    pub telegram: Option<String>,
    pub rating: sqlx::types::Decimal,
    pub currency: String,
    pub tables_amount: i32,
    pub created_at: OffsetDateTime,
}

/// Restaurant row joined with its owning account, for the superuser listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RestaurantWithOwner {
    pub id: i32,
    pub name: String,
    pub photo: Option<String>,
    pub reviews: Option<String>,
    pub telegram: Option<String>,
    pub rating: sqlx::types::Decimal,
    pub currency: String,
    pub tables_amount: i32,
    pub created_at: OffsetDateTime,
    pub owner_email: Option<String>,
}

const RESTAURANT_COLUMNS: &str =
    "id, name, photo, reviews, telegram, rating, currency, tables_amount, created_at";

pub async fn list_with_owners(db: &PgPool) -> anyhow::Result<Vec<RestaurantWithOwner>> {
    let rows = sqlx::query_as::<_, RestaurantWithOwner>(
        r#"
        SELECT r.id, r.name, r.photo, r.reviews, r.telegram, r.rating,
               r.currency, r.tables_amount, r.created_at, u.email AS owner_email
        FROM restaurants r
        LEFT JOIN users u ON u.restaurant_id = r.id
        ORDER BY r.id
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_owner_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Restaurant>> {
    let row = sqlx::query_as::<_, Restaurant>(
        r#"
        SELECT r.id, r.name, r.photo, r.reviews, r.telegram, r.rating,
               r.currency, r.tables_amount, r.created_at
        FROM restaurants r
        JOIN users u ON u.restaurant_id = r.id
        WHERE u.email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Partial update: absent fields keep their current value.
pub async fn update_partial(
    db: &PgPool,
    id: i32,
    update: &RestaurantUpdate,
) -> anyhow::Result<Option<Restaurant>> {
    let row = sqlx::query_as::<_, Restaurant>(&format!(
        r#"
        UPDATE restaurants SET
            name          = COALESCE($2, name),
            photo         = COALESCE($3, photo),
            reviews       = COALESCE($4, reviews),
            telegram      = COALESCE($5, telegram),
            rating        = COALESCE($6, rating),
            currency      = COALESCE($7, currency),
            tables_amount = COALESCE($8, tables_amount)
        WHERE id = $1
        RETURNING {RESTAURANT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&update.name)
    .bind(&update.photo)
    .bind(&update.reviews)
    .bind(&update.telegram)
    .bind(update.rating)
    .bind(&update.currency)
    .bind(update.tables_amount)
    .fetch_optional(db)
    .await?;
    Ok(row)
}
