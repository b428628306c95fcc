use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use super::dto::{DishCreate, DishUpdate};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Dish {
    pub id: i32,
    pub restaurant_id: i32,
    pub name: String,
    pub description: String,
    pub price: sqlx::types::Decimal,
    pub photo: Option<String>,
    pub extra: Option<serde_json::Value>,
    pub created_at: OffsetDateTime,
}

const DISH_COLUMNS: &str =
    "id, restaurant_id, name, description, price, photo, extra, created_at";

pub async fn list_by_restaurant(db: &PgPool, restaurant_id: i32) -> anyhow::Result<Vec<Dish>> {
    let rows = sqlx::query_as::<_, Dish>(&format!(
        "SELECT {DISH_COLUMNS} FROM dishes WHERE restaurant_id = $1 ORDER BY id"
    ))
    .bind(restaurant_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn get(db: &PgPool, id: i32) -> anyhow::Result<Option<Dish>> {
    let row = sqlx::query_as::<_, Dish>(&format!(
        "SELECT {DISH_COLUMNS} FROM dishes WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn create(db: &PgPool, dish: &DishCreate) -> anyhow::Result<Dish> {
    let row = sqlx::query_as::<_, Dish>(&format!(
        r#"
        INSERT INTO dishes (restaurant_id, name, description, price, photo, extra)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {DISH_COLUMNS}
        "#
    ))
    .bind(dish.restaurant_id)
    .bind(&dish.name)
    .bind(&dish.description)
    .bind(dish.price)
    .bind(&dish.photo)
    .bind(&dish.extra)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Partial update: absent fields keep their current value.
pub async fn update_partial(
    db: &PgPool,
    id: i32,
    update: &DishUpdate,
) -> anyhow::Result<Option<Dish>> {
    let row = sqlx::query_as::<_, Dish>(&format!(
        r#"
        UPDATE dishes SET
            name        = COALESCE($2, name),
            description = COALESCE($3, description),
            price       = COALESCE($4, price),
            photo       = COALESCE($5, photo),
            extra       = COALESCE($6, extra)
        WHERE id = $1
        RETURNING {DISH_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&update.name)
    .bind(&update.description)
    .bind(update.price)
    .bind(&update.photo)
    .bind(&update.extra)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: i32) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM dishes WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
