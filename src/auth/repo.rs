use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Superuser,
    Owner,
}

impl Role {
    pub fn is_superuser(self) -> bool {
        matches!(self, Role::Superuser)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Superuser => "superuser",
            Role::Owner => "owner",
        }
    }
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String, // unique identity
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub role: Role,
    pub approved: bool,
    pub restaurant_id: Option<i32>, // owned restaurant, superusers have none
    pub created_at: OffsetDateTime,
}

const USER_COLUMNS: &str = "id, email, password_hash, role, approved, restaurant_id, created_at";

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    /// Create a user with a hashed password. Superusers start approved and
    /// own no restaurant; owners start unapproved and get a default
    /// restaurant created and linked in the same transaction.
    pub async fn create_with_role(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> anyhow::Result<User> {
        let mut tx = db.begin().await?;

        let restaurant_id = match role {
            Role::Owner => {
                let (id,): (i32,) =
                    sqlx::query_as("INSERT INTO restaurants (name) VALUES ($1) RETURNING id")
                        .bind("Default Restaurant Name")
                        .fetch_one(&mut *tx)
                        .await?;
                Some(id)
            }
            Role::Superuser => None,
        };

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, role, approved, restaurant_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(role.is_superuser())
        .bind(restaurant_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    pub async fn set_approved(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET approved = TRUE WHERE email = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn set_password_hash(
        db: &PgPool,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE email = $1")
            .bind(email)
            .bind(password_hash)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user and the restaurant they own (dishes cascade with it).
    pub async fn delete(db: &PgPool, email: &str) -> anyhow::Result<bool> {
        let mut tx = db.begin().await?;

        let row: Option<(Option<i32>,)> =
            sqlx::query_as("DELETE FROM users WHERE email = $1 RETURNING restaurant_id")
                .bind(email)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((restaurant_id,)) = row else {
            return Ok(false);
        };
        if let Some(id) = restaurant_id {
            sqlx::query("DELETE FROM restaurants WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "owner@cafe.test".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::Owner,
            approved: true,
            restaurant_id: Some(7),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn serialization_never_exposes_password_hash() {
        let value = serde_json::to_value(sample_user()).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["email"], "owner@cafe.test");
        assert_eq!(value["role"], "owner");
    }

    #[test]
    fn role_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Superuser).unwrap(), "\"superuser\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"owner\"").unwrap(),
            Role::Owner
        );
        assert_eq!(Role::Superuser.as_str(), "superuser");
    }
}
