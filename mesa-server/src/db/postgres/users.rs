//! User and staff queries

use shared::models::Staff;
use sqlx::PgPool;

use crate::db::{StoreResult, UserRecord};

const COLUMNS: &str = "id, email, name, password_hash, role, created_at";

pub async fn find_by_email(pool: &PgPool, email: &str) -> StoreResult<Option<UserRecord>> {
    let row = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM users WHERE lower(email) = lower($1)"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn get(pool: &PgPool, id: &str) -> StoreResult<Option<UserRecord>> {
    let row = sqlx::query_as(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn insert(pool: &PgPool, u: &UserRecord) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, email, name, password_hash, role, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&u.id)
    .bind(&u.email)
    .bind(&u.name)
    .bind(&u.password_hash)
    .bind(u.role)
    .bind(u.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_staff(pool: &PgPool, s: &Staff) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO staff (user_id, restaurant_id, position, created_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(&s.user_id)
    .bind(&s.restaurant_id)
    .bind(&s.position)
    .bind(s.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_staff(pool: &PgPool, user_id: &str) -> StoreResult<Option<Staff>> {
    let row = sqlx::query_as(
        "SELECT user_id, restaurant_id, position, created_at FROM staff WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
