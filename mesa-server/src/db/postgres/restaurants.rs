//! Restaurant queries

use shared::models::Restaurant;
use sqlx::PgPool;

use crate::db::StoreResult;

const COLUMNS: &str = "id, name, description, address, phone, cuisine, image_url, \
                       open_time, close_time, rating, review_count, created_at";

pub async fn list(pool: &PgPool) -> StoreResult<Vec<Restaurant>> {
    let rows = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM restaurants ORDER BY name, created_at"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get(pool: &PgPool, id: &str) -> StoreResult<Option<Restaurant>> {
    let row = sqlx::query_as(&format!("SELECT {COLUMNS} FROM restaurants WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn insert(pool: &PgPool, r: &Restaurant) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO restaurants (
            id, name, description, address, phone, cuisine, image_url,
            open_time, close_time, rating, review_count, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(&r.id)
    .bind(&r.name)
    .bind(&r.description)
    .bind(&r.address)
    .bind(&r.phone)
    .bind(&r.cuisine)
    .bind(&r.image_url)
    .bind(r.open_time)
    .bind(r.close_time)
    .bind(r.rating)
    .bind(r.review_count)
    .bind(r.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Rating and review count are owned by the review insert and left untouched
pub async fn update(pool: &PgPool, r: &Restaurant) -> StoreResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE restaurants SET
            name = $2, description = $3, address = $4, phone = $5,
            cuisine = $6, image_url = $7, open_time = $8, close_time = $9
        WHERE id = $1
        "#,
    )
    .bind(&r.id)
    .bind(&r.name)
    .bind(&r.description)
    .bind(&r.address)
    .bind(&r.phone)
    .bind(&r.cuisine)
    .bind(&r.image_url)
    .bind(r.open_time)
    .bind(r.close_time)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &PgPool, id: &str) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM restaurants WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
