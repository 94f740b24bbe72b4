//! Offer queries

use chrono::NaiveDate;
use shared::models::Offer;
use sqlx::PgPool;

use crate::db::StoreResult;

const COLUMNS: &str = "id, restaurant_id, title, description, discount, valid_until, created_at";

pub async fn list_active(
    pool: &PgPool,
    restaurant_id: Option<&str>,
    active_on: NaiveDate,
) -> StoreResult<Vec<Offer>> {
    let rows = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM offers \
         WHERE valid_until >= $1 AND ($2::text IS NULL OR restaurant_id = $2) \
         ORDER BY created_at DESC"
    ))
    .bind(active_on)
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get(pool: &PgPool, id: &str) -> StoreResult<Option<Offer>> {
    let row = sqlx::query_as(&format!("SELECT {COLUMNS} FROM offers WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn insert(pool: &PgPool, o: &Offer) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO offers (id, restaurant_id, title, description, discount, valid_until, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&o.id)
    .bind(&o.restaurant_id)
    .bind(&o.title)
    .bind(&o.description)
    .bind(o.discount)
    .bind(o.valid_until)
    .bind(o.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: &str) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM offers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
