//! Dining table queries

use shared::models::{DiningTable, TableStatus};
use sqlx::PgPool;

use crate::db::StoreResult;

const COLUMNS: &str =
    "id, restaurant_id, number, capacity, status, position_x, position_y, updated_at";

pub async fn list(pool: &PgPool, restaurant_id: &str) -> StoreResult<Vec<DiningTable>> {
    let rows = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM tables WHERE restaurant_id = $1 ORDER BY number"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get(pool: &PgPool, id: &str) -> StoreResult<Option<DiningTable>> {
    let row = sqlx::query_as(&format!("SELECT {COLUMNS} FROM tables WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn insert(pool: &PgPool, t: &DiningTable) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO tables (
            id, restaurant_id, number, capacity, status,
            position_x, position_y, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(&t.id)
    .bind(&t.restaurant_id)
    .bind(t.number)
    .bind(t.capacity)
    .bind(t.status)
    .bind(t.position_x)
    .bind(t.position_y)
    .bind(t.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update(pool: &PgPool, t: &DiningTable) -> StoreResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE tables SET
            capacity = $2, position_x = $3, position_y = $4, updated_at = $5
        WHERE id = $1
        "#,
    )
    .bind(&t.id)
    .bind(t.capacity)
    .bind(t.position_x)
    .bind(t.position_y)
    .bind(t.updated_at)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_status(
    pool: &PgPool,
    id: &str,
    status: TableStatus,
    now: i64,
) -> StoreResult<Option<DiningTable>> {
    let row = sqlx::query_as(&format!(
        "UPDATE tables SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(status)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// `ON DELETE SET NULL` detaches the table's reservations
pub async fn delete(pool: &PgPool, id: &str) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM tables WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
