//! Reservation queries

use chrono::NaiveDate;
use futures::{StreamExt, TryStreamExt, stream::BoxStream};
use shared::models::{Reservation, ReservationFilter};
use sqlx::PgPool;

use crate::db::{StoreError, StoreResult};

const COLUMNS: &str = "id, restaurant_id, table_id, customer_name, email, phone, date, time, \
                       guest_count, status, deposit_paid, deposit_amount, notes, \
                       created_at, updated_at";

pub async fn insert(pool: &PgPool, r: &Reservation) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO reservations (
            id, restaurant_id, table_id, customer_name, email, phone, date, time,
            guest_count, status, deposit_paid, deposit_amount, notes,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        "#,
    )
    .bind(&r.id)
    .bind(&r.restaurant_id)
    .bind(&r.table_id)
    .bind(&r.customer_name)
    .bind(&r.email)
    .bind(&r.phone)
    .bind(r.date)
    .bind(r.time)
    .bind(r.guest_count)
    .bind(r.status)
    .bind(r.deposit_paid)
    .bind(r.deposit_amount)
    .bind(&r.notes)
    .bind(r.created_at)
    .bind(r.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get(pool: &PgPool, id: &str) -> StoreResult<Option<Reservation>> {
    let row = sqlx::query_as(&format!("SELECT {COLUMNS} FROM reservations WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Mutable fields only: status, deposit, table binding
pub async fn update(pool: &PgPool, r: &Reservation) -> StoreResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE reservations SET
            table_id = $2, status = $3, deposit_paid = $4,
            deposit_amount = $5, updated_at = $6
        WHERE id = $1
        "#,
    )
    .bind(&r.id)
    .bind(&r.table_id)
    .bind(r.status)
    .bind(r.deposit_paid)
    .bind(r.deposit_amount)
    .bind(r.updated_at)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

const LIST_SQL: &str = r#"
    SELECT id, restaurant_id, table_id, customer_name, email, phone, date, time,
           guest_count, status, deposit_paid, deposit_amount, notes,
           created_at, updated_at
    FROM reservations
    WHERE ($1::text IS NULL OR restaurant_id = $1)
      AND ($2::date IS NULL OR date >= $2)
      AND ($3::date IS NULL OR date <= $3)
      AND ($4::reservation_status IS NULL OR status = $4)
      AND ($5::text IS NULL OR table_id = $5)
      AND ($6::text IS NULL OR lower(email) = lower($6))
    ORDER BY date, time, created_at
"#;

/// Static SQL; a NULL parameter disables its filter
pub fn list(pool: &PgPool, filter: ReservationFilter) -> BoxStream<'_, StoreResult<Reservation>> {
    sqlx::query_as::<_, Reservation>(LIST_SQL)
        .bind(filter.restaurant_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.status)
        .bind(filter.table_id)
        .bind(filter.email)
        .fetch(pool)
        .map_err(StoreError::from)
        .boxed()
}

pub async fn active_for_table(
    pool: &PgPool,
    table_id: &str,
    date: NaiveDate,
) -> StoreResult<Vec<Reservation>> {
    let rows = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM reservations \
         WHERE table_id = $1 AND date = $2 AND status IN ('pending', 'confirmed') \
         ORDER BY time"
    ))
    .bind(table_id)
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
