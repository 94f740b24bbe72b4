//! Review queries

use shared::models::{Restaurant, Review};
use sqlx::PgPool;

use crate::db::StoreResult;

pub async fn list(pool: &PgPool, restaurant_id: &str) -> StoreResult<Vec<Review>> {
    let rows = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, rating, comment, customer_name, user_id, created_at
        FROM reviews
        WHERE restaurant_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert the review and refresh the restaurant aggregate in one transaction
///
/// The restaurant row is locked first so concurrent reviews of the same
/// restaurant serialize and each aggregate sees every committed review.
pub async fn insert_and_rate(pool: &PgPool, review: &Review) -> StoreResult<Option<Restaurant>> {
    let mut tx = pool.begin().await?;

    let locked: Option<(String,)> =
        sqlx::query_as("SELECT id FROM restaurants WHERE id = $1 FOR UPDATE")
            .bind(&review.restaurant_id)
            .fetch_optional(&mut *tx)
            .await?;
    if locked.is_none() {
        return Ok(None);
    }

    sqlx::query(
        r#"
        INSERT INTO reviews (id, restaurant_id, rating, comment, customer_name, user_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&review.id)
    .bind(&review.restaurant_id)
    .bind(review.rating)
    .bind(&review.comment)
    .bind(&review.customer_name)
    .bind(&review.user_id)
    .bind(review.created_at)
    .execute(&mut *tx)
    .await?;

    let restaurant: Option<Restaurant> = sqlx::query_as(
        r#"
        UPDATE restaurants r SET
            rating = agg.avg_rating,
            review_count = agg.total
        FROM (
            SELECT COALESCE(ROUND(AVG(rating)::numeric, 1), 0)::float8 AS avg_rating,
                   COUNT(*)::int4 AS total
            FROM reviews
            WHERE restaurant_id = $1
        ) agg
        WHERE r.id = $1
        RETURNING r.id, r.name, r.description, r.address, r.phone, r.cuisine, r.image_url,
                  r.open_time, r.close_time, r.rating, r.review_count, r.created_at
        "#,
    )
    .bind(&review.restaurant_id)
    .fetch_optional(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(restaurant)
}
