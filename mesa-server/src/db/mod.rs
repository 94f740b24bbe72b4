//! Persistence layer
//!
//! [`Store`] is the seam between workflows and storage. [`PgStore`] is the
//! production backend; [`MemoryStore`] backs development runs without
//! `DATABASE_URL` and the integration tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::BoxStream;
use shared::models::{
    DiningTable, Offer, Reservation, ReservationFilter, Restaurant, Review, Role, Staff,
    TableStatus, User,
};
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::core::error::BoxError;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint hit
    #[error("{0}")]
    Conflict(String),

    /// Row still referenced by a restricting foreign key
    #[error("{0}")]
    Referenced(String),

    #[error(transparent)]
    Backend(BoxError),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            match db.code().as_deref() {
                Some("23505") => {
                    return StoreError::Conflict(
                        db.constraint().unwrap_or("unique constraint").to_string(),
                    );
                }
                Some("23503") => {
                    return StoreError::Referenced(
                        db.constraint().unwrap_or("foreign key").to_string(),
                    );
                }
                _ => {}
            }
        }
        StoreError::Backend(Box::new(e))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// User row including the password hash; never serialized to clients
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: i64,
}

impl UserRecord {
    /// Public view, with the restaurant binding of staff accounts
    pub fn into_user(self, restaurant_id: Option<String>) -> User {
        User {
            id: self.id,
            email: self.email,
            name: self.name,
            role: self.role,
            restaurant_id,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip used by the detailed health check
    async fn ping(&self) -> StoreResult<()>;

    // ── Restaurants ──

    async fn list_restaurants(&self) -> StoreResult<Vec<Restaurant>>;
    async fn get_restaurant(&self, id: &str) -> StoreResult<Option<Restaurant>>;
    async fn insert_restaurant(&self, restaurant: &Restaurant) -> StoreResult<()>;
    /// `false` when the row does not exist
    async fn update_restaurant(&self, restaurant: &Restaurant) -> StoreResult<bool>;
    /// [`StoreError::Referenced`] while reservations point at the restaurant
    async fn delete_restaurant(&self, id: &str) -> StoreResult<bool>;

    // ── Tables ──

    /// Ordered by table number
    async fn list_tables(&self, restaurant_id: &str) -> StoreResult<Vec<DiningTable>>;
    async fn get_table(&self, id: &str) -> StoreResult<Option<DiningTable>>;
    /// [`StoreError::Conflict`] on a duplicate number within the restaurant
    async fn insert_table(&self, table: &DiningTable) -> StoreResult<()>;
    async fn update_table(&self, table: &DiningTable) -> StoreResult<bool>;
    async fn set_table_status(
        &self,
        id: &str,
        status: TableStatus,
        now: i64,
    ) -> StoreResult<Option<DiningTable>>;
    /// Reservations of the table are detached, not deleted
    async fn delete_table(&self, id: &str) -> StoreResult<bool>;

    // ── Reservations ──

    /// [`StoreError::Conflict`] when the exact slot is already actively booked
    async fn insert_reservation(&self, reservation: &Reservation) -> StoreResult<()>;
    async fn get_reservation(&self, id: &str) -> StoreResult<Option<Reservation>>;
    /// Last writer wins
    async fn update_reservation(&self, reservation: &Reservation) -> StoreResult<bool>;
    /// Single pass over matching rows, ordered by date, time
    fn list_reservations(
        &self,
        filter: ReservationFilter,
    ) -> BoxStream<'_, StoreResult<Reservation>>;
    /// Pending and confirmed reservations of a table on one date
    async fn active_reservations_for_table(
        &self,
        table_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Vec<Reservation>>;

    // ── Offers ──

    /// Offers valid on `active_on`, newest first
    async fn list_offers(
        &self,
        restaurant_id: Option<&str>,
        active_on: NaiveDate,
    ) -> StoreResult<Vec<Offer>>;
    async fn get_offer(&self, id: &str) -> StoreResult<Option<Offer>>;
    async fn insert_offer(&self, offer: &Offer) -> StoreResult<()>;
    async fn delete_offer(&self, id: &str) -> StoreResult<bool>;

    // ── Reviews ──

    /// Newest first
    async fn list_reviews(&self, restaurant_id: &str) -> StoreResult<Vec<Review>>;
    /// Insert and recompute the restaurant's `rating` / `review_count`
    /// atomically. Returns the updated restaurant.
    async fn add_review(&self, review: &Review) -> StoreResult<Option<Restaurant>>;

    // ── Users & staff ──

    /// Case-insensitive lookup
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;
    async fn get_user(&self, id: &str) -> StoreResult<Option<UserRecord>>;
    /// [`StoreError::Conflict`] when the email is taken
    async fn insert_user(&self, user: &UserRecord) -> StoreResult<()>;
    async fn insert_staff(&self, staff: &Staff) -> StoreResult<()>;
    async fn get_staff(&self, user_id: &str) -> StoreResult<Option<Staff>>;
}
