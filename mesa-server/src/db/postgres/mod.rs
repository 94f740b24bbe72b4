//! PostgreSQL backend
//!
//! One submodule per table, each a set of free functions over `&PgPool`.

mod offers;
mod reservations;
mod restaurants;
mod reviews;
mod tables;
mod users;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::BoxStream;
use shared::models::{
    DiningTable, Offer, Reservation, ReservationFilter, Restaurant, Review, Staff, TableStatus,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{Store, StoreResult, UserRecord};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and apply pending migrations
    pub async fn connect(database_url: &str) -> Result<Self, crate::core::ServerError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        tracing::info!("Connected to PostgreSQL");

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_restaurants(&self) -> StoreResult<Vec<Restaurant>> {
        restaurants::list(&self.pool).await
    }

    async fn get_restaurant(&self, id: &str) -> StoreResult<Option<Restaurant>> {
        restaurants::get(&self.pool, id).await
    }

    async fn insert_restaurant(&self, restaurant: &Restaurant) -> StoreResult<()> {
        restaurants::insert(&self.pool, restaurant).await
    }

    async fn update_restaurant(&self, restaurant: &Restaurant) -> StoreResult<bool> {
        restaurants::update(&self.pool, restaurant).await
    }

    async fn delete_restaurant(&self, id: &str) -> StoreResult<bool> {
        restaurants::delete(&self.pool, id).await
    }

    async fn list_tables(&self, restaurant_id: &str) -> StoreResult<Vec<DiningTable>> {
        tables::list(&self.pool, restaurant_id).await
    }

    async fn get_table(&self, id: &str) -> StoreResult<Option<DiningTable>> {
        tables::get(&self.pool, id).await
    }

    async fn insert_table(&self, table: &DiningTable) -> StoreResult<()> {
        tables::insert(&self.pool, table).await
    }

    async fn update_table(&self, table: &DiningTable) -> StoreResult<bool> {
        tables::update(&self.pool, table).await
    }

    async fn set_table_status(
        &self,
        id: &str,
        status: TableStatus,
        now: i64,
    ) -> StoreResult<Option<DiningTable>> {
        tables::set_status(&self.pool, id, status, now).await
    }

    async fn delete_table(&self, id: &str) -> StoreResult<bool> {
        tables::delete(&self.pool, id).await
    }

    async fn insert_reservation(&self, reservation: &Reservation) -> StoreResult<()> {
        reservations::insert(&self.pool, reservation).await
    }

    async fn get_reservation(&self, id: &str) -> StoreResult<Option<Reservation>> {
        reservations::get(&self.pool, id).await
    }

    async fn update_reservation(&self, reservation: &Reservation) -> StoreResult<bool> {
        reservations::update(&self.pool, reservation).await
    }

    fn list_reservations(
        &self,
        filter: ReservationFilter,
    ) -> BoxStream<'_, StoreResult<Reservation>> {
        reservations::list(&self.pool, filter)
    }

    async fn active_reservations_for_table(
        &self,
        table_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Vec<Reservation>> {
        reservations::active_for_table(&self.pool, table_id, date).await
    }

    async fn list_offers(
        &self,
        restaurant_id: Option<&str>,
        active_on: NaiveDate,
    ) -> StoreResult<Vec<Offer>> {
        offers::list_active(&self.pool, restaurant_id, active_on).await
    }

    async fn get_offer(&self, id: &str) -> StoreResult<Option<Offer>> {
        offers::get(&self.pool, id).await
    }

    async fn insert_offer(&self, offer: &Offer) -> StoreResult<()> {
        offers::insert(&self.pool, offer).await
    }

    async fn delete_offer(&self, id: &str) -> StoreResult<bool> {
        offers::delete(&self.pool, id).await
    }

    async fn list_reviews(&self, restaurant_id: &str) -> StoreResult<Vec<Review>> {
        reviews::list(&self.pool, restaurant_id).await
    }

    async fn add_review(&self, review: &Review) -> StoreResult<Option<Restaurant>> {
        reviews::insert_and_rate(&self.pool, review).await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        users::find_by_email(&self.pool, email).await
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<UserRecord>> {
        users::get(&self.pool, id).await
    }

    async fn insert_user(&self, user: &UserRecord) -> StoreResult<()> {
        users::insert(&self.pool, user).await
    }

    async fn insert_staff(&self, staff: &Staff) -> StoreResult<()> {
        users::insert_staff(&self.pool, staff).await
    }

    async fn get_staff(&self, user_id: &str) -> StoreResult<Option<Staff>> {
        users::get_staff(&self.pool, user_id).await
    }
}
