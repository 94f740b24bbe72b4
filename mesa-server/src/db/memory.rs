//! In-memory backend
//!
//! Mirrors the constraints of the Postgres schema (unique table numbers,
//! active slot uniqueness, restricting and cascading deletes) so the
//! workflows behave the same on both backends.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::StreamExt;
use futures::stream::BoxStream;
use shared::models::{
    DiningTable, Offer, Reservation, ReservationFilter, Restaurant, Review, Staff, TableStatus,
};
use tokio::sync::RwLock;

use super::{Store, StoreError, StoreResult, UserRecord};

#[derive(Default)]
struct MemoryData {
    restaurants: HashMap<String, Restaurant>,
    tables: HashMap<String, DiningTable>,
    reservations: HashMap<String, Reservation>,
    offers: HashMap<String, Offer>,
    reviews: HashMap<String, Review>,
    users: HashMap<String, UserRecord>,
    staff: HashMap<String, Staff>,
}

impl MemoryData {
    fn require_restaurant(&self, restaurant_id: &str) -> StoreResult<()> {
        if self.restaurants.contains_key(restaurant_id) {
            Ok(())
        } else {
            Err(StoreError::Referenced(format!(
                "restaurant {restaurant_id} does not exist"
            )))
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Average rounded to one decimal, as stored by the Postgres backend
fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let avg = ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64;
    (avg * 10.0).round() / 10.0
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_restaurants(&self) -> StoreResult<Vec<Restaurant>> {
        let data = self.data.read().await;
        let mut rows: Vec<Restaurant> = data.restaurants.values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.created_at.cmp(&b.created_at)));
        Ok(rows)
    }

    async fn get_restaurant(&self, id: &str) -> StoreResult<Option<Restaurant>> {
        Ok(self.data.read().await.restaurants.get(id).cloned())
    }

    async fn insert_restaurant(&self, restaurant: &Restaurant) -> StoreResult<()> {
        let mut data = self.data.write().await;
        if data.restaurants.contains_key(&restaurant.id) {
            return Err(StoreError::Conflict("restaurants_pkey".into()));
        }
        data.restaurants
            .insert(restaurant.id.clone(), restaurant.clone());
        Ok(())
    }

    async fn update_restaurant(&self, restaurant: &Restaurant) -> StoreResult<bool> {
        let mut data = self.data.write().await;
        let Some(existing) = data.restaurants.get_mut(&restaurant.id) else {
            return Ok(false);
        };
        let (rating, review_count) = (existing.rating, existing.review_count);
        *existing = Restaurant {
            rating,
            review_count,
            ..restaurant.clone()
        };
        Ok(true)
    }

    async fn delete_restaurant(&self, id: &str) -> StoreResult<bool> {
        let mut data = self.data.write().await;
        if !data.restaurants.contains_key(id) {
            return Ok(false);
        }
        if data.reservations.values().any(|r| r.restaurant_id == id) {
            return Err(StoreError::Referenced(
                "reservations_restaurant_id_fkey".into(),
            ));
        }
        data.restaurants.remove(id);
        data.tables.retain(|_, t| t.restaurant_id != id);
        data.offers.retain(|_, o| o.restaurant_id != id);
        data.reviews.retain(|_, r| r.restaurant_id != id);
        data.staff.retain(|_, s| s.restaurant_id != id);
        Ok(true)
    }

    async fn list_tables(&self, restaurant_id: &str) -> StoreResult<Vec<DiningTable>> {
        let data = self.data.read().await;
        let mut rows: Vec<DiningTable> = data
            .tables
            .values()
            .filter(|t| t.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.number);
        Ok(rows)
    }

    async fn get_table(&self, id: &str) -> StoreResult<Option<DiningTable>> {
        Ok(self.data.read().await.tables.get(id).cloned())
    }

    async fn insert_table(&self, table: &DiningTable) -> StoreResult<()> {
        let mut data = self.data.write().await;
        data.require_restaurant(&table.restaurant_id)?;
        if data
            .tables
            .values()
            .any(|t| t.restaurant_id == table.restaurant_id && t.number == table.number)
        {
            return Err(StoreError::Conflict(
                "tables_restaurant_id_number_key".into(),
            ));
        }
        data.tables.insert(table.id.clone(), table.clone());
        Ok(())
    }

    async fn update_table(&self, table: &DiningTable) -> StoreResult<bool> {
        let mut data = self.data.write().await;
        let Some(existing) = data.tables.get_mut(&table.id) else {
            return Ok(false);
        };
        existing.capacity = table.capacity;
        existing.position_x = table.position_x;
        existing.position_y = table.position_y;
        existing.updated_at = table.updated_at;
        Ok(true)
    }

    async fn set_table_status(
        &self,
        id: &str,
        status: TableStatus,
        now: i64,
    ) -> StoreResult<Option<DiningTable>> {
        let mut data = self.data.write().await;
        Ok(data.tables.get_mut(id).map(|t| {
            t.status = status;
            t.updated_at = now;
            t.clone()
        }))
    }

    async fn delete_table(&self, id: &str) -> StoreResult<bool> {
        let mut data = self.data.write().await;
        if data.tables.remove(id).is_none() {
            return Ok(false);
        }
        for reservation in data.reservations.values_mut() {
            if reservation.table_id.as_deref() == Some(id) {
                reservation.table_id = None;
            }
        }
        Ok(true)
    }

    async fn insert_reservation(&self, reservation: &Reservation) -> StoreResult<()> {
        let mut data = self.data.write().await;
        data.require_restaurant(&reservation.restaurant_id)?;
        if let Some(table_id) = &reservation.table_id {
            let taken = data.reservations.values().any(|r| {
                r.table_id.as_ref() == Some(table_id)
                    && r.date == reservation.date
                    && r.time == reservation.time
                    && r.status.is_active()
            });
            if taken {
                return Err(StoreError::Conflict("uq_reservations_active_slot".into()));
            }
        }
        data.reservations
            .insert(reservation.id.clone(), reservation.clone());
        Ok(())
    }

    async fn get_reservation(&self, id: &str) -> StoreResult<Option<Reservation>> {
        Ok(self.data.read().await.reservations.get(id).cloned())
    }

    async fn update_reservation(&self, reservation: &Reservation) -> StoreResult<bool> {
        let mut data = self.data.write().await;
        let Some(existing) = data.reservations.get_mut(&reservation.id) else {
            return Ok(false);
        };
        existing.table_id = reservation.table_id.clone();
        existing.status = reservation.status;
        existing.deposit_paid = reservation.deposit_paid;
        existing.deposit_amount = reservation.deposit_amount;
        existing.updated_at = reservation.updated_at;
        Ok(true)
    }

    fn list_reservations(
        &self,
        filter: ReservationFilter,
    ) -> BoxStream<'_, StoreResult<Reservation>> {
        futures::stream::once(async move {
            let data = self.data.read().await;
            let mut rows: Vec<Reservation> = data
                .reservations
                .values()
                .filter(|r| filter.matches(r))
                .cloned()
                .collect();
            rows.sort_by(|a, b| {
                (a.date, a.time, a.created_at).cmp(&(b.date, b.time, b.created_at))
            });
            futures::stream::iter(rows.into_iter().map(Ok))
        })
        .flatten()
        .boxed()
    }

    async fn active_reservations_for_table(
        &self,
        table_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Vec<Reservation>> {
        let data = self.data.read().await;
        let mut rows: Vec<Reservation> = data
            .reservations
            .values()
            .filter(|r| {
                r.table_id.as_deref() == Some(table_id) && r.date == date && r.status.is_active()
            })
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.time);
        Ok(rows)
    }

    async fn list_offers(
        &self,
        restaurant_id: Option<&str>,
        active_on: NaiveDate,
    ) -> StoreResult<Vec<Offer>> {
        let data = self.data.read().await;
        let mut rows: Vec<Offer> = data
            .offers
            .values()
            .filter(|o| o.is_active_on(active_on))
            .filter(|o| restaurant_id.is_none_or(|id| o.restaurant_id == id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get_offer(&self, id: &str) -> StoreResult<Option<Offer>> {
        Ok(self.data.read().await.offers.get(id).cloned())
    }

    async fn insert_offer(&self, offer: &Offer) -> StoreResult<()> {
        let mut data = self.data.write().await;
        data.require_restaurant(&offer.restaurant_id)?;
        data.offers.insert(offer.id.clone(), offer.clone());
        Ok(())
    }

    async fn delete_offer(&self, id: &str) -> StoreResult<bool> {
        Ok(self.data.write().await.offers.remove(id).is_some())
    }

    async fn list_reviews(&self, restaurant_id: &str) -> StoreResult<Vec<Review>> {
        let data = self.data.read().await;
        let mut rows: Vec<Review> = data
            .reviews
            .values()
            .filter(|r| r.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn add_review(&self, review: &Review) -> StoreResult<Option<Restaurant>> {
        let mut data = self.data.write().await;
        data.require_restaurant(&review.restaurant_id)?;
        data.reviews.insert(review.id.clone(), review.clone());

        let ratings: Vec<i32> = data
            .reviews
            .values()
            .filter(|r| r.restaurant_id == review.restaurant_id)
            .map(|r| r.rating)
            .collect();
        let rating = average_rating(&ratings);
        let count = ratings.len() as i32;

        Ok(data.restaurants.get_mut(&review.restaurant_id).map(|r| {
            r.rating = rating;
            r.review_count = count;
            r.clone()
        }))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let data = self.data.read().await;
        Ok(data
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.data.read().await.users.get(id).cloned())
    }

    async fn insert_user(&self, user: &UserRecord) -> StoreResult<()> {
        let mut data = self.data.write().await;
        if data
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StoreError::Conflict("users_email_key".into()));
        }
        data.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn insert_staff(&self, staff: &Staff) -> StoreResult<()> {
        let mut data = self.data.write().await;
        data.require_restaurant(&staff.restaurant_id)?;
        if data.staff.contains_key(&staff.user_id) {
            return Err(StoreError::Conflict("staff_pkey".into()));
        }
        data.staff.insert(staff.user_id.clone(), staff.clone());
        Ok(())
    }

    async fn get_staff(&self, user_id: &str) -> StoreResult<Option<Staff>> {
        Ok(self.data.read().await.staff.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use futures::TryStreamExt;
    use shared::models::ReservationStatus;

    fn restaurant(id: &str) -> Restaurant {
        Restaurant {
            id: id.into(),
            name: format!("Restaurant {id}"),
            description: None,
            address: None,
            phone: None,
            cuisine: None,
            image_url: None,
            open_time: None,
            close_time: None,
            rating: 0.0,
            review_count: 0,
            created_at: 0,
        }
    }

    fn table(id: &str, restaurant_id: &str, number: i32) -> DiningTable {
        DiningTable {
            id: id.into(),
            restaurant_id: restaurant_id.into(),
            number,
            capacity: 4,
            status: TableStatus::Available,
            position_x: 0.0,
            position_y: 0.0,
            updated_at: 0,
        }
    }

    fn reservation(id: &str, table_id: Option<&str>, day: u32, time: &str) -> Reservation {
        Reservation {
            id: id.into(),
            restaurant_id: "r1".into(),
            table_id: table_id.map(Into::into),
            customer_name: "Ana".into(),
            email: "Ana@Example.com".into(),
            phone: "600000000".into(),
            date: NaiveDate::from_ymd_opt(2030, 5, day).unwrap(),
            time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            guest_count: 2,
            status: ReservationStatus::Pending,
            deposit_paid: false,
            deposit_amount: None,
            notes: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn review(id: &str, rating: i32, at: i64) -> Review {
        Review {
            id: id.into(),
            restaurant_id: "r1".into(),
            rating,
            comment: String::new(),
            customer_name: "Ana".into(),
            user_id: None,
            created_at: at,
        }
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_restaurant(&restaurant("r1")).await.unwrap();
        store.insert_table(&table("t1", "r1", 1)).await.unwrap();
        store
    }

    #[tokio::test]
    async fn duplicate_table_number_conflicts() {
        let store = seeded().await;
        let err = store.insert_table(&table("t2", "r1", 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn active_slot_is_unique_until_cancelled() {
        let store = seeded().await;
        let mut first = reservation("a", Some("t1"), 1, "20:00");
        store.insert_reservation(&first).await.unwrap();

        let err = store
            .insert_reservation(&reservation("b", Some("t1"), 1, "20:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        first.status = ReservationStatus::Cancelled;
        assert!(store.update_reservation(&first).await.unwrap());
        store
            .insert_reservation(&reservation("b", Some("t1"), 1, "20:00"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn listing_is_filtered_and_ordered() {
        let store = seeded().await;
        store
            .insert_reservation(&reservation("late", None, 2, "21:00"))
            .await
            .unwrap();
        store
            .insert_reservation(&reservation("early", None, 2, "13:00"))
            .await
            .unwrap();
        store
            .insert_reservation(&reservation("first", None, 1, "22:00"))
            .await
            .unwrap();

        let all: Vec<Reservation> = store
            .list_reservations(ReservationFilter::default())
            .try_collect()
            .await
            .unwrap();
        let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["first", "early", "late"]);

        let filter = ReservationFilter {
            from: NaiveDate::from_ymd_opt(2030, 5, 2),
            email: Some("ana@example.com".into()),
            ..Default::default()
        };
        let day_two: Vec<Reservation> = store.list_reservations(filter).try_collect().await.unwrap();
        assert_eq!(day_two.len(), 2);
    }

    #[tokio::test]
    async fn restaurant_with_reservations_cannot_be_deleted() {
        let store = seeded().await;
        store
            .insert_reservation(&reservation("a", Some("t1"), 1, "20:00"))
            .await
            .unwrap();
        let err = store.delete_restaurant("r1").await.unwrap_err();
        assert!(matches!(err, StoreError::Referenced(_)));
    }

    #[tokio::test]
    async fn deleting_a_table_detaches_reservations() {
        let store = seeded().await;
        store
            .insert_reservation(&reservation("a", Some("t1"), 1, "20:00"))
            .await
            .unwrap();
        assert!(store.delete_table("t1").await.unwrap());
        let r = store.get_reservation("a").await.unwrap().unwrap();
        assert_eq!(r.table_id, None);
    }

    #[tokio::test]
    async fn reviews_update_the_aggregate() {
        let store = seeded().await;
        store.add_review(&review("v1", 5, 1)).await.unwrap();
        let updated = store.add_review(&review("v2", 4, 2)).await.unwrap().unwrap();
        assert_eq!(updated.review_count, 2);
        assert!((updated.rating - 4.5).abs() < f64::EPSILON);

        let listed = store.list_reviews("r1").await.unwrap();
        assert_eq!(listed[0].id, "v2");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reviews_are_all_counted() {
        let store = std::sync::Arc::new(seeded().await);
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .add_review(&review(&format!("v{i}"), 1 + i % 5, i64::from(i)))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let restaurant = store.get_restaurant("r1").await.unwrap().unwrap();
        assert_eq!(restaurant.review_count, 10);
        assert!((restaurant.rating - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rating_is_rounded_to_one_decimal() {
        assert_eq!(average_rating(&[]), 0.0);
        assert_eq!(average_rating(&[5, 4, 4]), 4.3);
    }
}
