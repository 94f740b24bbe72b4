//! Reservation workflow
//!
//! Booking validation, the status lifecycle with its table side effects,
//! deposits and scoped listing. Authorization rules live in [`policy`].

pub mod policy;

use chrono::{NaiveDateTime, NaiveTime};
use futures::stream::BoxStream;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    DiningTable, MAX_GUEST_COUNT, Reservation, ReservationCreate, ReservationFilter,
    ReservationStatus, Restaurant, TableStatus,
};
use shared::util::{new_id, now_millis};

use crate::auth::CurrentUser;
use crate::core::{ServiceError, ServiceResult};
use crate::db::{Store, StoreError, StoreResult};
use crate::utils::time::{parse_date, parse_time};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_required_text,
};

pub struct ReservationWorkflow<'a> {
    store: &'a dyn Store,
    /// How long a booking holds its table
    slot_minutes: i64,
}

impl<'a> ReservationWorkflow<'a> {
    pub fn new(store: &'a dyn Store, slot_minutes: i64) -> Self {
        Self {
            store,
            slot_minutes,
        }
    }

    async fn load(&self, id: &str) -> ServiceResult<Reservation> {
        self.store.get_reservation(id).await?.ok_or_else(|| {
            AppError::new(ErrorCode::ReservationNotFound)
                .with_detail("id", id)
                .into()
        })
    }

    /// Book a slot; the result is `pending` with no deposit
    ///
    /// `now` is the local wall clock the slot is compared against.
    pub async fn create(
        &self,
        input: &ReservationCreate,
        now: NaiveDateTime,
    ) -> ServiceResult<Reservation> {
        validate_required_text(&input.customer_name, "customer_name", MAX_NAME_LEN)?;
        validate_email(&input.email, "email")?;
        validate_required_text(&input.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&input.notes, "notes", MAX_NOTE_LEN)?;

        if !(1..=MAX_GUEST_COUNT).contains(&input.guest_count) {
            return Err(AppError::with_message(
                ErrorCode::InvalidGuestCount,
                format!("Guest count must be between 1 and {MAX_GUEST_COUNT}"),
            )
            .with_detail("guest_count", input.guest_count)
            .into());
        }

        let date = parse_date(&input.date)?;
        let time = parse_time(&input.time)?;
        if date.and_time(time) < now {
            return Err(AppError::new(ErrorCode::SlotInPast)
                .with_detail("date", date.to_string())
                .with_detail("time", input.time.as_str())
                .into());
        }

        let restaurant = self
            .store
            .get_restaurant(&input.restaurant_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::RestaurantNotFound)
                    .with_detail("restaurant_id", input.restaurant_id.as_str())
            })?;
        check_opening_hours(&restaurant, time)?;

        let table_id = input.table_id.as_deref().filter(|t| !t.is_empty());
        if let Some(table_id) = table_id {
            let table = self.bookable_table(&restaurant, table_id, input.guest_count).await?;
            self.check_slot_free(&table, date, time).await?;
        }

        let now_ms = now_millis();
        let reservation = Reservation {
            id: new_id(),
            restaurant_id: restaurant.id,
            table_id: table_id.map(str::to_string),
            customer_name: input.customer_name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            date,
            time,
            guest_count: input.guest_count,
            status: ReservationStatus::Pending,
            deposit_paid: false,
            deposit_amount: None,
            notes: input.notes.clone(),
            created_at: now_ms,
            updated_at: now_ms,
        };

        match self.store.insert_reservation(&reservation).await {
            Ok(()) => {}
            Err(StoreError::Conflict(_)) => return Err(slot_taken(&reservation).into()),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            reservation_id = %reservation.id,
            restaurant_id = %reservation.restaurant_id,
            date = %reservation.date,
            guests = reservation.guest_count,
            "Reservation created"
        );
        Ok(reservation)
    }

    async fn bookable_table(
        &self,
        restaurant: &Restaurant,
        table_id: &str,
        guests: i32,
    ) -> ServiceResult<DiningTable> {
        let table = self
            .store
            .get_table(table_id)
            .await?
            .filter(|t| t.restaurant_id == restaurant.id)
            .ok_or_else(|| {
                AppError::new(ErrorCode::TableNotFound).with_detail("table_id", table_id)
            })?;

        if table.status == TableStatus::Maintenance {
            return Err(AppError::new(ErrorCode::TableUnderMaintenance)
                .with_detail("table_id", table_id)
                .into());
        }
        if guests > table.capacity {
            return Err(AppError::with_message(
                ErrorCode::GuestsExceedCapacity,
                format!(
                    "Table {} seats {} guests, {} requested",
                    table.number, table.capacity, guests
                ),
            )
            .with_detail("capacity", table.capacity)
            .into());
        }
        Ok(table)
    }

    async fn check_slot_free(
        &self,
        table: &DiningTable,
        date: chrono::NaiveDate,
        time: NaiveTime,
    ) -> ServiceResult<()> {
        // Slots near midnight overlap bookings on the neighbouring days
        let requested = date.and_time(time);
        for day in [date.pred_opt(), Some(date), date.succ_opt()]
            .into_iter()
            .flatten()
        {
            let existing = self
                .store
                .active_reservations_for_table(&table.id, day)
                .await?;
            if let Some(clash) = existing.iter().find(|r| {
                (r.date.and_time(r.time) - requested).num_minutes().abs() < self.slot_minutes
            }) {
                return Err(slot_taken(clash).into());
            }
        }
        Ok(())
    }

    /// Visible to the actor, else 403
    pub async fn get(&self, id: &str, actor: &CurrentUser) -> ServiceResult<Reservation> {
        let reservation = self.load(id).await?;
        policy::authorize_view(actor, &reservation)?;
        Ok(reservation)
    }

    /// Apply a lifecycle move
    ///
    /// Confirming a booked table marks it `reserved` when it is
    /// `available`; completing or cancelling frees a `reserved` table.
    pub async fn update_status(
        &self,
        id: &str,
        status: &str,
        actor: &CurrentUser,
    ) -> ServiceResult<Reservation> {
        let next: ReservationStatus = status.parse()?;
        let mut reservation = self.load(id).await?;

        policy::authorize_status_change(actor, &reservation, next)?;
        let previous = reservation.status;
        reservation.status = previous.transition(next)?;
        reservation.updated_at = now_millis();

        if !self.store.update_reservation(&reservation).await? {
            return Err(AppError::new(ErrorCode::ReservationNotFound)
                .with_detail("id", id)
                .into());
        }

        tracing::info!(
            reservation_id = %reservation.id,
            from = %previous,
            to = %next,
            user_id = %actor.id,
            "Reservation status changed"
        );

        if let Some(table_id) = &reservation.table_id
            && let Err(e) = self.sync_table(table_id, next, reservation.updated_at).await
        {
            tracing::warn!(table_id = %table_id, error = %e, "Failed to update table status");
        }

        Ok(reservation)
    }

    async fn sync_table(&self, table_id: &str, next: ReservationStatus, now: i64) -> StoreResult<()> {
        let Some(table) = self.store.get_table(table_id).await? else {
            return Ok(());
        };
        let target = match (next, table.status) {
            (ReservationStatus::Confirmed, TableStatus::Available) => TableStatus::Reserved,
            (ReservationStatus::Completed | ReservationStatus::Cancelled, TableStatus::Reserved) => {
                TableStatus::Available
            }
            _ => return Ok(()),
        };
        self.store.set_table_status(table_id, target, now).await?;
        tracing::debug!(table_id, status = %target, "Table status follows reservation");
        Ok(())
    }

    /// Mark the deposit as paid
    pub async fn record_deposit(
        &self,
        id: &str,
        amount: Decimal,
        actor: &CurrentUser,
    ) -> ServiceResult<Reservation> {
        if amount <= Decimal::ZERO {
            return Err(AppError::new(ErrorCode::InvalidDepositAmount)
                .with_detail("amount", amount.to_string())
                .into());
        }

        let mut reservation = self.load(id).await?;
        policy::authorize_deposit(actor, &reservation)?;

        if !reservation.status.is_active() {
            return Err(AppError::with_message(
                ErrorCode::DepositNotAllowed,
                format!(
                    "Cannot record a deposit on a {} reservation",
                    reservation.status
                ),
            )
            .with_detail("status", reservation.status.as_str())
            .into());
        }

        reservation.deposit_paid = true;
        reservation.deposit_amount = Some(amount);
        reservation.updated_at = now_millis();
        if !self.store.update_reservation(&reservation).await? {
            return Err(AppError::new(ErrorCode::ReservationNotFound)
                .with_detail("id", id)
                .into());
        }

        tracing::info!(
            reservation_id = %reservation.id,
            amount = %amount,
            user_id = %actor.id,
            "Deposit recorded"
        );
        Ok(reservation)
    }

    /// Lazy listing narrowed to what the actor may see
    pub fn list(
        &self,
        filter: ReservationFilter,
        actor: &CurrentUser,
    ) -> Result<BoxStream<'a, StoreResult<Reservation>>, ServiceError> {
        let filter = policy::scope_filter(actor, filter)?;
        Ok(self.store.list_reservations(filter))
    }
}

fn check_opening_hours(restaurant: &Restaurant, time: NaiveTime) -> Result<(), AppError> {
    if restaurant.accepts_time(time) {
        return Ok(());
    }
    let hours = |t: Option<NaiveTime>| t.map(|t| t.format("%H:%M").to_string()).unwrap_or_default();
    Err(AppError::with_message(
        ErrorCode::OutsideOpeningHours,
        format!(
            "{} accepts reservations between {} and {}",
            restaurant.name,
            hours(restaurant.open_time),
            hours(restaurant.close_time)
        ),
    )
    .with_detail("open_time", hours(restaurant.open_time))
    .with_detail("close_time", hours(restaurant.close_time)))
}

fn slot_taken(clash: &Reservation) -> AppError {
    AppError::new(ErrorCode::TableSlotTaken)
        .with_detail("date", clash.date.to_string())
        .with_detail("time", clash.time.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use chrono::NaiveDate;
    use futures::TryStreamExt;
    use shared::models::Role;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn actor(role: Role, restaurant_id: Option<&str>, email: &str) -> CurrentUser {
        CurrentUser {
            id: format!("{email}-id"),
            email: email.into(),
            name: "Test".into(),
            role,
            restaurant_id: restaurant_id.map(Into::into),
        }
    }

    fn staff() -> CurrentUser {
        actor(Role::Staff, Some("r1"), "waiter@r1.com")
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        let t = |s: &str| NaiveTime::parse_from_str(s, "%H:%M").ok();
        store
            .insert_restaurant(&Restaurant {
                id: "r1".into(),
                name: "Casa Pepe".into(),
                description: None,
                address: None,
                phone: None,
                cuisine: None,
                image_url: None,
                open_time: t("12:00"),
                close_time: t("23:30"),
                rating: 0.0,
                review_count: 0,
                created_at: 0,
            })
            .await
            .unwrap();
        for (id, number, capacity, status) in [
            ("t1", 1, 4, TableStatus::Available),
            ("t2", 2, 2, TableStatus::Maintenance),
        ] {
            store
                .insert_table(&DiningTable {
                    id: id.into(),
                    restaurant_id: "r1".into(),
                    number,
                    capacity,
                    status,
                    position_x: 0.0,
                    position_y: 0.0,
                    updated_at: 0,
                })
                .await
                .unwrap();
        }
        store
    }

    fn booking(table_id: Option<&str>, date: &str, time: &str, guests: i32) -> ReservationCreate {
        ReservationCreate {
            restaurant_id: "r1".into(),
            table_id: table_id.map(Into::into),
            customer_name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: "600123123".into(),
            date: date.into(),
            time: time.into(),
            guest_count: guests,
            notes: None,
        }
    }

    async fn create_err(store: &MemoryStore, input: ReservationCreate) -> ErrorCode {
        let err = ReservationWorkflow::new(store, 120)
            .create(&input, now())
            .await
            .unwrap_err();
        AppError::from(err).code
    }

    #[tokio::test]
    async fn creates_pending_reservation() {
        let store = seeded().await;
        let r = ReservationWorkflow::new(&store, 120)
            .create(&booking(Some("t1"), "2030-06-02", "20:00", 4), now())
            .await
            .unwrap();
        assert_eq!(r.status, ReservationStatus::Pending);
        assert!(!r.deposit_paid);
        assert_eq!(r.deposit_amount, None);
    }

    #[tokio::test]
    async fn rejects_invalid_bookings() {
        let store = seeded().await;
        let cases = [
            (booking(None, "2030-06-02", "20:00", 0), ErrorCode::InvalidGuestCount),
            (booking(None, "2030-06-02", "20:00", 51), ErrorCode::InvalidGuestCount),
            (booking(None, "02/06/2030", "20:00", 2), ErrorCode::ValidationFailed),
            (booking(None, "2030-06-02", "8pm", 2), ErrorCode::ValidationFailed),
            (booking(None, "2030-05-31", "20:00", 2), ErrorCode::SlotInPast),
            (booking(None, "2030-06-01", "11:00", 2), ErrorCode::SlotInPast),
            (booking(None, "2030-06-02", "09:00", 2), ErrorCode::OutsideOpeningHours),
            (booking(Some("nope"), "2030-06-02", "20:00", 2), ErrorCode::TableNotFound),
            (booking(Some("t2"), "2030-06-02", "20:00", 2), ErrorCode::TableUnderMaintenance),
            (booking(Some("t1"), "2030-06-02", "20:00", 5), ErrorCode::GuestsExceedCapacity),
        ];
        for (input, expected) in cases {
            assert_eq!(create_err(&store, input).await, expected);
        }

        let mut unknown = booking(None, "2030-06-02", "20:00", 2);
        unknown.restaurant_id = "missing".into();
        assert_eq!(create_err(&store, unknown).await, ErrorCode::RestaurantNotFound);

        let mut bad_email = booking(None, "2030-06-02", "20:00", 2);
        bad_email.email = "ana".into();
        assert_eq!(create_err(&store, bad_email).await, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn overlapping_booking_of_same_table_conflicts() {
        let store = seeded().await;
        let workflow = ReservationWorkflow::new(&store, 120);
        workflow
            .create(&booking(Some("t1"), "2030-06-02", "20:00", 2), now())
            .await
            .unwrap();

        assert_eq!(
            create_err(&store, booking(Some("t1"), "2030-06-02", "21:00", 2)).await,
            ErrorCode::TableSlotTaken
        );
        // Outside the window, and on another day
        workflow
            .create(&booking(Some("t1"), "2030-06-02", "22:00", 2), now())
            .await
            .unwrap();
        workflow
            .create(&booking(Some("t1"), "2030-06-03", "20:00", 2), now())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn overlapping_booking_across_midnight_conflicts() {
        let store = seeded().await;
        let mut late = store.get_restaurant("r1").await.unwrap().unwrap();
        late.open_time = NaiveTime::from_hms_opt(18, 0, 0);
        late.close_time = NaiveTime::from_hms_opt(2, 0, 0);
        assert!(store.update_restaurant(&late).await.unwrap());

        let workflow = ReservationWorkflow::new(&store, 120);
        workflow
            .create(&booking(Some("t1"), "2030-06-02", "23:30", 2), now())
            .await
            .unwrap();

        assert_eq!(
            create_err(&store, booking(Some("t1"), "2030-06-03", "00:30", 2)).await,
            ErrorCode::TableSlotTaken
        );
        workflow
            .create(&booking(Some("t1"), "2030-06-03", "01:30", 2), now())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn lifecycle_moves_the_table() {
        let store = seeded().await;
        let workflow = ReservationWorkflow::new(&store, 120);
        let r = workflow
            .create(&booking(Some("t1"), "2030-06-02", "20:00", 2), now())
            .await
            .unwrap();

        let confirmed = workflow.update_status(&r.id, "confirmed", &staff()).await.unwrap();
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);
        assert_eq!(
            store.get_table("t1").await.unwrap().unwrap().status,
            TableStatus::Reserved
        );

        workflow.update_status(&r.id, "completed", &staff()).await.unwrap();
        assert_eq!(
            store.get_table("t1").await.unwrap().unwrap().status,
            TableStatus::Available
        );

        let err: AppError = workflow
            .update_status(&r.id, "cancelled", &staff())
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
    }

    #[tokio::test]
    async fn unknown_status_and_missing_reservation() {
        let store = seeded().await;
        let workflow = ReservationWorkflow::new(&store, 120);
        let err: AppError = workflow
            .update_status("missing", "done", &staff())
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::InvalidReservationStatus);

        let err: AppError = workflow
            .update_status("missing", "confirmed", &staff())
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);
    }

    #[tokio::test]
    async fn deposits() {
        let store = seeded().await;
        let workflow = ReservationWorkflow::new(&store, 120);
        let r = workflow
            .create(&booking(None, "2030-06-02", "20:00", 2), now())
            .await
            .unwrap();

        let err: AppError = workflow
            .record_deposit(&r.id, Decimal::ZERO, &staff())
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::InvalidDepositAmount);

        let paid = workflow
            .record_deposit(&r.id, Decimal::new(2500, 2), &staff())
            .await
            .unwrap();
        assert!(paid.deposit_paid);
        assert_eq!(paid.deposit_amount, Some(Decimal::new(2500, 2)));

        workflow.update_status(&r.id, "cancelled", &staff()).await.unwrap();
        let err: AppError = workflow
            .record_deposit(&r.id, Decimal::ONE, &staff())
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::DepositNotAllowed);
    }

    #[tokio::test]
    async fn listing_is_scoped() {
        let store = seeded().await;
        let workflow = ReservationWorkflow::new(&store, 120);
        workflow
            .create(&booking(None, "2030-06-03", "20:00", 2), now())
            .await
            .unwrap();
        let mut other = booking(None, "2030-06-02", "13:00", 2);
        other.email = "bob@example.com".into();
        workflow.create(&other, now()).await.unwrap();

        let ana = actor(Role::Customer, None, "ana@example.com");
        let mine: Vec<Reservation> = workflow
            .list(ReservationFilter::default(), &ana)
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);

        let all: Vec<Reservation> = workflow
            .list(ReservationFilter::default(), &staff())
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].email, "bob@example.com");
    }
}
