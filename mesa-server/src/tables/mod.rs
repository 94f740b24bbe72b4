//! Dining tables: floor-plan CRUD and the status machine
//!
//! Any status may move to any other status. Unknown values are rejected
//! before the table is looked up, so the stored status never changes on a
//! bad request.

use shared::error::{AppError, ErrorCode};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
use shared::util::{new_id, now_millis};

use crate::auth::CurrentUser;
use crate::core::ServiceResult;
use crate::db::{Store, StoreError};

const MAX_TABLE_CAPACITY: i32 = 50;

fn validate_capacity(capacity: i32) -> Result<(), AppError> {
    if !(1..=MAX_TABLE_CAPACITY).contains(&capacity) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("capacity must be between 1 and {MAX_TABLE_CAPACITY}"),
        )
        .with_detail("capacity", capacity));
    }
    Ok(())
}

fn table_not_found(id: &str) -> AppError {
    AppError::new(ErrorCode::TableNotFound).with_detail("id", id)
}

pub struct TableService<'a> {
    store: &'a dyn Store,
}

impl<'a> TableService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: &str) -> ServiceResult<DiningTable> {
        Ok(self
            .store
            .get_table(id)
            .await?
            .ok_or_else(|| table_not_found(id))?)
    }

    /// Tables of an existing restaurant, ordered by number
    pub async fn list(&self, restaurant_id: &str) -> ServiceResult<Vec<DiningTable>> {
        if self.store.get_restaurant(restaurant_id).await?.is_none() {
            return Err(AppError::new(ErrorCode::RestaurantNotFound)
                .with_detail("restaurant_id", restaurant_id)
                .into());
        }
        Ok(self.store.list_tables(restaurant_id).await?)
    }

    pub async fn create(
        &self,
        restaurant_id: &str,
        input: &DiningTableCreate,
        actor: &CurrentUser,
    ) -> ServiceResult<DiningTable> {
        actor.require_restaurant_admin(restaurant_id)?;
        if input.number < 1 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "number must be a positive integer",
            )
            .with_detail("number", input.number)
            .into());
        }
        validate_capacity(input.capacity)?;
        if self.store.get_restaurant(restaurant_id).await?.is_none() {
            return Err(AppError::new(ErrorCode::RestaurantNotFound)
                .with_detail("restaurant_id", restaurant_id)
                .into());
        }

        let table = DiningTable {
            id: new_id(),
            restaurant_id: restaurant_id.to_string(),
            number: input.number,
            capacity: input.capacity,
            status: TableStatus::Available,
            position_x: input.position_x.unwrap_or_default(),
            position_y: input.position_y.unwrap_or_default(),
            updated_at: now_millis(),
        };
        match self.store.insert_table(&table).await {
            Ok(()) => {}
            Err(StoreError::Conflict(_)) => {
                return Err(AppError::with_message(
                    ErrorCode::TableNumberExists,
                    format!("Table number {} already exists in this restaurant", table.number),
                )
                .with_detail("number", table.number)
                .into());
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(table_id = %table.id, restaurant_id, number = table.number, "Table created");
        Ok(table)
    }

    /// Capacity and position; the number is fixed once assigned
    pub async fn update(
        &self,
        id: &str,
        input: &DiningTableUpdate,
        actor: &CurrentUser,
    ) -> ServiceResult<DiningTable> {
        let mut table = self.get(id).await?;
        actor.require_restaurant_admin(&table.restaurant_id)?;

        if let Some(capacity) = input.capacity {
            validate_capacity(capacity)?;
            table.capacity = capacity;
        }
        if let Some(x) = input.position_x {
            table.position_x = x;
        }
        if let Some(y) = input.position_y {
            table.position_y = y;
        }
        table.updated_at = now_millis();

        if !self.store.update_table(&table).await? {
            return Err(table_not_found(id).into());
        }
        Ok(table)
    }

    /// Reservations of the table keep their history with no table attached
    pub async fn delete(&self, id: &str, actor: &CurrentUser) -> ServiceResult<()> {
        let table = self.get(id).await?;
        actor.require_restaurant_admin(&table.restaurant_id)?;
        if !self.store.delete_table(id).await? {
            return Err(table_not_found(id).into());
        }
        tracing::info!(table_id = id, restaurant_id = %table.restaurant_id, "Table deleted");
        Ok(())
    }

    /// Move a table to `status`
    ///
    /// Order of checks: status value (400), table exists (404), actor scope (403).
    pub async fn set_status(
        &self,
        id: &str,
        status: &str,
        actor: &CurrentUser,
    ) -> ServiceResult<DiningTable> {
        let status: TableStatus = status.parse()?;
        let table = self.get(id).await?;
        actor.require_restaurant_staff(&table.restaurant_id)?;

        let updated = self
            .store
            .set_table_status(id, status, now_millis())
            .await?
            .ok_or_else(|| table_not_found(id))?;

        tracing::info!(
            table_id = id,
            from = %table.status,
            to = %updated.status,
            user_id = %actor.id,
            "Table status changed"
        );
        Ok(updated)
    }

    /// Floor of the actor's own restaurant
    pub async fn list_for_staff(&self, actor: &CurrentUser) -> ServiceResult<Vec<DiningTable>> {
        let Some(restaurant_id) = actor.restaurant_id.as_deref() else {
            return Err(AppError::with_message(
                ErrorCode::RestaurantScopeMismatch,
                "Account is not bound to a restaurant",
            )
            .into());
        };
        Ok(self.store.list_tables(restaurant_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use shared::models::{Restaurant, Role};

    fn actor(role: Role, restaurant_id: Option<&str>) -> CurrentUser {
        CurrentUser {
            id: "u1".into(),
            email: "u1@example.com".into(),
            name: "U1".into(),
            role,
            restaurant_id: restaurant_id.map(Into::into),
        }
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for id in ["r1", "r2"] {
            store
                .insert_restaurant(&Restaurant {
                    id: id.into(),
                    name: id.into(),
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
                })
                .await
                .unwrap();
        }
        store
    }

    fn new_table(number: i32) -> DiningTableCreate {
        DiningTableCreate {
            number,
            capacity: 4,
            position_x: Some(10.0),
            position_y: None,
        }
    }

    fn code<T: std::fmt::Debug>(result: ServiceResult<T>) -> ErrorCode {
        AppError::from(result.unwrap_err()).code
    }

    #[tokio::test]
    async fn create_and_duplicate_number() {
        let store = seeded().await;
        let tables = TableService::new(&store);
        let admin = actor(Role::RestaurantAdmin, Some("r1"));

        let t = tables.create("r1", &new_table(1), &admin).await.unwrap();
        assert_eq!(t.status, TableStatus::Available);
        assert_eq!(t.position_x, 10.0);

        assert_eq!(
            code(tables.create("r1", &new_table(1), &admin).await),
            ErrorCode::TableNumberExists
        );
        assert_eq!(
            code(tables.create("r2", &new_table(1), &admin).await),
            ErrorCode::RestaurantScopeMismatch
        );
        let staff = actor(Role::Staff, Some("r1"));
        assert_eq!(
            code(tables.create("r1", &new_table(2), &staff).await),
            ErrorCode::RoleRequired
        );
    }

    #[tokio::test]
    async fn status_changes() {
        let store = seeded().await;
        let tables = TableService::new(&store);
        let admin = actor(Role::Admin, None);
        let t = tables.create("r1", &new_table(1), &admin).await.unwrap();

        let staff = actor(Role::Staff, Some("r1"));
        for status in ["occupied", "maintenance", "reserved", "available"] {
            let updated = tables.set_status(&t.id, status, &staff).await.unwrap();
            assert_eq!(updated.status.as_str(), status);
        }

        let err = AppError::from(tables.set_status(&t.id, "broken", &staff).await.unwrap_err());
        assert_eq!(err.code, ErrorCode::InvalidTableStatus);
        assert!(err.message.contains("available, occupied, reserved, maintenance"));
        assert_eq!(tables.get(&t.id).await.unwrap().status, TableStatus::Available);

        assert_eq!(
            code(tables.set_status("missing", "occupied", &staff).await),
            ErrorCode::TableNotFound
        );
        let outsider = actor(Role::Staff, Some("r2"));
        assert_eq!(
            code(tables.set_status(&t.id, "occupied", &outsider).await),
            ErrorCode::RestaurantScopeMismatch
        );
    }

    #[tokio::test]
    async fn update_keeps_number() {
        let store = seeded().await;
        let tables = TableService::new(&store);
        let admin = actor(Role::Admin, None);
        let t = tables.create("r1", &new_table(7), &admin).await.unwrap();

        let input = DiningTableUpdate {
            capacity: Some(6),
            ..Default::default()
        };
        let updated = tables.update(&t.id, &input, &admin).await.unwrap();
        assert_eq!(updated.capacity, 6);
        assert_eq!(updated.number, 7);

        let bad = DiningTableUpdate {
            capacity: Some(0),
            ..Default::default()
        };
        assert_eq!(
            code(tables.update(&t.id, &bad, &admin).await),
            ErrorCode::ValueOutOfRange
        );
    }

    #[tokio::test]
    async fn staff_floor_and_delete() {
        let store = seeded().await;
        let tables = TableService::new(&store);
        let admin = actor(Role::Admin, None);
        let t = tables.create("r1", &new_table(1), &admin).await.unwrap();
        tables.create("r1", &new_table(2), &admin).await.unwrap();

        let staff = actor(Role::Staff, Some("r1"));
        assert_eq!(tables.list_for_staff(&staff).await.unwrap().len(), 2);

        tables.delete(&t.id, &admin).await.unwrap();
        assert_eq!(tables.list("r1").await.unwrap().len(), 1);
        assert_eq!(code(tables.get(&t.id).await), ErrorCode::TableNotFound);
        assert_eq!(code(tables.list("nope").await), ErrorCode::RestaurantNotFound);
    }
}
