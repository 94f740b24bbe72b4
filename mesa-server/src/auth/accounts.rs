//! Account flows: customer registration, password login, staff creation,
//! admin bootstrap

use shared::error::{AppError, ErrorCode};
use shared::models::{RegisterRequest, Role, Staff, StaffCreate, User};
use shared::util::{new_id, now_millis};

use crate::auth::password::{MIN_PASSWORD_LEN, hash_password, verify_password};
use crate::core::ServiceResult;
use crate::db::{Store, StoreError, UserRecord};
use crate::security_log;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_required_text,
};

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::with_message(
            ErrorCode::PasswordTooShort,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    validate_required_text(password, "password", MAX_PASSWORD_LEN)
}

async fn create_user(
    store: &dyn Store,
    email: &str,
    password: &str,
    name: &str,
    role: Role,
) -> ServiceResult<UserRecord> {
    let password_hash = hash_password(password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
    let record = UserRecord {
        id: new_id(),
        email: email.trim().to_lowercase(),
        name: name.trim().to_string(),
        password_hash,
        role,
        created_at: now_millis(),
    };
    match store.insert_user(&record).await {
        Ok(()) => Ok(record),
        Err(StoreError::Conflict(_)) => Err(AppError::new(ErrorCode::EmailExists)
            .with_detail("email", record.email)
            .into()),
        Err(e) => Err(e.into()),
    }
}

/// Public view of a stored user, including the staff binding
pub async fn load_user(store: &dyn Store, record: UserRecord) -> ServiceResult<User> {
    let restaurant_id = if record.role.is_restaurant_bound() {
        store
            .get_staff(&record.id)
            .await?
            .map(|s| s.restaurant_id)
    } else {
        None
    };
    Ok(record.into_user(restaurant_id))
}

/// Self-service sign-up; always the customer role
pub async fn register(store: &dyn Store, req: &RegisterRequest) -> ServiceResult<User> {
    validate_email(&req.email, "email")?;
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_password(&req.password)?;

    let record = create_user(store, &req.email, &req.password, &req.name, Role::Customer).await?;
    tracing::info!(user_id = %record.id, "Customer registered");
    Ok(record.into_user(None))
}

/// Verify credentials; unknown email and wrong password fail alike
pub async fn login(store: &dyn Store, email: &str, password: &str) -> ServiceResult<User> {
    let record = store.find_user_by_email(email.trim()).await?;
    let Some(record) = record.filter(|r| verify_password(password, &r.password_hash)) else {
        security_log!("WARN", "login_failed", email = email.trim());
        return Err(AppError::invalid_credentials().into());
    };
    security_log!("INFO", "login_success", user_id = record.id.as_str());
    load_user(store, record).await
}

/// Create a staff or restaurant-admin account bound to a restaurant
pub async fn create_staff(store: &dyn Store, req: &StaffCreate) -> ServiceResult<User> {
    if !req.role.is_restaurant_bound() {
        return Err(AppError::validation(format!(
            "Role '{}' cannot be bound to a restaurant",
            req.role
        ))
        .into());
    }
    validate_email(&req.email, "email")?;
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&req.position, "position", MAX_SHORT_TEXT_LEN)?;
    validate_password(&req.password)?;

    if store.get_restaurant(&req.restaurant_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::RestaurantNotFound)
            .with_detail("restaurant_id", req.restaurant_id.as_str())
            .into());
    }

    let record = create_user(store, &req.email, &req.password, &req.name, req.role).await?;
    let staff = Staff {
        user_id: record.id.clone(),
        restaurant_id: req.restaurant_id.clone(),
        position: req.position.clone(),
        created_at: record.created_at,
    };
    store.insert_staff(&staff).await?;

    tracing::info!(
        user_id = %record.id,
        restaurant_id = %staff.restaurant_id,
        role = %record.role,
        "Staff account created"
    );
    Ok(record.into_user(Some(staff.restaurant_id)))
}

/// Create the configured admin account unless the email already exists
pub async fn ensure_admin(store: &dyn Store, email: &str, password: &str) -> ServiceResult<()> {
    if let Some(existing) = store.find_user_by_email(email).await? {
        if existing.role != Role::Admin {
            tracing::warn!(email, role = %existing.role, "Bootstrap admin email belongs to a non-admin account");
        }
        return Ok(());
    }
    validate_email(email, "ADMIN_EMAIL")?;
    validate_password(password)?;
    let record = create_user(store, email, password, "Administrator", Role::Admin).await?;
    tracing::info!(user_id = %record.id, "Bootstrap admin account created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use shared::models::Restaurant;

    fn register_req(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: "s3cret-pass".into(),
            name: "Ana".into(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let store = MemoryStore::new();
        let user = register(&store, &register_req("Ana@Example.com")).await.unwrap();
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.email, "ana@example.com");

        let logged_in = login(&store, "ana@example.com", "s3cret-pass").await.unwrap();
        assert_eq!(logged_in.id, user.id);

        let err: AppError = login(&store, "ana@example.com", "nope").await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        let err: AppError = login(&store, "bob@example.com", "s3cret-pass").await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        register(&store, &register_req("ana@example.com")).await.unwrap();
        let err: AppError = register(&store, &register_req("ANA@example.com"))
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::EmailExists);
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let store = MemoryStore::new();
        let req = RegisterRequest {
            password: "short".into(),
            ..register_req("ana@example.com")
        };
        let err: AppError = register(&store, &req).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::PasswordTooShort);
    }

    #[tokio::test]
    async fn staff_is_bound_to_restaurant() {
        let store = MemoryStore::new();
        store
            .insert_restaurant(&Restaurant {
                id: "r1".into(),
                name: "Casa".into(),
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

        let req = StaffCreate {
            email: "waiter@casa.com".into(),
            password: "s3cret-pass".into(),
            name: "Luis".into(),
            role: Role::Staff,
            restaurant_id: "r1".into(),
            position: Some("waiter".into()),
        };
        let user = create_staff(&store, &req).await.unwrap();
        assert_eq!(user.restaurant_id.as_deref(), Some("r1"));

        let logged_in = login(&store, "waiter@casa.com", "s3cret-pass").await.unwrap();
        assert_eq!(logged_in.restaurant_id.as_deref(), Some("r1"));

        let customer = StaffCreate {
            email: "x@casa.com".into(),
            role: Role::Customer,
            ..req
        };
        assert!(create_staff(&store, &customer).await.is_err());
    }

    #[tokio::test]
    async fn admin_bootstrap_is_idempotent() {
        let store = MemoryStore::new();
        ensure_admin(&store, "admin@mesa.com", "admin-password").await.unwrap();
        ensure_admin(&store, "admin@mesa.com", "admin-password").await.unwrap();
        let admin = login(&store, "admin@mesa.com", "admin-password").await.unwrap();
        assert_eq!(admin.role, Role::Admin);
    }
}
