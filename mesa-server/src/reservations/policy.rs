//! Who may do what with a reservation
//!
//! | Role | View / list | Status changes | Deposit |
//! |------|-------------|----------------|---------|
//! | customer | own (email match) | cancel own pending | - |
//! | staff, restaurant_admin | own restaurant | any legal move, own restaurant | own restaurant |
//! | admin | all | any legal move | all |
//!
//! Authorization runs before the transition graph is consulted, so a
//! forbidden actor gets 403 even for an illegal move.

use shared::error::{AppError, ErrorCode};
use shared::models::{Reservation, ReservationFilter, ReservationStatus, Role};

use crate::auth::CurrentUser;
use crate::security_log;

fn owns(actor: &CurrentUser, reservation: &Reservation) -> bool {
    actor.email.eq_ignore_ascii_case(&reservation.email)
}

fn denied(actor: &CurrentUser, reservation: &Reservation, message: &str) -> AppError {
    security_log!(
        "WARN",
        "reservation_access_denied",
        user_id = actor.id.as_str(),
        reservation_id = reservation.id.as_str()
    );
    AppError::with_message(ErrorCode::PermissionDenied, message)
}

pub fn authorize_view(actor: &CurrentUser, reservation: &Reservation) -> Result<(), AppError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Staff | Role::RestaurantAdmin => {
            actor.require_restaurant_scope(&reservation.restaurant_id)
        }
        Role::Customer if owns(actor, reservation) => Ok(()),
        Role::Customer => Err(denied(actor, reservation, "Not your reservation")),
    }
}

pub fn authorize_status_change(
    actor: &CurrentUser,
    reservation: &Reservation,
    next: ReservationStatus,
) -> Result<(), AppError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Staff | Role::RestaurantAdmin => {
            actor.require_restaurant_scope(&reservation.restaurant_id)
        }
        Role::Customer => {
            if !owns(actor, reservation) {
                return Err(denied(actor, reservation, "Not your reservation"));
            }
            if next != ReservationStatus::Cancelled {
                return Err(denied(
                    actor,
                    reservation,
                    "Customers may only cancel their reservations",
                ));
            }
            if reservation.status != ReservationStatus::Pending {
                return Err(denied(
                    actor,
                    reservation,
                    "Only pending reservations can be cancelled by the customer",
                ));
            }
            Ok(())
        }
    }
}

pub fn authorize_deposit(actor: &CurrentUser, reservation: &Reservation) -> Result<(), AppError> {
    actor.require_restaurant_staff(&reservation.restaurant_id)
}

/// Narrow a listing request to what the actor may see
///
/// Customers always get their own email; staff are pinned to their
/// restaurant and asking for another one is refused.
pub fn scope_filter(
    actor: &CurrentUser,
    mut filter: ReservationFilter,
) -> Result<ReservationFilter, AppError> {
    match actor.role {
        Role::Admin => {}
        Role::Customer => filter.email = Some(actor.email.clone()),
        Role::Staff | Role::RestaurantAdmin => {
            let Some(own) = actor.restaurant_id.clone() else {
                return Err(AppError::new(ErrorCode::RestaurantScopeMismatch));
            };
            if let Some(requested) = &filter.restaurant_id {
                actor.require_restaurant_scope(requested)?;
            }
            filter.restaurant_id = Some(own);
        }
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn actor(role: Role, restaurant_id: Option<&str>, email: &str) -> CurrentUser {
        CurrentUser {
            id: "u1".into(),
            email: email.into(),
            name: "Test".into(),
            role,
            restaurant_id: restaurant_id.map(Into::into),
        }
    }

    fn reservation(status: ReservationStatus) -> Reservation {
        Reservation {
            id: "res-1".into(),
            restaurant_id: "r1".into(),
            table_id: None,
            customer_name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: "600".into(),
            date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            guest_count: 2,
            status,
            deposit_paid: false,
            deposit_amount: None,
            notes: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn customer_can_only_cancel_own_pending() {
        let ana = actor(Role::Customer, None, "ANA@example.com");
        let pending = reservation(ReservationStatus::Pending);
        assert!(authorize_status_change(&ana, &pending, ReservationStatus::Cancelled).is_ok());

        let err = authorize_status_change(&ana, &pending, ReservationStatus::Confirmed).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        let confirmed = reservation(ReservationStatus::Confirmed);
        assert!(authorize_status_change(&ana, &confirmed, ReservationStatus::Cancelled).is_err());

        let bob = actor(Role::Customer, None, "bob@example.com");
        assert!(authorize_status_change(&bob, &pending, ReservationStatus::Cancelled).is_err());
    }

    #[test]
    fn staff_are_scoped_to_their_restaurant() {
        let pending = reservation(ReservationStatus::Pending);
        let own = actor(Role::Staff, Some("r1"), "w@r1.com");
        let other = actor(Role::Staff, Some("r2"), "w@r2.com");

        assert!(authorize_status_change(&own, &pending, ReservationStatus::Confirmed).is_ok());
        assert_eq!(
            authorize_status_change(&other, &pending, ReservationStatus::Confirmed)
                .unwrap_err()
                .code,
            ErrorCode::RestaurantScopeMismatch
        );
        assert!(authorize_deposit(&own, &pending).is_ok());
        assert!(authorize_deposit(&other, &pending).is_err());
        assert!(authorize_view(&other, &pending).is_err());
    }

    #[test]
    fn customers_cannot_record_deposits() {
        let ana = actor(Role::Customer, None, "ana@example.com");
        let err = authorize_deposit(&ana, &reservation(ReservationStatus::Pending)).unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
    }

    #[test]
    fn listing_scope() {
        let ana = actor(Role::Customer, None, "ana@example.com");
        let scoped = scope_filter(&ana, ReservationFilter::default()).unwrap();
        assert_eq!(scoped.email.as_deref(), Some("ana@example.com"));

        let staff = actor(Role::Staff, Some("r1"), "w@r1.com");
        let scoped = scope_filter(&staff, ReservationFilter::default()).unwrap();
        assert_eq!(scoped.restaurant_id.as_deref(), Some("r1"));

        let other = ReservationFilter {
            restaurant_id: Some("r2".into()),
            ..Default::default()
        };
        assert!(scope_filter(&staff, other).is_err());

        let admin = actor(Role::Admin, None, "admin@mesa.com");
        let scoped = scope_filter(&admin, ReservationFilter::default()).unwrap();
        assert!(scoped.restaurant_id.is_none() && scoped.email.is_none());
    }
}
