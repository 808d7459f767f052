//! Reservation lifecycle manager
//!
//! Owns the reservation state machine and every write that touches more
//! than the reservation row itself. Each operation runs inside one
//! unit-of-work scope and either commits all of its writes or none.
//!
//! ```text
//! confirmed ──check-in──▶ checked-in ──check-out──▶ checked-out
//!     └──────────── update(status = cancelled) ─────▶ cancelled
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::domain::{
    finish, DomainError, DomainResult, HousekeepingTask, NewReservation, Reservation,
    ReservationChanges, ReservationDetails, ReservationStatus, RoomStatus, Transition,
    UnitOfWork, WorkScope,
};

pub struct ReservationLifecycle {
    uow: Arc<dyn UnitOfWork>,
}

impl ReservationLifecycle {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    /// Book a stay. The reservation starts out confirmed and nothing else changes.
    pub async fn create(&self, new: NewReservation) -> DomainResult<ReservationDetails> {
        let reservation = Reservation::create(new, Utc::now())?;

        let mut scope = self.uow.begin().await?;
        let result = insert_within(scope.as_mut(), reservation).await;
        let details = finish(scope, result).await?;

        info!(
            "Reservation {} created for guest {} in room {}",
            details.reservation.id, details.reservation.guest_id, details.reservation.room_id
        );
        Ok(details)
    }

    pub async fn get(&self, id: &str) -> DomainResult<ReservationDetails> {
        let mut scope = self.uow.begin().await?;
        let result = match scope.reservation(id).await {
            Ok(Some(r)) => load_details(scope.as_mut(), r).await,
            Ok(None) => Err(DomainError::not_found("Reservation", id)),
            Err(e) => Err(e),
        };
        finish(scope, result).await
    }

    /// Confirmed → checked-in. Occupies the room and counts the stay on the guest.
    pub async fn check_in(&self, id: &str) -> DomainResult<ReservationDetails> {
        let mut scope = self.uow.begin().await?;
        let result = check_in_within(scope.as_mut(), id, Utc::now()).await;
        let details = finish(scope, result).await?;

        metrics::counter!("reservation_transitions_total", "transition" => Transition::CheckIn.as_str())
            .increment(1);
        info!(
            "Reservation {} checked in (room {}, guest {})",
            id, details.reservation.room_id, details.reservation.guest_id
        );
        Ok(details)
    }

    /// Checked-in → checked-out. Sends the room to cleaning and queues a
    /// high-priority cleaning task. Guest counters are left alone.
    pub async fn check_out(&self, id: &str) -> DomainResult<ReservationDetails> {
        let mut scope = self.uow.begin().await?;
        let result = check_out_within(scope.as_mut(), id, Utc::now()).await;
        let details = finish(scope, result).await?;

        metrics::counter!("reservation_transitions_total", "transition" => Transition::CheckOut.as_str())
            .increment(1);
        info!(
            "Reservation {} checked out, room {} queued for cleaning",
            id, details.reservation.room_id
        );
        Ok(details)
    }

    /// Administrative edit. Room status and guest counters are not touched,
    /// even when the status is forced.
    pub async fn update(
        &self,
        id: &str,
        changes: ReservationChanges,
    ) -> DomainResult<ReservationDetails> {
        let mut scope = self.uow.begin().await?;
        let result = update_within(scope.as_mut(), id, changes, Utc::now()).await;
        finish(scope, result).await
    }

    /// Unconditional delete. No status or referential guard.
    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        let mut scope = self.uow.begin().await?;
        let result = delete_within(scope.as_mut(), id).await;
        finish(scope, result).await?;
        info!("Reservation {} deleted", id);
        Ok(())
    }
}

// ── Scoped steps ───────────────────────────────────────────────

async fn insert_within(
    scope: &mut dyn WorkScope,
    reservation: Reservation,
) -> DomainResult<ReservationDetails> {
    if scope.guest(&reservation.guest_id).await?.is_none() {
        return Err(DomainError::not_found("Guest", &reservation.guest_id));
    }
    if scope.room(&reservation.room_id).await?.is_none() {
        return Err(DomainError::not_found("Room", &reservation.room_id));
    }
    scope.insert_reservation(&reservation).await?;
    load_details(scope, reservation).await
}

/// Apply the guarded status change, then read the reservation back.
///
/// The guarded write must be the first statement of the scope. A SQLite
/// transaction that has already read cannot wait for the write lock; it
/// fails with "database is locked" once a concurrent writer commits.
async fn transition_within(
    scope: &mut dyn WorkScope,
    id: &str,
    transition: Transition,
    now: DateTime<Utc>,
) -> DomainResult<Reservation> {
    let applied = scope
        .transition_reservation(id, transition.from_status(), transition.to_status(), now)
        .await?;

    let reservation = scope
        .reservation(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Reservation", id))?;
    if !applied {
        return Err(transition.rejected(reservation.status));
    }
    Ok(reservation)
}

async fn check_in_within(
    scope: &mut dyn WorkScope,
    id: &str,
    now: DateTime<Utc>,
) -> DomainResult<ReservationDetails> {
    let reservation = transition_within(scope, id, Transition::CheckIn, now).await?;

    if !scope
        .set_room_status(&reservation.room_id, RoomStatus::Occupied, now)
        .await?
    {
        return Err(DomainError::not_found("Room", &reservation.room_id));
    }
    if !scope
        .record_guest_stay(&reservation.guest_id, reservation.total_amount, now)
        .await?
    {
        return Err(DomainError::not_found("Guest", &reservation.guest_id));
    }

    load_details(scope, reservation).await
}

async fn check_out_within(
    scope: &mut dyn WorkScope,
    id: &str,
    now: DateTime<Utc>,
) -> DomainResult<ReservationDetails> {
    let reservation = transition_within(scope, id, Transition::CheckOut, now).await?;

    if !scope
        .set_room_status(&reservation.room_id, RoomStatus::Cleaning, now)
        .await?
    {
        return Err(DomainError::not_found("Room", &reservation.room_id));
    }

    let task = HousekeepingTask::post_checkout(&reservation.room_id, now);
    scope.insert_housekeeping_task(&task).await?;
    debug!("Housekeeping task {} created for room {}", task.id, task.room_id);

    load_details(scope, reservation).await
}

async fn update_within(
    scope: &mut dyn WorkScope,
    id: &str,
    changes: ReservationChanges,
    now: DateTime<Utc>,
) -> DomainResult<ReservationDetails> {
    let mut reservation = scope
        .reservation(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Reservation", id))?;

    if let Some(forced) = changes.status {
        if forced != reservation.status {
            warn!(
                "Reservation {} status forced {} -> {} by update; room status and guest totals unchanged",
                id, reservation.status, forced
            );
        }
    }

    reservation.apply_changes(changes, now)?;
    if !scope.save_reservation(&reservation).await? {
        return Err(DomainError::not_found("Reservation", id));
    }
    load_details(scope, reservation).await
}

async fn delete_within(scope: &mut dyn WorkScope, id: &str) -> DomainResult<()> {
    let reservation = scope
        .reservation(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Reservation", id))?;

    if reservation.status == ReservationStatus::CheckedIn {
        warn!(
            "Deleting checked-in reservation {}; room {} stays occupied",
            id, reservation.room_id
        );
    }

    if !scope.delete_reservation(id).await? {
        return Err(DomainError::not_found("Reservation", id));
    }
    Ok(())
}

async fn load_details(
    scope: &mut dyn WorkScope,
    reservation: Reservation,
) -> DomainResult<ReservationDetails> {
    let guest = scope.guest(&reservation.guest_id).await?;
    let room = scope.room(&reservation.room_id).await?;
    Ok(ReservationDetails {
        reservation,
        guest,
        room,
    })
}
