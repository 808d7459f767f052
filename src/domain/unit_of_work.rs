//! Unit-of-work boundary for multi-record writes
//!
//! Services that must change several records atomically open a
//! [`WorkScope`] through [`UnitOfWork::begin`], stage reads and writes on
//! it, then either [`WorkScope::commit`] or [`WorkScope::rollback`].
//! Dropping a scope without committing discards its writes.
//!
//! ```ignore
//! let mut scope = uow.begin().await?;
//! let result = do_work(scope.as_mut()).await;
//! finish(scope, result).await
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::warn;

use super::guest::Guest;
use super::housekeeping::HousekeepingTask;
use super::ledger::{Account, FinancialTransaction};
use super::reservation::{Reservation, ReservationStatus};
use super::room::{Room, RoomStatus};
use crate::shared::errors::DomainResult;

/// Opens atomic write scopes against a storage backend.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn begin(&self) -> DomainResult<Box<dyn WorkScope>>;
}

/// Reads and writes that commit or roll back as one unit.
///
/// Mutators that target a single row by id return `false` when the row
/// does not exist (or, for guarded updates, did not match the guard).
#[async_trait]
pub trait WorkScope: Send {
    // ── Reservations ───────────────────────────────────────────
    async fn reservation(&mut self, id: &str) -> DomainResult<Option<Reservation>>;

    async fn insert_reservation(&mut self, reservation: &Reservation) -> DomainResult<()>;

    /// Overwrite every mutable column of an existing reservation
    async fn save_reservation(&mut self, reservation: &Reservation) -> DomainResult<bool>;

    /// Guarded status change: applies only while the stored status equals `from`.
    async fn transition_reservation(
        &mut self,
        id: &str,
        from: ReservationStatus,
        to: ReservationStatus,
        at: DateTime<Utc>,
    ) -> DomainResult<bool>;

    async fn delete_reservation(&mut self, id: &str) -> DomainResult<bool>;

    // ── Rooms ──────────────────────────────────────────────────
    async fn room(&mut self, id: &str) -> DomainResult<Option<Room>>;

    async fn set_room_status(
        &mut self,
        id: &str,
        status: RoomStatus,
        at: DateTime<Utc>,
    ) -> DomainResult<bool>;

    async fn mark_room_cleaned(&mut self, id: &str, at: DateTime<Utc>) -> DomainResult<bool>;

    // ── Guests ─────────────────────────────────────────────────
    async fn guest(&mut self, id: &str) -> DomainResult<Option<Guest>>;

    /// Increment lifetime counters: stays by one, spend by `amount`.
    async fn record_guest_stay(
        &mut self,
        id: &str,
        amount: i64,
        at: DateTime<Utc>,
    ) -> DomainResult<bool>;

    // ── Housekeeping ───────────────────────────────────────────
    async fn housekeeping_task(&mut self, id: &str) -> DomainResult<Option<HousekeepingTask>>;

    async fn insert_housekeeping_task(&mut self, task: &HousekeepingTask) -> DomainResult<()>;

    async fn save_housekeeping_task(&mut self, task: &HousekeepingTask) -> DomainResult<bool>;

    // ── Ledger ─────────────────────────────────────────────────
    async fn account(&mut self, id: &str) -> DomainResult<Option<Account>>;

    async fn adjust_account_balance(
        &mut self,
        id: &str,
        delta: i64,
        at: DateTime<Utc>,
    ) -> DomainResult<bool>;

    async fn financial_transaction(&mut self, id: &str)
        -> DomainResult<Option<FinancialTransaction>>;

    async fn insert_financial_transaction(&mut self, txn: &FinancialTransaction)
        -> DomainResult<()>;

    async fn save_financial_transaction(&mut self, txn: &FinancialTransaction)
        -> DomainResult<bool>;

    async fn delete_financial_transaction(&mut self, id: &str) -> DomainResult<bool>;

    // ── Boundary ───────────────────────────────────────────────
    async fn commit(self: Box<Self>) -> DomainResult<()>;

    async fn rollback(self: Box<Self>) -> DomainResult<()>;
}

/// Commit the scope if `result` is Ok, roll it back otherwise.
pub async fn finish<T>(scope: Box<dyn WorkScope>, result: DomainResult<T>) -> DomainResult<T> {
    match result {
        Ok(value) => {
            scope.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = scope.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(e)
        }
    }
}
