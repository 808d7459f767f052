//! In-memory unit of work
//!
//! Scopes are serialized on one async mutex. Each scope works on a staged
//! copy of the state which replaces the shared state on commit, so an
//! uncommitted or rolled back scope leaves nothing behind.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    Account, DomainError, DomainResult, FinancialTransaction, Guest, HousekeepingTask,
    Reservation, ReservationStatus, Room, RoomStatus, UnitOfWork, WorkScope,
};

/// All collections held by the in-memory backend
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub reservations: HashMap<String, Reservation>,
    pub rooms: HashMap<String, Room>,
    pub guests: HashMap<String, Guest>,
    pub housekeeping_tasks: HashMap<String, HousekeepingTask>,
    pub accounts: HashMap<String, Account>,
    pub financial_transactions: HashMap<String, FinancialTransaction>,
}

/// In-memory storage for development and testing
#[derive(Clone, Default)]
pub struct InMemoryUnitOfWork {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutate the committed state directly, outside any scope.
    pub async fn seed(&self, f: impl FnOnce(&mut MemoryState)) {
        let mut state = self.state.lock().await;
        f(&mut state);
    }

    /// Copy of the committed state
    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn begin(&self) -> DomainResult<Box<dyn WorkScope>> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryScope { guard, staged }))
    }
}

struct InMemoryScope {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

fn insert_new<T>(map: &mut HashMap<String, T>, id: &str, value: T, entity: &str) -> DomainResult<()> {
    if map.contains_key(id) {
        return Err(DomainError::Conflict(format!("{} '{}' already exists", entity, id)));
    }
    map.insert(id.to_string(), value);
    Ok(())
}

fn replace<T>(map: &mut HashMap<String, T>, id: &str, value: T) -> bool {
    match map.get_mut(id) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}

#[async_trait]
impl WorkScope for InMemoryScope {
    async fn reservation(&mut self, id: &str) -> DomainResult<Option<Reservation>> {
        Ok(self.staged.reservations.get(id).cloned())
    }

    async fn insert_reservation(&mut self, reservation: &Reservation) -> DomainResult<()> {
        insert_new(
            &mut self.staged.reservations,
            &reservation.id,
            reservation.clone(),
            "Reservation",
        )
    }

    async fn save_reservation(&mut self, reservation: &Reservation) -> DomainResult<bool> {
        Ok(replace(
            &mut self.staged.reservations,
            &reservation.id,
            reservation.clone(),
        ))
    }

    async fn transition_reservation(
        &mut self,
        id: &str,
        from: ReservationStatus,
        to: ReservationStatus,
        at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        match self.staged.reservations.get_mut(id) {
            Some(r) if r.status == from => {
                r.status = to;
                r.updated_at = at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_reservation(&mut self, id: &str) -> DomainResult<bool> {
        Ok(self.staged.reservations.remove(id).is_some())
    }

    async fn room(&mut self, id: &str) -> DomainResult<Option<Room>> {
        Ok(self.staged.rooms.get(id).cloned())
    }

    async fn set_room_status(
        &mut self,
        id: &str,
        status: RoomStatus,
        at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        Ok(self
            .staged
            .rooms
            .get_mut(id)
            .map(|room| {
                room.status = status;
                room.updated_at = at;
            })
            .is_some())
    }

    async fn mark_room_cleaned(&mut self, id: &str, at: DateTime<Utc>) -> DomainResult<bool> {
        Ok(self
            .staged
            .rooms
            .get_mut(id)
            .map(|room| {
                room.last_cleaned = Some(at);
                room.updated_at = at;
            })
            .is_some())
    }

    async fn guest(&mut self, id: &str) -> DomainResult<Option<Guest>> {
        Ok(self.staged.guests.get(id).cloned())
    }

    async fn record_guest_stay(
        &mut self,
        id: &str,
        amount: i64,
        at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        Ok(self
            .staged
            .guests
            .get_mut(id)
            .map(|guest| guest.record_stay(amount, at))
            .is_some())
    }

    async fn housekeeping_task(&mut self, id: &str) -> DomainResult<Option<HousekeepingTask>> {
        Ok(self.staged.housekeeping_tasks.get(id).cloned())
    }

    async fn insert_housekeeping_task(&mut self, task: &HousekeepingTask) -> DomainResult<()> {
        insert_new(
            &mut self.staged.housekeeping_tasks,
            &task.id,
            task.clone(),
            "Housekeeping task",
        )
    }

    async fn save_housekeeping_task(&mut self, task: &HousekeepingTask) -> DomainResult<bool> {
        Ok(replace(
            &mut self.staged.housekeeping_tasks,
            &task.id,
            task.clone(),
        ))
    }

    async fn account(&mut self, id: &str) -> DomainResult<Option<Account>> {
        Ok(self.staged.accounts.get(id).cloned())
    }

    async fn adjust_account_balance(
        &mut self,
        id: &str,
        delta: i64,
        at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        Ok(self
            .staged
            .accounts
            .get_mut(id)
            .map(|account| {
                account.balance += delta;
                account.updated_at = at;
            })
            .is_some())
    }

    async fn financial_transaction(
        &mut self,
        id: &str,
    ) -> DomainResult<Option<FinancialTransaction>> {
        Ok(self.staged.financial_transactions.get(id).cloned())
    }

    async fn insert_financial_transaction(
        &mut self,
        txn: &FinancialTransaction,
    ) -> DomainResult<()> {
        insert_new(
            &mut self.staged.financial_transactions,
            &txn.id,
            txn.clone(),
            "Transaction",
        )
    }

    async fn save_financial_transaction(
        &mut self,
        txn: &FinancialTransaction,
    ) -> DomainResult<bool> {
        Ok(replace(
            &mut self.staged.financial_transactions,
            &txn.id,
            txn.clone(),
        ))
    }

    async fn delete_financial_transaction(&mut self, id: &str) -> DomainResult<bool> {
        Ok(self.staged.financial_transactions.remove(id).is_some())
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let InMemoryScope { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RoomType;

    #[tokio::test]
    async fn committed_writes_are_visible() {
        let uow = InMemoryUnitOfWork::new();
        let room = Room::new("101", RoomType::Single, 1, 1, 9_000);
        let id = room.id.clone();
        uow.seed(|s| {
            s.rooms.insert(id.clone(), room);
        })
        .await;

        let mut scope = uow.begin().await.unwrap();
        assert!(scope
            .set_room_status(&id, RoomStatus::Maintenance, Utc::now())
            .await
            .unwrap());
        scope.commit().await.unwrap();

        let state = uow.snapshot().await;
        assert_eq!(state.rooms[&id].status, RoomStatus::Maintenance);
    }

    #[tokio::test]
    async fn rollback_and_drop_discard_writes() {
        let uow = InMemoryUnitOfWork::new();
        let room = Room::new("102", RoomType::Double, 1, 2, 11_000);
        let id = room.id.clone();
        uow.seed(|s| {
            s.rooms.insert(id.clone(), room);
        })
        .await;

        let mut scope = uow.begin().await.unwrap();
        scope.mark_room_cleaned(&id, Utc::now()).await.unwrap();
        scope.rollback().await.unwrap();

        {
            let mut scope = uow.begin().await.unwrap();
            scope
                .set_room_status(&id, RoomStatus::Occupied, Utc::now())
                .await
                .unwrap();
        }

        let state = uow.snapshot().await;
        assert_eq!(state.rooms[&id].status, RoomStatus::Available);
        assert!(state.rooms[&id].last_cleaned.is_none());
    }

    #[tokio::test]
    async fn updates_on_missing_rows_report_false() {
        let uow = InMemoryUnitOfWork::new();
        let mut scope = uow.begin().await.unwrap();
        assert!(!scope
            .set_room_status("nope", RoomStatus::Occupied, Utc::now())
            .await
            .unwrap());
        assert!(!scope.record_guest_stay("nope", 10, Utc::now()).await.unwrap());
        assert!(!scope.delete_reservation("nope").await.unwrap());
    }
}
