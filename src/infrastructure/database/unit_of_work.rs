//! SeaORM implementation of the unit of work
//!
//! Every scope wraps one database transaction. Guarded status changes and
//! counter increments are single UPDATE statements so concurrent scopes
//! cannot lose writes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter,
    TransactionTrait,
};

use super::entities::{
    account, financial_transaction, guest, housekeeping_task, reservation, room,
};
use super::mapping::*;
use super::write_err;
use crate::domain::{
    Account, DomainResult, FinancialTransaction, Guest, HousekeepingTask, Reservation,
    ReservationStatus, Room, RoomStatus, UnitOfWork, WorkScope,
};

#[derive(Clone)]
pub struct SeaOrmUnitOfWork {
    db: DatabaseConnection,
}

impl SeaOrmUnitOfWork {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn begin(&self) -> DomainResult<Box<dyn WorkScope>> {
        let txn = self.db.begin().await?;
        Ok(Box::new(SeaOrmWorkScope { txn }))
    }
}

pub struct SeaOrmWorkScope {
    txn: DatabaseTransaction,
}

#[async_trait]
impl WorkScope for SeaOrmWorkScope {
    // ── Reservations ───────────────────────────────────────────

    async fn reservation(&mut self, id: &str) -> DomainResult<Option<Reservation>> {
        reservation::Entity::find_by_id(id)
            .one(&self.txn)
            .await?
            .map(reservation_to_domain)
            .transpose()
    }

    async fn insert_reservation(&mut self, r: &Reservation) -> DomainResult<()> {
        debug!("Inserting reservation: {}", r.id);
        reservation::Entity::insert(reservation_active(r))
            .exec_without_returning(&self.txn)
            .await
            .map_err(write_err)?;
        Ok(())
    }

    async fn save_reservation(&mut self, r: &Reservation) -> DomainResult<bool> {
        debug!("Saving reservation: {}", r.id);
        let result = reservation::Entity::update_many()
            .set(reservation_active(r))
            .filter(reservation::Column::Id.eq(r.id.as_str()))
            .exec(&self.txn)
            .await
            .map_err(write_err)?;
        Ok(result.rows_affected == 1)
    }

    async fn transition_reservation(
        &mut self,
        id: &str,
        from: ReservationStatus,
        to: ReservationStatus,
        at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        debug!("Reservation {} transition {} -> {}", id, from, to);
        let result = reservation::Entity::update_many()
            .col_expr(reservation::Column::Status, Expr::value(to.as_str()))
            .col_expr(reservation::Column::UpdatedAt, Expr::value(at))
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::Status.eq(from.as_str()))
            .exec(&self.txn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    async fn delete_reservation(&mut self, id: &str) -> DomainResult<bool> {
        debug!("Deleting reservation: {}", id);
        let result = reservation::Entity::delete_by_id(id)
            .exec(&self.txn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    // ── Rooms ──────────────────────────────────────────────────

    async fn room(&mut self, id: &str) -> DomainResult<Option<Room>> {
        room::Entity::find_by_id(id)
            .one(&self.txn)
            .await?
            .map(room_to_domain)
            .transpose()
    }

    async fn set_room_status(
        &mut self,
        id: &str,
        status: RoomStatus,
        at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        debug!("Room {} status -> {}", id, status);
        let result = room::Entity::update_many()
            .col_expr(room::Column::Status, Expr::value(status.as_str()))
            .col_expr(room::Column::UpdatedAt, Expr::value(at))
            .filter(room::Column::Id.eq(id))
            .exec(&self.txn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    async fn mark_room_cleaned(&mut self, id: &str, at: DateTime<Utc>) -> DomainResult<bool> {
        let result = room::Entity::update_many()
            .col_expr(room::Column::LastCleaned, Expr::value(Some(at)))
            .col_expr(room::Column::UpdatedAt, Expr::value(at))
            .filter(room::Column::Id.eq(id))
            .exec(&self.txn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    // ── Guests ─────────────────────────────────────────────────

    async fn guest(&mut self, id: &str) -> DomainResult<Option<Guest>> {
        Ok(guest::Entity::find_by_id(id)
            .one(&self.txn)
            .await?
            .map(guest_to_domain))
    }

    async fn record_guest_stay(
        &mut self,
        id: &str,
        amount: i64,
        at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        debug!("Recording stay for guest {} (+{})", id, amount);
        let result = guest::Entity::update_many()
            .col_expr(
                guest::Column::TotalStays,
                Expr::col(guest::Column::TotalStays).add(1),
            )
            .col_expr(
                guest::Column::TotalSpent,
                Expr::col(guest::Column::TotalSpent).add(amount),
            )
            .col_expr(guest::Column::UpdatedAt, Expr::value(at))
            .filter(guest::Column::Id.eq(id))
            .exec(&self.txn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    // ── Housekeeping ───────────────────────────────────────────

    async fn housekeeping_task(&mut self, id: &str) -> DomainResult<Option<HousekeepingTask>> {
        housekeeping_task::Entity::find_by_id(id)
            .one(&self.txn)
            .await?
            .map(task_to_domain)
            .transpose()
    }

    async fn insert_housekeeping_task(&mut self, task: &HousekeepingTask) -> DomainResult<()> {
        debug!("Inserting housekeeping task {} for room {}", task.id, task.room_id);
        housekeeping_task::Entity::insert(task_active(task))
            .exec_without_returning(&self.txn)
            .await
            .map_err(write_err)?;
        Ok(())
    }

    async fn save_housekeeping_task(&mut self, task: &HousekeepingTask) -> DomainResult<bool> {
        let result = housekeeping_task::Entity::update_many()
            .set(task_active(task))
            .filter(housekeeping_task::Column::Id.eq(task.id.as_str()))
            .exec(&self.txn)
            .await
            .map_err(write_err)?;
        Ok(result.rows_affected == 1)
    }

    // ── Ledger ─────────────────────────────────────────────────

    async fn account(&mut self, id: &str) -> DomainResult<Option<Account>> {
        account::Entity::find_by_id(id)
            .one(&self.txn)
            .await?
            .map(account_to_domain)
            .transpose()
    }

    async fn adjust_account_balance(
        &mut self,
        id: &str,
        delta: i64,
        at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        debug!("Account {} balance {:+}", id, delta);
        let result = account::Entity::update_many()
            .col_expr(
                account::Column::Balance,
                Expr::col(account::Column::Balance).add(delta),
            )
            .col_expr(account::Column::UpdatedAt, Expr::value(at))
            .filter(account::Column::Id.eq(id))
            .exec(&self.txn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    async fn financial_transaction(
        &mut self,
        id: &str,
    ) -> DomainResult<Option<FinancialTransaction>> {
        financial_transaction::Entity::find_by_id(id)
            .one(&self.txn)
            .await?
            .map(transaction_to_domain)
            .transpose()
    }

    async fn insert_financial_transaction(
        &mut self,
        txn: &FinancialTransaction,
    ) -> DomainResult<()> {
        debug!("Inserting financial transaction: {}", txn.id);
        financial_transaction::Entity::insert(transaction_active(txn))
            .exec_without_returning(&self.txn)
            .await
            .map_err(write_err)?;
        Ok(())
    }

    async fn save_financial_transaction(
        &mut self,
        txn: &FinancialTransaction,
    ) -> DomainResult<bool> {
        let result = financial_transaction::Entity::update_many()
            .set(transaction_active(txn))
            .filter(financial_transaction::Column::Id.eq(txn.id.as_str()))
            .exec(&self.txn)
            .await
            .map_err(write_err)?;
        Ok(result.rows_affected == 1)
    }

    async fn delete_financial_transaction(&mut self, id: &str) -> DomainResult<bool> {
        let result = financial_transaction::Entity::delete_by_id(id)
            .exec(&self.txn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    // ── Boundary ───────────────────────────────────────────────

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.txn.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        self.txn.rollback().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewReservation, RoomType};
    use crate::infrastructure::database::test_connection;
    use chrono::NaiveDate;
    use sea_orm::ActiveModelTrait;

    async fn seeded() -> (SeaOrmUnitOfWork, Reservation) {
        let db = test_connection().await;
        let room = Room::new("201", RoomType::Double, 2, 2, 15_000);
        let guest = Guest::new("Grace", "Hopper", "grace@example.com", "555-0100");
        room_active(&room).insert(&db).await.unwrap();
        guest_active(&guest).insert(&db).await.unwrap();

        let reservation = Reservation::create(
            NewReservation {
                guest_id: guest.id.clone(),
                room_id: room.id.clone(),
                check_in_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
                check_out_date: NaiveDate::from_ymd_opt(2026, 5, 3).unwrap(),
                adults: 1,
                children: 0,
                total_amount: 30_000,
                special_requests: None,
            },
            Utc::now(),
        )
        .unwrap();

        let uow = SeaOrmUnitOfWork::new(db);
        let mut scope = uow.begin().await.unwrap();
        scope.insert_reservation(&reservation).await.unwrap();
        scope.commit().await.unwrap();
        (uow, reservation)
    }

    #[tokio::test]
    async fn guarded_transition_applies_once() {
        let (uow, r) = seeded().await;

        let mut scope = uow.begin().await.unwrap();
        let first = scope
            .transition_reservation(
                &r.id,
                ReservationStatus::Confirmed,
                ReservationStatus::CheckedIn,
                Utc::now(),
            )
            .await
            .unwrap();
        let second = scope
            .transition_reservation(
                &r.id,
                ReservationStatus::Confirmed,
                ReservationStatus::CheckedIn,
                Utc::now(),
            )
            .await
            .unwrap();
        scope.commit().await.unwrap();

        assert!(first);
        assert!(!second);

        let mut scope = uow.begin().await.unwrap();
        let stored = scope.reservation(&r.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::CheckedIn);
    }

    #[tokio::test]
    async fn rollback_discards_counter_increments() {
        let (uow, r) = seeded().await;

        let mut scope = uow.begin().await.unwrap();
        assert!(scope
            .record_guest_stay(&r.guest_id, r.total_amount, Utc::now())
            .await
            .unwrap());
        scope.rollback().await.unwrap();

        let mut scope = uow.begin().await.unwrap();
        let guest = scope.guest(&r.guest_id).await.unwrap().unwrap();
        assert_eq!(guest.total_stays, 0);
        assert_eq!(guest.total_spent, 0);
    }

    #[tokio::test]
    async fn counters_increment_in_place() {
        let (uow, r) = seeded().await;

        let mut scope = uow.begin().await.unwrap();
        scope.record_guest_stay(&r.guest_id, 100, Utc::now()).await.unwrap();
        scope.record_guest_stay(&r.guest_id, 250, Utc::now()).await.unwrap();
        scope.commit().await.unwrap();

        let mut scope = uow.begin().await.unwrap();
        let guest = scope.guest(&r.guest_id).await.unwrap().unwrap();
        assert_eq!(guest.total_stays, 2);
        assert_eq!(guest.total_spent, 350);
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_conflict() {
        let (uow, r) = seeded().await;

        let mut scope = uow.begin().await.unwrap();
        let err = scope.insert_reservation(&r).await.unwrap_err();
        assert!(matches!(err, crate::domain::DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn missing_rows_report_false() {
        let (uow, _) = seeded().await;

        let mut scope = uow.begin().await.unwrap();
        assert!(!scope
            .set_room_status("missing", RoomStatus::Occupied, Utc::now())
            .await
            .unwrap());
        assert!(!scope.adjust_account_balance("missing", 5, Utc::now()).await.unwrap());
        assert!(scope.reservation("missing").await.unwrap().is_none());
    }
}
