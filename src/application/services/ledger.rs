//! Ledger service
//!
//! Records financial transactions and keeps account balances in step with
//! them. A transaction moves balances only while it is completed, so every
//! write computes the net postings between the stored and the new version
//! and applies them in the same unit of work as the transaction row.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::domain::{
    finish, rebalance, DomainError, DomainResult, FinancialTransaction, NewTransaction,
    TransactionChanges, UnitOfWork, WorkScope,
};

pub struct LedgerService {
    uow: Arc<dyn UnitOfWork>,
}

impl LedgerService {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn record(&self, new: NewTransaction) -> DomainResult<FinancialTransaction> {
        let now = Utc::now();
        let txn = FinancialTransaction::create(new, now)?;

        let mut scope = self.uow.begin().await?;
        let result = record_within(scope.as_mut(), txn, now).await;
        let txn = finish(scope, result).await?;

        info!(
            "Transaction {} recorded: {} {} on account {} ({})",
            txn.id,
            txn.direction.as_str(),
            txn.amount,
            txn.account_id,
            txn.status
        );
        Ok(txn)
    }

    pub async fn update(
        &self,
        id: &str,
        changes: TransactionChanges,
    ) -> DomainResult<FinancialTransaction> {
        let mut scope = self.uow.begin().await?;
        let result = update_within(scope.as_mut(), id, changes, Utc::now()).await;
        finish(scope, result).await
    }

    /// Remove a transaction, reversing its effect if it was completed.
    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        let mut scope = self.uow.begin().await?;
        let result = delete_within(scope.as_mut(), id, Utc::now()).await;
        finish(scope, result).await?;
        info!("Transaction {} deleted", id);
        Ok(())
    }
}

async fn ensure_accounts(scope: &mut dyn WorkScope, txn: &FinancialTransaction) -> DomainResult<()> {
    for account_id in txn.account_ids() {
        if scope.account(account_id).await?.is_none() {
            return Err(DomainError::not_found("Account", account_id));
        }
    }
    Ok(())
}

/// Apply the balance changes that take the ledger from `before` to `after`.
async fn apply_postings(
    scope: &mut dyn WorkScope,
    before: Option<&FinancialTransaction>,
    after: Option<&FinancialTransaction>,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    for posting in rebalance(before, after) {
        if !scope
            .adjust_account_balance(&posting.account_id, posting.delta, now)
            .await?
        {
            return Err(DomainError::not_found("Account", posting.account_id));
        }
        metrics::counter!("ledger_postings_total").increment(1);
        debug!("Posted {:+} to account {}", posting.delta, posting.account_id);
    }
    Ok(())
}

async fn record_within(
    scope: &mut dyn WorkScope,
    txn: FinancialTransaction,
    now: DateTime<Utc>,
) -> DomainResult<FinancialTransaction> {
    ensure_accounts(scope, &txn).await?;
    scope.insert_financial_transaction(&txn).await?;
    apply_postings(scope, None, Some(&txn), now).await?;
    Ok(txn)
}

async fn update_within(
    scope: &mut dyn WorkScope,
    id: &str,
    changes: TransactionChanges,
    now: DateTime<Utc>,
) -> DomainResult<FinancialTransaction> {
    let before = scope
        .financial_transaction(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Transaction", id))?;
    let after = before.with_changes(changes, now)?;

    ensure_accounts(scope, &after).await?;
    if !scope.save_financial_transaction(&after).await? {
        return Err(DomainError::not_found("Transaction", id));
    }
    apply_postings(scope, Some(&before), Some(&after), now).await?;

    if before.status != after.status {
        info!("Transaction {} status {} -> {}", id, before.status, after.status);
    }
    Ok(after)
}

async fn delete_within(scope: &mut dyn WorkScope, id: &str, now: DateTime<Utc>) -> DomainResult<()> {
    let before = scope
        .financial_transaction(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Transaction", id))?;

    if !scope.delete_financial_transaction(id).await? {
        return Err(DomainError::not_found("Transaction", id));
    }
    apply_postings(scope, Some(&before), None, now).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, AccountType, Direction, TransactionStatus};
    use crate::infrastructure::database::mapping::account_active;
    use crate::infrastructure::database::test_connection;
    use crate::infrastructure::{InMemoryUnitOfWork, SeaOrmUnitOfWork};
    use sea_orm::ActiveModelTrait;

    struct Ledger {
        store: InMemoryUnitOfWork,
        service: LedgerService,
        cash: String,
        revenue: String,
    }

    async fn ledger() -> Ledger {
        let store = InMemoryUnitOfWork::new();
        let cash = Account::new("1000", "Cash", AccountType::Asset);
        let revenue = Account::new("4000", "Room revenue", AccountType::Revenue);
        let (cash_id, revenue_id) = (cash.id.clone(), revenue.id.clone());
        store
            .seed(|s| {
                s.accounts.insert(cash.id.clone(), cash);
                s.accounts.insert(revenue.id.clone(), revenue);
            })
            .await;
        Ledger {
            service: LedgerService::new(Arc::new(store.clone())),
            store,
            cash: cash_id,
            revenue: revenue_id,
        }
    }

    fn entry(account_id: &str, amount: i64, status: TransactionStatus) -> NewTransaction {
        NewTransaction {
            account_id: account_id.to_string(),
            counter_account_id: None,
            direction: Direction::Credit,
            amount,
            description: "room 101, 3 nights".into(),
            reference: None,
            transaction_date: Utc::now().date_naive(),
            status,
        }
    }

    impl Ledger {
        async fn balance(&self, account_id: &str) -> i64 {
            self.store.snapshot().await.accounts[account_id].balance
        }

        async fn set_status(&self, id: &str, status: TransactionStatus) -> FinancialTransaction {
            self.service
                .update(
                    id,
                    TransactionChanges {
                        status: Some(status),
                        ..Default::default()
                    },
                )
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn completed_create_posts_immediately() {
        let l = ledger().await;
        l.service
            .record(entry(&l.cash, 450, TransactionStatus::Completed))
            .await
            .unwrap();
        assert_eq!(l.balance(&l.cash).await, 450);
    }

    #[tokio::test]
    async fn pending_posts_on_completion_and_reverses_on_cancel() {
        let l = ledger().await;
        let txn = l
            .service
            .record(entry(&l.cash, 300, TransactionStatus::Pending))
            .await
            .unwrap();
        assert_eq!(l.balance(&l.cash).await, 0);

        l.set_status(&txn.id, TransactionStatus::Completed).await;
        assert_eq!(l.balance(&l.cash).await, 300);

        l.set_status(&txn.id, TransactionStatus::Cancelled).await;
        assert_eq!(l.balance(&l.cash).await, 0);
    }

    #[tokio::test]
    async fn amount_edit_on_completed_reposts() {
        let l = ledger().await;
        let txn = l
            .service
            .record(entry(&l.cash, 100, TransactionStatus::Completed))
            .await
            .unwrap();

        l.service
            .update(
                &txn.id,
                TransactionChanges {
                    amount: Some(175),
                    direction: Some(Direction::Debit),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(l.balance(&l.cash).await, -175);
    }

    #[tokio::test]
    async fn counter_account_gets_opposite_effect_and_delete_reverses() {
        let l = ledger().await;
        let mut new = entry(&l.cash, 450, TransactionStatus::Completed);
        new.counter_account_id = Some(l.revenue.clone());
        let txn = l.service.record(new).await.unwrap();

        assert_eq!(l.balance(&l.cash).await, 450);
        assert_eq!(l.balance(&l.revenue).await, -450);

        l.service.delete(&txn.id).await.unwrap();
        assert_eq!(l.balance(&l.cash).await, 0);
        assert_eq!(l.balance(&l.revenue).await, 0);
        assert!(l.store.snapshot().await.financial_transactions.is_empty());
    }

    #[tokio::test]
    async fn detaching_counter_account_reverses_its_side() {
        let l = ledger().await;
        let mut new = entry(&l.cash, 450, TransactionStatus::Completed);
        new.counter_account_id = Some(l.revenue.clone());
        let txn = l.service.record(new).await.unwrap();

        let txn = l
            .service
            .update(
                &txn.id,
                TransactionChanges {
                    counter_account_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(txn.counter_account_id.is_none());
        assert_eq!(l.balance(&l.cash).await, 450);
        assert_eq!(l.balance(&l.revenue).await, 0);
    }

    #[tokio::test]
    async fn unknown_account_writes_nothing() {
        let l = ledger().await;
        let mut new = entry(&l.cash, 10, TransactionStatus::Completed);
        new.counter_account_id = Some("nope".into());

        let err = l.service.record(new).await.unwrap_err();
        assert_eq!(err.to_string(), "Account not found");
        assert_eq!(l.balance(&l.cash).await, 0);
        assert!(l.store.snapshot().await.financial_transactions.is_empty());
    }

    #[tokio::test]
    async fn invalid_amount_is_rejected() {
        let l = ledger().await;
        let err = l
            .service
            .record(entry(&l.cash, 0, TransactionStatus::Pending))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn balances_move_against_sqlite() {
        let db = test_connection().await;
        let cash = Account::new("1000", "Cash", AccountType::Asset);
        account_active(&cash).insert(&db).await.unwrap();
        let uow = Arc::new(SeaOrmUnitOfWork::new(db));
        let service = LedgerService::new(uow.clone());

        let txn = service
            .record(entry(&cash.id, 250, TransactionStatus::Completed))
            .await
            .unwrap();
        service
            .update(
                &txn.id,
                TransactionChanges {
                    status: Some(TransactionStatus::Pending),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        service
            .update(
                &txn.id,
                TransactionChanges {
                    status: Some(TransactionStatus::Completed),
                    amount: Some(260),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let mut scope = uow.begin().await.unwrap();
        let stored = scope.account(&cash.id).await.unwrap().unwrap();
        assert_eq!(stored.balance, 260);
    }
}
