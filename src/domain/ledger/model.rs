//! Ledger accounts and financial transactions

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::shared::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl FromStr for AccountType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            other => Err(DomainError::Validation(format!(
                "Unknown account type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    /// Chart-of-accounts code, unique
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    /// Sum of all completed postings, minor currency units
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code: code.into(),
            name: name.into(),
            account_type,
            balance: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Increases the account balance
    Credit,
    /// Decreases the account balance
    Debit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    fn sign(&self) -> i64 {
        match self {
            Self::Credit => 1,
            Self::Debit => -1,
        }
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            other => Err(DomainError::Validation(format!(
                "Unknown transaction direction '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::Validation(format!(
                "Unknown transaction status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialTransaction {
    pub id: String,
    pub account_id: String,
    /// Receives the opposite effect when set
    pub counter_account_id: Option<String>,
    pub direction: Direction,
    /// Always positive, minor currency units
    pub amount: i64,
    pub description: String,
    pub reference: Option<String>,
    pub transaction_date: NaiveDate,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to record a transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: String,
    pub counter_account_id: Option<String>,
    pub direction: Direction,
    pub amount: i64,
    pub description: String,
    pub reference: Option<String>,
    pub transaction_date: NaiveDate,
    pub status: TransactionStatus,
}

/// Partial update of a transaction
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub account_id: Option<String>,
    /// `Some(None)` detaches the counter account
    pub counter_account_id: Option<Option<String>>,
    pub direction: Option<Direction>,
    pub amount: Option<i64>,
    pub description: Option<String>,
    /// `Some(None)` clears the reference
    pub reference: Option<Option<String>>,
    pub transaction_date: Option<NaiveDate>,
    pub status: Option<TransactionStatus>,
}

/// Balance change on one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub account_id: String,
    pub delta: i64,
}

impl FinancialTransaction {
    pub fn create(new: NewTransaction, now: DateTime<Utc>) -> DomainResult<Self> {
        let txn = Self {
            id: uuid::Uuid::new_v4().to_string(),
            account_id: new.account_id,
            counter_account_id: new.counter_account_id,
            direction: new.direction,
            amount: new.amount,
            description: new.description,
            reference: new.reference,
            transaction_date: new.transaction_date,
            status: new.status,
            created_at: now,
            updated_at: now,
        };
        txn.validate()?;
        Ok(txn)
    }

    /// Apply an edit to a copy, leaving `self` untouched on validation failure.
    pub fn with_changes(&self, changes: TransactionChanges, now: DateTime<Utc>) -> DomainResult<Self> {
        let mut next = self.clone();
        if let Some(account_id) = changes.account_id {
            next.account_id = account_id;
        }
        if let Some(counter) = changes.counter_account_id {
            next.counter_account_id = counter;
        }
        if let Some(direction) = changes.direction {
            next.direction = direction;
        }
        if let Some(amount) = changes.amount {
            next.amount = amount;
        }
        if let Some(description) = changes.description {
            next.description = description;
        }
        if let Some(reference) = changes.reference {
            next.reference = reference;
        }
        if let Some(date) = changes.transaction_date {
            next.transaction_date = date;
        }
        if let Some(status) = changes.status {
            next.status = status;
        }
        next.updated_at = now;
        next.validate()?;
        Ok(next)
    }

    /// Accounts this transaction touches
    pub fn account_ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.account_id.as_str()).chain(self.counter_account_id.as_deref())
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.amount <= 0 {
            return Err(DomainError::Validation(
                "Amount must be greater than zero".to_string(),
            ));
        }
        if self.counter_account_id.as_deref() == Some(self.account_id.as_str()) {
            return Err(DomainError::Validation(
                "Counter account must differ from the account".to_string(),
            ));
        }
        Ok(())
    }

    /// Postings this transaction contributes while it is completed.
    pub fn postings(&self) -> Vec<Posting> {
        if self.status != TransactionStatus::Completed {
            return Vec::new();
        }
        let delta = self.direction.sign() * self.amount;
        let mut postings = vec![Posting {
            account_id: self.account_id.clone(),
            delta,
        }];
        if let Some(counter) = &self.counter_account_id {
            postings.push(Posting {
                account_id: counter.clone(),
                delta: -delta,
            });
        }
        postings
    }
}

/// Net balance adjustments needed to move the ledger from `before` to `after`.
///
/// `None` on either side stands for "no transaction" (create or delete).
/// Accounts whose net change is zero are omitted.
pub fn rebalance(
    before: Option<&FinancialTransaction>,
    after: Option<&FinancialTransaction>,
) -> Vec<Posting> {
    let mut net: BTreeMap<String, i64> = BTreeMap::new();

    for p in before.map(|t| t.postings()).unwrap_or_default() {
        *net.entry(p.account_id).or_default() -= p.delta;
    }
    for p in after.map(|t| t.postings()).unwrap_or_default() {
        *net.entry(p.account_id).or_default() += p.delta;
    }

    net.into_iter()
        .filter(|(_, delta)| *delta != 0)
        .map(|(account_id, delta)| Posting { account_id, delta })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(direction: Direction, amount: i64, status: TransactionStatus) -> FinancialTransaction {
        let now = Utc::now();
        FinancialTransaction {
            id: "T1".into(),
            account_id: "CASH".into(),
            counter_account_id: None,
            direction,
            amount,
            description: "room revenue".into(),
            reference: None,
            transaction_date: now.date_naive(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn delta_for(postings: &[Posting], account: &str) -> i64 {
        postings
            .iter()
            .find(|p| p.account_id == account)
            .map(|p| p.delta)
            .unwrap_or(0)
    }

    #[test]
    fn pending_transactions_do_not_post() {
        let t = txn(Direction::Credit, 100, TransactionStatus::Pending);
        assert!(t.postings().is_empty());
        assert!(rebalance(None, Some(&t)).is_empty());
    }

    #[test]
    fn completing_posts_and_cancelling_reverses() {
        let pending = txn(Direction::Debit, 250, TransactionStatus::Pending);
        let mut done = pending.clone();
        done.status = TransactionStatus::Completed;

        let post = rebalance(Some(&pending), Some(&done));
        assert_eq!(delta_for(&post, "CASH"), -250);

        let mut cancelled = done.clone();
        cancelled.status = TransactionStatus::Cancelled;
        let reverse = rebalance(Some(&done), Some(&cancelled));
        assert_eq!(delta_for(&reverse, "CASH"), 250);
    }

    #[test]
    fn amount_edit_on_completed_nets_the_difference() {
        let before = txn(Direction::Credit, 100, TransactionStatus::Completed);
        let mut after = before.clone();
        after.amount = 130;
        let postings = rebalance(Some(&before), Some(&after));
        assert_eq!(postings.len(), 1);
        assert_eq!(delta_for(&postings, "CASH"), 30);
    }

    #[test]
    fn counter_account_gets_opposite_effect() {
        let mut t = txn(Direction::Credit, 400, TransactionStatus::Completed);
        t.counter_account_id = Some("REVENUE".into());
        let postings = rebalance(None, Some(&t));
        assert_eq!(delta_for(&postings, "CASH"), 400);
        assert_eq!(delta_for(&postings, "REVENUE"), -400);

        let removal = rebalance(Some(&t), None);
        assert_eq!(delta_for(&removal, "CASH"), -400);
        assert_eq!(delta_for(&removal, "REVENUE"), 400);
    }

    #[test]
    fn unchanged_completed_transaction_needs_no_postings() {
        let t = txn(Direction::Credit, 100, TransactionStatus::Completed);
        assert!(rebalance(Some(&t), Some(&t)).is_empty());
    }

    #[test]
    fn edits_are_validated_on_a_copy() {
        let t = txn(Direction::Credit, 100, TransactionStatus::Pending);
        let bad = TransactionChanges {
            amount: Some(-5),
            ..Default::default()
        };
        assert!(t.with_changes(bad, Utc::now()).is_err());
        assert_eq!(t.amount, 100);

        let good = TransactionChanges {
            status: Some(TransactionStatus::Completed),
            counter_account_id: Some(Some("REVENUE".into())),
            ..Default::default()
        };
        let next = t.with_changes(good, Utc::now()).unwrap();
        assert_eq!(next.status, TransactionStatus::Completed);
        assert_eq!(next.account_ids().collect::<Vec<_>>(), vec!["CASH", "REVENUE"]);
    }

    #[test]
    fn counter_account_and_reference_can_be_cleared() {
        let mut t = txn(Direction::Credit, 100, TransactionStatus::Completed);
        t.counter_account_id = Some("REVENUE".into());
        t.reference = Some("INV-7".into());

        let untouched = t
            .with_changes(TransactionChanges::default(), Utc::now())
            .unwrap();
        assert_eq!(untouched.counter_account_id.as_deref(), Some("REVENUE"));
        assert_eq!(untouched.reference.as_deref(), Some("INV-7"));

        let cleared = t
            .with_changes(
                TransactionChanges {
                    counter_account_id: Some(None),
                    reference: Some(None),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert!(cleared.counter_account_id.is_none());
        assert!(cleared.reference.is_none());
        assert_eq!(cleared.account_ids().collect::<Vec<_>>(), vec!["CASH"]);

        let postings = rebalance(Some(&t), Some(&cleared));
        assert_eq!(postings.len(), 1);
        assert_eq!(delta_for(&postings, "REVENUE"), 100);
    }

    #[test]
    fn validation_rules() {
        let mut t = txn(Direction::Credit, 0, TransactionStatus::Pending);
        assert!(t.validate().is_err());
        t.amount = 10;
        t.counter_account_id = Some("CASH".into());
        assert!(t.validate().is_err());
        t.counter_account_id = None;
        assert!(t.validate().is_ok());
    }
}
