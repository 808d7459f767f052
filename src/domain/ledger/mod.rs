//! Ledger aggregate
//!
//! Accounts and the financial transactions posted against them.

pub mod model;

pub use model::{
    rebalance, Account, AccountType, Direction, FinancialTransaction, NewTransaction, Posting,
    TransactionChanges, TransactionStatus,
};
