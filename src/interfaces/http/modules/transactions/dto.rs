//! Financial transaction DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{
    Direction, FinancialTransaction, NewTransaction, TransactionChanges, TransactionStatus,
};
use crate::shared::{DomainResult, PageRequest};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: String,
    pub account_id: String,
    pub counter_account_id: Option<String>,
    /// credit or debit, relative to `accountId`
    pub direction: String,
    /// Minor units, always positive
    pub amount: i64,
    pub description: String,
    pub reference: Option<String>,
    pub transaction_date: NaiveDate,
    /// pending, completed, cancelled
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<FinancialTransaction> for TransactionDto {
    fn from(t: FinancialTransaction) -> Self {
        Self {
            id: t.id,
            account_id: t.account_id,
            counter_account_id: t.counter_account_id,
            direction: t.direction.as_str().to_string(),
            amount: t.amount,
            description: t.description,
            reference: t.reference,
            transaction_date: t.transaction_date,
            status: t.status.to_string(),
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub account_id: String,
    pub counter_account_id: Option<String>,
    pub direction: String,
    pub amount: i64,
    #[validate(length(min = 1, max = 500, message = "must be 1-500 characters"))]
    pub description: String,
    pub reference: Option<String>,
    pub transaction_date: NaiveDate,
    /// Defaults to pending
    pub status: Option<String>,
}

impl CreateTransactionRequest {
    pub fn into_new(self) -> DomainResult<NewTransaction> {
        Ok(NewTransaction {
            direction: self.direction.parse::<Direction>()?,
            status: match self.status.as_deref() {
                Some(s) => s.parse::<TransactionStatus>()?,
                None => TransactionStatus::Pending,
            },
            account_id: self.account_id,
            counter_account_id: self.counter_account_id,
            amount: self.amount,
            description: self.description,
            reference: self.reference,
            transaction_date: self.transaction_date,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTransactionRequest {
    pub account_id: Option<String>,
    /// `null` detaches the counter account
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub counter_account_id: Option<Option<String>>,
    pub direction: Option<String>,
    pub amount: Option<i64>,
    #[validate(length(min = 1, max = 500, message = "must be 1-500 characters"))]
    pub description: Option<String>,
    /// `null` clears the reference
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub reference: Option<Option<String>>,
    pub transaction_date: Option<NaiveDate>,
    /// Moving into or out of `completed` posts or reverses the balances
    pub status: Option<String>,
}

/// Keep an explicit `null` apart from an absent field.
fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl UpdateTransactionRequest {
    pub fn into_changes(self) -> DomainResult<TransactionChanges> {
        Ok(TransactionChanges {
            direction: self.direction.as_deref().map(str::parse::<Direction>).transpose()?,
            status: self
                .status
                .as_deref()
                .map(str::parse::<TransactionStatus>)
                .transpose()?,
            account_id: self.account_id,
            counter_account_id: self.counter_account_id,
            amount: self.amount,
            description: self.description,
            reference: self.reference,
            transaction_date: self.transaction_date,
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListTransactionsParams {
    /// Matches either side of the transaction
    pub account_id: Option<String>,
    pub status: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ListTransactionsParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changes(body: &str) -> TransactionChanges {
        serde_json::from_str::<UpdateTransactionRequest>(body)
            .unwrap()
            .into_changes()
            .unwrap()
    }

    #[test]
    fn null_clears_and_absent_keeps() {
        let absent = changes(r#"{"amount": 120}"#);
        assert_eq!(absent.counter_account_id, None);
        assert_eq!(absent.reference, None);

        let cleared = changes(r#"{"counterAccountId": null, "reference": null}"#);
        assert_eq!(cleared.counter_account_id, Some(None));
        assert_eq!(cleared.reference, Some(None));

        let set = changes(r#"{"counterAccountId": "acc-2", "reference": "INV-9"}"#);
        assert_eq!(set.counter_account_id, Some(Some("acc-2".to_string())));
        assert_eq!(set.reference, Some(Some("INV-9".to_string())));
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        let request: UpdateTransactionRequest =
            serde_json::from_str(r#"{"status": "settled"}"#).unwrap();
        assert!(request.into_changes().is_err());
    }
}
