//! Guest domain entity

use chrono::{DateTime, Utc};

/// Registered hotel guest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guest {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    /// Passport or national ID number
    pub id_number: Option<String>,
    /// Lifetime number of check-ins. Never decremented.
    pub total_stays: i32,
    /// Lifetime spend in minor currency units. Never decremented.
    pub total_spent: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Guest {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.into(),
            address: None,
            id_number: None,
            total_stays: 0,
            total_spent: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Count a stay that has just checked in.
    pub fn record_stay(&mut self, amount: i64, now: DateTime<Utc>) {
        self.total_stays += 1;
        self.total_spent += amount;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_stay_accumulates() {
        let mut g = Guest::new("Ada", "Lovelace", "ada@example.com", "+44 20 0000");
        g.record_stay(450, Utc::now());
        g.record_stay(100, Utc::now());
        assert_eq!(g.total_stays, 2);
        assert_eq!(g.total_spent, 550);
        assert_eq!(g.full_name(), "Ada Lovelace");
    }
}
