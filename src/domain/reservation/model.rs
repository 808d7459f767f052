//! Reservation domain entity

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::guest::Guest;
use crate::domain::room::Room;
use crate::shared::errors::{DomainError, DomainResult};

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    /// Booked, guest has not arrived
    Confirmed,
    /// Guest is in the room
    CheckedIn,
    /// Stay finished
    CheckedOut,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked-in",
            Self::CheckedOut => "checked-out",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "checked-in" => Ok(Self::CheckedIn),
            "checked-out" => Ok(Self::CheckedOut),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::Validation(format!(
                "Unknown reservation status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The two guarded transitions of the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    CheckIn,
    CheckOut,
}

impl Transition {
    /// Status the reservation must be in for the transition to apply.
    pub fn from_status(&self) -> ReservationStatus {
        match self {
            Self::CheckIn => ReservationStatus::Confirmed,
            Self::CheckOut => ReservationStatus::CheckedIn,
        }
    }

    pub fn to_status(&self) -> ReservationStatus {
        match self {
            Self::CheckIn => ReservationStatus::CheckedIn,
            Self::CheckOut => ReservationStatus::CheckedOut,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckIn => "check-in",
            Self::CheckOut => "check-out",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Self::CheckIn => "check in",
            Self::CheckOut => "check out",
        }
    }

    /// Error returned when `current` does not satisfy the precondition.
    pub fn rejected(&self, current: ReservationStatus) -> DomainError {
        DomainError::InvalidState(format!(
            "Reservation must be {} to {} (current status: {})",
            self.from_status(),
            self.verb(),
            current
        ))
    }
}

/// Hotel room reservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: String,
    pub guest_id: String,
    pub room_id: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub adults: i32,
    pub children: i32,
    pub status: ReservationStatus,
    /// Amount in minor currency units, fixed at creation
    pub total_amount: i64,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to book a stay
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub guest_id: String,
    pub room_id: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub adults: i32,
    pub children: i32,
    pub total_amount: i64,
    pub special_requests: Option<String>,
}

/// Administrative partial update. Guest, room and amount are immutable.
#[derive(Debug, Clone, Default)]
pub struct ReservationChanges {
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub adults: Option<i32>,
    pub children: Option<i32>,
    pub status: Option<ReservationStatus>,
    pub special_requests: Option<String>,
}

fn validate_stay(check_in: NaiveDate, check_out: NaiveDate) -> DomainResult<()> {
    if check_in >= check_out {
        return Err(DomainError::Validation(
            "Check-out date must be after check-in date".to_string(),
        ));
    }
    Ok(())
}

fn validate_occupancy(adults: i32, children: i32) -> DomainResult<()> {
    if adults < 1 {
        return Err(DomainError::Validation(
            "At least one adult is required".to_string(),
        ));
    }
    if children < 0 {
        return Err(DomainError::Validation(
            "Children cannot be negative".to_string(),
        ));
    }
    Ok(())
}

impl Reservation {
    /// Build a confirmed reservation, checking the stay window, occupancy and amount.
    pub fn create(new: NewReservation, now: DateTime<Utc>) -> DomainResult<Self> {
        validate_stay(new.check_in_date, new.check_out_date)?;
        validate_occupancy(new.adults, new.children)?;
        if new.total_amount < 0 {
            return Err(DomainError::Validation(
                "Total amount cannot be negative".to_string(),
            ));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            guest_id: new.guest_id,
            room_id: new.room_id,
            check_in_date: new.check_in_date,
            check_out_date: new.check_out_date,
            adults: new.adults,
            children: new.children,
            status: ReservationStatus::Confirmed,
            total_amount: new.total_amount,
            special_requests: new.special_requests,
            created_at: now,
            updated_at: now,
        })
    }

    /// Number of nights covered by the stay window
    pub fn nights(&self) -> i64 {
        (self.check_out_date - self.check_in_date).num_days()
    }

    /// Apply an administrative update. Status may be forced to any value.
    pub fn apply_changes(&mut self, changes: ReservationChanges, now: DateTime<Utc>) -> DomainResult<()> {
        let check_in = changes.check_in_date.unwrap_or(self.check_in_date);
        let check_out = changes.check_out_date.unwrap_or(self.check_out_date);
        validate_stay(check_in, check_out)?;

        let adults = changes.adults.unwrap_or(self.adults);
        let children = changes.children.unwrap_or(self.children);
        validate_occupancy(adults, children)?;

        self.check_in_date = check_in;
        self.check_out_date = check_out;
        self.adults = adults;
        self.children = children;
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(requests) = changes.special_requests {
            self.special_requests = Some(requests);
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Reservation joined with the current guest and room records
#[derive(Debug, Clone)]
pub struct ReservationDetails {
    pub reservation: Reservation,
    pub guest: Option<Guest>,
    pub room: Option<Room>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn booking() -> NewReservation {
        NewReservation {
            guest_id: "G1".into(),
            room_id: "RM1".into(),
            check_in_date: date("2026-03-01"),
            check_out_date: date("2026-03-04"),
            adults: 2,
            children: 0,
            total_amount: 450,
            special_requests: None,
        }
    }

    #[test]
    fn new_reservation_is_confirmed() {
        let r = Reservation::create(booking(), Utc::now()).unwrap();
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert_eq!(r.nights(), 3);
        assert_eq!(r.created_at, r.updated_at);
        assert!(uuid::Uuid::parse_str(&r.id).is_ok());
    }

    #[test]
    fn rejects_inverted_stay_window() {
        let mut b = booking();
        b.check_out_date = b.check_in_date;
        assert!(matches!(
            Reservation::create(b, Utc::now()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn rejects_zero_adults_and_negative_amount() {
        let mut b = booking();
        b.adults = 0;
        assert!(Reservation::create(b, Utc::now()).is_err());

        let mut b = booking();
        b.total_amount = -1;
        assert!(Reservation::create(b, Utc::now()).is_err());
    }

    #[test]
    fn transitions_guard_on_their_source_status() {
        let r = Reservation::create(booking(), Utc::now()).unwrap();
        assert_eq!(Transition::CheckIn.from_status(), r.status);
        assert_eq!(Transition::CheckIn.to_status(), Transition::CheckOut.from_status());
        assert_eq!(Transition::CheckOut.to_status(), ReservationStatus::CheckedOut);
        assert!(matches!(
            Transition::CheckIn.rejected(ReservationStatus::Cancelled),
            DomainError::InvalidState(_)
        ));
    }

    #[test]
    fn rejection_message_names_both_statuses() {
        let err = Transition::CheckOut.rejected(ReservationStatus::Confirmed);
        assert_eq!(
            err.to_string(),
            "Reservation must be checked-in to check out (current status: confirmed)"
        );
    }

    #[test]
    fn changes_can_force_any_status() {
        let mut r = Reservation::create(booking(), Utc::now()).unwrap();
        let changes = ReservationChanges {
            status: Some(ReservationStatus::CheckedOut),
            special_requests: Some("late arrival".into()),
            ..Default::default()
        };
        r.apply_changes(changes, Utc::now()).unwrap();
        assert_eq!(r.status, ReservationStatus::CheckedOut);
        assert_eq!(r.special_requests.as_deref(), Some("late arrival"));
    }

    #[test]
    fn changes_keep_stay_window_valid() {
        let mut r = Reservation::create(booking(), Utc::now()).unwrap();
        let before = r.clone();
        let changes = ReservationChanges {
            check_in_date: Some(date("2026-03-10")),
            ..Default::default()
        };
        assert!(r.apply_changes(changes, Utc::now()).is_err());
        assert_eq!(r, before);
    }

    #[test]
    fn status_parses_from_wire_names() {
        for status in [
            ReservationStatus::Confirmed,
            ReservationStatus::CheckedIn,
            ReservationStatus::CheckedOut,
            ReservationStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<ReservationStatus>().unwrap(), status);
        }
        assert!("Checked-In".parse::<ReservationStatus>().is_err());
    }
}
