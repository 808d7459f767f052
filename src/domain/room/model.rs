//! Room domain entity

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::shared::errors::DomainError;

/// Operational status of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomStatus {
    Available,
    /// A checked-in reservation holds the room
    Occupied,
    /// Waiting for housekeeping after check-out
    Cleaning,
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Cleaning => "cleaning",
            Self::Maintenance => "maintenance",
        }
    }
}

impl Default for RoomStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl FromStr for RoomStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            "cleaning" => Ok(Self::Cleaning),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(DomainError::Validation(format!(
                "Unknown room status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomType {
    Single,
    Double,
    Twin,
    Suite,
    Deluxe,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Twin => "twin",
            Self::Suite => "suite",
            Self::Deluxe => "deluxe",
        }
    }
}

impl FromStr for RoomType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "double" => Ok(Self::Double),
            "twin" => Ok(Self::Twin),
            "suite" => Ok(Self::Suite),
            "deluxe" => Ok(Self::Deluxe),
            other => Err(DomainError::Validation(format!(
                "Unknown room type '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hotel room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    /// Human-readable room number, unique across the hotel
    pub number: String,
    pub room_type: RoomType,
    pub floor: i32,
    pub capacity: i32,
    /// Nightly rate in minor currency units
    pub price_per_night: i64,
    pub description: Option<String>,
    pub status: RoomStatus,
    pub last_cleaned: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn new(
        number: impl Into<String>,
        room_type: RoomType,
        floor: i32,
        capacity: i32,
        price_per_night: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            number: number.into(),
            room_type,
            floor,
            capacity,
            price_per_night,
            description: None,
            status: RoomStatus::Available,
            last_cleaned: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == RoomStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_room_is_available() {
        let room = Room::new("101", RoomType::Double, 1, 2, 12_000);
        assert!(room.is_available());
        assert!(room.last_cleaned.is_none());
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        assert_eq!("cleaning".parse::<RoomStatus>().unwrap(), RoomStatus::Cleaning);
        assert!(matches!(
            "dirty".parse::<RoomStatus>(),
            Err(DomainError::Validation(_))
        ));
        assert_eq!("suite".parse::<RoomType>().unwrap(), RoomType::Suite);
    }
}
