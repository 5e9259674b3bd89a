use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A time-bounded reservation of one vehicle by one user.
///
/// Intervals are half-open: the booking occupies `[start_time, end_time)`,
/// so a booking ending exactly when another starts does not collide with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub purpose: BookingPurpose,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// Whether the learner drives alone or with a supervising companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingPurpose {
    #[serde(rename = "self")]
    SelfDrive,
    #[serde(rename = "accompanied")]
    Accompanied,
}

impl BookingPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingPurpose::SelfDrive => "self",
            BookingPurpose::Accompanied => "accompanied",
        }
    }
}

impl fmt::Display for BookingPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self" => Ok(BookingPurpose::SelfDrive),
            "accompanied" => Ok(BookingPurpose::Accompanied),
            other => Err(format!("unknown booking purpose: {other}")),
        }
    }
}

/// Payload for a proposed booking. Id, status and timestamps are
/// server-assigned on admission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub vehicle_id: Uuid,
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub purpose: BookingPurpose,
}

/// Store-level partial update. Only `Some` fields are written;
/// `updated_at` is refreshed on every application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingPatch {
    pub vehicle_id: Option<Uuid>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub purpose: Option<BookingPurpose>,
    pub status: Option<BookingStatus>,
}

/// Scheduler-level change request: moving a booking in time or onto
/// another vehicle. Status transitions do not go through here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingChange {
    pub vehicle_id: Option<Uuid>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub purpose: Option<BookingPurpose>,
}
