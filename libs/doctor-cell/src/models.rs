use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::services::slots::SlotError;

/// A registered doctor. One row per doctor; the specialty is carried on the
/// row itself and doctor names are unique (database unique index).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub full_name: String,
    pub specialty: String,
    pub joined_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDoctorRequest {
    pub full_name: String,
    pub specialty: String,
    /// YYYY-MM-DD
    pub joined_date: String,
}

/// Schedule registration: a parent row owning a set of working windows.
/// Windows are immutable once registered and disappear only when the owning
/// schedule is deleted (database cascade).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A doctor's working window on one date. Times are wall-clock "HH:MM"
/// strings at minute granularity, start < end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Deserialize)]
pub struct WindowInput {
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub start: String,
    /// HH:MM
    pub end: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    pub windows: Vec<WindowInput>,
}

/// One specialty with the doctors registered under it.
#[derive(Debug, Serialize)]
pub struct SpecialtyListing {
    pub specialty: String,
    pub doctors: Vec<String>,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Doctor name is already registered")]
    DuplicateName,

    #[error("No schedule for this date")]
    NoScheduleForDate,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Format(#[from] SlotError),

    #[error("Database error: {0}")]
    Database(String),
}
