use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use doctor_cell::SlotError;

/// A booked appointment slot. The database enforces at most one row per
/// (doctor_id, date, time) through a unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub specialty: String,
    pub date: NaiveDate,
    /// HH:MM start time, one of the doctor's generated slots.
    pub time: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub specialty: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub time: String,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("This slot is already taken")]
    SlotTaken,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Format(#[from] SlotError),

    #[error("Database error: {0}")]
    Database(String),
}
