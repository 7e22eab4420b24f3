use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use doctor_cell::services::doctor::DoctorService;
use doctor_cell::services::slots::parse_hhmm;
use doctor_cell::DoctorError;
use shared_config::AppConfig;
use shared_database::{DbError, SupabaseClient};

use crate::models::{Appointment, AppointmentError, BookAppointmentRequest};

pub struct BookingService {
    supabase: Arc<SupabaseClient>,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(Arc::new(SupabaseClient::new(config)))
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Book a slot for a patient.
    ///
    /// The insert goes straight to the database; the unique index on
    /// (doctor_id, date, time) decides whether the slot is free, so two
    /// concurrent bookings of the same slot cannot both succeed.
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        debug!(
            "Booking appointment for patient {} with doctor {}",
            request.patient_id, request.doctor_id
        );

        if request.specialty.trim().is_empty() || request.reason.trim().is_empty() {
            return Err(AppointmentError::Validation(
                "All fields are required".to_string(),
            ));
        }

        let date = NaiveDate::parse_from_str(&request.date, "%Y-%m-%d").map_err(|_| {
            AppointmentError::Validation("Invalid date format, use YYYY-MM-DD".to_string())
        })?;
        let time = parse_hhmm(&request.time)?;

        let doctor_service = DoctorService::with_client(Arc::clone(&self.supabase));
        doctor_service
            .get_doctor(&request.doctor_id.to_string())
            .await
            .map_err(|e| match e {
                DoctorError::NotFound => AppointmentError::DoctorNotFound,
                other => AppointmentError::Database(other.to_string()),
            })?;

        let appointment_data = json!({
            "id": Uuid::new_v4(),
            "patient_id": request.patient_id,
            "doctor_id": request.doctor_id,
            "specialty": request.specialty.trim(),
            "date": date,
            "time": time.format("%H:%M").to_string(),
            "reason": request.reason.trim(),
            "created_at": Utc::now().to_rfc3339(),
        });

        let created: Vec<Appointment> = self
            .supabase
            .insert_returning("/rest/v1/appointments", Some(auth_token), appointment_data)
            .await
            .map_err(|e| match e {
                DbError::Conflict(_) => AppointmentError::SlotTaken,
                other => AppointmentError::Database(other.to_string()),
            })?;

        let appointment = created
            .into_iter()
            .next()
            .ok_or_else(|| AppointmentError::Database("Insert returned no rows".to_string()))?;

        info!("Booked appointment {}", appointment.id);
        Ok(appointment)
    }

    /// All appointments booked by a patient, newest date first.
    pub async fn appointments_for_patient(
        &self,
        patient_id: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?patient_id=eq.{}&order=date.desc,time.asc",
            patient_id
        );
        let appointments: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        Ok(appointments)
    }

    /// Cancel an appointment, freeing its slot.
    pub async fn cancel(
        &self,
        appointment_id: &str,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Cancelling appointment {}", appointment_id);

        // Ask Postgrest to echo the deleted rows; an empty echo means the id
        // did not exist.
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let deleted: Vec<Appointment> = self
            .supabase
            .request_with_headers(Method::DELETE, &path, Some(auth_token), None, Some(headers))
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        let appointment = deleted
            .into_iter()
            .next()
            .ok_or(AppointmentError::NotFound)?;

        info!("Cancelled appointment {}", appointment.id);
        Ok(appointment)
    }
}
