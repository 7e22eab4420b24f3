use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::DoctorError;
use crate::services::schedule::ScheduleService;
use crate::services::slots::{filter_available, format_hhmm, generate_slots, parse_hhmm};

#[derive(Debug, Deserialize)]
struct BookedTimeRow {
    time: String,
}

pub struct AvailabilityService {
    supabase: Arc<SupabaseClient>,
    slot_minutes: i64,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(Arc::new(SupabaseClient::new(config)), config.slot_minutes)
    }

    pub fn with_client(supabase: Arc<SupabaseClient>, slot_minutes: i64) -> Self {
        Self {
            supabase,
            slot_minutes,
        }
    }

    /// Bookable "HH:MM" start times for a doctor on a date.
    ///
    /// Looks up the doctor's working window for the date (none means no
    /// schedule was registered), generates the slot grid and drops slots whose
    /// start time is already taken by a booked appointment. An empty result is
    /// a valid answer, distinct from the no-schedule case.
    pub async fn available_slots(
        &self,
        doctor_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<String>, DoctorError> {
        debug!("Computing available slots for doctor {} on {}", doctor_id, date);

        let schedule_service = ScheduleService::with_client(Arc::clone(&self.supabase));
        let window = schedule_service
            .window_for_date(doctor_id, date)
            .await?
            .ok_or(DoctorError::NoScheduleForDate)?;

        let start = parse_hhmm(&window.start_time)?;
        let end = parse_hhmm(&window.end_time)?;

        let slots = generate_slots(start, end, Duration::minutes(self.slot_minutes));
        let booked = self.booked_times(doctor_id, date).await?;
        let available = filter_available(&slots, &booked);

        debug!("{} of {} slots available", available.len(), slots.len());
        Ok(available.into_iter().map(format_hhmm).collect())
    }

    /// Start times of confirmed appointments for (doctor, date).
    async fn booked_times(
        &self,
        doctor_id: &str,
        date: NaiveDate,
    ) -> Result<HashSet<NaiveTime>, DoctorError> {
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&date=eq.{}&select=time",
            doctor_id, date
        );
        let rows: Vec<BookedTimeRow> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        rows.iter()
            .map(|row| parse_hhmm(&row.time).map_err(DoctorError::from))
            .collect()
    }
}
