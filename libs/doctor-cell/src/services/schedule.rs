use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{CreateScheduleRequest, DoctorError, Schedule, ScheduleWindow};
use crate::services::doctor::DoctorService;
use crate::services::slots::parse_hhmm;

pub struct ScheduleService {
    supabase: Arc<SupabaseClient>,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(Arc::new(SupabaseClient::new(config)))
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Register a schedule and its working windows for a doctor.
    ///
    /// Every window is validated up front (date format, HH:MM format,
    /// start < end) so a malformed entry rejects the whole request before
    /// anything is written. Windows are immutable once stored.
    pub async fn create_schedule(
        &self,
        doctor_id: &str,
        request: CreateScheduleRequest,
        auth_token: &str,
    ) -> Result<Schedule, DoctorError> {
        debug!("Registering schedule for doctor {}", doctor_id);

        if request.windows.is_empty() {
            return Err(DoctorError::Validation(
                "Schedule needs at least one window".to_string(),
            ));
        }

        let doctor_service = DoctorService::with_client(Arc::clone(&self.supabase));
        let doctor = doctor_service.get_doctor(doctor_id).await?;

        let mut validated: Vec<(NaiveDate, String, String)> = Vec::new();
        for window in &request.windows {
            let date = NaiveDate::parse_from_str(&window.date, "%Y-%m-%d").map_err(|_| {
                DoctorError::Validation("Invalid date format, use YYYY-MM-DD".to_string())
            })?;
            let start = parse_hhmm(&window.start)?;
            let end = parse_hhmm(&window.end)?;
            if start >= end {
                return Err(DoctorError::Validation(
                    "Window start must be before end".to_string(),
                ));
            }
            validated.push((date, window.start.clone(), window.end.clone()));
        }

        let schedule_data = json!({
            "id": Uuid::new_v4(),
            "doctor_id": doctor.id,
            "created_at": Utc::now().to_rfc3339(),
        });
        let created: Vec<Schedule> = self
            .supabase
            .insert_returning("/rest/v1/schedules", Some(auth_token), schedule_data)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        let schedule = created
            .into_iter()
            .next()
            .ok_or_else(|| DoctorError::Database("Insert returned no rows".to_string()))?;

        let window_rows: Vec<serde_json::Value> = validated
            .into_iter()
            .map(|(date, start, end)| {
                json!({
                    "id": Uuid::new_v4(),
                    "schedule_id": schedule.id,
                    "date": date,
                    "start_time": start,
                    "end_time": end,
                })
            })
            .collect();

        let _: Vec<ScheduleWindow> = self
            .supabase
            .insert_returning(
                "/rest/v1/schedule_windows",
                Some(auth_token),
                serde_json::Value::Array(window_rows),
            )
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        info!("Registered schedule {} for doctor {}", schedule.id, doctor.id);
        Ok(schedule)
    }

    /// The doctor's working window on a date, if a schedule defines one.
    pub async fn window_for_date(
        &self,
        doctor_id: &str,
        date: NaiveDate,
    ) -> Result<Option<ScheduleWindow>, DoctorError> {
        let schedules_path = format!("/rest/v1/schedules?doctor_id=eq.{}&select=id", doctor_id);
        let schedules: Vec<serde_json::Value> = self
            .supabase
            .request(Method::GET, &schedules_path, None, None)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        if schedules.is_empty() {
            return Ok(None);
        }

        let schedule_ids: Vec<String> = schedules
            .iter()
            .filter_map(|s| s["id"].as_str().map(str::to_string))
            .collect();

        let windows_path = format!(
            "/rest/v1/schedule_windows?schedule_id=in.({})&date=eq.{}&limit=1",
            schedule_ids.join(","),
            date
        );
        let windows: Vec<ScheduleWindow> = self
            .supabase
            .request(Method::GET, &windows_path, None, None)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        Ok(windows.into_iter().next())
    }
}
