use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use axum_extra::TypedHeader;
use chrono::NaiveDate;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, CreateScheduleRequest, DoctorError};
use crate::services::{AvailabilityService, DoctorService, ScheduleService};

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::DuplicateName => AppError::Conflict(err.to_string()),
            DoctorError::NoScheduleForDate => AppError::NotFound(err.to_string()),
            DoctorError::Validation(msg) => AppError::ValidationError(msg),
            DoctorError::Format(e) => AppError::ValidationError(e.to_string()),
            DoctorError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.create_doctor(request, auth.token()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Doctor registered successfully",
            "doctor": doctor
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_specialties(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let specialties = doctor_service.list_specialties().await?;

    if specialties.is_empty() {
        return Err(AppError::NotFound("No specialties registered".to_string()));
    }

    Ok(Json(json!({ "specialties": specialties })))
}

#[axum::debug_handler]
pub async fn doctors_by_specialty(
    State(state): State<Arc<AppConfig>>,
    Path(specialty): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.doctors_by_specialty(&specialty).await?;

    if doctors.is_empty() {
        return Err(AppError::NotFound(
            "No doctors found for this specialty".to_string(),
        ));
    }

    Ok(Json(json!({ "doctors": doctors })))
}

#[axum::debug_handler]
pub async fn create_schedule(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let schedule_service = ScheduleService::new(&state);

    let schedule = schedule_service
        .create_schedule(&doctor_id, request, auth.token())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Schedule registered successfully",
            "schedule": schedule
        })),
    ))
}

#[axum::debug_handler]
pub async fn available_slots(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let slots = availability_service
        .available_slots(&doctor_id, query.date)
        .await?;

    // An empty grid is a valid computation result; the endpoint reports it
    // as no availability rather than as a failure of the request itself.
    if slots.is_empty() {
        return Err(AppError::NotFound(
            "No available slots for this doctor on the selected date".to_string(),
        ));
    }

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "date": query.date,
        "available_slots": slots
    })))
}
