use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{AppointmentError, BookAppointmentRequest};
use crate::services::BookingService;

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::SlotTaken => AppError::Conflict(err.to_string()),
            AppointmentError::DoctorNotFound => AppError::NotFound(err.to_string()),
            AppointmentError::Validation(msg) => AppError::ValidationError(msg),
            AppointmentError::Format(e) => AppError::ValidationError(e.to_string()),
            AppointmentError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service.book(request, auth.token()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Appointment booked successfully",
            "appointment": appointment
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointments = booking_service.appointments_for_patient(&patient_id).await?;

    // An empty list is a normal answer here, not a 404.
    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .cancel(&appointment_id, auth.token())
        .await?;

    Ok(Json(json!({
        "message": "Appointment cancelled successfully",
        "appointment": appointment
    })))
}
