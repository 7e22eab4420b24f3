use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum_extra::TypedHeader;
use assert_matches::assert_matches;
use chrono::Utc;
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::handlers;
use appointment_cell::models::BookAppointmentRequest;
use shared_models::error::AppError;
use shared_utils::test_utils::{TestConfig, TestUser};

fn auth_header(config: &TestConfig) -> TypedHeader<Authorization<Bearer>> {
    let token = TestUser::patient("ana@example.com").token(&config.jwt_secret);
    TypedHeader(Authorization::bearer(&token).unwrap())
}

fn book_request(patient_id: Uuid, doctor_id: Uuid) -> BookAppointmentRequest {
    BookAppointmentRequest {
        patient_id,
        doctor_id,
        specialty: "Cardiology".to_string(),
        date: "2024-06-10".to_string(),
        time: "09:40".to_string(),
        reason: "General check-up".to_string(),
    }
}

fn appointment_row(patient_id: Uuid, doctor_id: Uuid) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "patient_id": patient_id,
        "doctor_id": doctor_id,
        "specialty": "Cardiology",
        "date": "2024-06-10",
        "time": "09:40",
        "reason": "General check-up",
        "created_at": Utc::now().to_rfc3339(),
    })
}

async fn mount_doctor_lookup(server: &MockServer, doctor_id: Uuid) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": doctor_id,
            "full_name": "Dr. Gomez",
            "specialty": "Cardiology",
            "joined_date": "2024-06-01",
            "created_at": Utc::now().to_rfc3339(),
        }])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn book_appointment_creates_record() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri());
    let patient_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();

    mount_doctor_lookup(&server, doctor_id).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            appointment_row(patient_id, doctor_id)
        ])))
        .mount(&server)
        .await;

    let result = handlers::book_appointment(
        State(config.to_arc()),
        auth_header(&config),
        Json(book_request(patient_id, doctor_id)),
    )
    .await;

    let (status, body) = result.expect("booking should succeed");
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.0["appointment"]["time"], "09:40");
}

#[tokio::test]
async fn booking_taken_slot_is_conflict() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri());
    let doctor_id = Uuid::new_v4();

    mount_doctor_lookup(&server, doctor_id).await;

    // The unique index on (doctor_id, date, time) answers 409; there is no
    // application-level existence check beforehand.
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"appointments_doctor_slot_key\""
        })))
        .mount(&server)
        .await;

    let result = handlers::book_appointment(
        State(config.to_arc()),
        auth_header(&config),
        Json(book_request(Uuid::new_v4(), doctor_id)),
    )
    .await;

    assert_matches!(result, Err(AppError::Conflict(_)));
}

#[tokio::test]
async fn booking_with_unknown_doctor_is_not_found() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = handlers::book_appointment(
        State(config.to_arc()),
        auth_header(&config),
        Json(book_request(Uuid::new_v4(), Uuid::new_v4())),
    )
    .await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn booking_with_bad_time_is_rejected() {
    let config = TestConfig::default();

    let mut request = book_request(Uuid::new_v4(), Uuid::new_v4());
    request.time = "9:99".to_string();

    let result = handlers::book_appointment(
        State(config.to_arc()),
        auth_header(&config),
        Json(request),
    )
    .await;

    assert_matches!(result, Err(AppError::ValidationError(_)));
}

#[tokio::test]
async fn patient_appointments_may_be_empty() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let body = handlers::get_patient_appointments(
        State(config.to_arc()),
        Path(Uuid::new_v4().to_string()),
    )
    .await
    .expect("empty history is a valid response");

    assert_eq!(body.0["appointments"], json!([]));
}

#[tokio::test]
async fn cancel_removes_appointment() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri());
    let patient_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(patient_id, doctor_id)
        ])))
        .mount(&server)
        .await;

    let body = handlers::cancel_appointment(
        State(config.to_arc()),
        Path(Uuid::new_v4().to_string()),
        auth_header(&config),
    )
    .await
    .expect("cancellation should succeed");

    assert_eq!(body.0["message"], "Appointment cancelled successfully");
}

#[tokio::test]
async fn cancel_unknown_appointment_is_not_found() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri());

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = handlers::cancel_appointment(
        State(config.to_arc()),
        Path(Uuid::new_v4().to_string()),
        auth_header(&config),
    )
    .await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}
