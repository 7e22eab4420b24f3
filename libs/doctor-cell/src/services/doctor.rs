use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{DbError, SupabaseClient};

use crate::models::{CreateDoctorRequest, Doctor, DoctorError, SpecialtyListing};

pub struct DoctorService {
    supabase: Arc<SupabaseClient>,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(Arc::new(SupabaseClient::new(config)))
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Register a doctor under a specialty. Name uniqueness comes from the
    /// database unique index on `doctors.full_name`.
    pub async fn create_doctor(
        &self,
        request: CreateDoctorRequest,
        auth_token: &str,
    ) -> Result<Doctor, DoctorError> {
        debug!("Registering doctor {}", request.full_name);

        if request.full_name.trim().is_empty() || request.specialty.trim().is_empty() {
            return Err(DoctorError::Validation("All fields are required".to_string()));
        }

        let joined_date = NaiveDate::parse_from_str(&request.joined_date, "%Y-%m-%d")
            .map_err(|_| {
                DoctorError::Validation("Invalid date format, use YYYY-MM-DD".to_string())
            })?;

        let doctor_data = json!({
            "id": Uuid::new_v4(),
            "full_name": request.full_name.trim(),
            "specialty": request.specialty.trim(),
            "joined_date": joined_date,
            "created_at": Utc::now().to_rfc3339(),
        });

        let created: Vec<Doctor> = self
            .supabase
            .insert_returning("/rest/v1/doctors", Some(auth_token), doctor_data)
            .await
            .map_err(|e| match e {
                DbError::Conflict(_) => DoctorError::DuplicateName,
                other => DoctorError::Database(other.to_string()),
            })?;

        let doctor = created
            .into_iter()
            .next()
            .ok_or_else(|| DoctorError::Database("Insert returned no rows".to_string()))?;

        info!("Registered doctor {} ({})", doctor.full_name, doctor.id);
        Ok(doctor)
    }

    pub async fn get_doctor(&self, doctor_id: &str) -> Result<Doctor, DoctorError> {
        let path = format!("/rest/v1/doctors?id=eq.{}&limit=1", doctor_id);
        let rows: Vec<Doctor> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        rows.into_iter().next().ok_or(DoctorError::NotFound)
    }

    /// All registered specialties with the doctors offering them.
    pub async fn list_specialties(&self) -> Result<Vec<SpecialtyListing>, DoctorError> {
        let path = "/rest/v1/doctors?order=specialty.asc,full_name.asc";
        let doctors: Vec<Doctor> = self
            .supabase
            .request(Method::GET, path, None, None)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        let mut listings: Vec<SpecialtyListing> = Vec::new();
        for doctor in doctors {
            match listings.last_mut() {
                Some(listing) if listing.specialty == doctor.specialty => {
                    listing.doctors.push(doctor.full_name);
                }
                _ => listings.push(SpecialtyListing {
                    specialty: doctor.specialty,
                    doctors: vec![doctor.full_name],
                }),
            }
        }

        Ok(listings)
    }

    /// Doctor names registered under one specialty, ordered by name.
    pub async fn doctors_by_specialty(&self, specialty: &str) -> Result<Vec<String>, DoctorError> {
        let path = format!(
            "/rest/v1/doctors?specialty=eq.{}&order=full_name.asc",
            urlencoding::encode(specialty)
        );
        let doctors: Vec<Doctor> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        Ok(doctors.into_iter().map(|d| d.full_name).collect())
    }
}
