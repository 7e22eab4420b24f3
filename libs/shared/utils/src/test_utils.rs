use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use shared_config::{AppConfig, DEFAULT_SLOT_MINUTES};
use shared_models::auth::{User, ROLE_DOCTOR, ROLE_PATIENT};

use crate::jwt::sign_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: i32,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            full_name: "Test User".to_string(),
            role: ROLE_PATIENT,
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            full_name: "Test User".to_string(),
            role,
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, ROLE_DOCTOR)
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, ROLE_PATIENT)
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            full_name: Some(self.full_name.clone()),
            role: Some(self.role),
            created_at: Some(Utc::now()),
        }
    }

    pub fn token(&self, secret: &str) -> String {
        sign_token(&self.to_user(), secret).expect("test token")
    }
}
