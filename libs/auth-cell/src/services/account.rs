use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{DbError, SupabaseClient};
use shared_models::auth::{User, ROLE_DOCTOR, ROLE_PATIENT};
use shared_utils::jwt::sign_token;

use crate::models::{
    AuthError, LoginRequest, LoginResponse, PublicUser, RegisterRequest, UserRecord,
};

pub struct AccountService {
    supabase: Arc<SupabaseClient>,
    jwt_secret: String,
}

impl AccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(Arc::new(SupabaseClient::new(config)), config)
    }

    pub fn with_client(supabase: Arc<SupabaseClient>, config: &AppConfig) -> Self {
        Self {
            supabase,
            jwt_secret: config.jwt_secret.clone(),
        }
    }

    /// Register a new account. Email uniqueness is enforced by the database
    /// unique index; a 409 from the insert means the address is taken.
    pub async fn register(&self, request: RegisterRequest) -> Result<PublicUser, AuthError> {
        debug!("Registering user {}", request.email);

        if request.full_name.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(AuthError::Validation("All fields are required".to_string()));
        }
        if request.role != ROLE_PATIENT && request.role != ROLE_DOCTOR {
            return Err(AuthError::Validation("Unknown role".to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(request.password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .to_string();

        let user_data = json!({
            "id": Uuid::new_v4(),
            "full_name": request.full_name.trim(),
            "email": request.email.trim().to_lowercase(),
            "password_hash": password_hash,
            "role": request.role,
            "created_at": Utc::now().to_rfc3339(),
        });

        let created: Vec<UserRecord> = self
            .supabase
            .insert_returning("/rest/v1/users", None, user_data)
            .await
            .map_err(|e| match e {
                DbError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Database(other.to_string()),
            })?;

        let record = created
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::Database("Insert returned no rows".to_string()))?;

        info!("Registered user {}", record.id);
        Ok(record.into())
    }

    /// Verify credentials and mint a session token.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        debug!("Login attempt for {}", request.email);

        let email = request.email.trim().to_lowercase();
        let path = format!(
            "/rest/v1/users?email=eq.{}&limit=1",
            urlencoding::encode(&email)
        );
        let rows: Vec<UserRecord> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?;

        let record = rows.into_iter().next().ok_or(AuthError::UserNotFound)?;

        let parsed_hash = PasswordHash::new(&record.password_hash)
            .map_err(|e| AuthError::Hash(e.to_string()))?;
        if Argon2::default()
            .verify_password(request.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            return Err(AuthError::InvalidPassword);
        }

        let user = User {
            id: record.id.to_string(),
            email: Some(record.email.clone()),
            full_name: Some(record.full_name.clone()),
            role: Some(record.role),
            created_at: Some(record.created_at),
        };
        let token = sign_token(&user, &self.jwt_secret).map_err(AuthError::Hash)?;

        info!("User {} logged in", record.id);
        Ok(LoginResponse {
            token,
            user: record.into(),
        })
    }
}
