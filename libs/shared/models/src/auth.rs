use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role codes carried in `users.role` and in JWT claims.
pub const ROLE_PATIENT: i32 = 1;
pub const ROLE_DOCTOR: i32 = 2;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<i32>,
    pub iat: Option<u64>,
}

/// Authenticated caller, decoded from a bearer token by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub valid: bool,
    pub user_id: String,
    pub email: Option<String>,
    pub role: Option<i32>,
}
