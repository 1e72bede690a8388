//! Admin authentication: argon2 password check, bearer tokens, and the
//! middleware guarding admin routes.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

pub struct AuthManager {
    password_hash: String,
    jwt_secret: String,
}

impl AuthManager {
    pub fn new(config: &AuthConfig) -> anyhow::Result<Self> {
        // Reject malformed hashes at startup rather than on first login.
        PasswordHash::new(&config.password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid admin password hash: {}", e))?;
        Ok(Self {
            password_hash: config.password_hash.clone(),
            jwt_secret: config.jwt_secret.clone(),
        })
    }

    pub fn verify_password(&self, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.password_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    pub fn issue_token(&self) -> anyhow::Result<String> {
        let claims = Claims {
            sub: "admin".to_string(),
            exp: (Utc::now() + Duration::hours(24)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))
    }

    pub fn validate_token(&self, token: &str) -> bool {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .is_ok()
    }
}

/// Middleware requiring a valid bearer token on admin routes. A
/// deployment without auth configured leaves them open.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(auth) = &state.auth else {
        return next.run(request).await;
    };

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) if auth.validate_token(token) => next.run(request).await,
        _ => ApiError::Unauthorized("Missing or invalid bearer token".to_string()).into_response(),
    }
}

#[derive(Deserialize)]
struct LoginRequest {
    password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    access_token: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let Some(auth) = &state.auth else {
        return Err(ApiError::BadRequest(
            "Authentication is not configured".to_string(),
        ));
    };
    if !auth.verify_password(&body.password) {
        return Err(ApiError::Unauthorized("Invalid password".to_string()));
    }
    let access_token = auth.issue_token()?;
    Ok(Json(LoginResponse { access_token }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthStatus {
    requires_password: bool,
}

async fn status(State(state): State<Arc<AppState>>) -> Json<AuthStatus> {
    Json(AuthStatus {
        requires_password: state.auth.is_some(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/status", get(status))
}
