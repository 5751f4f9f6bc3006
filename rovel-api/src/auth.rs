use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use rovel_domain::user::User;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::password;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    user: User,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// POST /login
///
/// Unknown account and wrong password produce the same external rejection;
/// the distinction is only ever logged.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Email et mot de passe requis".to_string(),
        ));
    }

    let user = match state.users.find_by_email(&req.email).await? {
        Some(user) => user,
        None => {
            debug!("login rejected for {}: no such account", req.email);
            return Err(rejected());
        }
    };

    if !password::verify_password(&req.password, &user.password_hash)? {
        debug!("login rejected for {}: password mismatch", req.email);
        return Err(rejected());
    }

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role.as_str().to_string(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))?;

    Ok(Json(AuthResponse { token, user }))
}

fn rejected() -> AppError {
    AppError::Authentication("Identifiants invalides.".to_string())
}
