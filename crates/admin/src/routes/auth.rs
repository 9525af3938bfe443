//! Admin login and logout.
//!
//! There is a single admin account, configured through `ADMIN_EMAIL` and
//! `ADMIN_PASSWORD_HASH`.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{Json, extract::State};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use happy_store_core::Email;

use crate::config::AdminConfig;
use crate::error::{AppError, Result};
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Check submitted credentials against the configured admin.
///
/// Both a wrong email and a wrong password give the same error.
pub(crate) fn verify_admin(config: &AdminConfig, email: &str, password: &str) -> Result<CurrentAdmin> {
    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let email = Email::parse(email).map_err(|_| invalid())?;
    if email != config.admin_email {
        return Err(invalid());
    }

    let hash = PasswordHash::new(config.admin_password_hash.expose_secret().trim())
        .map_err(|e| AppError::Internal(format!("admin password hash: {e}")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .map_err(|_| invalid())?;

    Ok(CurrentAdmin { email })
}

/// Log in as the admin.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let admin = verify_admin(state.config(), &form.email, &form.password).inspect_err(|_| {
        warn!("Admin login failed");
    })?;

    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, &admin).await?;
    info!("Admin logged in");

    Ok(Json(json!({ "success": true, "message": "Logged in" })))
}

/// Log out and discard the session.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Json<Value>> {
    session.flush().await?;
    Ok(Json(json!({ "success": true, "message": "Logged out" })))
}
