//! User account route handlers.
//!
//! Logging in (or registering, which logs in) merges the session cart into
//! the account cart. Logging out leaves a copy of the account cart behind
//! in the session.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument};

use happy_store_core::Cart;

use super::{JsonBody, Message, Success};
use crate::db::UserRepository;
use crate::error::{AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::{AuthService, CartService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoggedIn {
    pub user: User,
    /// The account cart after merging in the guest cart.
    pub cart: Cart,
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub user: User,
}

/// Put `user` in the session and merge the guest cart into theirs.
async fn start_session(state: &AppState, session: &Session, user: User) -> Result<LoggedIn> {
    set_current_user(session, &CurrentUser::from(&user)).await?;
    let cart = CartService::new(state.pool(), session).login(user.id).await?;

    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(LoggedIn { user, cart })
}

/// Create an account and log in.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    JsonBody(form): JsonBody<RegisterRequest>,
) -> Result<Success<LoggedIn>> {
    let user = AuthService::new(state.pool())
        .register(&form.name, &form.email, &form.password)
        .await?;

    info!(user_id = %user.id, "User registered");
    add_breadcrumb("auth", "User registered", &[]);
    Ok(Success(start_session(&state, &session, user).await?))
}

/// Log in with email and password.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    JsonBody(form): JsonBody<LoginRequest>,
) -> Result<Success<LoggedIn>> {
    let user = AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await?;

    info!(user_id = %user.id, "User logged in");
    add_breadcrumb("auth", "User logged in", &[]);
    Ok(Success(start_session(&state, &session, user).await?))
}

/// Log out. Guests get an acknowledgement too.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> Result<Success<Message>> {
    if let Some(user) = user {
        CartService::new(state.pool(), &session)
            .logout(user.id)
            .await?;
        clear_current_user(&session).await?;
        clear_sentry_user();
        info!(user_id = %user.id, "User logged out");
    }

    Ok(Success(Message {
        message: "Logged out",
    }))
}

/// The logged-in user's profile.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Success<UserBody>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Not Authorized. Login Again".to_owned()))?;
    Ok(Success(UserBody { user }))
}
