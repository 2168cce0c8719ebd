//! Admin authentication route handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAdmin, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::auth::AdminAuthService;
use crate::state::AppState;

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Log in as the admin.
///
/// POST /admin/auth/login
#[instrument(skip(state, session, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<CurrentAdmin>> {
    let admin = match AdminAuthService::new(&state.config().admin).login(&request.username, &request.password) {
        Ok(admin) => admin,
        Err(e) => {
            tracing::warn!("Admin login failed");
            return Err(e.into());
        }
    };

    set_current_admin(&session, &admin).await?;
    set_sentry_user(&admin.username);
    tracing::info!("Admin logged in");

    Ok(Json(admin))
}

/// Log out.
///
/// POST /admin/auth/logout
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The logged-in admin.
///
/// GET /admin/auth/me
pub async fn me(RequireAdmin(admin): RequireAdmin) -> Json<CurrentAdmin> {
    Json(admin)
}
