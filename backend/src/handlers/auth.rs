//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use shared::ApiMessage;
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::services::auth::{AuthenticatedUser, LoginInput, RegisterInput, Session};
use crate::AppState;

#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<AuthenticatedUser> for AuthResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            success: true,
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((state.config.jwt.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(state.config.jwt.secure_cookie)
        .same_site(SameSite::Strict)
        .build()
}

fn start_session(state: &AppState, jar: CookieJar, session: Session) -> (CookieJar, Json<AuthResponse>) {
    let jar = jar.add(session_cookie(state, session.token));
    (jar, Json(session.user.into()))
}

/// Register endpoint handler
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<RegisterInput>,
) -> AppResult<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let session = state.auth_service().register(body).await?;
    let (jar, body) = start_session(&state, jar, session);
    Ok((StatusCode::CREATED, jar, body))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<LoginInput>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    let session = state.auth_service().login(body).await?;
    Ok(start_session(&state, jar, session))
}

/// Logout endpoint handler
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<ApiMessage>) {
    let removal = Cookie::build((state.config.jwt.cookie_name.clone(), "")).path("/");
    (
        jar.remove(removal),
        Json(ApiMessage::ok("User logged out successfully")),
    )
}
