use crate::api_error::ApiError;
use crate::auth::SESSION_COOKIE;
use crate::http::AppState;
use crate::models::{LoginRequest, SessionResponse, User};
use actix_web::cookie::Cookie;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::info;
use validator::Validate;

fn session_response(state: &AppState, user: &User) -> SessionResponse {
    SessionResponse {
        user_id: user.id,
        username: user.username.clone(),
        bracket_submitted: user.bracket_submitted,
        is_admin: state.session_service.is_admin(&user.username),
    }
}

/// POST /api/session
/// Username login: find-or-create the user and set the session cookie.
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<impl Responder, ApiError> {
    req.validate()?;

    let user = state.session_service.login(&req.username).await?;

    let cookie = Cookie::build(SESSION_COOKIE, user.username.clone())
        .path("/")
        .http_only(true)
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(session_response(&state, &user)))
}

/// GET /api/session
pub async fn current_session(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, ApiError> {
    let user = state.session_service.current_user(&req).await?;
    Ok(HttpResponse::Ok().json(session_response(&state, &user)))
}

/// DELETE /api/session
pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Ok(user) = state.session_service.current_user(&req).await {
        info!(username = %user.username, "Session ended");
    }

    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::NoContent().cookie(cookie).finish()
}
