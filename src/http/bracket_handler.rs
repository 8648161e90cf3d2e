use crate::api_error::ApiError;
use crate::http::AppState;
use crate::models::SavePickRequest;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// GET /api/bracket
/// The caller's own bracket, editable until submission or lock.
pub async fn my_bracket(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, ApiError> {
    let user = state.session_service.current_user(&req).await?;
    let response = state.bracket_service.bracket_response(&user).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/bracket/{username}
/// Another user's bracket, always read-only.
pub async fn bracket_by_username(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    state.session_service.current_user(&req).await?;

    let target = state
        .session_service
        .user_by_username(&path.into_inner())
        .await?;
    let mut response = state.bracket_service.bracket_response(&target).await?;
    response.read_only = true;

    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/picks
pub async fn save_pick(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SavePickRequest>,
) -> Result<impl Responder, ApiError> {
    body.validate()?;
    let user = state.session_service.current_user(&req).await?;

    info!(
        user_id = %user.id,
        match_id = %body.match_id,
        selected_team = %body.selected_team,
        "Received pick"
    );

    let response = state
        .bracket_service
        .save_pick(user.id, body.match_id, &body.selected_team)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[derive(Debug, Deserialize)]
pub struct DeletePicksRequest {
    pub match_ids: Vec<Uuid>,
}

/// DELETE /api/picks
pub async fn delete_picks(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<DeletePicksRequest>,
) -> Result<impl Responder, ApiError> {
    let user = state.session_service.current_user(&req).await?;

    state
        .bracket_service
        .delete_picks(user.id, &body.match_ids)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/bracket/submit
pub async fn submit_bracket(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, ApiError> {
    let user = state.session_service.current_user(&req).await?;
    state.bracket_service.submit_bracket(user.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "submitted": true })))
}
