use crate::api_error::ApiError;
use crate::http::AppState;
use crate::models::{EnterResultRequest, SetLockRequest, SetupMatchupRequest};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// GET /api/admin/matches
pub async fn list_matches(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, ApiError> {
    state.session_service.require_admin(&req).await?;
    let matches = state.admin_service.list_matches().await?;
    Ok(HttpResponse::Ok().json(matches))
}

/// GET /api/admin/results
pub async fn list_results(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, ApiError> {
    state.session_service.require_admin(&req).await?;
    let results = state.admin_service.list_results().await?;
    Ok(HttpResponse::Ok().json(results))
}

/// POST /api/admin/matchups
pub async fn setup_matchup(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SetupMatchupRequest>,
) -> Result<impl Responder, ApiError> {
    let admin = state.session_service.require_admin(&req).await?;
    body.validate()?;

    info!(admin = %admin.username, position = body.position, "Matchup setup request");

    let match_id = state
        .admin_service
        .setup_matchup(&body.team_a, &body.team_b, body.position)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "match_id": match_id })))
}

/// DELETE /api/admin/matchups/{id}
pub async fn delete_matchup(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    state.session_service.require_admin(&req).await?;
    state.admin_service.delete_matchup(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/admin/results
pub async fn enter_result(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<EnterResultRequest>,
) -> Result<impl Responder, ApiError> {
    let admin = state.session_service.require_admin(&req).await?;
    body.validate()?;

    info!(
        admin = %admin.username,
        match_id = %body.match_id,
        winner = %body.winner,
        "Result entry request"
    );

    state
        .admin_service
        .enter_result(body.match_id, &body.winner)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "recorded": true })))
}

/// PUT /api/admin/lock
pub async fn set_lock(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SetLockRequest>,
) -> Result<impl Responder, ApiError> {
    state.session_service.require_admin(&req).await?;
    state.admin_service.set_lock(body.locked).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "locked": body.locked })))
}

/// GET /api/admin/config
pub async fn get_config(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, ApiError> {
    state.session_service.require_admin(&req).await?;
    let config = state.admin_service.get_config().await?;
    Ok(HttpResponse::Ok().json(config))
}
