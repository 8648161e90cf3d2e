use crate::api_error::ApiError;
use crate::http::AppState;
use actix_web::{web, HttpResponse, Responder};

/// GET /api/leaderboard
pub async fn leaderboard(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let entries = state.leaderboard_service.leaderboard().await?;
    Ok(HttpResponse::Ok().json(entries))
}
