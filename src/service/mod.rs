// Service layer: sqlx-backed orchestration around the pure bracket core.
pub mod admin_service;
pub mod bracket_service;
pub mod leaderboard_service;

pub use admin_service::AdminService;
pub use bracket_service::BracketService;
pub use leaderboard_service::LeaderboardService;

use crate::api_error::ApiError;
use crate::db::DbPool;
use crate::models::TournamentConfig;

/// Loads the singleton tournament config, falling back to defaults while the
/// row has not been created yet.
pub(crate) async fn load_config(pool: &DbPool) -> Result<TournamentConfig, ApiError> {
    let config = sqlx::query_as::<_, TournamentConfig>(
        "SELECT is_locked, points_r32, points_r16, points_qf, points_sf, points_final \
         FROM tournament_config WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(config.unwrap_or_default())
}
