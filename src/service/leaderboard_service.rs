use crate::api_error::ApiError;
use crate::bracket::{build_leaderboard_entries, PointsPerRound};
use crate::db::DbPool;
use crate::models::{LeaderboardEntry, Match, MatchResult, Pick, User};
use crate::service::load_config;

/// Loads one snapshot of the tournament and hands it to the pure ranker.
pub struct LeaderboardService {
    db_pool: DbPool,
}

impl LeaderboardService {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, bracket_submitted, created_at FROM users ORDER BY username",
        )
        .fetch_all(&self.db_pool)
        .await?;

        let all_picks =
            sqlx::query_as::<_, Pick>("SELECT id, user_id, match_id, selected_team FROM picks")
                .fetch_all(&self.db_pool)
                .await?;

        let results = sqlx::query_as::<_, MatchResult>(
            "SELECT id, match_id, winner, created_at FROM results",
        )
        .fetch_all(&self.db_pool)
        .await?;

        let matches = sqlx::query_as::<_, Match>(
            "SELECT id, team_a, team_b, round, position, winner, created_at \
             FROM matches ORDER BY round, position",
        )
        .fetch_all(&self.db_pool)
        .await?;

        let config = load_config(&self.db_pool).await?;
        let points = PointsPerRound::from(&config);

        Ok(build_leaderboard_entries(
            &users, &all_picks, &results, &matches, points,
        ))
    }
}
