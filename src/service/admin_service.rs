use crate::api_error::ApiError;
use crate::bracket::{matches_in_round, next_slot, ROUNDS};
use crate::db::DbPool;
use crate::models::{Match, MatchResult, TournamentConfig};
use crate::service::load_config;
use tracing::{info, warn};
use uuid::Uuid;

/// Admin operations: round-1 matchup setup, result entry with winner
/// advancement, and the global bracket lock. Authorization happens at the
/// HTTP layer; callers here are already trusted.
pub struct AdminService {
    db_pool: DbPool,
}

impl AdminService {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }

    pub async fn list_matches(&self) -> Result<Vec<Match>, ApiError> {
        let matches = sqlx::query_as::<_, Match>(
            "SELECT id, team_a, team_b, round, position, winner, created_at \
             FROM matches ORDER BY round, position",
        )
        .fetch_all(&self.db_pool)
        .await?;
        Ok(matches)
    }

    pub async fn list_results(&self) -> Result<Vec<MatchResult>, ApiError> {
        let results = sqlx::query_as::<_, MatchResult>(
            "SELECT id, match_id, winner, created_at FROM results ORDER BY created_at",
        )
        .fetch_all(&self.db_pool)
        .await?;
        Ok(results)
    }

    /// Creates or updates the round-1 matchup at `position`, then makes sure
    /// the later-round placeholder matches exist.
    pub async fn setup_matchup(
        &self,
        team_a: &str,
        team_b: &str,
        position: i32,
    ) -> Result<Uuid, ApiError> {
        let team_a = team_a.trim();
        let team_b = team_b.trim();
        if team_a.is_empty() || team_b.is_empty() {
            return Err(ApiError::bad_request("Both team names are required"));
        }
        if !(1..=16).contains(&position) {
            return Err(ApiError::bad_request("Position must be between 1 and 16"));
        }

        let (match_id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO matches (id, team_a, team_b, round, position) \
             VALUES ($1, $2, $3, 1, $4) \
             ON CONFLICT (round, position) \
             DO UPDATE SET team_a = EXCLUDED.team_a, team_b = EXCLUDED.team_b \
             RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(team_a)
        .bind(team_b)
        .bind(position)
        .fetch_one(&self.db_pool)
        .await?;

        self.ensure_bracket_structure().await?;

        info!(%match_id, position, team_a, team_b, "Matchup set up");
        Ok(match_id)
    }

    /// Idempotently creates the empty placeholder matches for rounds 2-5.
    pub async fn ensure_bracket_structure(&self) -> Result<(), ApiError> {
        for round in 2..=ROUNDS {
            for position in 1..=matches_in_round(round) as i32 {
                sqlx::query(
                    "INSERT INTO matches (id, team_a, team_b, round, position) \
                     VALUES ($1, '', '', $2, $3) \
                     ON CONFLICT (round, position) DO NOTHING",
                )
                .bind(Uuid::new_v4())
                .bind(round)
                .bind(position)
                .execute(&self.db_pool)
                .await?;
            }
        }
        Ok(())
    }

    /// Round-1 matchup correction. Later rounds are derived, never deleted.
    pub async fn delete_matchup(&self, match_id: Uuid) -> Result<(), ApiError> {
        let deleted = sqlx::query("DELETE FROM matches WHERE id = $1 AND round = 1")
            .bind(match_id)
            .execute(&self.db_pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(ApiError::NotFound);
        }

        info!(%match_id, "Matchup deleted");
        Ok(())
    }

    /// Records a result and advances the winner into the next round's slot
    /// in one transaction, so readers never see a winner without its
    /// advancement. Re-entering a result corrects the advanced slot too.
    pub async fn enter_result(&self, match_id: Uuid, winner: &str) -> Result<(), ApiError> {
        let m = sqlx::query_as::<_, Match>(
            "SELECT id, team_a, team_b, round, position, winner, created_at \
             FROM matches WHERE id = $1",
        )
        .bind(match_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(ApiError::NotFound)?;

        if m.team_a.is_empty() || m.team_b.is_empty() {
            return Err(ApiError::bad_request(
                "Match teams are not decided yet",
            ));
        }
        if !m.has_team(winner) {
            warn!(%match_id, winner, "Rejected result for team not in match");
            return Err(ApiError::bad_request("Winner must be one of the match teams"));
        }

        let mut tx = self.db_pool.begin().await?;

        sqlx::query(
            "INSERT INTO results (id, match_id, winner) VALUES ($1, $2, $3) \
             ON CONFLICT (match_id) DO UPDATE SET winner = EXCLUDED.winner",
        )
        .bind(Uuid::new_v4())
        .bind(match_id)
        .bind(winner)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE matches SET winner = $1 WHERE id = $2")
            .bind(winner)
            .bind(match_id)
            .execute(&mut *tx)
            .await?;

        if m.round < ROUNDS {
            let (next_round, next_position) = next_slot(m.round, m.position);
            // Odd feeder position lands in team_a, even in team_b.
            let column = if m.position % 2 == 1 { "team_a" } else { "team_b" };
            let query = format!(
                "UPDATE matches SET {column} = $1 WHERE round = $2 AND position = $3"
            );
            sqlx::query(&query)
                .bind(winner)
                .bind(next_round)
                .bind(next_position)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(%match_id, winner, round = m.round, "Result recorded");
        Ok(())
    }

    pub async fn set_lock(&self, locked: bool) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO tournament_config (id, is_locked) VALUES (1, $1) \
             ON CONFLICT (id) DO UPDATE SET is_locked = EXCLUDED.is_locked",
        )
        .bind(locked)
        .execute(&self.db_pool)
        .await?;

        info!(locked, "Bracket lock updated");
        Ok(())
    }

    pub async fn get_config(&self) -> Result<TournamentConfig, ApiError> {
        load_config(&self.db_pool).await
    }
}
