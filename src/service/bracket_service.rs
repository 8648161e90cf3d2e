use crate::api_error::ApiError;
use crate::bracket::{cascade_clears, compute_bracket_state, is_noop_pick, validate_pick, MAX_PICKS};
use crate::db::DbPool;
use crate::models::{BracketResponse, Match, Pick, SavePickResponse, User};
use crate::service::load_config;
use tracing::{debug, info};
use uuid::Uuid;

/// Largest delete request the cascade can legitimately produce
/// (everything downstream of a round-1 pick, minus the pick itself,
/// is at most 30 matches).
const MAX_DELETE_IDS: usize = 30;

/// Pick entry: lock/submission guards, legality checks, cascade clearing.
pub struct BracketService {
    db_pool: DbPool,
}

impl BracketService {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }

    async fn load_matches(&self) -> Result<Vec<Match>, ApiError> {
        let matches = sqlx::query_as::<_, Match>(
            "SELECT id, team_a, team_b, round, position, winner, created_at \
             FROM matches ORDER BY round, position",
        )
        .fetch_all(&self.db_pool)
        .await?;
        Ok(matches)
    }

    async fn load_picks(&self, user_id: Uuid) -> Result<Vec<Pick>, ApiError> {
        let picks = sqlx::query_as::<_, Pick>(
            "SELECT id, user_id, match_id, selected_team FROM picks WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;
        Ok(picks)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, bracket_submitted, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(ApiError::NotFound)
    }

    /// Rejects writes when brackets are globally locked or the user already
    /// submitted; returns the user row for further checks.
    async fn writable_user(&self, user_id: Uuid) -> Result<User, ApiError> {
        let config = load_config(&self.db_pool).await?;
        if config.is_locked {
            return Err(ApiError::BracketLocked);
        }
        let user = self.get_user(user_id).await?;
        if user.bracket_submitted {
            return Err(ApiError::conflict("Bracket already submitted"));
        }
        Ok(user)
    }

    /// The user's bracket tree plus the read-only flag for the view.
    pub async fn bracket_response(&self, user: &User) -> Result<BracketResponse, ApiError> {
        let config = load_config(&self.db_pool).await?;
        let matches = self.load_matches().await?;
        let picks = self.load_picks(user.id).await?;
        let state = compute_bracket_state(&matches, &picks);
        let completion_percent = state.completion_percent();

        Ok(BracketResponse {
            state,
            completion_percent,
            read_only: user.bracket_submitted || config.is_locked,
        })
    }

    /// Upserts one pick, clearing the downstream picks that depended on the
    /// previous selection. Re-selecting the current team is a no-op and
    /// performs no writes.
    pub async fn save_pick(
        &self,
        user_id: Uuid,
        match_id: Uuid,
        selected_team: &str,
    ) -> Result<SavePickResponse, ApiError> {
        self.writable_user(user_id).await?;

        let matches = self.load_matches().await?;
        let picks = self.load_picks(user_id).await?;

        if is_noop_pick(match_id, selected_team, &picks) {
            debug!(%user_id, %match_id, "Pick unchanged, skipping");
            let existing = picks.iter().find(|p| p.match_id == match_id);
            return Ok(SavePickResponse {
                pick_id: existing.map(|p| p.id).unwrap_or_default(),
                cleared_match_ids: Vec::new(),
            });
        }

        if !validate_pick(match_id, selected_team, &matches, &picks) {
            return Err(ApiError::bad_request("Invalid team selection"));
        }

        let previous_team = picks
            .iter()
            .find(|p| p.match_id == match_id)
            .map(|p| p.selected_team.clone());
        let cleared_match_ids = match previous_team {
            Some(ref prev) => cascade_clears(match_id, prev, &picks, &matches),
            None => Vec::new(),
        };

        let mut tx = self.db_pool.begin().await?;

        // The unique (user_id, match_id) constraint backstops concurrent
        // identical requests; ON CONFLICT turns the loser into an update.
        let (pick_id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO picks (id, user_id, match_id, selected_team) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, match_id) \
             DO UPDATE SET selected_team = EXCLUDED.selected_team \
             RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(match_id)
        .bind(selected_team)
        .fetch_one(&mut *tx)
        .await?;

        if !cleared_match_ids.is_empty() {
            sqlx::query("DELETE FROM picks WHERE user_id = $1 AND match_id = ANY($2)")
                .bind(user_id)
                .bind(&cleared_match_ids)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(
            %user_id,
            %match_id,
            selected_team,
            cleared = cleared_match_ids.len(),
            "Pick saved"
        );

        Ok(SavePickResponse {
            pick_id,
            cleared_match_ids,
        })
    }

    /// Deletes a batch of the user's picks (the client-driven variant of
    /// cascade clearing).
    pub async fn delete_picks(&self, user_id: Uuid, match_ids: &[Uuid]) -> Result<(), ApiError> {
        self.writable_user(user_id).await?;

        if match_ids.len() > MAX_DELETE_IDS {
            return Err(ApiError::bad_request("Invalid request"));
        }
        if match_ids.is_empty() {
            return Ok(());
        }

        sqlx::query("DELETE FROM picks WHERE user_id = $1 AND match_id = ANY($2)")
            .bind(user_id)
            .bind(match_ids)
            .execute(&self.db_pool)
            .await?;

        info!(%user_id, count = match_ids.len(), "Picks deleted");
        Ok(())
    }

    /// Permanently freezes the user's bracket once all 31 picks exist.
    pub async fn submit_bracket(&self, user_id: Uuid) -> Result<(), ApiError> {
        self.writable_user(user_id).await?;

        let picks = self.load_picks(user_id).await?;
        if picks.len() < MAX_PICKS {
            return Err(ApiError::bad_request(format!(
                "Only {} of {} picks made. Complete your bracket first.",
                picks.len(),
                MAX_PICKS
            )));
        }

        sqlx::query("UPDATE users SET bracket_submitted = TRUE WHERE id = $1")
            .bind(user_id)
            .execute(&self.db_pool)
            .await?;

        info!(%user_id, "Bracket submitted");
        Ok(())
    }
}
