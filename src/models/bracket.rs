use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// One match in the elimination tree. Rounds 2-5 start out as placeholders
/// with empty team strings until winners advance into them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Match {
    pub id: Uuid,
    pub team_a: String,
    pub team_b: String,
    pub round: i32,
    pub position: i32,
    pub winner: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Empty strings mean the slot has no team yet.
    pub fn team_a_opt(&self) -> Option<&str> {
        if self.team_a.is_empty() {
            None
        } else {
            Some(self.team_a.as_str())
        }
    }

    pub fn team_b_opt(&self) -> Option<&str> {
        if self.team_b.is_empty() {
            None
        } else {
            Some(self.team_b.as_str())
        }
    }

    pub fn has_team(&self, team: &str) -> bool {
        self.team_a == team || self.team_b == team
    }
}

/// A user's prediction for a single match. Unique per (user_id, match_id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Pick {
    pub id: Uuid,
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub selected_team: String,
}

/// Recorded outcome of a match. At most one per match.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchResult {
    pub id: Uuid,
    pub match_id: Uuid,
    pub winner: String,
    pub created_at: DateTime<Utc>,
}

/// Singleton row governing lock state and per-round point weights.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TournamentConfig {
    pub is_locked: bool,
    pub points_r32: i32,
    pub points_r16: i32,
    pub points_qf: i32,
    pub points_sf: i32,
    pub points_final: i32,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            is_locked: false,
            points_r32: 1,
            points_r16: 2,
            points_qf: 4,
            points_sf: 8,
            points_final: 16,
        }
    }
}

/// One renderable slot of the bracket tree, with teams resolved from the
/// stored match (round 1) or from the viewing user's feeder picks (round 2+).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSlot {
    pub match_id: Option<Uuid>,
    pub round: i32,
    pub position: i32,
    pub team_a: Option<String>,
    pub team_b: Option<String>,
    pub selected_team: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundState {
    pub round: i32,
    pub name: &'static str,
    pub matches: Vec<MatchSlot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BracketState {
    pub rounds: Vec<RoundState>,
    pub total_picks: usize,
    pub max_picks: usize,
}

impl BracketState {
    /// Completion percentage for the progress bar, capped at 100.
    pub fn completion_percent(&self) -> u32 {
        let pct = (100.0 * self.total_picks as f64 / self.max_picks as f64).round() as u32;
        pct.min(100)
    }
}

/// Per-user score pair used internally by the ranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerScore {
    pub user_id: Uuid,
    pub username: String,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    pub username: String,
    pub score: i32,
    pub max_possible: i32,
    pub champion_pick: Option<String>,
    pub is_champion_eliminated: bool,
    pub is_eliminated: bool,
    pub rank: usize,
}

// ===== Request DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SavePickRequest {
    pub match_id: Uuid,
    #[validate(length(min = 1, max = 64))]
    pub selected_team: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetupMatchupRequest {
    #[validate(length(min = 1, max = 64))]
    pub team_a: String,
    #[validate(length(min = 1, max = 64))]
    pub team_b: String,
    #[validate(range(min = 1, max = 16))]
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EnterResultRequest {
    pub match_id: Uuid,
    #[validate(length(min = 1, max = 64))]
    pub winner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetLockRequest {
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePickResponse {
    pub pick_id: Uuid,
    pub cleared_match_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BracketResponse {
    #[serde(flatten)]
    pub state: BracketState,
    pub completion_percent: u32,
    pub read_only: bool,
}
