//! Pure bracket/scoring core. Every function here is synchronous, touches no
//! storage, and operates only on the snapshot it is handed, so concurrent
//! callers need no locking. Expected business outcomes (wrong team,
//! unavailable match, no results yet) are plain `false`/`0`/`None` values,
//! never errors.

pub mod picks;
pub mod scoring;
pub mod standings;
pub mod state;
pub mod topology;

pub use picks::{cascade_clears, is_noop_pick, validate_pick};
pub use scoring::{calculate_all_scores, calculate_score, PointsPerRound};
pub use standings::{
    apply_tiebreakers, build_leaderboard_entries, champion_pick, correct_picks_in_round,
    is_champion_eliminated, is_eliminated, is_team_alive, latest_completed_round,
    max_possible_points,
};
pub use state::{compute_bracket_state, resolve_slot};
pub use topology::{feeder_slots, matches_in_round, next_slot, round_name, MAX_PICKS, ROUNDS};
