//! Pick legality and downstream invalidation.

use crate::bracket::state::resolve_slot;
use crate::bracket::topology::{next_slot, ROUNDS};
use crate::models::{Match, Pick};
use uuid::Uuid;

/// A pick is legal when the match exists, both sides of its resolved slot
/// are set, and the chosen team is one of them. For rounds past the first
/// this is what gates picking until both feeder picks exist.
pub fn validate_pick(match_id: Uuid, team: &str, matches: &[Match], picks: &[Pick]) -> bool {
    let Some(m) = matches.iter().find(|m| m.id == match_id) else {
        return false;
    };

    let (team_a, team_b) = resolve_slot(m.round, m.position, picks, matches);
    match (team_a, team_b) {
        (Some(a), Some(b)) => team == a || team == b,
        _ => false,
    }
}

/// Re-selecting the already-picked team is a no-op; callers check this
/// before validation and skip all side effects.
pub fn is_noop_pick(match_id: Uuid, team: &str, picks: &[Pick]) -> bool {
    picks
        .iter()
        .any(|p| p.match_id == match_id && p.selected_team == team)
}

/// When a pick at `changed_match_id` moves away from `previous_team`, every
/// downstream pick that depended on `previous_team` advancing is invalid.
/// The chain is walked via `next_slot` and stops at the first match without
/// a pick for `previous_team`: past that point nothing could have depended
/// on the old team. Returned ids are ordered earliest round first.
pub fn cascade_clears(
    changed_match_id: Uuid,
    previous_team: &str,
    picks: &[Pick],
    matches: &[Match],
) -> Vec<Uuid> {
    let Some(changed) = matches.iter().find(|m| m.id == changed_match_id) else {
        return Vec::new();
    };

    let mut cleared = Vec::new();
    let (mut round, mut position) = (changed.round, changed.position);

    while round < ROUNDS {
        let (next_round, next_position) = next_slot(round, position);
        let Some(next_match) = matches
            .iter()
            .find(|m| m.round == next_round && m.position == next_position)
        else {
            break;
        };

        let carried = picks
            .iter()
            .any(|p| p.match_id == next_match.id && p.selected_team == previous_team);
        if !carried {
            break;
        }

        cleared.push(next_match.id);
        round = next_round;
        position = next_position;
    }

    cleared
}
