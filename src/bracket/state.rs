//! Builds the renderable bracket tree for one user from stored matches and
//! that user's picks.

use crate::bracket::topology::{feeder_slots, matches_in_round, round_name, MAX_PICKS, ROUNDS};
use crate::models::{BracketState, Match, MatchSlot, Pick, RoundState};
use uuid::Uuid;

fn match_at<'a>(matches: &'a [Match], round: i32, position: i32) -> Option<&'a Match> {
    matches
        .iter()
        .find(|m| m.round == round && m.position == position)
}

fn pick_on<'a>(picks: &'a [Pick], match_id: Uuid) -> Option<&'a Pick> {
    picks.iter().find(|p| p.match_id == match_id)
}

/// Resolves the two team names shown in a slot. Round 1 comes from the
/// stored match; later rounds come from the user's picks on the two feeder
/// matches. Feeder picks are deliberately not checked against results: the
/// bracket view shows the user's own hypothetical path even when an actual
/// result has since gone the other way.
pub fn resolve_slot(
    round: i32,
    position: i32,
    picks: &[Pick],
    matches: &[Match],
) -> (Option<String>, Option<String>) {
    if round == 1 {
        return match match_at(matches, 1, position) {
            Some(m) => (
                m.team_a_opt().map(str::to_string),
                m.team_b_opt().map(str::to_string),
            ),
            None => (None, None),
        };
    }

    let ((round_a, pos_a), (round_b, pos_b)) = feeder_slots(round, position);

    let team_a = match_at(matches, round_a, pos_a)
        .and_then(|m| pick_on(picks, m.id))
        .map(|p| p.selected_team.clone());
    let team_b = match_at(matches, round_b, pos_b)
        .and_then(|m| pick_on(picks, m.id))
        .map(|p| p.selected_team.clone());

    (team_a, team_b)
}

/// Computes the full five-round bracket state for rendering.
/// `picks` must already be filtered to a single user.
pub fn compute_bracket_state(matches: &[Match], picks: &[Pick]) -> BracketState {
    let mut rounds = Vec::with_capacity(ROUNDS as usize);

    for round in 1..=ROUNDS {
        let mut slots = Vec::with_capacity(matches_in_round(round));

        for position in 1..=matches_in_round(round) as i32 {
            let (team_a, team_b) = resolve_slot(round, position, picks, matches);
            let stored = match_at(matches, round, position);
            let selected_team = stored
                .and_then(|m| pick_on(picks, m.id))
                .map(|p| p.selected_team.clone());

            slots.push(MatchSlot {
                match_id: stored.map(|m| m.id),
                round,
                position,
                team_a,
                team_b,
                selected_team,
            });
        }

        rounds.push(RoundState {
            round,
            name: round_name(round),
            matches: slots,
        });
    }

    BracketState {
        rounds,
        total_picks: picks.len(),
        max_picks: MAX_PICKS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::fixtures::{find, full_bracket, match_at as fixture_match, pick_for};
    use uuid::Uuid;

    #[test]
    fn round_one_slots_come_from_stored_matches() {
        let matches = full_bracket();
        let state = compute_bracket_state(&matches, &[]);

        let first = &state.rounds[0].matches[0];
        assert_eq!(first.team_a.as_deref(), Some("T1"));
        assert_eq!(first.team_b.as_deref(), Some("T2"));
        assert_eq!(first.selected_team, None);
    }

    #[test]
    fn later_round_slots_resolve_from_feeder_picks() {
        let matches = full_bracket();
        let user = Uuid::new_v4();
        let picks = vec![
            pick_for(user, find(&matches, 1, 1).id, "T1"),
            pick_for(user, find(&matches, 1, 2).id, "T4"),
        ];

        let (team_a, team_b) = resolve_slot(2, 1, &picks, &matches);
        assert_eq!(team_a.as_deref(), Some("T1"));
        assert_eq!(team_b.as_deref(), Some("T4"));

        // Position 2 has no feeder picks yet.
        let (team_a, team_b) = resolve_slot(2, 2, &picks, &matches);
        assert_eq!(team_a, None);
        assert_eq!(team_b, None);
    }

    #[test]
    fn round_one_selected_teams_round_trip() {
        let matches = full_bracket();
        let user = Uuid::new_v4();
        let picks: Vec<_> = (1..=16)
            .map(|pos| {
                let m = find(&matches, 1, pos);
                pick_for(user, m.id, &m.team_a)
            })
            .collect();

        let state = compute_bracket_state(&matches, &picks);
        for (slot, pick) in state.rounds[0].matches.iter().zip(&picks) {
            assert_eq!(slot.selected_team.as_deref(), Some(pick.selected_team.as_str()));
        }
    }

    #[test]
    fn missing_stored_match_yields_empty_slot() {
        // Only one round-1 match exists; everything else is absent.
        let matches = vec![fixture_match(1, 1, "T1", "T2")];
        let state = compute_bracket_state(&matches, &[]);

        assert_eq!(state.rounds[0].matches[1].match_id, None);
        assert_eq!(state.rounds[1].matches[0].team_a, None);
    }

    #[test]
    fn completion_percent_counts_picks_against_31() {
        let matches = full_bracket();
        let user = Uuid::new_v4();
        let picks: Vec<_> = (1..=16)
            .map(|pos| {
                let m = find(&matches, 1, pos);
                pick_for(user, m.id, &m.team_a)
            })
            .collect();

        let state = compute_bracket_state(&matches, &picks);
        assert_eq!(state.total_picks, 16);
        assert_eq!(state.max_picks, 31);
        assert_eq!(state.completion_percent(), 52);
    }
}
