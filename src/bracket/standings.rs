//! Score ceilings, elimination flags, and leaderboard ranking.

use crate::bracket::scoring::{calculate_all_scores, calculate_score, PointsPerRound};
use crate::bracket::topology::{FINAL_ROUND, ROUNDS};
use crate::models::{LeaderboardEntry, Match, MatchResult, Pick, User};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// False iff the team lost some decided match; a team with no decided match
/// yet is alive.
pub fn is_team_alive(team: &str, results: &[MatchResult], matches: &[Match]) -> bool {
    !results.iter().any(|result| {
        matches
            .iter()
            .find(|m| m.id == result.match_id)
            .is_some_and(|m| m.has_team(team) && result.winner != team)
    })
}

/// The set of teams that lost a decided match, rebuilt from scratch on every
/// call so result corrections are always reflected.
fn eliminated_teams(results: &[MatchResult], matches: &[Match]) -> HashSet<String> {
    let mut eliminated = HashSet::new();
    for result in results {
        let Some(m) = matches.iter().find(|m| m.id == result.match_id) else {
            continue;
        };
        if !m.team_a.is_empty() && m.team_a != result.winner {
            eliminated.insert(m.team_a.clone());
        }
        if !m.team_b.is_empty() && m.team_b != result.winner {
            eliminated.insert(m.team_b.clone());
        }
    }
    eliminated
}

/// The highest score the user could still reach: current score plus the
/// round weight of every undecided-match pick whose team is still alive.
/// Picks on decided matches are already reflected in `current_score`.
pub fn max_possible_points(
    picks: &[Pick],
    results: &[MatchResult],
    matches: &[Match],
    points: PointsPerRound,
    current_score: i32,
) -> i32 {
    let eliminated = eliminated_teams(results, matches);
    let decided: HashSet<Uuid> = results.iter().map(|r| r.match_id).collect();

    let mut remaining = 0;
    for pick in picks {
        if decided.contains(&pick.match_id) {
            continue;
        }
        if eliminated.contains(&pick.selected_team) {
            continue;
        }
        if let Some(m) = matches.iter().find(|m| m.id == pick.match_id) {
            remaining += points.get(m.round);
        }
    }

    current_score + remaining
}

/// Strictly below the leader's score means mathematically out; a user whose
/// ceiling equals the leader's score is not eliminated.
pub fn is_eliminated(max_possible: i32, leader_score: i32) -> bool {
    max_possible < leader_score
}

/// The user's predicted Final winner, if they have picked the Final.
pub fn champion_pick(picks: &[Pick], matches: &[Match]) -> Option<String> {
    let final_match = matches
        .iter()
        .find(|m| m.round == FINAL_ROUND && m.position == 1)?;
    picks
        .iter()
        .find(|p| p.match_id == final_match.id)
        .map(|p| p.selected_team.clone())
}

pub fn is_champion_eliminated(team: &str, results: &[MatchResult], matches: &[Match]) -> bool {
    !is_team_alive(team, results, matches)
}

/// Highest round where every match has a result; falls back to the highest
/// round with any result, then 0 when no results exist at all.
pub fn latest_completed_round(results: &[MatchResult], matches: &[Match]) -> i32 {
    let decided: HashSet<Uuid> = results.iter().map(|r| r.match_id).collect();

    for round in (1..=ROUNDS).rev() {
        let mut round_matches = matches.iter().filter(|m| m.round == round).peekable();
        if round_matches.peek().is_none() {
            continue;
        }
        if round_matches.all(|m| decided.contains(&m.id)) {
            return round;
        }
    }

    for round in (1..=ROUNDS).rev() {
        if matches
            .iter()
            .any(|m| m.round == round && decided.contains(&m.id))
        {
            return round;
        }
    }

    0
}

/// How many of the user's picks in `round` match a recorded result.
pub fn correct_picks_in_round(
    picks: &[Pick],
    results: &[MatchResult],
    matches: &[Match],
    round: i32,
) -> usize {
    matches
        .iter()
        .filter(|m| m.round == round)
        .filter(|m| {
            results.iter().find(|r| r.match_id == m.id).is_some_and(|r| {
                picks
                    .iter()
                    .any(|p| p.match_id == m.id && p.selected_team == r.winner)
            })
        })
        .count()
}

/// Orders entries by score, then champion correctness (only once the Final
/// has a result), then correct picks in the latest completed round. Entries
/// tied through all applied criteria share a rank; the next distinct entry's
/// rank is its 1-based position, so ranks skip after ties rather than
/// running densely.
pub fn apply_tiebreakers(
    mut entries: Vec<LeaderboardEntry>,
    all_picks: &[Pick],
    results: &[MatchResult],
    matches: &[Match],
) -> Vec<LeaderboardEntry> {
    if entries.is_empty() {
        return entries;
    }

    let latest_round = latest_completed_round(results, matches);

    let actual_champion: Option<&str> = matches
        .iter()
        .find(|m| m.round == FINAL_ROUND && m.position == 1)
        .and_then(|m| results.iter().find(|r| r.match_id == m.id))
        .map(|r| r.winner.as_str());

    let round_correct: HashMap<Uuid, usize> = if latest_round > 0 {
        entries
            .iter()
            .map(|e| {
                let picks: Vec<Pick> = all_picks
                    .iter()
                    .filter(|p| p.user_id == e.user_id)
                    .cloned()
                    .collect();
                (
                    e.user_id,
                    correct_picks_in_round(&picks, results, matches, latest_round),
                )
            })
            .collect()
    } else {
        HashMap::new()
    };

    let champ_correct = |e: &LeaderboardEntry| -> bool {
        match actual_champion {
            Some(champion) => e.champion_pick.as_deref() == Some(champion),
            None => false,
        }
    };

    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| {
                if actual_champion.is_some() {
                    champ_correct(b).cmp(&champ_correct(a))
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .then_with(|| {
                if latest_round > 0 {
                    round_correct
                        .get(&b.user_id)
                        .cmp(&round_correct.get(&a.user_id))
                } else {
                    std::cmp::Ordering::Equal
                }
            })
    });

    entries[0].rank = 1;
    for i in 1..entries.len() {
        let tied = {
            let prev = &entries[i - 1];
            let curr = &entries[i];
            curr.score == prev.score
                && (actual_champion.is_none() || champ_correct(curr) == champ_correct(prev))
                && (latest_round == 0
                    || round_correct.get(&curr.user_id) == round_correct.get(&prev.user_id))
        };
        entries[i].rank = if tied { entries[i - 1].rank } else { i + 1 };
    }

    entries
}

/// One ranked entry per user: score, ceiling against the current leader,
/// champion pick and its status, and elimination flag.
pub fn build_leaderboard_entries(
    users: &[User],
    all_picks: &[Pick],
    results: &[MatchResult],
    matches: &[Match],
    points: PointsPerRound,
) -> Vec<LeaderboardEntry> {
    let scores = calculate_all_scores(users, all_picks, results, matches, points);
    let leader_score = scores.first().map(|s| s.score).unwrap_or(0);

    let entries = users
        .iter()
        .map(|user| {
            let picks: Vec<Pick> = all_picks
                .iter()
                .filter(|p| p.user_id == user.id)
                .cloned()
                .collect();
            let score = calculate_score(&picks, results, matches, points);
            let max_possible = max_possible_points(&picks, results, matches, points, score);
            let champion = champion_pick(&picks, matches);
            let champion_out = champion
                .as_deref()
                .map(|team| is_champion_eliminated(team, results, matches))
                .unwrap_or(false);

            LeaderboardEntry {
                user_id: user.id,
                username: user.username.clone(),
                score,
                max_possible,
                champion_pick: champion,
                is_champion_eliminated: champion_out,
                is_eliminated: is_eliminated(max_possible, leader_score),
                rank: 0,
            }
        })
        .collect();

    apply_tiebreakers(entries, all_picks, results, matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::fixtures::{find, full_bracket, pick_for, result_for, user_named};

    #[test]
    fn team_is_alive_until_it_loses() {
        let matches = full_bracket();
        let m = find(&matches, 1, 1);
        let results = vec![result_for(m.id, "T1")];

        assert!(is_team_alive("T1", &results, &matches));
        assert!(!is_team_alive("T2", &results, &matches));
        // Never played a decided match.
        assert!(is_team_alive("T5", &results, &matches));
        assert!(is_team_alive("T1", &[], &matches));
    }

    #[test]
    fn max_possible_adds_alive_undecided_picks_only() {
        let matches = full_bracket();
        let user = uuid::Uuid::new_v4();
        let m1 = find(&matches, 1, 1);
        let m2 = find(&matches, 1, 2);
        let m3 = find(&matches, 1, 3);

        // m1 decided (pick correct, already in current score); m2 undecided
        // pick on an alive team; m3 undecided pick on a team eliminated at m1.
        let picks = vec![
            pick_for(user, m1.id, "T1"),
            pick_for(user, m2.id, "T3"),
            pick_for(user, m3.id, "T2"),
        ];
        let results = vec![result_for(m1.id, "T1")];

        let points = PointsPerRound::default();
        let score = calculate_score(&picks, &results, &matches, points);
        assert_eq!(score, 1);
        // Only m2's pick can still land: +1.
        assert_eq!(
            max_possible_points(&picks, &results, &matches, points, score),
            2
        );
    }

    #[test]
    fn max_possible_never_increases_as_results_arrive() {
        let matches = full_bracket();
        let user = uuid::Uuid::new_v4();
        let points = PointsPerRound::default();
        let picks: Vec<_> = (1..=16)
            .map(|pos| {
                let m = find(&matches, 1, pos);
                pick_for(user, m.id, &m.team_a)
            })
            .collect();

        let mut results = Vec::new();
        let mut previous = i32::MAX;
        for pos in 1..=16 {
            let m = find(&matches, 1, pos);
            // Half the results go against the user's pick.
            let winner = if pos % 2 == 0 { &m.team_b } else { &m.team_a };
            results.push(result_for(m.id, winner));

            let score = calculate_score(&picks, &results, &matches, points);
            let ceiling = max_possible_points(&picks, &results, &matches, points, score);
            assert!(ceiling <= previous);
            previous = ceiling;
        }

        // Every picked match is decided: ceiling equals the score exactly.
        let score = calculate_score(&picks, &results, &matches, points);
        assert_eq!(
            max_possible_points(&picks, &results, &matches, points, score),
            score
        );
    }

    #[test]
    fn elimination_is_strict() {
        assert!(!is_eliminated(10, 10));
        assert!(is_eliminated(9, 10));
    }

    #[test]
    fn champion_pick_reads_the_final_slot() {
        let matches = full_bracket();
        let user = uuid::Uuid::new_v4();
        let final_match = find(&matches, 5, 1);
        let picks = vec![pick_for(user, final_match.id, "T1")];

        assert_eq!(champion_pick(&picks, &matches).as_deref(), Some("T1"));
        assert_eq!(champion_pick(&[], &matches), None);
    }

    #[test]
    fn latest_completed_round_prefers_full_rounds() {
        let matches = full_bracket();
        assert_eq!(latest_completed_round(&[], &matches), 0);

        // One result in round 1: nothing complete, round 1 in progress.
        let mut results = vec![result_for(find(&matches, 1, 1).id, "T1")];
        assert_eq!(latest_completed_round(&results, &matches), 1);

        // All of round 1 decided.
        for pos in 2..=16 {
            let m = find(&matches, 1, pos);
            results.push(result_for(m.id, &m.team_a));
        }
        assert_eq!(latest_completed_round(&results, &matches), 1);

        // One round-2 result: round 1 still the latest fully complete round.
        results.push(result_for(find(&matches, 2, 1).id, "T1"));
        assert_eq!(latest_completed_round(&results, &matches), 1);
    }

    #[test]
    fn counts_correct_picks_in_round() {
        let matches = full_bracket();
        let user = uuid::Uuid::new_v4();
        let m1 = find(&matches, 1, 1);
        let m2 = find(&matches, 1, 2);
        let picks = vec![pick_for(user, m1.id, "T1"), pick_for(user, m2.id, "T4")];
        let results = vec![result_for(m1.id, "T1"), result_for(m2.id, "T3")];

        assert_eq!(correct_picks_in_round(&picks, &results, &matches, 1), 1);
        assert_eq!(correct_picks_in_round(&picks, &results, &matches, 2), 0);
    }

    #[test]
    fn truly_tied_users_share_rank_and_next_rank_skips() {
        let matches = full_bracket();
        let alice = user_named("alice");
        let bob = user_named("bob");
        let carol = user_named("carol");
        let m = find(&matches, 1, 1);

        // alice and bob both right, carol wrong.
        let all_picks = vec![
            pick_for(alice.id, m.id, "T1"),
            pick_for(bob.id, m.id, "T1"),
            pick_for(carol.id, m.id, "T2"),
        ];
        let results = vec![result_for(m.id, "T1")];

        let entries = build_leaderboard_entries(
            &[alice, bob, carol],
            &all_picks,
            &results,
            &matches,
            PointsPerRound::default(),
        );

        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[1].rank, 1);
        assert_eq!(entries[2].rank, 3);
        assert_eq!(entries[2].username, "carol");
    }

    #[test]
    fn higher_score_always_outranks_tied_pair() {
        let matches = full_bracket();
        let alice = user_named("alice");
        let bob = user_named("bob");
        let carol = user_named("carol");
        let m1 = find(&matches, 1, 1);
        let m2 = find(&matches, 1, 2);

        // carol gets both, alice and bob get one each (same match).
        let all_picks = vec![
            pick_for(alice.id, m1.id, "T1"),
            pick_for(bob.id, m1.id, "T1"),
            pick_for(carol.id, m1.id, "T1"),
            pick_for(carol.id, m2.id, "T3"),
        ];
        let results = vec![result_for(m1.id, "T1"), result_for(m2.id, "T3")];

        let entries = build_leaderboard_entries(
            &[alice, bob, carol],
            &all_picks,
            &results,
            &matches,
            PointsPerRound::default(),
        );

        assert_eq!(entries[0].username, "carol");
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[1].rank, 2);
        assert_eq!(entries[2].rank, 2);
    }

    #[test]
    fn champion_tiebreak_skipped_until_final_has_result() {
        let matches = full_bracket();
        let alice = user_named("alice");
        let bob = user_named("bob");
        let final_id = find(&matches, 5, 1).id;
        let m1 = find(&matches, 1, 1);

        // Same score, different champion picks, no Final result yet:
        // the champion tiebreaker must not apply.
        let all_picks = vec![
            pick_for(alice.id, m1.id, "T1"),
            pick_for(bob.id, m1.id, "T1"),
            pick_for(alice.id, final_id, "T1"),
            pick_for(bob.id, final_id, "T3"),
        ];
        let results = vec![result_for(m1.id, "T1")];

        let entries = build_leaderboard_entries(
            &[alice, bob],
            &all_picks,
            &results,
            &matches,
            PointsPerRound::default(),
        );
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[1].rank, 1);
    }

    #[test]
    fn correct_champion_breaks_score_tie_once_final_decided() {
        let matches = full_bracket();
        let alice = user_named("alice");
        let bob = user_named("bob");
        let final_id = find(&matches, 5, 1).id;

        // alice banks 16 points on the Final alone; bob banks 16 on a
        // perfect round of 32 with the wrong champion. Scores tie at 16.
        let mut all_picks = vec![
            pick_for(alice.id, final_id, "T1"),
            pick_for(bob.id, final_id, "T3"),
        ];
        let mut results = Vec::new();
        for pos in 1..=16 {
            let m = find(&matches, 1, pos);
            all_picks.push(pick_for(bob.id, m.id, &m.team_a));
            results.push(result_for(m.id, &m.team_a));
        }
        results.push(result_for(final_id, "T1"));

        let entries = build_leaderboard_entries(
            &[alice, bob],
            &all_picks,
            &results,
            &matches,
            PointsPerRound::default(),
        );
        assert_eq!(entries[0].score, entries[1].score);
        assert_eq!(entries[0].username, "alice");
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[1].rank, 2);
    }

    #[test]
    fn champion_elimination_flags_follow_results() {
        let matches = full_bracket();
        let alice = user_named("alice");
        let final_match = find(&matches, 5, 1);
        let m1 = find(&matches, 1, 1);

        let all_picks = vec![pick_for(alice.id, final_match.id, "T2")];
        let results = vec![result_for(m1.id, "T1")]; // T2 loses at R32

        let entries = build_leaderboard_entries(
            &[alice],
            &all_picks,
            &results,
            &matches,
            PointsPerRound::default(),
        );
        assert_eq!(entries[0].champion_pick.as_deref(), Some("T2"));
        assert!(entries[0].is_champion_eliminated);
    }

    #[test]
    fn sixteen_correct_r32_picks_and_nothing_else() {
        let matches = full_bracket();
        let alice = user_named("alice");
        let points = PointsPerRound::default();

        let mut all_picks = Vec::new();
        let mut results = Vec::new();
        for pos in 1..=16 {
            let m = find(&matches, 1, pos);
            all_picks.push(pick_for(alice.id, m.id, &m.team_a));
            results.push(result_for(m.id, &m.team_a));
        }

        let entries =
            build_leaderboard_entries(&[alice], &all_picks, &results, &matches, points);
        assert_eq!(entries[0].score, 16);
        // No undecided picks remain, so the ceiling is exactly the score.
        assert_eq!(entries[0].max_possible, 16);
        assert!(!entries[0].is_eliminated);
    }
}
