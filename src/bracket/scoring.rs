//! Round-weighted scoring of picks against recorded results.

use crate::models::{Match, MatchResult, Pick, PlayerScore, TournamentConfig, User};

/// Round number to point weight, derived 1:1 from the tournament config.
/// Defaults (1/2/4/8/16) give a perfect 31-pick bracket exactly 80 points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsPerRound([i32; 5]);

impl PointsPerRound {
    pub fn get(&self, round: i32) -> i32 {
        if (1..=5).contains(&round) {
            self.0[(round - 1) as usize]
        } else {
            0
        }
    }
}

impl Default for PointsPerRound {
    fn default() -> Self {
        Self::from(&TournamentConfig::default())
    }
}

impl From<&TournamentConfig> for PointsPerRound {
    fn from(config: &TournamentConfig) -> Self {
        Self([
            config.points_r32,
            config.points_r16,
            config.points_qf,
            config.points_sf,
            config.points_final,
        ])
    }
}

/// Sums the round weight of every result the user predicted correctly.
/// A sum over results, so the outcome is order-independent; results without
/// a matching pick contribute nothing.
pub fn calculate_score(
    picks: &[Pick],
    results: &[MatchResult],
    matches: &[Match],
    points: PointsPerRound,
) -> i32 {
    let mut score = 0;

    for result in results {
        let Some(pick) = picks.iter().find(|p| p.match_id == result.match_id) else {
            continue;
        };
        if pick.selected_team != result.winner {
            continue;
        }
        if let Some(m) = matches.iter().find(|m| m.id == result.match_id) {
            score += points.get(m.round);
        }
    }

    score
}

/// Per-user scores sorted by score descending, username ascending. This
/// ordering is an internal stable sort key; displayed ranks come from the
/// leaderboard tiebreakers.
pub fn calculate_all_scores(
    users: &[User],
    all_picks: &[Pick],
    results: &[MatchResult],
    matches: &[Match],
    points: PointsPerRound,
) -> Vec<PlayerScore> {
    let mut scores: Vec<PlayerScore> = users
        .iter()
        .map(|user| {
            let picks: Vec<Pick> = all_picks
                .iter()
                .filter(|p| p.user_id == user.id)
                .cloned()
                .collect();
            PlayerScore {
                user_id: user.id,
                username: user.username.clone(),
                score: calculate_score(&picks, results, matches, points),
            }
        })
        .collect();

    scores.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.username.cmp(&b.username)));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::fixtures::{find, full_bracket, pick_for, result_for, user_named};
    use crate::bracket::topology::matches_in_round;
    use uuid::Uuid;

    #[test]
    fn correct_pick_earns_round_weight() {
        let matches = full_bracket();
        let user = Uuid::new_v4();
        let m = find(&matches, 1, 1);
        let picks = vec![pick_for(user, m.id, "T1")];
        let results = vec![result_for(m.id, "T1")];

        assert_eq!(
            calculate_score(&picks, &results, &matches, PointsPerRound::default()),
            1
        );
    }

    #[test]
    fn wrong_or_missing_picks_earn_nothing() {
        let matches = full_bracket();
        let user = Uuid::new_v4();
        let m1 = find(&matches, 1, 1);
        let m2 = find(&matches, 1, 2);
        let picks = vec![pick_for(user, m1.id, "T2")];
        let results = vec![result_for(m1.id, "T1"), result_for(m2.id, "T3")];

        assert_eq!(
            calculate_score(&picks, &results, &matches, PointsPerRound::default()),
            0
        );
    }

    #[test]
    fn perfect_bracket_scores_eighty_under_defaults() {
        let mut matches = full_bracket();
        let user = Uuid::new_v4();
        let mut picks = Vec::new();
        let mut results = Vec::new();

        // T1 beats everyone it meets; every other slot's team_a wins too.
        // Advance winners into later rounds so team names are real.
        for round in 1..=5 {
            for position in 1..=matches_in_round(round) as i32 {
                let idx = matches
                    .iter()
                    .position(|m| m.round == round && m.position == position)
                    .unwrap();
                let winner = matches[idx].team_a.clone();
                let match_id = matches[idx].id;
                picks.push(pick_for(user, match_id, &winner));
                results.push(result_for(match_id, &winner));
                if round < 5 {
                    let (nr, np) = crate::bracket::topology::next_slot(round, position);
                    let next_idx = matches
                        .iter()
                        .position(|m| m.round == nr && m.position == np)
                        .unwrap();
                    if position % 2 == 1 {
                        matches[next_idx].team_a = winner;
                    } else {
                        matches[next_idx].team_b = winner;
                    }
                }
            }
        }

        assert_eq!(picks.len(), 31);
        assert_eq!(
            calculate_score(&picks, &results, &matches, PointsPerRound::default()),
            80
        );
    }

    #[test]
    fn scoring_is_order_independent() {
        let matches = full_bracket();
        let user = Uuid::new_v4();
        let m1 = find(&matches, 1, 1);
        let m2 = find(&matches, 1, 2);
        let picks = vec![pick_for(user, m1.id, "T1"), pick_for(user, m2.id, "T3")];
        let mut results = vec![result_for(m1.id, "T1"), result_for(m2.id, "T3")];

        let forward = calculate_score(&picks, &results, &matches, PointsPerRound::default());
        results.reverse();
        let backward = calculate_score(&picks, &results, &matches, PointsPerRound::default());
        assert_eq!(forward, backward);
        assert_eq!(forward, 2);
    }

    #[test]
    fn all_scores_sorted_by_score_then_username() {
        let matches = full_bracket();
        let alice = user_named("alice");
        let bob = user_named("bob");
        let carol = user_named("carol");
        let m = find(&matches, 1, 1);

        let all_picks = vec![
            pick_for(alice.id, m.id, "T2"),
            pick_for(bob.id, m.id, "T1"),
            pick_for(carol.id, m.id, "T2"),
        ];
        let results = vec![result_for(m.id, "T1")];

        let scores = calculate_all_scores(
            &[alice, bob, carol],
            &all_picks,
            &results,
            &matches,
            PointsPerRound::default(),
        );

        let order: Vec<_> = scores.iter().map(|s| s.username.as_str()).collect();
        assert_eq!(order, vec!["bob", "alice", "carol"]);
    }

    #[test]
    fn unmapped_round_contributes_zero() {
        assert_eq!(PointsPerRound::default().get(0), 0);
        assert_eq!(PointsPerRound::default().get(6), 0);
    }
}
