//! Static shape of the 32-team elimination tree: 5 rounds of
//! 16/8/4/2/1 matches, addressed by (round, position) slots.

pub const ROUNDS: i32 = 5;
pub const FINAL_ROUND: i32 = 5;

/// One pick per match: 16 + 8 + 4 + 2 + 1.
pub const MAX_PICKS: usize = 31;

pub fn matches_in_round(round: i32) -> usize {
    match round {
        1 => 16,
        2 => 8,
        3 => 4,
        4 => 2,
        5 => 1,
        _ => 0,
    }
}

/// Display names only, never business logic.
pub fn round_name(round: i32) -> &'static str {
    match round {
        1 => "Round of 32",
        2 => "Round of 16",
        3 => "Quarterfinals",
        4 => "Semifinals",
        5 => "Final",
        _ => "Unknown",
    }
}

/// Slot the winner of (round, position) advances into: positions 1 and 2
/// feed the next round's position 1, 3 and 4 feed position 2, and so on.
pub fn next_slot(round: i32, position: i32) -> (i32, i32) {
    (round + 1, (position + 1) / 2)
}

/// The two prior-round slots feeding (round, position). Round 1 has no
/// feeders; callers only ask for rounds 2 and up.
pub fn feeder_slots(round: i32, position: i32) -> ((i32, i32), (i32, i32)) {
    ((round - 1, 2 * position - 1), (round - 1, 2 * position))
}
