//! Head-to-head matchup resolution.
//!
//! Fantasy platforms report a week's schedule as a flat list of roster
//! entries sharing a matchup id. Pairing is a lookup, and a roster with no
//! pair is a bye week, never an error.

use crate::types::{MatchupSlot, MatchupWeek};
use std::collections::HashMap;

/// Find a roster's opponent for the week.
///
/// Returns the opponent's roster id and current points, or `None` when the
/// roster is not scheduled, carries no matchup id, or shares its matchup id
/// with nobody (all bye shapes).
pub fn resolve_opponent(slots: &[MatchupSlot], target_roster_id: u64) -> Option<(u64, f64)> {
    let target = slots.iter().find(|s| s.roster_id == target_roster_id)?;
    let matchup_id = target.matchup_id?;

    slots
        .iter()
        .find(|s| s.matchup_id == Some(matchup_id) && s.roster_id != target_roster_id)
        .map(|s| (s.roster_id, s.points))
}

impl MatchupWeek {
    /// Group flat records into head-to-head pairs.
    ///
    /// Unpaired records (byes) are dropped; pairs come out ordered by
    /// matchup id so repeated builds are identical.
    pub fn from_slots(week: u32, slots: &[MatchupSlot]) -> Self {
        let mut by_matchup: HashMap<u64, Vec<u64>> = HashMap::new();
        for slot in slots {
            if let Some(matchup_id) = slot.matchup_id {
                by_matchup.entry(matchup_id).or_default().push(slot.roster_id);
            }
        }

        let mut matchup_ids: Vec<u64> = by_matchup
            .iter()
            .filter(|(_, rosters)| rosters.len() >= 2)
            .map(|(id, _)| *id)
            .collect();
        matchup_ids.sort_unstable();

        let pairs = matchup_ids
            .into_iter()
            .map(|id| {
                let rosters = &by_matchup[&id];
                (rosters[0], rosters[1])
            })
            .collect();

        Self { week, pairs }
    }
}
