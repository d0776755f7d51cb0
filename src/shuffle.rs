use crate::classify;
use itertools::Itertools;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// Orders rooms by ascending zone priority, shuffling within each rank
/// tier with the run's shared generator so equally-ranked rooms take
/// turns at the front. Excluded rooms are left out entirely. Cross-tier
/// ordering is never affected by the shuffle.
pub fn order_by_priority<R: Rng>(
    rooms: &[String],
    excluded: &HashSet<String>,
    rng: &mut R,
) -> Vec<String> {
    rooms
        .iter()
        .filter(|room| !excluded.contains(*room))
        .map(|room| (classify::classify(room).priority, room.clone()))
        .into_group_map()
        .into_iter()
        .sorted_by_key(|(rank, _)| *rank)
        .flat_map(|(_, mut tier)| {
            tier.shuffle(rng);
            tier
        })
        .collect()
}
