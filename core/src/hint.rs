use alloc::vec::Vec;
use hashbrown::HashMap;
use rand::prelude::*;
use smallvec::SmallVec;

use crate::*;

/// One candidate pair per value among tiles a hint may still reveal.
///
/// Groups are visited in board order so a seeded rng gives the same pairs.
pub(crate) fn candidate_pairs<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Vec<[TileId; 2]> {
    let mut groups: HashMap<&str, SmallVec<[TileId; 2]>> = HashMap::new();
    for tile in board.iter().filter(|tile| tile.is_hint_candidate()) {
        groups.entry(tile.value()).or_default().push(tile.id());
    }

    let mut groups: Vec<_> = groups
        .into_values()
        .filter(|members| members.len() >= 2)
        .collect();
    groups.sort_unstable_by_key(|members| members[0]);

    groups
        .into_iter()
        .map(|members| {
            let first = rng.random_range(0..members.len());
            let mut second = rng.random_range(0..members.len() - 1);
            if second >= first {
                second += 1;
            }
            [members[first], members[second]]
        })
        .collect()
}

/// Uniformly picks one of the candidate pairs, if there are any.
pub(crate) fn pick_pair<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<[TileId; 2]> {
    let pairs = candidate_pairs(board, rng);
    log::trace!("Hint candidates: {:?}", pairs);
    pairs.choose(rng).copied()
}
