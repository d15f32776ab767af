use alloc::vec::Vec;

use crate::*;
pub use random::*;

mod random;

pub trait DeckGenerator {
    fn generate(self, config: &LevelConfig) -> Result<Board>;
}

/// Keeps tiles in the order the level lists them, for reproducible layouts.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FixedDeckGenerator;

impl DeckGenerator for FixedDeckGenerator {
    fn generate(self, config: &LevelConfig) -> Result<Board> {
        config.validate()?;
        Board::new(config.size(), fresh_tiles(config))
    }
}

/// Face-down tiles in level order, each id being its index in the level.
pub(crate) fn fresh_tiles(config: &LevelConfig) -> Vec<Tile> {
    config
        .tiles
        .iter()
        .enumerate()
        .map(|(index, value)| Tile::new(index as TileId, value.as_str()))
        .collect()
}
