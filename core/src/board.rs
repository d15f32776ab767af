use alloc::vec;
use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Tiles laid out on the level grid, addressable by position or by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    tiles: Array2<Tile>,
    slots: Vec<Dim2>,
}

impl Board {
    /// Lays `tiles` out row by row. Every id in `0..tiles.len()` must occur exactly once.
    pub fn new(size: Dim2, tiles: Vec<Tile>) -> Result<Self> {
        let expected = usize::from(mult(size.0, size.1));
        if tiles.len() != expected {
            return Err(LevelDefect::SizeMismatch {
                rows: size.0,
                cols: size.1,
                expected,
                actual: tiles.len(),
            }
            .into());
        }

        let mut slots: Vec<Option<Dim2>> = vec![None; expected];
        for (index, tile) in tiles.iter().enumerate() {
            let slot = slots
                .get_mut(usize::from(tile.id()))
                .ok_or(LevelDefect::BrokenArrangement)?;
            if slot.is_some() {
                return Err(LevelDefect::BrokenArrangement.into());
            }
            // both fit in Dim since index < rows * cols
            let row = (index / usize::from(size.1)) as Dim;
            let col = (index % usize::from(size.1)) as Dim;
            *slot = Some((row, col));
        }
        let slots = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(LevelDefect::BrokenArrangement)?;

        let tiles = Array2::from_shape_vec(size.to_nd_index(), tiles)
            .map_err(|_| LevelDefect::BrokenArrangement)?;

        Ok(Self { tiles, slots })
    }

    pub fn size(&self) -> Dim2 {
        let dim = self.tiles.dim();
        // constructed from a Dim2 shape
        (dim.0 as Dim, dim.1 as Dim)
    }

    pub fn total_tiles(&self) -> TileCount {
        self.slots.len() as TileCount
    }

    pub fn total_pairs(&self) -> TileCount {
        self.total_tiles() / 2
    }

    pub fn matched_pairs(&self) -> TileCount {
        (self.iter().filter(|tile| tile.is_matched()).count() / 2) as TileCount
    }

    pub fn remaining_pairs(&self) -> TileCount {
        self.total_pairs() - self.matched_pairs()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        let pos = self.position_of(id)?;
        Some(&self.tiles[pos.to_nd_index()])
    }

    pub fn position_of(&self, id: TileId) -> Option<Dim2> {
        self.slots.get(usize::from(id)).copied()
    }

    /// Tiles in display order, row by row.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        let pos = self.position_of(id)?;
        Some(&mut self.tiles[pos.to_nd_index()])
    }
}

impl Index<Dim2> for Board {
    type Output = Tile;

    fn index(&self, pos: Dim2) -> &Self::Output {
        &self.tiles[pos.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(values: &[&str]) -> Vec<Tile> {
        values
            .iter()
            .enumerate()
            .map(|(id, &value)| Tile::new(id as TileId, value))
            .collect()
    }

    #[test]
    fn tracks_positions_of_arranged_ids() {
        let mut arranged = tiles(&["a", "b", "a", "b"]);
        arranged.reverse();
        let board = Board::new((2, 2), arranged).unwrap();

        assert_eq!(board.position_of(3), Some((0, 0)));
        assert_eq!(board.position_of(0), Some((1, 1)));
        assert_eq!(board[(0, 1)].id(), 2);
        assert_eq!(board.tile(1).unwrap().value(), "b");
        assert_eq!(board.tile(4), None);
    }

    #[test]
    fn rejects_duplicate_or_missing_ids() {
        let mut arranged = tiles(&["a", "a"]);
        arranged[1] = Tile::new(0, "a");

        assert_eq!(
            Board::new((1, 2), arranged).unwrap_err(),
            GameError::InvalidLevel(LevelDefect::BrokenArrangement)
        );
        assert_eq!(
            Board::new((1, 2), vec![Tile::new(0, "a"), Tile::new(5, "a")]).unwrap_err(),
            GameError::InvalidLevel(LevelDefect::BrokenArrangement)
        );
    }

    #[test]
    fn counts_pairs() {
        let mut board = Board::new((2, 2), tiles(&["a", "a", "b", "b"])).unwrap();
        assert_eq!(board.remaining_pairs(), 2);

        board.tile_mut(0).unwrap().mark_matched();
        board.tile_mut(1).unwrap().mark_matched();

        assert_eq!(board.matched_pairs(), 1);
        assert_eq!(board.remaining_pairs(), 1);
    }
}
