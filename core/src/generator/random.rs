use super::*;

/// Uniformly random arrangement, reproducible from its seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomDeckGenerator {
    seed: u64,
}

impl RandomDeckGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DeckGenerator for RandomDeckGenerator {
    fn generate(self, config: &LevelConfig) -> Result<Board> {
        use rand::prelude::*;

        config.validate()?;

        let mut tiles = fresh_tiles(config);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        // Fisher-Yates
        tiles.shuffle(&mut rng);

        log::debug!(
            "Arranged level {} ({}x{}) with seed {}",
            config.level,
            config.rows,
            config.cols,
            self.seed
        );
        Board::new(config.size(), tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn config() -> LevelConfig {
        LevelConfig::new(1, (2, 4), ["a", "a", "b", "b", "c", "c", "d", "d"]).unwrap()
    }

    fn ids(board: &Board) -> Vec<TileId> {
        board.iter().map(Tile::id).collect()
    }

    #[test]
    fn same_seed_same_arrangement() {
        let first = RandomDeckGenerator::new(42).generate(&config()).unwrap();
        let second = RandomDeckGenerator::new(42).generate(&config()).unwrap();

        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn arrangement_is_a_permutation_of_fresh_tiles() {
        let board = RandomDeckGenerator::new(7).generate(&config()).unwrap();

        let mut sorted = ids(&board);
        sorted.sort_unstable();
        assert_eq!(sorted, (0..8).collect::<Vec<TileId>>());
        assert!(board.iter().all(|tile| !tile.is_flipped()
            && !tile.is_matched()
            && !tile.is_hint_used()
            && tile.hinted_color().is_none()));
        for tile in board.iter() {
            assert_eq!(tile.value(), config().tiles[usize::from(tile.id())]);
        }
    }

    #[test]
    fn first_slot_is_roughly_uniform() {
        // every tile should land in slot 0 about 1/8 of the time
        let mut hits = vec![0u32; 8];
        for seed in 0..4000 {
            let board = RandomDeckGenerator::new(seed).generate(&config()).unwrap();
            hits[usize::from(board[(0, 0)].id())] += 1;
        }

        for count in hits {
            assert!((350..650).contains(&count), "skewed slot count {count}");
        }
    }

    #[test]
    fn fixed_generator_keeps_level_order() {
        let board = FixedDeckGenerator.generate(&config()).unwrap();

        assert_eq!(ids(&board), (0..8).collect::<Vec<TileId>>());
        assert_eq!(board[(1, 3)].value(), "d");
    }

    #[test]
    fn invalid_level_is_rejected() {
        let config = LevelConfig {
            level: 1,
            rows: 1,
            cols: 2,
            tiles: vec!["a".into(), "b".into()],
        };

        assert!(matches!(
            RandomDeckGenerator::new(1).generate(&config),
            Err(GameError::InvalidLevel(LevelDefect::UnpairedValue { .. }))
        ));
    }
}
