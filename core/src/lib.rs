#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::BitOr;
use core::time::Duration;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use error::*;
pub use generator::*;
pub use host::*;
pub use levels::*;
pub use scheduler::*;
pub use session::*;
pub use tile::*;
pub use types::*;
pub use view::*;

mod board;
mod error;
mod generator;
mod hint;
mod host;
mod levels;
mod scheduler;
mod session;
mod tile;
mod types;
mod view;

/// Level definition as shipped in the level data files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub level: LevelNumber,
    pub rows: Dim,
    pub cols: Dim,
    pub tiles: Vec<String>,
}

impl LevelConfig {
    pub fn new<I, T>(level: LevelNumber, (rows, cols): Dim2, tiles: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let config = Self {
            level,
            rows,
            cols,
            tiles: tiles.into_iter().map(Into::into).collect(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON level definition.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|err| GameError::LevelLoad {
            level: 0,
            reason: alloc::format!("malformed level data: {err}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let (rows, cols) = self.size();

        if self.level == 0 {
            return Err(LevelDefect::ZeroLevel.into());
        }
        if rows == 0 || cols == 0 {
            return Err(LevelDefect::EmptyGrid.into());
        }
        if self.total_tiles() % 2 != 0 {
            return Err(LevelDefect::OddCellCount { rows, cols }.into());
        }

        let expected = usize::from(self.total_tiles());
        if self.tiles.len() != expected {
            return Err(LevelDefect::SizeMismatch {
                rows,
                cols,
                expected,
                actual: self.tiles.len(),
            }
            .into());
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in &self.tiles {
            *counts.entry(value.as_str()).or_default() += 1;
        }
        // report in level order so the error is stable
        for value in &self.tiles {
            let count = counts[value.as_str()];
            if count % 2 != 0 {
                return Err(LevelDefect::UnpairedValue {
                    value: value.clone(),
                    count,
                }
                .into());
            }
        }

        Ok(())
    }

    pub const fn size(&self) -> Dim2 {
        (self.rows, self.cols)
    }

    pub const fn total_tiles(&self) -> TileCount {
        mult(self.rows, self.cols)
    }

    pub const fn total_pairs(&self) -> TileCount {
        self.total_tiles() / 2
    }

    /// Hints granted for a fresh session, one per level ordinal.
    pub const fn hint_budget(&self) -> u32 {
        self.level
    }

    /// Countdown for a fresh session: two seconds per tile plus the ordinal.
    pub const fn countdown(&self) -> Seconds {
        (2 * self.total_tiles() as Seconds).saturating_add(self.level)
    }
}

const DEFAULT_HINT_PALETTE: [&str; 7] = [
    "#FFC107", "#8BC34A", "#03A9F4", "#E91E63", "#9C27B0", "#FF5722", "#00BCD4",
];

/// Delays and presentation tokens used by a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Pause after a match before the selection is released.
    pub settle_delay_ms: u64,
    /// How long a mismatched pair stays face-up.
    pub reveal_delay_ms: u64,
    /// How long a hinted pair stays face-up.
    pub hint_exposure_ms: u64,
    pub tick_interval_ms: u64,
    pub hint_palette: Vec<HintColor>,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            settle_delay_ms: 500,
            reveal_delay_ms: 800,
            hint_exposure_ms: 2000,
            tick_interval_ms: 1000,
            hint_palette: DEFAULT_HINT_PALETTE
                .iter()
                .map(|&token| HintColor::new(token))
                .collect(),
        }
    }
}

impl Timings {
    pub const fn settle_delay(&self) -> Duration {
        millis(self.settle_delay_ms)
    }

    pub const fn reveal_delay(&self) -> Duration {
        millis(self.reveal_delay_ms)
    }

    pub const fn hint_exposure(&self) -> Duration {
        millis(self.hint_exposure_ms)
    }

    /// Never zero, a zero interval would tick forever.
    pub const fn tick_interval(&self) -> Duration {
        if self.tick_interval_ms == 0 {
            millis(1)
        } else {
            millis(self.tick_interval_ms)
        }
    }

    /// Color for the hint with the given ordinal, cycling through the palette.
    pub fn hint_color(&self, cursor: usize) -> Option<HintColor> {
        if self.hint_palette.is_empty() {
            return None;
        }
        self.hint_palette
            .get(cursor % self.hint_palette.len())
            .cloned()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SelectOutcome {
    NoChange,
    Flipped,
    Matched,
    Mismatched,
    Won,
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HintOutcome {
    NoChange,
    Revealed([TileId; 2]),
}

impl HintOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Revealed(_))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AdvanceOutcome {
    NoChange,
    Changed,
    Failed,
    Succeeded,
}

impl AdvanceOutcome {
    pub const fn has_update(self) -> bool {
        use AdvanceOutcome::*;
        match self {
            NoChange => false,
            Changed => true,
            Failed => true,
            Succeeded => true,
        }
    }
}

impl BitOr for AdvanceOutcome {
    type Output = AdvanceOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use AdvanceOutcome::*;
        match (self, rhs) {
            (Succeeded, _) => Succeeded,
            (_, Succeeded) => Succeeded,
            (Failed, _) => Failed,
            (_, Failed) => Failed,
            (Changed, _) => Changed,
            (_, Changed) => Changed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn derived_fields_follow_level_ordinal_and_size() {
        let config = LevelConfig::new(3, (2, 2), ["a", "a", "b", "b"]).unwrap();

        assert_eq!(config.total_pairs(), 2);
        assert_eq!(config.hint_budget(), 3);
        assert_eq!(config.countdown(), 2 * 4 + 3);
    }

    #[test]
    fn rejects_size_mismatch() {
        let err = LevelConfig::new(1, (2, 2), ["a", "a"]).unwrap_err();

        assert_eq!(
            err,
            GameError::InvalidLevel(LevelDefect::SizeMismatch {
                rows: 2,
                cols: 2,
                expected: 4,
                actual: 2,
            })
        );
    }

    #[test]
    fn rejects_odd_grid_and_unpaired_values() {
        assert_eq!(
            LevelConfig::new(1, (1, 3), ["a", "a", "a"]).unwrap_err(),
            GameError::InvalidLevel(LevelDefect::OddCellCount { rows: 1, cols: 3 })
        );
        assert_eq!(
            LevelConfig::new(1, (2, 2), ["a", "b", "a", "c"]).unwrap_err(),
            GameError::InvalidLevel(LevelDefect::UnpairedValue {
                value: "b".into(),
                count: 1,
            })
        );
    }

    #[test]
    fn rejects_zero_level_and_empty_grid() {
        assert_eq!(
            LevelConfig::new(0, (1, 2), ["a", "a"]).unwrap_err(),
            GameError::InvalidLevel(LevelDefect::ZeroLevel)
        );
        assert_eq!(
            LevelConfig::new(1, (0, 2), Vec::<String>::new()).unwrap_err(),
            GameError::InvalidLevel(LevelDefect::EmptyGrid)
        );
    }

    #[test]
    fn accepts_values_repeated_in_multiples_of_two() {
        assert!(LevelConfig::new(1, (2, 2), ["a", "a", "a", "a"]).is_ok());
    }

    #[test]
    fn parses_json_level() {
        let config =
            LevelConfig::from_json(r#"{"level":2,"rows":1,"cols":2,"tiles":["eye","eye"]}"#)
                .unwrap();

        assert_eq!(config.level, 2);
        assert_eq!(config.tiles, vec!["eye", "eye"]);
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        let err = LevelConfig::from_json(r#"{"level":2,"rows":1}"#).unwrap_err();

        assert!(matches!(err, GameError::LevelLoad { .. }));
    }

    #[test]
    fn hint_colors_cycle_through_palette() {
        let timings = Timings::default();

        assert_eq!(timings.hint_color(0).unwrap().as_str(), "#FFC107");
        assert_eq!(timings.hint_color(7), timings.hint_color(0));

        let bare = Timings {
            hint_palette: Vec::new(),
            ..Timings::default()
        };
        assert_eq!(bare.hint_color(0), None);
    }

    #[test]
    fn advance_outcomes_merge_by_priority() {
        use AdvanceOutcome::*;

        assert_eq!(NoChange | Changed, Changed);
        assert_eq!(Changed | Failed, Failed);
        assert_eq!(Succeeded | Changed, Succeeded);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
