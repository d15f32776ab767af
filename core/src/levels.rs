use alloc::format;

use crate::*;

/// Supplies level definitions by ordinal.
pub trait LevelSource {
    fn load(&self, level: LevelNumber) -> Result<LevelConfig>;

    /// Highest ordinal this source can supply, levels start at 1.
    fn level_count(&self) -> LevelNumber;
}

impl<S: LevelSource + ?Sized> LevelSource for &S {
    fn load(&self, level: LevelNumber) -> Result<LevelConfig> {
        (**self).load(level)
    }

    fn level_count(&self) -> LevelNumber {
        (**self).level_count()
    }
}

const BUNDLED: [&str; 10] = [
    include_str!("../levels/level1.json"),
    include_str!("../levels/level2.json"),
    include_str!("../levels/level3.json"),
    include_str!("../levels/level4.json"),
    include_str!("../levels/level5.json"),
    include_str!("../levels/level6.json"),
    include_str!("../levels/level7.json"),
    include_str!("../levels/level8.json"),
    include_str!("../levels/level9.json"),
    include_str!("../levels/level10.json"),
];

/// The levels shipped with the game.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BundledLevels;

impl LevelSource for BundledLevels {
    fn load(&self, level: LevelNumber) -> Result<LevelConfig> {
        let json = level
            .checked_sub(1)
            .and_then(|index| BUNDLED.get(index as usize))
            .ok_or_else(|| GameError::LevelLoad {
                level,
                reason: "no such level".into(),
            })?;
        parse_level(level, json)
    }

    fn level_count(&self) -> LevelNumber {
        BUNDLED.len() as LevelNumber
    }
}

/// Parses the JSON for `level`, checking the file describes that level.
pub fn parse_level(level: LevelNumber, json: &str) -> Result<LevelConfig> {
    let config = LevelConfig::from_json(json).map_err(|err| match err {
        GameError::LevelLoad { reason, .. } => GameError::LevelLoad { level, reason },
        other => other,
    })?;
    if config.level != level {
        return Err(GameError::LevelLoad {
            level,
            reason: format!("data describes level {}", config.level),
        });
    }
    Ok(config)
}
