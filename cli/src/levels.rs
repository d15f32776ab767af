use std::fs;
use std::path::PathBuf;

use headtotoe_core::*;

/// Reads `level{N}.json` files from a directory.
#[derive(Clone, Debug)]
pub struct DirLevelSource {
    dir: PathBuf,
}

impl DirLevelSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, level: LevelNumber) -> PathBuf {
        self.dir.join(format!("level{level}.json"))
    }
}

impl LevelSource for DirLevelSource {
    fn load(&self, level: LevelNumber) -> Result<LevelConfig> {
        let path = self.path(level);
        log::debug!("Loading level {} from {}", level, path.display());
        let json = fs::read_to_string(&path).map_err(|err| GameError::LevelLoad {
            level,
            reason: format!("{}: {}", path.display(), err),
        })?;
        parse_level(level, &json)
    }

    fn level_count(&self) -> LevelNumber {
        (1..)
            .take_while(|&level| self.path(level).is_file())
            .last()
            .unwrap_or(0)
    }
}

/// Level data chosen on the command line.
#[derive(Clone, Debug)]
pub enum Levels {
    Bundled(BundledLevels),
    Dir(DirLevelSource),
}

impl LevelSource for Levels {
    fn load(&self, level: LevelNumber) -> Result<LevelConfig> {
        match self {
            Self::Bundled(source) => source.load(level),
            Self::Dir(source) => source.load(level),
        }
    }

    fn level_count(&self) -> LevelNumber {
        match self {
            Self::Bundled(source) => source.level_count(),
            Self::Dir(source) => source.level_count(),
        }
    }
}
