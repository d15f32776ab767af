use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// What the rendering layer needs to draw one tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileView {
    pub id: TileId,
    pub value: String,
    pub flipped: bool,
    pub matched: bool,
    pub hinted_color: Option<HintColor>,
}

impl From<&Tile> for TileView {
    fn from(tile: &Tile) -> Self {
        Self {
            id: tile.id(),
            value: tile.value().into(),
            flipped: tile.is_flipped(),
            matched: tile.is_matched(),
            hinted_color: tile.hinted_color().cloned(),
        }
    }
}

/// Read-only snapshot of a session, tiles in display order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub level: LevelNumber,
    pub generation: u64,
    pub size: Dim2,
    pub tiles: Vec<TileView>,
    pub hint_budget: u32,
    pub countdown: Seconds,
    pub status: SessionStatus,
    pub remaining_pairs: TileCount,
    pub processing: bool,
}

impl SessionView {
    pub fn from_session(session: &Session) -> Self {
        Self {
            level: session.level(),
            generation: session.generation(),
            size: session.size(),
            tiles: session.board().iter().map(TileView::from).collect(),
            hint_budget: session.hint_budget(),
            countdown: session.countdown(),
            status: session.status(),
            remaining_pairs: session.remaining_pairs(),
            processing: session.is_processing(),
        }
    }

    /// Tiles grouped into grid rows.
    pub fn rows(&self) -> impl Iterator<Item = &[TileView]> {
        self.tiles.chunks(usize::from(self.size.1.max(1)))
    }
}
