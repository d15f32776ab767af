use alloc::string::String;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::types::TileId;

/// Highlight token applied to a tile while a hint exposes it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HintColor(String);

impl HintColor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HintColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single grid cell.
///
/// Fields are only changed through the methods below, which keep
/// `matched ⇒ flipped` true at all times.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    id: TileId,
    value: String,
    flipped: bool,
    matched: bool,
    hint_used: bool,
    hinted_color: Option<HintColor>,
}

impl Tile {
    pub fn new(id: TileId, value: impl Into<String>) -> Self {
        Self {
            id,
            value: value.into(),
            flipped: false,
            matched: false,
            hint_used: false,
            hinted_color: None,
        }
    }

    pub const fn id(&self) -> TileId {
        self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub const fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub const fn is_matched(&self) -> bool {
        self.matched
    }

    pub const fn is_hint_used(&self) -> bool {
        self.hint_used
    }

    pub fn hinted_color(&self) -> Option<&HintColor> {
        self.hinted_color.as_ref()
    }

    /// Eligible to be revealed by a hint.
    pub const fn is_hint_candidate(&self) -> bool {
        !self.flipped && !self.matched && !self.hint_used
    }

    pub fn pairs_with(&self, other: &Tile) -> bool {
        self.id != other.id && self.value == other.value
    }

    /// Turn face-up as a player pick, dropping any hint highlight.
    pub(crate) fn flip_up(&mut self) {
        self.flipped = true;
        self.hinted_color = None;
    }

    pub(crate) fn reveal_hint(&mut self, color: Option<HintColor>) {
        self.flipped = true;
        self.hint_used = true;
        self.hinted_color = color;
    }

    pub(crate) fn mark_matched(&mut self) {
        self.flipped = true;
        self.matched = true;
    }

    /// Turn face-down again, matched tiles stay up.
    pub(crate) fn flip_down(&mut self) -> bool {
        if self.matched {
            return false;
        }
        let changed = self.flipped || self.hinted_color.is_some();
        self.flipped = false;
        self.hinted_color = None;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matched_tile_cannot_flip_down() {
        let mut tile = Tile::new(0, "head");
        tile.flip_up();
        tile.mark_matched();

        assert!(!tile.flip_down());
        assert!(tile.is_flipped());
        assert!(tile.is_matched());
    }

    #[test]
    fn player_flip_clears_hint_highlight() {
        let mut tile = Tile::new(3, "knee");
        tile.reveal_hint(Some(HintColor::new("#FFC107")));
        assert_eq!(tile.hinted_color().unwrap().as_str(), "#FFC107");

        tile.flip_up();

        assert!(tile.is_flipped());
        assert!(tile.is_hint_used());
        assert_eq!(tile.hinted_color(), None);
    }

    #[test]
    fn pairs_with_requires_distinct_ids() {
        let a = Tile::new(0, "toe");
        let b = Tile::new(1, "toe");

        assert!(a.pairs_with(&b));
        assert!(!a.pairs_with(&a.clone()));
        assert!(!a.pairs_with(&Tile::new(2, "heel")));
    }
}
