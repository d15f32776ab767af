use core::time::Duration;

/// Grid axis used for level width and height.
pub type Dim = u8;

/// Count type used for tile and pair counts.
pub type TileCount = u16;

/// Stable tile identity, the tile's index in the level definition.
pub type TileId = u16;

/// Level ordinal, starting at 1.
pub type LevelNumber = u32;

/// Whole seconds left on the countdown.
pub type Seconds = u32;

/// Two-dimensional grid position `(row, col)`.
pub type Dim2 = (Dim, Dim);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Dim2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Dim, b: Dim) -> TileCount {
    let a = a as TileCount;
    let b = b as TileCount;
    a.saturating_mul(b)
}

pub(crate) const fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
