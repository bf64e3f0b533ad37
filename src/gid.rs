//! Global tile ids and the flip flags Tiled packs into their high bits.

pub const FLIP_H: u32 = 0x8000_0000; // bit 31
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
pub const GID_MASK: u32 = 0x1FFF_FFFF; // keep lower 29 bits (bit 28 is free)

/// Raw global tile id as stored in layer data, flip bits included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub u32);

impl TileId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
    /// Global id with the flip bits stripped. `0` means an empty cell.
    #[inline]
    pub fn clean(self) -> u32 {
        self.0 & GID_MASK
    }
    #[inline]
    pub fn is_empty(self) -> bool {
        self.clean() == 0
    }
    #[inline]
    pub fn flip(self) -> Flip {
        Flip {
            horizontal: (self.0 & FLIP_H) != 0,
            vertical: (self.0 & FLIP_V) != 0,
            diagonal: (self.0 & FLIP_D) != 0,
        }
    }
}

/// Orientation of a placed tile.
///
/// `diagonal` is the anti-diagonal transpose Tiled uses to express 90°
/// rotations; it composes with the other two flags rather than being a
/// separate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flip {
    /// Mirror left and right.
    pub horizontal: bool,
    /// Mirror top and bottom.
    pub vertical: bool,
    /// Transpose before mirroring.
    pub diagonal: bool,
}

impl Flip {
    /// No flipping at all.
    pub const NONE: Flip = Flip {
        horizontal: false,
        vertical: false,
        diagonal: false,
    };

    /// Builds a flip from the three flags.
    pub const fn new(horizontal: bool, vertical: bool, diagonal: bool) -> Self {
        Flip {
            horizontal,
            vertical,
            diagonal,
        }
    }

    /// 3-bit key `(d << 2) | (h << 1) | v`.
    #[inline]
    pub fn key(self) -> usize {
        ((self.diagonal as usize) << 2) | ((self.horizontal as usize) << 1) | self.vertical as usize
    }

    /// All eight orientations, in key order.
    pub fn all() -> impl Iterator<Item = Flip> {
        (0..8usize).map(|k| Flip::new(k & 0b010 != 0, k & 0b001 != 0, k & 0b100 != 0))
    }
}

/// One tile's occurrence in a tile layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    /// Grid column.
    pub col: u32,
    /// Grid row.
    pub row: u32,
    /// Global id with flip bits stripped.
    pub gid: u32,
    /// Orientation flags of this placement.
    pub flip: Flip,
}

impl TilePlacement {
    /// Decodes a raw layer cell.
    pub fn from_raw(col: u32, row: u32, raw: TileId) -> Self {
        TilePlacement {
            col,
            row,
            gid: raw.clean(),
            flip: raw.flip(),
        }
    }
}
