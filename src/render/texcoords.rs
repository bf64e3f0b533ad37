//! Atlas sub-rectangles and flip-aware texture coordinate assignment.

use crate::error::MapError;
use crate::gid::Flip;
use macroquad::prelude::*;

/// Corners of a quad, in the order vertices are emitted.
pub const QUAD_CORNERS: usize = 4;

/// A corner of the tile's source rectangle in the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

use Corner::*;

/// Source corner fed to each render corner `[TL, BL, BR, TR]`,
/// keyed by `(diagonal << 2) | (horizontal << 1) | vertical`.
const CORNER_TABLE: [[Corner; QUAD_CORNERS]; 8] = [
    [TopLeft, BottomLeft, BottomRight, TopRight],  // -
    [BottomLeft, TopLeft, TopRight, BottomRight],  // v
    [TopRight, BottomRight, BottomLeft, TopLeft],  // h
    [BottomRight, TopRight, TopLeft, BottomLeft],  // hv
    [TopLeft, TopRight, BottomRight, BottomLeft],  // d
    [TopRight, TopLeft, BottomLeft, BottomRight],  // dv
    [BottomLeft, BottomRight, TopRight, TopLeft],  // dh
    [BottomRight, BottomLeft, TopLeft, TopRight],  // dhv
];

/// Grid layout of a tileset inside its atlas, with the column count resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub tile_w: u32,
    pub tile_h: u32,
    pub margin: u32,
    pub spacing: u32,
    pub columns: u32,
}

/// Pixel rectangle of one tile inside an atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl TexRect {
    fn corner(&self, c: Corner) -> Vec2 {
        let (l, t) = (self.left as f32, self.top as f32);
        let (r, b) = (l + self.width as f32, t + self.height as f32);
        match c {
            TopLeft => vec2(l, t),
            TopRight => vec2(r, t),
            BottomLeft => vec2(l, b),
            BottomRight => vec2(r, b),
        }
    }
}

/// Number of tile columns in an atlas laid out as
/// `margin, tile, spacing, tile, ..., tile, margin`.
///
/// `w = 2m + c*t + (c-1)*s`, so `c = (w - 2m + s) / (t + s)`.
pub fn derive_columns(
    atlas: &str,
    atlas_width: u32,
    margin: u32,
    spacing: u32,
    tile_w: u32,
) -> Result<u32, MapError> {
    let usable = atlas_width as i64 - 2 * margin as i64 + spacing as i64;
    let step = tile_w as i64 + spacing as i64;
    let cols = if step > 0 && usable > 0 { usable / step } else { 0 };
    if cols <= 0 {
        return Err(MapError::InvalidAtlasGeometry {
            atlas: atlas.to_owned(),
            width: atlas_width,
            margin,
            spacing,
            tile_width: tile_w,
        });
    }
    Ok(cols as u32)
}

impl TileGrid {
    /// Source rectangle of `local` in the atlas.
    #[inline]
    pub fn rect(&self, local: u32) -> TexRect {
        let col = local % self.columns;
        let row = local / self.columns;
        TexRect {
            left: self.margin + col * (self.tile_w + self.spacing),
            top: self.margin + row * (self.tile_h + self.spacing),
            width: self.tile_w,
            height: self.tile_h,
        }
    }
}

/// Texture coordinates (atlas pixels) for the render corners `[TL, BL, BR, TR]`
/// of tile `local` drawn with orientation `flip`.
pub fn compute_tex_coords(local: u32, grid: &TileGrid, flip: Flip) -> [Vec2; QUAD_CORNERS] {
    let rect = grid.rect(local);
    CORNER_TABLE[flip.key()].map(|c| rect.corner(c))
}
