//! Per-layer vertex batches grouped by atlas, with back-references to the
//! animated tiles whose texture coordinates change over time.

use crate::gid::TilePlacement;
use crate::ir_map::IrLayer;
use crate::render::animation::Animation;
use crate::render::atlas::AtlasId;
use crate::render::resolver::{TilesetId, TilesetResolver};
use crate::render::texcoords::{compute_tex_coords, QUAD_CORNERS};
use macroquad::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A render vertex: world position plus texture coordinate in atlas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileVertex {
    pub position: Vec2,
    pub tex_coords: Vec2,
}

/// Back-reference from an animated tile to its quad in a batch.
#[derive(Debug, Clone)]
pub struct AnimatedEntry {
    /// Batch holding the quad
    pub atlas: AtlasId,
    /// Index of the quad's first vertex in that batch
    pub offset: usize,
    /// The placement, for its flip flags
    pub placement: TilePlacement,
    /// Owning tileset, for its grid geometry
    pub tileset: TilesetId,
    /// Frames to cycle through
    pub animation: Arc<Animation>,
}

/// Vertex batches of one layer, one contiguous list per atlas.
///
/// Each list holds whole quads (`TL, BL, BR, TR`) in placement order.
#[derive(Debug, Clone, Default)]
pub struct LayerBatch {
    batches: BTreeMap<AtlasId, Vec<TileVertex>>,
    animated: Vec<AnimatedEntry>,
    dropped: usize,
}

impl LayerBatch {
    /// Builds the batches for `layer`, picking animation frames at `elapsed_ms`.
    ///
    /// Cells whose gid resolves to no tileset are dropped.
    pub fn build(layer: &IrLayer, resolver: &TilesetResolver, elapsed_ms: u64) -> Self {
        let mut batch = LayerBatch::default();
        batch.rebuild(layer, resolver, elapsed_ms);
        batch
    }

    /// Replaces every batch and animated entry with a fresh build of `layer`.
    pub fn rebuild(&mut self, layer: &IrLayer, resolver: &TilesetResolver, elapsed_ms: u64) {
        self.batches.clear();
        self.animated.clear();
        self.dropped = 0;

        for placement in layer.placements() {
            if placement.gid == 0 {
                continue;
            }
            let Some((ts_id, base_local)) = resolver.resolve(placement.gid) else {
                self.dropped += 1;
                continue;
            };
            let ts = resolver.tileset(ts_id);
            let (tw, th) = (ts.grid.tile_w as f32, ts.grid.tile_h as f32);

            let tl = layer.offset + vec2(placement.col as f32 * tw, placement.row as f32 * th);
            let positions = [
                tl,
                tl + vec2(0.0, th),
                tl + vec2(tw, th),
                tl + vec2(tw, 0.0),
            ];

            let vertices = self.batches.entry(ts.atlas).or_default();
            let mut local = base_local;
            if let Some(anim) = ts.animation(base_local) {
                self.animated.push(AnimatedEntry {
                    atlas: ts.atlas,
                    offset: vertices.len(),
                    placement,
                    tileset: ts_id,
                    animation: Arc::clone(anim),
                });
                local = anim.local_index_at(elapsed_ms);
            }

            let uvs = compute_tex_coords(local, &ts.grid, placement.flip);
            vertices.extend(
                positions
                    .iter()
                    .zip(uvs.iter())
                    .map(|(&position, &tex_coords)| TileVertex {
                        position,
                        tex_coords,
                    }),
            );
        }

        tracing::debug!(
            layer = %layer.name,
            quads = self.quad_count(),
            animated = self.animated.len(),
            atlases = self.batches.len(),
            "built layer batch"
        );
        if self.dropped > 0 {
            tracing::warn!(
                layer = %layer.name,
                dropped = self.dropped,
                "tiles reference gids outside every tileset and were skipped"
            );
        }
    }

    /// Rewrites the texture coordinates of every animated quad for `elapsed_ms`.
    /// Positions and vertex counts are left untouched.
    pub fn update_animations(&mut self, resolver: &TilesetResolver, elapsed_ms: u64) {
        for entry in &self.animated {
            let local = entry.animation.local_index_at(elapsed_ms);
            let grid = &resolver.tileset(entry.tileset).grid;
            let uvs = compute_tex_coords(local, grid, entry.placement.flip);
            let Some(vertices) = self.batches.get_mut(&entry.atlas) else {
                continue;
            };
            let quad = &mut vertices[entry.offset..entry.offset + QUAD_CORNERS];
            for (v, uv) in quad.iter_mut().zip(uvs) {
                v.tex_coords = uv;
            }
        }
    }

    /// Atlases with at least one quad, in atlas order.
    pub fn atlases(&self) -> impl Iterator<Item = AtlasId> + '_ {
        self.batches.keys().copied()
    }

    /// Vertices batched for `atlas`; empty if the layer never uses it.
    pub fn vertices(&self, atlas: AtlasId) -> &[TileVertex] {
        self.batches.get(&atlas).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn batches(&self) -> impl Iterator<Item = (AtlasId, &[TileVertex])> + '_ {
        self.batches.iter().map(|(id, v)| (*id, v.as_slice()))
    }

    pub fn animated(&self) -> &[AnimatedEntry] {
        &self.animated
    }

    /// Quads across all atlases.
    pub fn quad_count(&self) -> usize {
        self.batches.values().map(|v| v.len() / QUAD_CORNERS).sum()
    }

    /// Cells skipped by the last build because their gid matched no tileset.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
