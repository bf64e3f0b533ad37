//! Draw submission: the [`DrawTarget`] seam and the macroquad mesh backend.

use crate::render::batch::TileVertex;
use macroquad::prelude::*;

/// Something quad batches can be submitted to.
pub trait DrawTarget<T> {
    /// Draws `vertices` (whole quads, `TL, BL, BR, TR`) textured with `texture`.
    /// Texture coordinates are in atlas pixels.
    fn draw_quads(&mut self, vertices: &[TileVertex], texture: &T);
}

// Stays under macroquad's default per-draw-call capacity
// (10000 vertices / 5000 indices).
const QUADS_PER_MESH: usize = 800;

/// Draws into the current macroquad camera.
#[derive(Default)]
pub struct Screen {
    tint: Option<Color>,
    mesh_vertices: Vec<Vertex>,
    mesh_indices: Vec<u16>,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Multiplies every tile by `tint`.
    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = Some(tint);
        self
    }
}

impl DrawTarget<Texture2D> for Screen {
    fn draw_quads(&mut self, vertices: &[TileVertex], texture: &Texture2D) {
        let size = texture.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let color = self.tint.unwrap_or(WHITE);

        for chunk in vertices.chunks(QUADS_PER_MESH * 4) {
            self.mesh_vertices.clear();
            self.mesh_indices.clear();
            self.mesh_vertices.extend(chunk.iter().map(|v| {
                let uv = v.tex_coords / size;
                Vertex::new(v.position.x, v.position.y, 0.0, uv.x, uv.y, color)
            }));
            for q in 0..(chunk.len() / 4) as u16 {
                let i = q * 4;
                // TL, BL, BR and TL, BR, TR
                self.mesh_indices
                    .extend_from_slice(&[i, i + 1, i + 2, i, i + 2, i + 3]);
            }

            let mesh = Mesh {
                vertices: std::mem::take(&mut self.mesh_vertices),
                indices: std::mem::take(&mut self.mesh_indices),
                texture: Some(texture.clone()),
            };
            draw_mesh(&mesh);
            // hand the buffers back for the next chunk
            self.mesh_vertices = mesh.vertices;
            self.mesh_indices = mesh.indices;
        }
    }
}
