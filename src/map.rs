//! The map renderer: lazily built layer batches, animation refresh and draw calls.

use crate::config::RendererConfig;
use crate::error::MapError;
use crate::ir_map::IrMap;
use crate::loader::json_loader::decode_map_file_to_ir;
use crate::render::animation::AnimationClock;
use crate::render::atlas::AtlasRegistry;
use crate::render::batch::LayerBatch;
use crate::render::resolver::TilesetResolver;
use crate::render::target::DrawTarget;
use macroquad::prelude::*;

/// Draws the tile layers of one map, batching quads per atlas and keeping
/// animated tiles up to date.
///
/// Layer batches are built on first use and cached for the renderer's
/// lifetime; call [`MapRenderer::invalidate_layer`] after editing the map.
pub struct MapRenderer<T = Texture2D> {
    map: IrMap,
    atlases: AtlasRegistry<T>,
    resolver: TilesetResolver,
    clock: AnimationClock,
    config: RendererConfig,
    layers: Vec<Option<LayerBatch>>,
}

impl MapRenderer<Texture2D> {
    /// Decodes a Tiled JSON map, loads its atlases and builds a renderer
    /// driven by macroquad's clock.
    pub async fn load(path: &str, config: RendererConfig) -> Result<Self, MapError> {
        let (ir, _base) = decode_map_file_to_ir(path)?;
        let atlases = AtlasRegistry::load(&ir, config.texture_filter).await?;
        Self::new(ir, atlases, config)
    }

    /// Renderer over already-loaded atlases, driven by macroquad's clock.
    pub fn new(map: IrMap, atlases: AtlasRegistry<Texture2D>, config: RendererConfig) -> Result<Self, MapError> {
        Self::with_clock(map, atlases, AnimationClock::realtime(), config)
    }
}

impl<T> MapRenderer<T> {
    /// Renderer with an explicit animation clock.
    ///
    /// The clock's speed is set from [`RendererConfig::animation_speed`].
    ///
    /// Fails if a tileset's atlas is missing from `atlases`, a tileset has an
    /// explicit column count of zero, an atlas is too narrow for a single
    /// column, or an animation has zero total duration.
    pub fn with_clock(
        map: IrMap,
        atlases: AtlasRegistry<T>,
        mut clock: AnimationClock,
        config: RendererConfig,
    ) -> Result<Self, MapError> {
        clock.set_speed(config.animation_speed);
        let resolver = TilesetResolver::new(&map, &atlases)?;
        tracing::info!(
            layers = map.layers.len(),
            tilesets = resolver.len(),
            atlases = atlases.len(),
            "created map renderer"
        );
        let layers = vec![None; map.layers.len()];
        Ok(Self {
            map,
            atlases,
            resolver,
            clock,
            config,
            layers,
        })
    }

    pub fn map(&self) -> &IrMap {
        &self.map
    }

    pub fn atlases(&self) -> &AtlasRegistry<T> {
        &self.atlases
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut AnimationClock {
        &mut self.clock
    }

    fn layer_index(&self, name: &str) -> Result<usize, MapError> {
        self.map
            .layer_index(name)
            .ok_or_else(|| MapError::UnknownLayer(name.to_owned()))
    }

    fn ensure_built(&mut self, idx: usize) -> &mut LayerBatch {
        let elapsed = self.clock.elapsed_ms();
        let (map, resolver) = (&self.map, &self.resolver);
        self.layers[idx].get_or_insert_with(|| LayerBatch::build(&map.layers[idx], resolver, elapsed))
    }

    /// Batch of the named layer, building it if needed.
    pub fn layer_batch(&mut self, name: &str) -> Result<&LayerBatch, MapError> {
        let idx = self.layer_index(name)?;
        Ok(self.ensure_built(idx))
    }

    /// Whether the named layer currently has a cached batch.
    pub fn is_built(&self, name: &str) -> bool {
        self.map
            .layer_index(name)
            .is_some_and(|idx| self.layers[idx].is_some())
    }

    /// Reads the clock once and moves every animated tile of every layer to
    /// its current frame. Unbuilt layers are built first.
    pub fn update_animations(&mut self) {
        if !self.config.animations_enabled {
            return;
        }
        let now = self.clock.tick();
        for idx in 0..self.layers.len() {
            self.ensure_built(idx);
        }
        for batch in self.layers.iter_mut().flatten() {
            batch.update_animations(&self.resolver, now);
        }
    }

    /// Draws one layer by name: one submission per atlas the layer uses.
    pub fn draw_layer<D: DrawTarget<T>>(&mut self, target: &mut D, name: &str) -> Result<(), MapError> {
        let idx = self.layer_index(name)?;
        self.draw_index(target, idx);
        Ok(())
    }

    /// Draws every layer in map order. Layers marked invisible are left out
    /// only when [`RendererConfig::skip_hidden_layers`] is set.
    pub fn draw<D: DrawTarget<T>>(&mut self, target: &mut D) {
        for idx in 0..self.map.layers.len() {
            if self.map.layers[idx].visible || !self.config.skip_hidden_layers {
                self.draw_index(target, idx);
            }
        }
    }

    fn draw_index<D: DrawTarget<T>>(&mut self, target: &mut D, idx: usize) {
        self.ensure_built(idx);
        let Some(batch) = self.layers[idx].as_ref() else {
            return;
        };
        for (atlas_id, vertices) in batch.batches() {
            if let Some(atlas) = self.atlases.get(atlas_id) {
                target.draw_quads(vertices, &atlas.texture);
            }
        }
    }

    /// Drops the cached batch of the named layer; it is rebuilt on next use.
    pub fn invalidate_layer(&mut self, name: &str) -> Result<(), MapError> {
        let idx = self.layer_index(name)?;
        if self.layers[idx].take().is_some() {
            tracing::debug!(layer = name, "invalidated layer batch");
        }
        Ok(())
    }

    /// Drops every cached batch.
    pub fn invalidate_all(&mut self) {
        self.layers.iter_mut().for_each(|l| *l = None);
        tracing::debug!("invalidated all layer batches");
    }

    /// Mutable access to the map model. Cached batches are not refreshed;
    /// invalidate the layers you change.
    pub fn map_mut(&mut self) -> &mut IrMap {
        &mut self.map
    }
}
