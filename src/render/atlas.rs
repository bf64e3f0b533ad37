//! Atlas images keyed by path, each loaded once and shared by every tileset
//! that points at it.

use crate::error::MapError;
use crate::ir_map::IrMap;
use macroquad::prelude::*;
use std::collections::HashMap;

/// Index of an atlas inside an [`AtlasRegistry`], in tileset declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtlasId(pub usize);

/// A loaded atlas image.
#[derive(Debug, Clone)]
pub struct Atlas<T> {
    /// Image path the atlas was loaded from
    pub source: String,
    /// Backend texture handle
    pub texture: T,
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
}

/// Every distinct atlas image referenced by a map, loaded once.
#[derive(Debug, Clone)]
pub struct AtlasRegistry<T = Texture2D> {
    atlases: Vec<Atlas<T>>,
    by_source: HashMap<String, AtlasId>,
}

impl<T> Default for AtlasRegistry<T> {
    fn default() -> Self {
        Self {
            atlases: Vec::new(),
            by_source: HashMap::new(),
        }
    }
}

impl<T> AtlasRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an already-loaded texture. Re-inserting a source replaces
    /// the texture but keeps its id.
    pub fn insert(&mut self, source: impl Into<String>, texture: T, width: u32, height: u32) -> AtlasId {
        let source = source.into();
        if let Some(&id) = self.by_source.get(&source) {
            self.atlases[id.0] = Atlas {
                source,
                texture,
                width,
                height,
            };
            return id;
        }
        let id = AtlasId(self.atlases.len());
        self.by_source.insert(source.clone(), id);
        self.atlases.push(Atlas {
            source,
            texture,
            width,
            height,
        });
        id
    }

    #[inline]
    pub fn id_of(&self, source: &str) -> Option<AtlasId> {
        self.by_source.get(source).copied()
    }

    #[inline]
    pub fn get(&self, id: AtlasId) -> Option<&Atlas<T>> {
        self.atlases.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.atlases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atlases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AtlasId, &Atlas<T>)> {
        self.atlases.iter().enumerate().map(|(i, a)| (AtlasId(i), a))
    }
}

impl AtlasRegistry<Texture2D> {
    /// Loads every distinct tileset image of `map` as a macroquad texture.
    pub async fn load(map: &IrMap, filter: FilterMode) -> Result<Self, MapError> {
        let mut registry = Self::new();
        for ts in &map.tilesets {
            if registry.id_of(&ts.image).is_some() {
                continue;
            }
            let tex = load_texture(&ts.image)
                .await
                .map_err(|e| MapError::Texture {
                    path: ts.image.clone(),
                    message: e.to_string(),
                })?;
            tex.set_filter(filter);
            let (w, h) = (tex.width() as u32, tex.height() as u32);
            registry.insert(ts.image.clone(), tex, w, h);
        }
        tracing::info!(atlases = registry.len(), "loaded tileset atlases");
        Ok(registry)
    }
}
