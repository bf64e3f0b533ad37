//! Renderer options.

use macroquad::prelude::FilterMode;

/// Rendering options for a [`crate::MapRenderer`].
#[derive(Debug, Clone, Copy)]
pub struct RendererConfig {
    /// Sampling filter for atlas textures (default: nearest)
    pub texture_filter: FilterMode,
    /// Multiplier on the realtime animation clock; `0.0` freezes animations (default: 1.0)
    pub animation_speed: f32,
    /// Whether `update_animations` does anything (default: true)
    pub animations_enabled: bool,
    /// Whether whole-map draws leave out layers marked invisible (default: false)
    pub skip_hidden_layers: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            texture_filter: FilterMode::Nearest,
            animation_speed: 1.0,
            animations_enabled: true,
            skip_hidden_layers: false,
        }
    }
}
