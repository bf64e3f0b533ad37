//! Elapsed-time clock and animation frame selection.

use crate::error::MapError;
use crate::ir_map::IrFrame;

/// Picks the local index shown at `elapsed_ms` by a looping frame list.
///
/// Fails when the list is empty or its durations sum to zero.
pub fn current_local_index(frames: &[IrFrame], elapsed_ms: u64) -> Result<u32, MapError> {
    let total: u64 = frames.iter().map(|f| f.duration as u64).sum();
    if total == 0 {
        return Err(MapError::DegenerateAnimation {
            tileset: None,
            tile: None,
        });
    }
    Ok(select(frames, elapsed_ms % total))
}

fn select(frames: &[IrFrame], position: u64) -> u32 {
    let mut threshold = 0u64;
    for frame in frames {
        threshold += frame.duration as u64;
        if position < threshold {
            return frame.tile_id;
        }
    }
    // position < total, so the loop always returns; keep the last frame anyway
    frames[frames.len() - 1].tile_id
}

/// A validated, non-degenerate tile animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<IrFrame>,
    total_ms: u64,
}

impl Animation {
    /// Validates a frame list. An empty list or a zero total duration is rejected.
    pub fn new(frames: Vec<IrFrame>) -> Result<Self, MapError> {
        let total_ms: u64 = frames.iter().map(|f| f.duration as u64).sum();
        if total_ms == 0 {
            return Err(MapError::DegenerateAnimation {
                tileset: None,
                tile: None,
            });
        }
        Ok(Self { frames, total_ms })
    }

    pub fn frames(&self) -> &[IrFrame] {
        &self.frames
    }

    /// Length of one loop in milliseconds.
    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    /// Local index shown at `elapsed_ms`.
    #[inline]
    pub fn local_index_at(&self, elapsed_ms: u64) -> u32 {
        select(&self.frames, elapsed_ms % self.total_ms)
    }
}

#[derive(Debug, Clone, Copy)]
enum ClockSource {
    /// Reads macroquad's frame clock
    Realtime { started_at: f64, offset_ms: u64 },
    /// Advanced explicitly by the host
    Manual,
}

/// Monotonic millisecond counter shared by every animated tile of a renderer.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    source: ClockSource,
    speed: f32,
    elapsed_ms: u64,
}

impl AnimationClock {
    /// Clock following `macroquad::time::get_time()`, starting at zero now.
    ///
    /// Needs a running macroquad context.
    pub fn realtime() -> Self {
        Self {
            source: ClockSource::Realtime {
                started_at: macroquad::time::get_time(),
                offset_ms: 0,
            },
            speed: 1.0,
            elapsed_ms: 0,
        }
    }

    /// Clock that only moves through [`AnimationClock::advance`].
    pub fn manual() -> Self {
        Self {
            source: ClockSource::Manual,
            speed: 1.0,
            elapsed_ms: 0,
        }
    }

    /// Scales how fast realtime flows into the clock. `0.0` freezes it.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.set_speed(speed);
        self
    }

    pub fn set_speed(&mut self, speed: f32) {
        let speed = speed.max(0.0);
        self.tick();
        if let ClockSource::Realtime { started_at, offset_ms } = &mut self.source {
            // rebase so that changing speed never moves the clock backwards
            *started_at = macroquad::time::get_time();
            *offset_ms = self.elapsed_ms;
        }
        self.speed = speed;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Pulls the latest reading from the time source and returns it.
    pub fn tick(&mut self) -> u64 {
        if let ClockSource::Realtime { started_at, offset_ms } = self.source {
            let secs = (macroquad::time::get_time() - started_at).max(0.0);
            let now = offset_ms + (secs * 1000.0 * self.speed as f64) as u64;
            self.elapsed_ms = self.elapsed_ms.max(now);
        }
        self.elapsed_ms
    }

    /// Moves the clock forward by `ms`, scaled by the speed factor.
    pub fn advance(&mut self, ms: u64) {
        let scaled = (ms as f64 * self.speed as f64) as u64;
        self.elapsed_ms = self.elapsed_ms.saturating_add(scaled);
        if let ClockSource::Realtime { offset_ms, .. } = &mut self.source {
            *offset_ms = offset_ms.saturating_add(scaled);
        }
    }

    /// Last reading, in milliseconds since the clock started.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}
