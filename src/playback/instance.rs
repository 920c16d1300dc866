use crate::assets::raster::{FrameSequence, MIN_FRAME_MS, RasterFrame};
use crate::foundation::core::PerMilleRect;

/// Largest delta applied by a single [`PlaybackInstance::advance`] call.
///
/// Keeps a resume from sleep or a long stall from visibly jumping through seconds of animation.
/// The clamp is per call, so splitting the same total time differently across calls can land
/// on a different frame.
pub const MAX_ADVANCE_MS: i64 = 2000;

/// One animated sprite on the overlay: its frames, playback position and placement.
#[derive(Clone, Debug)]
pub struct PlaybackInstance {
    frames: FrameSequence,
    frame_index: usize,
    elapsed_ms: u64,
    placement: PerMilleRect,
}

impl PlaybackInstance {
    /// Start playback of `frames` at frame 0.
    pub fn new(frames: FrameSequence, placement: PerMilleRect) -> Self {
        Self {
            frames,
            frame_index: 0,
            elapsed_ms: 0,
            placement,
        }
    }

    /// Move playback forward by `delta_ms` of wall-clock time.
    ///
    /// Returns `true` when the visible frame changed. Non-positive deltas are ignored; deltas
    /// above [`MAX_ADVANCE_MS`] are clamped. A single call may skip several short frames and
    /// wraps around indefinitely.
    pub fn advance(&mut self, delta_ms: i64) -> bool {
        if delta_ms <= 0 || self.frames.is_empty() || self.frames.total_duration_ms() == 0 {
            return false;
        }
        let delta = delta_ms.min(MAX_ADVANCE_MS) as u64;

        let before = self.frame_index;
        let mut dur = self.current_duration_ms();
        self.elapsed_ms += delta;
        while self.elapsed_ms >= dur {
            self.elapsed_ms -= dur;
            self.frame_index = (self.frame_index + 1) % self.frames.len();
            dur = self.current_duration_ms();
        }

        if before != self.frame_index {
            tracing::trace!(
                from = before,
                to = self.frame_index,
                total = self.frames.len(),
                "sprite frame changed"
            );
        }
        before != self.frame_index
    }

    /// Replay from the first frame.
    pub fn restart(&mut self) {
        self.frame_index = 0;
        self.elapsed_ms = 0;
    }

    /// Frame to show right now.
    pub fn current_frame(&self) -> &RasterFrame {
        &self.frames.frames()[self.frame_index].frame
    }

    /// Index of the visible frame, always `< frame_count()`.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Time already spent on the visible frame.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Number of frames in the sequence.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Placement in per-mille of the overlay canvas.
    pub fn placement(&self) -> PerMilleRect {
        self.placement
    }

    /// The frame sequence being played.
    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    fn current_duration_ms(&self) -> u64 {
        let d = self
            .frames
            .get(self.frame_index)
            .map_or(MIN_FRAME_MS, |f| f.duration_ms);
        u64::from(d.max(MIN_FRAME_MS))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/instance.rs"]
mod tests;
