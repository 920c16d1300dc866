use crate::foundation::core::Canvas;
use crate::foundation::error::{RunanimeError, RunanimeResult};

/// Shortest playable frame duration; anything below is raised to this.
pub const MIN_FRAME_MS: u32 = 10;

/// Immutable RGBA8 image owned by the frame sequence that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterFrame {
    width: u32,
    height: u32,
    rgba8_premul: Vec<u8>,
}

impl RasterFrame {
    /// Wrap premultiplied RGBA8 bytes, row-major and tightly packed.
    pub fn new(width: u32, height: u32, rgba8_premul: Vec<u8>) -> RunanimeResult<Self> {
        let expected = Canvas::new(width, height).rgba_len();
        if rgba8_premul.len() != expected {
            return Err(RunanimeError::validation(format!(
                "raster frame {width}x{height} expects {expected} bytes, got {}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul,
        })
    }

    /// Fully transparent frame.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba8_premul: vec![0u8; Canvas::new(width, height).rgba_len()],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frame dimensions.
    pub fn size(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Premultiplied RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = &self.rgba8_premul[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }
}

/// One frame paired with its normalized display duration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimedFrame {
    /// Composited pixels.
    pub frame: RasterFrame,
    /// Display duration in milliseconds, always `>= MIN_FRAME_MS`.
    pub duration_ms: u32,
}

/// Ordered, non-empty list of frames with per-frame durations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSequence {
    frames: Vec<TimedFrame>,
}

impl FrameSequence {
    /// Build a sequence from raw `(frame, duration_ms)` pairs.
    ///
    /// Durations below [`MIN_FRAME_MS`] are raised to it. An empty input is a decode failure,
    /// never a valid empty sequence.
    pub fn new(frames: Vec<(RasterFrame, i64)>) -> RunanimeResult<Self> {
        if frames.is_empty() {
            return Err(RunanimeError::decode("frame sequence contains no frames"));
        }
        let frames = frames
            .into_iter()
            .map(|(frame, ms)| TimedFrame {
                frame,
                duration_ms: normalize_duration_ms(ms),
            })
            .collect();
        Ok(Self { frames })
    }

    /// Number of frames (always >= 1).
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`.
    pub fn get(&self, index: usize) -> Option<&TimedFrame> {
        self.frames.get(index)
    }

    /// All frames in playback order.
    pub fn frames(&self) -> &[TimedFrame] {
        &self.frames
    }

    /// Iterator over normalized durations.
    pub fn durations_ms(&self) -> impl Iterator<Item = u32> + '_ {
        self.frames.iter().map(|f| f.duration_ms)
    }

    /// Sum of all durations.
    pub fn total_duration_ms(&self) -> u64 {
        self.durations_ms().map(u64::from).sum()
    }
}

pub(crate) fn normalize_duration_ms(ms: i64) -> u32 {
    let ms = ms.clamp(i64::from(MIN_FRAME_MS), i64::from(u32::MAX));
    ms as u32
}

#[cfg(test)]
#[path = "../../tests/unit/assets/raster.rs"]
mod tests;
