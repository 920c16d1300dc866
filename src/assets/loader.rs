use std::path::Path;

use crate::assets::animated::{DisposalMethod, decode_animation};
use crate::assets::detect::{SourceKind, detect_source_kind};
use crate::assets::raster::FrameSequence;
use crate::assets::still::load_still_frames;
use crate::foundation::error::{RunanimeError, RunanimeResult};

/// Per-frame duration for non-animated placements.
pub const DEFAULT_STILL_FRAME_MS: u32 = 150;

/// Loads placement images from disk and routes them to the right decoder.
#[derive(Clone, Debug)]
pub struct SpriteLoader {
    /// Uniform duration for still images.
    pub still_frame_ms: u32,
}

impl Default for SpriteLoader {
    fn default() -> Self {
        Self {
            still_frame_ms: DEFAULT_STILL_FRAME_MS,
        }
    }
}

impl SpriteLoader {
    /// Read `path` and decode it into a frame sequence.
    ///
    /// `saved_disposal` is only consulted for animated containers.
    #[tracing::instrument(level = "debug", skip(self, saved_disposal), fields(path = %path.display()))]
    pub fn load(
        &self,
        path: &Path,
        saved_disposal: &[DisposalMethod],
    ) -> RunanimeResult<FrameSequence> {
        let bytes = std::fs::read(path).map_err(|e| {
            RunanimeError::decode(format!("read image '{}': {e}", path.display()))
        })?;
        self.load_bytes(path, &bytes, saved_disposal)
    }

    /// Decode already-read bytes; `path` is only used for extension-based routing.
    pub fn load_bytes(
        &self,
        path: &Path,
        bytes: &[u8],
        saved_disposal: &[DisposalMethod],
    ) -> RunanimeResult<FrameSequence> {
        match detect_source_kind(path, bytes) {
            SourceKind::Animated => decode_animation(bytes, saved_disposal),
            SourceKind::Still => load_still_frames(&[bytes], self.still_frame_ms),
        }
    }
}
