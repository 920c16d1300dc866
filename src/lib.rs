//! Runanime plays animated sprites on a transparent, click-through desktop overlay.
//!
//! The crate is the playback engine behind the overlay:
//!
//! - Decode sprites into fully composited [`FrameSequence`]s ([`decode_animation`] for GIF
//!   containers with per-frame disposal, [`load_still_frames`] / [`load_sheet_frames`] for
//!   static rasters)
//! - Lay them out per monitor as a [`Scene`] of [`PlaybackInstance`]s
//! - Drive the scene from a presentation loop with [`OverlayDriver`], rebuilding it whenever a
//!   [`ReloadSignal`] fires
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;
mod playback;
mod render;
mod scene;
mod settings;

pub use crate::foundation::core::{Canvas, PerMilleRect, PixelRect, PlacedRect};
pub use crate::foundation::error::{RunanimeError, RunanimeResult};

pub use crate::assets::animated::{
    DEFAULT_DELAY_MS, DisposalMethod, decode_animation, decode_animation_from_reader,
    decode_saved_disposals, encode_disposals, extract_disposals,
};
pub use crate::assets::detect::{GIF_MAGIC, SourceKind, detect_source_kind};
pub use crate::assets::loader::{DEFAULT_STILL_FRAME_MS, SpriteLoader};
pub use crate::assets::raster::{FrameSequence, MIN_FRAME_MS, RasterFrame, TimedFrame};
pub use crate::assets::still::{decode_still, load_sheet_frames, load_still_frames};
pub use crate::playback::instance::{MAX_ADVANCE_MS, PlaybackInstance};
pub use crate::render::backend::{
    HeadlessBackend, PresentationBackend, WINDOW_TITLE, WindowOptions,
};
pub use crate::render::clock::FrameClock;
pub use crate::render::composite::{
    PremulRgba8, TRANSPARENT, over, over_in_place, premultiply, unpremultiply_rgba8,
};
pub use crate::render::driver::{OverlayDriver, ReloadSignal, RenderStats, TickReport};
pub use crate::render::surface::{CpuSurface, DrawSurface, ScaleTranslate};
pub use crate::scene::{
    MIN_CANVAS_SIDE, MonitorSpec, Placement, Scene, SceneBuild, SceneConfig, SkippedPlacement,
};
pub use crate::settings::model::{Anime, Monitor, Settings, State};
pub use crate::settings::store::{
    ConfigSource, SettingsStore, normalize_rel_path, resolve_image_ref, scene_config,
};
