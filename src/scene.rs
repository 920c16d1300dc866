//! The set of sprites currently shown on one monitor.
//!
//! A [`Scene`] is always rebuilt wholesale from a [`SceneConfig`]; it is never patched in place,
//! so the overlay can only ever show a complete old scene or a complete new one.

use std::path::PathBuf;

use crate::assets::animated::DisposalMethod;
use crate::assets::loader::SpriteLoader;
use crate::foundation::core::{Canvas, PerMilleRect};
use crate::foundation::error::RunanimeError;
use crate::playback::instance::PlaybackInstance;

/// Smallest overlay size on either axis, in pixels.
pub const MIN_CANVAS_SIDE: u32 = 128;

/// Monitor the scene is laid out against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorSpec {
    /// Monitor identifier.
    pub id: String,
    /// Monitor resolution.
    pub size: Canvas,
}

/// One configured sprite: where it goes and which image it plays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Identifier used in logs (e.g. `anime/state`).
    pub label: String,
    /// Placement in per-mille of the monitor.
    pub rect: PerMilleRect,
    /// Resolved local image path.
    pub image: PathBuf,
    /// Disposal metadata saved alongside the image; empty when unknown.
    pub saved_disposal: Vec<DisposalMethod>,
}

/// Everything needed to build a scene for one monitor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneConfig {
    /// Target monitor.
    pub monitor: MonitorSpec,
    /// Placements in draw order.
    pub placements: Vec<Placement>,
    /// Rectangles of configured sprites whose image reference could not be resolved. They are
    /// never drawn but still count toward the canvas size.
    pub layout_only: Vec<PerMilleRect>,
}

impl SceneConfig {
    /// Bounding overlay size containing every placement and layout-only rectangle, floored at
    /// [`MIN_CANVAS_SIDE`].
    pub fn canvas(&self) -> Canvas {
        let (w, h) = self
            .placements
            .iter()
            .map(|p| p.rect)
            .chain(self.layout_only.iter().copied())
            .map(|r| r.far_corner_px(self.monitor.size))
            .fold((0i64, 0i64), |(w, h), (r, b)| (w.max(r), h.max(b)));
        let clamp = |v: i64| u32::try_from(v.max(0)).unwrap_or(u32::MAX);
        Canvas::new(clamp(w), clamp(h)).floored(MIN_CANVAS_SIDE)
    }
}

/// A placement whose image could not be loaded.
#[derive(Debug)]
pub struct SkippedPlacement {
    /// Placement label.
    pub label: String,
    /// Image path that failed.
    pub image: PathBuf,
    /// Why it failed.
    pub error: RunanimeError,
}

/// Result of [`Scene::build`]: the scene plus placements that were dropped.
#[derive(Debug)]
pub struct SceneBuild {
    /// Newly constructed scene.
    pub scene: Scene,
    /// Placements left out because their image failed to load.
    pub skipped: Vec<SkippedPlacement>,
}

/// Active playback instances and the overlay canvas that contains them.
#[derive(Clone, Debug)]
pub struct Scene {
    instances: Vec<PlaybackInstance>,
    canvas: Canvas,
}

impl Default for Scene {
    fn default() -> Self {
        Self::empty()
    }
}

impl Scene {
    /// Scene with no instances and the minimum canvas.
    pub fn empty() -> Self {
        Self {
            instances: Vec::new(),
            canvas: Canvas::new(MIN_CANVAS_SIDE, MIN_CANVAS_SIDE),
        }
    }

    /// Load every placement of `config` and lay them out.
    ///
    /// A placement that fails to load is reported in [`SceneBuild::skipped`] and left out; the
    /// build itself never fails, and may yield a scene with no instances.
    pub fn build(config: &SceneConfig, loader: &SpriteLoader) -> SceneBuild {
        let mut instances = Vec::with_capacity(config.placements.len());
        let mut skipped = Vec::new();

        for p in &config.placements {
            match loader.load(&p.image, &p.saved_disposal) {
                Ok(frames) => instances.push(PlaybackInstance::new(frames, p.rect)),
                Err(error) => skipped.push(SkippedPlacement {
                    label: p.label.clone(),
                    image: p.image.clone(),
                    error,
                }),
            }
        }

        SceneBuild {
            scene: Self {
                instances,
                canvas: config.canvas(),
            },
            skipped,
        }
    }

    /// Overlay canvas size in pixels.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Instances in draw order.
    pub fn instances(&self) -> &[PlaybackInstance] {
        &self.instances
    }

    /// Mutable access for advancing playback.
    pub fn instances_mut(&mut self) -> &mut [PlaybackInstance] {
        &mut self.instances
    }

    /// Number of active instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Return `true` when nothing is shown.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Advance every instance by the same delta; returns how many changed frame.
    pub fn advance(&mut self, delta_ms: i64) -> usize {
        self.instances
            .iter_mut()
            .map(|i| i.advance(delta_ms))
            .filter(|changed| *changed)
            .count()
    }
}
