//! Render Loop Driver: one tick per display refresh.
//!
//! Each tick either rebuilds the scene (when a reload is pending) or advances every instance by
//! the same delta, then clears the presentation surface and composites every current frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::assets::loader::SpriteLoader;
use crate::foundation::error::RunanimeResult;
use crate::render::backend::{PresentationBackend, WindowOptions};
use crate::render::surface::ScaleTranslate;
use crate::scene::Scene;
use crate::settings::store::ConfigSource;

/// "Configuration changed" flag shared between the settings writer and the render loop.
///
/// Any number of notifications before the next tick collapse into one rebuild.
#[derive(Clone, Debug, Default)]
pub struct ReloadSignal {
    pending: Arc<AtomicBool>,
}

impl ReloadSignal {
    /// New signal with no reload pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a rebuild on the next tick. Callable from any thread.
    pub fn notify(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Test-and-clear: `true` if a rebuild was pending.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Peek without clearing.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

/// What one [`OverlayDriver::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// A rebuild was attempted this tick.
    pub rebuilt: bool,
    /// Instances whose visible frame changed.
    pub frames_changed: usize,
    /// Instances composited onto the surface.
    pub instances_drawn: usize,
}

/// Counters accumulated over the driver's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Ticks run.
    pub ticks: u64,
    /// Successful scene rebuilds, including the initial one.
    pub rebuilds: u64,
    /// Rebuilds abandoned because the configuration could not be loaded.
    pub failed_rebuilds: u64,
    /// Placements skipped by the most recent successful rebuild.
    pub skipped_last_rebuild: usize,
    /// Instance draws issued.
    pub frames_drawn: u64,
}

/// Owns the scene and drives it against a presentation backend.
pub struct OverlayDriver<C, B> {
    source: C,
    backend: B,
    loader: SpriteLoader,
    scene: Scene,
    reload: ReloadSignal,
    stats: RenderStats,
}

impl<C, B> OverlayDriver<C, B>
where
    C: ConfigSource,
    B: PresentationBackend,
{
    /// Configure the window and build the initial scene.
    ///
    /// A configuration that cannot be loaded leaves the overlay empty until the next reload.
    pub fn new(source: C, backend: B, loader: SpriteLoader) -> RunanimeResult<Self> {
        Self::with_window_options(source, backend, loader, &WindowOptions::default())
    }

    /// Same as [`OverlayDriver::new`] with explicit window attributes.
    pub fn with_window_options(
        source: C,
        mut backend: B,
        loader: SpriteLoader,
        opts: &WindowOptions,
    ) -> RunanimeResult<Self> {
        backend.set_window_options(opts)?;

        let mut driver = Self {
            source,
            backend,
            loader,
            scene: Scene::empty(),
            reload: ReloadSignal::new(),
            stats: RenderStats::default(),
        };
        if let Err(e) = driver.rebuild_scene() {
            if !e.is_config() {
                return Err(e);
            }
            let canvas = driver.scene.canvas();
            driver.backend.set_window_size(canvas)?;
        }
        Ok(driver)
    }

    /// Handle for raising reloads from other threads.
    pub fn reload_signal(&self) -> ReloadSignal {
        self.reload.clone()
    }

    /// Current scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Presentation backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable presentation backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Lifetime counters.
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Run one presentation tick with `delta_ms` of wall-clock time.
    ///
    /// A pending reload rebuilds the scene instead of advancing it; a rebuild that fails on
    /// configuration keeps the previous scene and the tick carries on drawing it.
    pub fn tick(&mut self, delta_ms: i64) -> RunanimeResult<TickReport> {
        self.stats.ticks += 1;
        let mut report = TickReport::default();

        if self.reload.take() {
            report.rebuilt = true;
            if let Err(e) = self.rebuild_scene() {
                if !e.is_config() {
                    return Err(e);
                }
            }
        } else {
            report.frames_changed = self.scene.advance(delta_ms);
        }

        report.instances_drawn = self.compose()?;
        self.backend.present()?;
        Ok(report)
    }

    /// Load the configuration, build a new scene, swap it in and resize the window.
    ///
    /// On a configuration error the current scene is kept and the error returned. Placements
    /// whose image fails to load are skipped with a warning.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn rebuild_scene(&mut self) -> RunanimeResult<()> {
        let config = match self.source.load_scene_config() {
            Ok(c) => c,
            Err(e) => {
                self.stats.failed_rebuilds += 1;
                tracing::warn!(error = %e, "configuration unusable, keeping current scene");
                return Err(e);
            }
        };

        let build = Scene::build(&config, &self.loader);
        for s in &build.skipped {
            tracing::warn!(
                placement = %s.label,
                image = %s.image.display(),
                error = %s.error,
                "skipping placement"
            );
        }

        let old = std::mem::replace(&mut self.scene, build.scene);
        drop(old);
        self.stats.rebuilds += 1;
        self.stats.skipped_last_rebuild = build.skipped.len();

        let canvas = self.scene.canvas();
        self.backend.set_window_size(canvas)?;
        tracing::info!(
            monitor = %config.monitor.id,
            instances = self.scene.len(),
            skipped = build.skipped.len(),
            width = canvas.width,
            height = canvas.height,
            "scene rebuilt"
        );
        Ok(())
    }

    fn compose(&mut self) -> RunanimeResult<usize> {
        let canvas = self.scene.canvas();
        let surface = self.backend.surface_mut();
        surface.clear();

        let mut drawn = 0;
        for inst in self.scene.instances() {
            let frame = inst.current_frame();
            let Some(xf) = ScaleTranslate::fit(frame.size(), inst.placement().to_pixels(canvas))
            else {
                continue;
            };
            if xf.scale_x <= 0.0 || xf.scale_y <= 0.0 {
                continue;
            }
            surface.draw_image(frame, xf)?;
            drawn += 1;
        }
        self.stats.frames_drawn += drawn as u64;
        Ok(drawn)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/driver.rs"]
mod tests;
