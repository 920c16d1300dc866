use crate::foundation::core::Canvas;
use crate::foundation::error::RunanimeResult;
use crate::render::surface::{CpuSurface, DrawSurface};

/// Window title used by the overlay.
pub const WINDOW_TITLE: &str = "run-anime";

/// Window attributes the overlay asks of its presentation backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowOptions {
    /// Window title.
    pub title: String,
    /// Uncovered pixels show the desktop through.
    pub transparent: bool,
    /// Keep the window above normal windows.
    pub always_on_top: bool,
    /// Draw a title bar and border.
    pub decorated: bool,
    /// Let mouse input fall through to windows below.
    pub click_through: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: WINDOW_TITLE.to_string(),
            transparent: true,
            always_on_top: true,
            decorated: false,
            click_through: true,
        }
    }
}

/// Contract for the windowing layer that shows the composited overlay.
///
/// Window creation and the event loop belong to the implementor; the driver only configures
/// the window, draws into [`PresentationBackend::surface_mut`] and calls
/// [`PresentationBackend::present`] once per tick.
pub trait PresentationBackend {
    /// Apply window attributes.
    fn set_window_options(&mut self, opts: &WindowOptions) -> RunanimeResult<()>;

    /// Resize the window and its drawing surface to `size`.
    fn set_window_size(&mut self, size: Canvas) -> RunanimeResult<()>;

    /// Surface for this tick's composition.
    fn surface_mut(&mut self) -> &mut dyn DrawSurface;

    /// Show what was drawn since the last present.
    fn present(&mut self) -> RunanimeResult<()>;
}

/// Backend without a window: draws into a [`CpuSurface`] and records what it was asked to do.
#[derive(Debug)]
pub struct HeadlessBackend {
    surface: CpuSurface,
    options: Option<WindowOptions>,
    resizes: Vec<Canvas>,
    presented: u64,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    /// Backend with an empty surface; the driver sizes it on start.
    pub fn new() -> Self {
        Self {
            surface: CpuSurface::new(Canvas::default()),
            options: None,
            resizes: Vec::new(),
            presented: 0,
        }
    }

    /// Borrow the surface holding the last composition.
    pub fn surface(&self) -> &CpuSurface {
        &self.surface
    }

    /// Window options last applied, if any.
    pub fn window_options(&self) -> Option<&WindowOptions> {
        self.options.as_ref()
    }

    /// Every size passed to [`PresentationBackend::set_window_size`], in order.
    pub fn resizes(&self) -> &[Canvas] {
        &self.resizes
    }

    /// Number of presented ticks.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl PresentationBackend for HeadlessBackend {
    fn set_window_options(&mut self, opts: &WindowOptions) -> RunanimeResult<()> {
        self.options = Some(opts.clone());
        Ok(())
    }

    fn set_window_size(&mut self, size: Canvas) -> RunanimeResult<()> {
        self.surface.resize(size);
        self.resizes.push(size);
        Ok(())
    }

    fn surface_mut(&mut self) -> &mut dyn DrawSurface {
        &mut self.surface
    }

    fn present(&mut self) -> RunanimeResult<()> {
        self.presented += 1;
        Ok(())
    }
}
