use std::path::{Path, PathBuf};

use crate::assets::animated::decode_saved_disposals;
use crate::foundation::core::Canvas;
use crate::foundation::error::{RunanimeError, RunanimeResult};
use crate::scene::{MonitorSpec, Placement, SceneConfig};
use crate::settings::model::Settings;

/// Supplies the scene configuration on every rebuild.
///
/// Any closure returning a [`SceneConfig`] is a source, which keeps tests free of files.
pub trait ConfigSource {
    /// Produce the current configuration, or a [`RunanimeError::Config`] if it is unusable.
    fn load_scene_config(&self) -> RunanimeResult<SceneConfig>;
}

impl<F> ConfigSource for F
where
    F: Fn() -> RunanimeResult<SceneConfig>,
{
    fn load_scene_config(&self) -> RunanimeResult<SceneConfig> {
        self()
    }
}

/// Read-only view of the settings file and upload directory written by the configuration UI.
#[derive(Clone, Debug)]
pub struct SettingsStore {
    settings_path: PathBuf,
    uploads_root: PathBuf,
    monitor_id: Option<String>,
}

impl SettingsStore {
    /// Store reading `settings_path` and resolving images under `uploads_root`.
    pub fn new(settings_path: impl Into<PathBuf>, uploads_root: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
            uploads_root: uploads_root.into(),
            monitor_id: None,
        }
    }

    /// Pin the store to one monitor instead of the first configured one.
    pub fn with_monitor(mut self, id: impl Into<String>) -> Self {
        self.monitor_id = Some(id.into());
        self
    }

    /// Store at `<user config dir>/runanime/{settings.json,uploads}`.
    pub fn default_location() -> RunanimeResult<Self> {
        let dir = user_config_dir()
            .ok_or_else(|| RunanimeError::config("cannot determine user config directory"))?
            .join("runanime");
        Ok(Self::new(dir.join("settings.json"), dir.join("uploads")))
    }

    /// Path of the settings document.
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Root directory of uploaded images.
    pub fn uploads_root(&self) -> &Path {
        &self.uploads_root
    }

    /// Read the settings document; a missing file yields [`Settings::default`].
    pub fn load_settings(&self) -> RunanimeResult<Settings> {
        match std::fs::read(&self.settings_path) {
            Ok(bytes) => Settings::from_json_slice(&bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(RunanimeError::config(format!(
                "read settings '{}': {e}",
                self.settings_path.display()
            ))),
        }
    }
}

impl ConfigSource for SettingsStore {
    fn load_scene_config(&self) -> RunanimeResult<SceneConfig> {
        let settings = self.load_settings()?;
        scene_config(&settings, self.monitor_id.as_deref(), &self.uploads_root)
    }
}

/// Flatten `settings` into placements for one monitor.
///
/// Every state with a resolvable image becomes one placement, in anime then state order. A
/// state whose image reference cannot be resolved keeps its rectangle for canvas sizing only.
pub fn scene_config(
    settings: &Settings,
    monitor_id: Option<&str>,
    uploads_root: &Path,
) -> RunanimeResult<SceneConfig> {
    let mon = settings.monitor(monitor_id)?;
    let mut placements = Vec::new();
    let mut layout_only = Vec::new();

    for anime in settings.animes.iter().filter(|a| a.monitor_id == mon.id) {
        for state in anime.states.iter().filter(|s| !s.sprite_path.is_empty()) {
            let label = format!("{}/{}", anime.id, state.id);
            let Some(image) = resolve_image_ref(uploads_root, &state.sprite_path) else {
                tracing::debug!(%label, sprite_path = %state.sprite_path, "unresolvable sprite path");
                layout_only.push(state.effective_rect(anime));
                continue;
            };
            placements.push(Placement {
                label,
                rect: state.effective_rect(anime),
                image,
                saved_disposal: decode_saved_disposals(&state.gif_disposal),
            });
        }
    }

    Ok(SceneConfig {
        monitor: MonitorSpec {
            id: mon.id.clone(),
            size: Canvas::new(mon.width, mon.height),
        },
        placements,
        layout_only,
    })
}

/// Map an upload URL path (e.g. `/uploads/sprites/a.gif`) to a file under `uploads_root`.
///
/// Inline `data:` images, remote URLs, absolute paths outside the upload prefix and paths
/// escaping the root resolve to `None`.
pub fn resolve_image_ref(uploads_root: &Path, reference: &str) -> Option<PathBuf> {
    let r = reference.trim().replace('\\', "/");
    if r.is_empty() || r.starts_with("data:") || r.contains("://") {
        return None;
    }
    let rel = r
        .strip_prefix("/uploads/")
        .or_else(|| r.strip_prefix("uploads/"))
        .unwrap_or(&r);
    let norm = normalize_rel_path(rel).ok()?;
    Some(uploads_root.join(Path::new(&norm)))
}

/// Normalize and validate an upload-relative path.
///
/// The result uses `/` separators, drops `.` segments, and rejects absolute paths or parent
/// traversals (`..`).
pub fn normalize_rel_path(source: &str) -> RunanimeResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(RunanimeError::config("image paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(RunanimeError::config("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(RunanimeError::config("image path must contain a file name"));
    }

    Ok(out.join("/"))
}

fn user_config_dir() -> Option<PathBuf> {
    let non_empty = |key: &str| std::env::var_os(key).filter(|v| !v.is_empty());

    if cfg!(windows) {
        return non_empty("APPDATA").map(PathBuf::from);
    }
    if cfg!(target_os = "macos") {
        return non_empty("HOME").map(|h| PathBuf::from(h).join("Library/Application Support"));
    }
    non_empty("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| non_empty("HOME").map(|h| PathBuf::from(h).join(".config")))
}

#[cfg(test)]
#[path = "../../tests/unit/settings/store.rs"]
mod tests;
