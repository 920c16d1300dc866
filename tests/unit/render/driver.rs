use super::*;
use crate::foundation::core::Canvas;
use crate::foundation::error::RunanimeError;
use crate::render::backend::HeadlessBackend;
use crate::scene::{MonitorSpec, SceneConfig};

fn empty_config() -> RunanimeResult<SceneConfig> {
    Ok(SceneConfig {
        monitor: MonitorSpec {
            id: "m".into(),
            size: Canvas::new(1920, 1080),
        },
        placements: Vec::new(),
        layout_only: Vec::new(),
    })
}

#[test]
fn reload_signal_is_test_and_clear() {
    let s = ReloadSignal::new();
    assert!(!s.take());
    s.notify();
    s.notify();
    s.notify();
    assert!(s.is_pending());
    assert!(s.take());
    assert!(!s.take());
}

#[test]
fn reload_signal_clones_share_state_across_threads() {
    let s = ReloadSignal::new();
    let writers: Vec<_> = (0..4)
        .map(|_| {
            let s = s.clone();
            std::thread::spawn(move || s.notify())
        })
        .collect();
    for w in writers {
        w.join().unwrap();
    }
    assert!(s.take());
    assert!(!s.is_pending());
}

#[test]
fn start_configures_window_and_sizes_minimum_canvas() {
    let d = OverlayDriver::new(empty_config, HeadlessBackend::new(), SpriteLoader::default())
        .unwrap();
    let opts = d.backend().window_options().unwrap();
    assert_eq!(opts.title, "run-anime");
    assert!(opts.transparent && opts.always_on_top && opts.click_through);
    assert!(!opts.decorated);
    assert_eq!(d.backend().resizes(), &[Canvas::new(128, 128)]);
    assert_eq!(d.stats().rebuilds, 1);
    assert!(d.scene().is_empty());
}

#[test]
fn unusable_config_at_start_leaves_empty_overlay() {
    let source = || -> RunanimeResult<SceneConfig> { Err(RunanimeError::config("bad json")) };
    let mut d =
        OverlayDriver::new(source, HeadlessBackend::new(), SpriteLoader::default()).unwrap();
    assert!(d.scene().is_empty());
    assert_eq!(d.stats().failed_rebuilds, 1);
    assert_eq!(d.backend().resizes(), &[Canvas::new(128, 128)]);

    let report = d.tick(16).unwrap();
    assert_eq!(report.instances_drawn, 0);
    assert_eq!(d.backend().presented(), 1);
}

#[test]
fn non_config_errors_propagate_from_rebuild() {
    let source = || -> RunanimeResult<SceneConfig> { Err(RunanimeError::validation("oops")) };
    assert!(OverlayDriver::new(source, HeadlessBackend::new(), SpriteLoader::default()).is_err());
}

#[test]
fn pending_reload_rebuilds_once_per_tick() {
    let mut d = OverlayDriver::new(empty_config, HeadlessBackend::new(), SpriteLoader::default())
        .unwrap();
    let signal = d.reload_signal();
    signal.notify();
    signal.notify();

    assert!(d.tick(16).unwrap().rebuilt);
    assert!(!d.tick(16).unwrap().rebuilt);
    assert_eq!(d.stats().rebuilds, 2);
    assert_eq!(d.stats().ticks, 2);
    assert_eq!(d.backend().presented(), 2);
}
