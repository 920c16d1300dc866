use std::path::Path;

/// Leading bytes of every GIF87a/GIF89a container.
pub const GIF_MAGIC: &[u8] = b"GIF8";

/// Which loader a source is routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Animated container with per-frame disposal and delays.
    Animated,
    /// Ordinary raster image played as a single frame.
    Still,
}

/// Classify a source by extension first, then by its leading bytes.
///
/// Uploaded files can carry the wrong extension, so anything not named `.gif` is still sniffed
/// for the container signature.
pub fn detect_source_kind(path: &Path, leading: &[u8]) -> SourceKind {
    let ext_is_gif = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"));
    if ext_is_gif || leading.starts_with(GIF_MAGIC) {
        SourceKind::Animated
    } else {
        SourceKind::Still
    }
}
