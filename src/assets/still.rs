use anyhow::Context;

use crate::assets::raster::{FrameSequence, RasterFrame};
use crate::foundation::error::{RunanimeError, RunanimeResult};
use crate::render::composite::premultiply_rgba8_in_place;

/// Decode one non-animated raster image into a premultiplied frame.
pub fn decode_still(bytes: &[u8]) -> RunanimeResult<RasterFrame> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| RunanimeError::decode(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(RunanimeError::decode(format!(
            "image has non-positive dimensions {width}x{height}"
        )));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    RasterFrame::new(width, height, rgba8_premul)
}

/// Decode each source independently and play them back with a uniform duration.
pub fn load_still_frames<B: AsRef<[u8]>>(
    sources: &[B],
    duration_ms: u32,
) -> RunanimeResult<FrameSequence> {
    if sources.is_empty() {
        return Err(RunanimeError::validation(
            "still frame loader needs at least one source",
        ));
    }
    check_uniform_duration(duration_ms)?;

    let frames = sources
        .iter()
        .enumerate()
        .map(|(i, src)| {
            decode_still(src.as_ref())
                .map(|f| (f, i64::from(duration_ms)))
                .map_err(|e| RunanimeError::decode(format!("source {i}: {e}")))
        })
        .collect::<RunanimeResult<Vec<_>>>()?;

    FrameSequence::new(frames)
}

/// Slice one sprite sheet row-major into `rows x cols` equally sized frames.
///
/// Cell size is the integer division of the sheet size; leftover pixels on the right and bottom
/// edges are ignored.
pub fn load_sheet_frames(
    bytes: &[u8],
    rows: u32,
    cols: u32,
    duration_ms: u32,
) -> RunanimeResult<FrameSequence> {
    if rows == 0 || cols == 0 {
        return Err(RunanimeError::validation(format!(
            "sprite sheet needs rows and cols >= 1, got {rows}x{cols}"
        )));
    }
    check_uniform_duration(duration_ms)?;

    let sheet = decode_still(bytes)?;
    let cell_w = sheet.width() / cols;
    let cell_h = sheet.height() / rows;
    if cell_w == 0 || cell_h == 0 {
        return Err(RunanimeError::decode(format!(
            "sprite sheet {}x{} too small for {rows}x{cols} cells",
            sheet.width(),
            sheet.height()
        )));
    }

    let sheet_stride = sheet.width() as usize * 4;
    let cell_stride = cell_w as usize * 4;
    let mut frames = Vec::with_capacity((rows * cols) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let mut cell = Vec::with_capacity(cell_stride * cell_h as usize);
            for y in 0..cell_h {
                let start = (row * cell_h + y) as usize * sheet_stride + (col * cell_w) as usize * 4;
                cell.extend_from_slice(&sheet.as_bytes()[start..start + cell_stride]);
            }
            frames.push((
                RasterFrame::new(cell_w, cell_h, cell)?,
                i64::from(duration_ms),
            ));
        }
    }

    FrameSequence::new(frames)
}

fn check_uniform_duration(duration_ms: u32) -> RunanimeResult<()> {
    if duration_ms == 0 {
        return Err(RunanimeError::validation(
            "uniform frame duration must be at least 1 ms",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/still.rs"]
mod tests;
