//! Animated container (GIF) decoding into fully composited frames.
//!
//! Sub-frames in the container may cover only part of the logical screen and rely on the
//! previous sub-frame's disposal rule to decide what remains visible underneath. This module
//! replays those rules on one accumulation canvas and emits a deep copy of the canvas after
//! every sub-frame, so playback can show any frame without knowing about disposal at all.

use std::io::{Cursor, Read};

use crate::assets::raster::{FrameSequence, RasterFrame};
use crate::foundation::core::{Canvas, PixelRect};
use crate::foundation::error::{RunanimeError, RunanimeResult};
use crate::render::composite::{over, premultiply_rgba8_in_place};

/// Duration used for sub-frames that carry no delay.
pub const DEFAULT_DELAY_MS: i64 = 100;

/// Upper bound on the pixel memory one decode may hold: the accumulation canvas plus one
/// composited copy per sub-frame.
pub const MAX_DECODE_BYTES: usize = 512 * 1024 * 1024;

/// Rule applied to the accumulation canvas after a sub-frame, before the next one is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisposalMethod {
    /// Leave the drawn content in place; frames accumulate.
    #[default]
    None,
    /// Erase the whole canvas to transparent.
    Background,
    /// Restore the canvas to its state from just before the sub-frame was drawn.
    Previous,
}

impl DisposalMethod {
    /// Decode a 3-bit container disposal code. Unspecified (0) and reserved codes map to `None`.
    pub fn from_code(code: u8) -> Self {
        match code {
            2 => Self::Background,
            3 => Self::Previous,
            _ => Self::None,
        }
    }

    /// Container disposal code for this method.
    pub fn code(self) -> u8 {
        match self {
            Self::None => 1,
            Self::Background => 2,
            Self::Previous => 3,
        }
    }

    fn from_container(method: gif::DisposalMethod) -> Self {
        match method {
            gif::DisposalMethod::Any | gif::DisposalMethod::Keep => Self::None,
            gif::DisposalMethod::Background => Self::Background,
            gif::DisposalMethod::Previous => Self::Previous,
        }
    }
}

/// Decode saved disposal metadata (one container code per sub-frame).
pub fn decode_saved_disposals(codes: &[u8]) -> Vec<DisposalMethod> {
    codes.iter().copied().map(DisposalMethod::from_code).collect()
}

/// Encode a disposal list as saved metadata.
pub fn encode_disposals(methods: &[DisposalMethod]) -> Vec<u8> {
    methods.iter().map(|m| m.code()).collect()
}

#[derive(Clone, Debug)]
struct SubFrame {
    bounds: PixelRect,
    rgba8_premul: Vec<u8>,
    delay_cs: Option<u16>,
    disposal: DisposalMethod,
}

impl SubFrame {
    fn duration_ms(&self) -> i64 {
        match self.delay_cs {
            Some(cs) => i64::from(cs) * 10,
            None => DEFAULT_DELAY_MS,
        }
    }
}

#[derive(Clone, Debug)]
struct ParsedContainer {
    canvas: Canvas,
    sub_frames: Vec<SubFrame>,
}

/// Decode an animated container held in memory.
///
/// When `saved_disposal` is non-empty it replaces the disposal tags embedded in the container;
/// sub-frames beyond its length use [`DisposalMethod::None`].
pub fn decode_animation(
    bytes: &[u8],
    saved_disposal: &[DisposalMethod],
) -> RunanimeResult<FrameSequence> {
    decode_animation_from_reader(Cursor::new(bytes), saved_disposal)
}

/// Decode an animated container from a reader. See [`decode_animation`].
#[tracing::instrument(level = "debug", skip_all, fields(saved = saved_disposal.len()))]
pub fn decode_animation_from_reader<R: Read>(
    reader: R,
    saved_disposal: &[DisposalMethod],
) -> RunanimeResult<FrameSequence> {
    let parsed = parse_container(reader)?;

    let embedded;
    let disposals = if saved_disposal.is_empty() {
        embedded = parsed
            .sub_frames
            .iter()
            .map(|s| s.disposal)
            .collect::<Vec<_>>();
        embedded.as_slice()
    } else {
        saved_disposal
    };

    let seq = compose_frames(&parsed, disposals)?;
    tracing::debug!(
        frames = seq.len(),
        width = parsed.canvas.width,
        height = parsed.canvas.height,
        total_ms = seq.total_duration_ms(),
        "decoded animated container"
    );
    Ok(seq)
}

/// Return the disposal tags embedded in a container, one per sub-frame.
///
/// This is the metadata an upload path stores next to the image so later loads can skip
/// re-deriving it.
pub fn extract_disposals(bytes: &[u8]) -> RunanimeResult<Vec<DisposalMethod>> {
    let parsed = parse_container(Cursor::new(bytes))?;
    Ok(parsed.sub_frames.iter().map(|s| s.disposal).collect())
}

fn parse_container<R: Read>(reader: R) -> RunanimeResult<ParsedContainer> {
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = opts
        .read_info(reader)
        .map_err(|e| RunanimeError::decode(format!("read gif header: {e}")))?;

    let screen = Canvas::new(u32::from(decoder.width()), u32::from(decoder.height()));
    check_decode_budget(screen, 1)?;

    let mut sub_frames = Vec::new();
    loop {
        let index = sub_frames.len();
        let Some(frame) = decoder
            .read_next_frame()
            .map_err(|e| RunanimeError::decode(format!("read gif frame {index}: {e}")))?
        else {
            break;
        };

        let bounds = PixelRect {
            x: u32::from(frame.left),
            y: u32::from(frame.top),
            width: u32::from(frame.width),
            height: u32::from(frame.height),
        };
        let expected = Canvas::new(bounds.width, bounds.height).rgba_len();
        if frame.buffer.len() != expected {
            return Err(RunanimeError::decode(format!(
                "gif frame {index} has {} pixel bytes, expected {expected}",
                frame.buffer.len()
            )));
        }

        let mut rgba8_premul = frame.buffer.to_vec();
        premultiply_rgba8_in_place(&mut rgba8_premul);

        sub_frames.push(SubFrame {
            bounds,
            rgba8_premul,
            delay_cs: (frame.delay > 0).then_some(frame.delay),
            disposal: DisposalMethod::from_container(frame.dispose),
        });
    }

    let Some(first) = sub_frames.first() else {
        return Err(RunanimeError::decode("gif contains no frames"));
    };

    let canvas = if screen.width == 0 || screen.height == 0 {
        Canvas::new(first.bounds.right(), first.bounds.bottom())
    } else {
        screen
    };
    if canvas.width == 0 || canvas.height == 0 {
        return Err(RunanimeError::decode("gif has zero-sized canvas"));
    }
    check_decode_budget(canvas, sub_frames.len() + 1)?;

    Ok(ParsedContainer { canvas, sub_frames })
}

fn check_decode_budget(canvas: Canvas, buffers: usize) -> RunanimeResult<()> {
    let needed = canvas.rgba_len().saturating_mul(buffers);
    if needed > MAX_DECODE_BYTES {
        return Err(RunanimeError::decode(format!(
            "gif canvas {}x{} with {buffers} frame buffers needs {needed} bytes, limit is {MAX_DECODE_BYTES}",
            canvas.width, canvas.height
        )));
    }
    Ok(())
}

fn disposal_at(disposals: &[DisposalMethod], index: usize) -> DisposalMethod {
    disposals.get(index).copied().unwrap_or_default()
}

fn compose_frames(
    parsed: &ParsedContainer,
    disposals: &[DisposalMethod],
) -> RunanimeResult<FrameSequence> {
    let size = parsed.canvas;
    let mut canvas = vec![0u8; size.rgba_len()];
    // Canvas as it was right before the most recent `Previous`-tagged sub-frame was drawn.
    let mut restore_point: Option<Vec<u8>> = None;
    let mut out = Vec::with_capacity(parsed.sub_frames.len());

    for (i, sub) in parsed.sub_frames.iter().enumerate() {
        if i > 0 {
            match disposal_at(disposals, i - 1) {
                DisposalMethod::None => {}
                DisposalMethod::Background => canvas.fill(0),
                DisposalMethod::Previous => match restore_point.take() {
                    Some(saved) => canvas = saved,
                    None => canvas.fill(0),
                },
            }
        }

        // Snapshot before drawing, never after.
        if disposal_at(disposals, i) == DisposalMethod::Previous {
            restore_point = Some(canvas.clone());
        }

        draw_sub_frame(&mut canvas, size, sub);

        let frame = RasterFrame::new(size.width, size.height, canvas.clone())?;
        out.push((frame, sub.duration_ms()));
    }

    FrameSequence::new(out)
}

fn draw_sub_frame(canvas: &mut [u8], size: Canvas, sub: &SubFrame) {
    let b = sub.bounds;
    let x_end = b.right().min(size.width);
    let y_end = b.bottom().min(size.height);
    if b.x >= x_end || b.y >= y_end {
        return;
    }

    let canvas_stride = size.width as usize * 4;
    let sub_stride = b.width as usize * 4;

    for y in b.y..y_end {
        let src_row = (y - b.y) as usize * sub_stride;
        let dst_row = y as usize * canvas_stride;
        for x in b.x..x_end {
            let si = src_row + (x - b.x) as usize * 4;
            let di = dst_row + x as usize * 4;
            let s = &sub.rgba8_premul[si..si + 4];
            let d = &canvas[di..di + 4];
            let px = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            canvas[di..di + 4].copy_from_slice(&px);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/animated.rs"]
mod tests;
