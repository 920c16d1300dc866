use crate::foundation::error::{RunanimeError, RunanimeResult};
use crate::foundation::math::mul_div255_u8;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Fully transparent black.
pub const TRANSPARENT: PremulRgba8 = [0, 0, 0, 0];

/// Source-over blend of premultiplied `src` onto premultiplied `dst`.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);

    let mut out = [0u8; 4];
    for i in 0..4 {
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = src[i].saturating_add(dc);
    }
    out
}

/// Blend `src` over `dst` pixel by pixel; both buffers are premultiplied RGBA8 of equal length.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> RunanimeResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(RunanimeError::validation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Convert one straight-alpha pixel into premultiplied form.
pub fn premultiply(px: [u8; 4]) -> PremulRgba8 {
    let a = u16::from(px[3]);
    match px[3] {
        0 => TRANSPARENT,
        255 => px,
        _ => [
            mul_div255(u16::from(px[0]), a),
            mul_div255(u16::from(px[1]), a),
            mul_div255(u16::from(px[2]), a),
            px[3],
        ],
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let out = premultiply([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&out);
    }
}

/// Convert a premultiplied buffer back to straight alpha (for image encoders).
pub fn unpremultiply_rgba8(premul: &[u8]) -> Vec<u8> {
    let mut out = premul.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
