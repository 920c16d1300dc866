use crate::foundation::math::per_mille_floor;

/// Surface or overlay dimensions in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas of `width x height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Raise each axis to at least `min` pixels.
    pub fn floored(self, min: u32) -> Self {
        Self {
            width: self.width.max(min),
            height: self.height.max(min),
        }
    }

    /// Number of pixels covered by the canvas.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Length in bytes of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        self.pixel_count().saturating_mul(4)
    }
}

/// Integer pixel rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Exclusive right edge.
    pub fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Return `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Placement rectangle in per-mille (0-1000) of a reference size.
///
/// Used so layouts survive monitor resolution changes: `x = 500` is always the horizontal middle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PerMilleRect {
    /// Left edge, per-mille of reference width.
    pub x: i32,
    /// Top edge, per-mille of reference height.
    pub y: i32,
    /// Width, per-mille of reference width.
    pub w: i32,
    /// Height, per-mille of reference height.
    pub h: i32,
}

impl PerMilleRect {
    /// Create a per-mille rectangle.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right/bottom corner in whole pixels against `reference`, floor semantics.
    pub fn far_corner_px(self, reference: Canvas) -> (i64, i64) {
        let right = per_mille_floor(
            i64::from(self.x) + i64::from(self.w),
            i64::from(reference.width),
        );
        let bottom = per_mille_floor(
            i64::from(self.y) + i64::from(self.h),
            i64::from(reference.height),
        );
        (right, bottom)
    }

    /// Map onto `reference` as a fractional pixel rectangle.
    pub fn to_pixels(self, reference: Canvas) -> PlacedRect {
        let rw = f64::from(reference.width);
        let rh = f64::from(reference.height);
        PlacedRect {
            x: f64::from(self.x) * rw / 1000.0,
            y: f64::from(self.y) * rh / 1000.0,
            width: f64::from(self.w) * rw / 1000.0,
            height: f64::from(self.h) * rh / 1000.0,
        }
    }
}

/// Fractional pixel rectangle produced by mapping a [`PerMilleRect`] onto a canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedRect {
    /// Left edge in pixels.
    pub x: f64,
    /// Top edge in pixels.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
