use crate::assets::raster::RasterFrame;
use crate::foundation::core::{Canvas, PlacedRect};
use crate::foundation::error::{RunanimeError, RunanimeResult};
use crate::render::composite::over;

/// Independent X/Y scale followed by a translation, in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTranslate {
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Horizontal offset applied after scaling.
    pub translate_x: f64,
    /// Vertical offset applied after scaling.
    pub translate_y: f64,
}

impl ScaleTranslate {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Transform stretching an image of `image` size onto `target`.
    ///
    /// Returns `None` when the image is empty, since no scale maps it onto anything.
    pub fn fit(image: Canvas, target: PlacedRect) -> Option<Self> {
        if image.width == 0 || image.height == 0 {
            return None;
        }
        Some(Self {
            scale_x: target.width / f64::from(image.width),
            scale_y: target.height / f64::from(image.height),
            translate_x: target.x,
            translate_y: target.y,
        })
    }

    fn is_drawable(&self) -> bool {
        [self.scale_x, self.scale_y, self.translate_x, self.translate_y]
            .iter()
            .all(|v| v.is_finite())
            && self.scale_x > 0.0
            && self.scale_y > 0.0
    }
}

/// Pixel surface the overlay composites onto each tick.
pub trait DrawSurface {
    /// Current surface size in pixels.
    fn size(&self) -> Canvas;

    /// Reset every pixel to fully transparent.
    fn clear(&mut self);

    /// Source-over `frame` onto the surface through `xf`.
    fn draw_image(&mut self, frame: &RasterFrame, xf: ScaleTranslate) -> RunanimeResult<()>;
}

/// Premultiplied RGBA8 surface in system memory.
///
/// Images are sampled nearest-neighbour at destination pixel centres.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CpuSurface {
    size: Canvas,
    rgba8_premul: Vec<u8>,
}

impl CpuSurface {
    /// Transparent surface of `size`.
    pub fn new(size: Canvas) -> Self {
        Self {
            size,
            rgba8_premul: vec![0u8; size.rgba_len()],
        }
    }

    /// Reallocate to `size` if it differs; contents become transparent either way.
    pub fn resize(&mut self, size: Canvas) {
        if self.size != size {
            self.size = size;
            self.rgba8_premul = vec![0u8; size.rgba_len()];
        } else {
            self.clear();
        }
    }

    /// Premultiplied RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
        let p = &self.rgba8_premul[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> RunanimeResult<RasterFrame> {
        RasterFrame::new(
            self.size.width,
            self.size.height,
            self.rgba8_premul.clone(),
        )
    }
}

impl DrawSurface for CpuSurface {
    fn size(&self) -> Canvas {
        self.size
    }

    fn clear(&mut self) {
        self.rgba8_premul.fill(0);
    }

    fn draw_image(&mut self, frame: &RasterFrame, xf: ScaleTranslate) -> RunanimeResult<()> {
        if !xf.is_drawable() {
            return Err(RunanimeError::validation(format!(
                "image transform must have finite, positive scale: {xf:?}"
            )));
        }
        let (fw, fh) = (frame.width(), frame.height());
        if fw == 0 || fh == 0 || self.size.pixel_count() == 0 {
            return Ok(());
        }

        let span = |t: f64, s: f64, len: u32, limit: u32| -> (u32, u32) {
            let lo = t.floor().max(0.0);
            let hi = (t + s * f64::from(len)).ceil().min(f64::from(limit));
            if hi <= lo {
                (0, 0)
            } else {
                (lo as u32, hi as u32)
            }
        };
        let (x0, x1) = span(xf.translate_x, xf.scale_x, fw, self.size.width);
        let (y0, y1) = span(xf.translate_y, xf.scale_y, fh, self.size.height);

        let stride = self.size.width as usize * 4;
        let src = frame.as_bytes();
        let src_stride = fw as usize * 4;

        for dy in y0..y1 {
            let sy = ((f64::from(dy) + 0.5 - xf.translate_y) / xf.scale_y).floor();
            if sy < 0.0 || sy >= f64::from(fh) {
                continue;
            }
            let src_row = sy as usize * src_stride;
            let dst_row = dy as usize * stride;
            for dx in x0..x1 {
                let sx = ((f64::from(dx) + 0.5 - xf.translate_x) / xf.scale_x).floor();
                if sx < 0.0 || sx >= f64::from(fw) {
                    continue;
                }
                let si = src_row + sx as usize * 4;
                let di = dst_row + dx as usize * 4;
                let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
                let d = &mut self.rgba8_premul[di..di + 4];
                let out = over([d[0], d[1], d[2], d[3]], s);
                d.copy_from_slice(&out);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
