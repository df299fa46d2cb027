use anyhow::anyhow;

use crate::color::{BlendingMode, Color, apply_blending};
use crate::device::DisplayOutput;
use crate::foundation::error::{StackError, StackResult};
use crate::foundation::geometry::Rect;

/// In-memory ARGB framebuffer.
///
/// Writes are blended against the current content with the requested
/// mode; anything outside the framebuffer extents is dropped.
#[derive(Clone, Debug)]
pub struct Offscreen {
    extents: Rect,
    pixels: Vec<Color>,
    bg_hint: Color,
    window: Rect,
    cursor: (i16, i16),
    mode: BlendingMode,
}

impl Offscreen {
    /// Framebuffer covering `extents`, filled with `fill`.
    pub fn new(extents: Rect, fill: Color) -> StackResult<Self> {
        if extents.is_empty() {
            return Err(StackError::validation("offscreen extents must not be empty"));
        }
        let area = extents.checked_area().ok_or_else(|| {
            StackError::validation(format!("offscreen extents {extents:?} are too large"))
        })?;
        Ok(Self {
            extents,
            pixels: vec![fill; area as usize],
            bg_hint: Color::TRANSPARENT,
            window: Rect::empty(),
            cursor: (0, 0),
            mode: BlendingMode::default(),
        })
    }

    /// Framebuffer of `width x height` anchored at the origin.
    pub fn with_size(width: u32, height: u32, fill: Color) -> StackResult<Self> {
        let w = i16::try_from(width)
            .map_err(|_| StackError::validation(format!("width {width} out of range")))?;
        let h = i16::try_from(height)
            .map_err(|_| StackError::validation(format!("height {height} out of range")))?;
        Self::new(Rect::new(0, 0, w - 1, h - 1), fill)
    }

    /// Set what [`DisplayOutput::bg_color_hint`] reports.
    pub fn set_bg_color_hint(&mut self, color: Color) {
        self.bg_hint = color;
    }

    /// Area covered by the framebuffer.
    pub fn extents(&self) -> Rect {
        self.extents
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Pixel at `(x, y)`; transparent outside the extents.
    pub fn pixel(&self, x: i16, y: i16) -> Color {
        self.index(x, y)
            .map_or(Color::TRANSPARENT, |i| self.pixels[i])
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Copy out as straight-alpha RGBA8.
    pub fn to_rgba_image(&self) -> StackResult<image::RgbaImage> {
        let mut raw = Vec::with_capacity(self.pixels.len() * 4);
        for c in &self.pixels {
            raw.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
        }
        let img = image::RgbaImage::from_raw(self.extents.width(), self.extents.height(), raw)
            .ok_or_else(|| anyhow!("rgba buffer does not match offscreen size"))?;
        Ok(img)
    }

    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if !self.extents.contains(x, y) {
            return None;
        }
        let col = (i32::from(x) - i32::from(self.extents.x_min())) as usize;
        let row = (i32::from(y) - i32::from(self.extents.y_min())) as usize;
        Some(row * self.extents.width() as usize + col)
    }

    fn put(&mut self, mode: BlendingMode, x: i16, y: i16, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = apply_blending(mode, self.pixels[i], color);
        }
    }

    fn advance(&mut self) {
        let (x, y) = self.cursor;
        if x < self.window.x_max() {
            self.cursor = (x + 1, y);
        } else {
            self.cursor = (self.window.x_min(), y.wrapping_add(1));
        }
    }
}

impl DisplayOutput for Offscreen {
    fn set_address(&mut self, window: Rect, mode: BlendingMode) {
        self.window = window;
        self.cursor = (window.x_min(), window.y_min());
        self.mode = mode;
    }

    fn write(&mut self, colors: &[Color]) {
        debug_assert!(!self.window.is_empty(), "write without address window");
        for &c in colors {
            let (x, y) = self.cursor;
            self.put(self.mode, x, y, c);
            self.advance();
        }
    }

    fn write_pixels(&mut self, mode: BlendingMode, xs: &[i16], ys: &[i16], colors: &[Color]) {
        for ((&x, &y), &c) in xs.iter().zip(ys).zip(colors) {
            self.put(mode, x, y, c);
        }
    }

    fn bg_color_hint(&self) -> Color {
        self.bg_hint
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/offscreen.rs"]
mod tests;
