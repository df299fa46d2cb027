//! Concrete pixel sources.

use crate::color::Color;
use crate::device::{Drawable, Surface};
use crate::foundation::error::{StackError, StackResult};
use crate::foundation::geometry::Rect;
use crate::rasterizable::Rasterizable;
use crate::render::draw_stream;
use crate::stream::{PixelStream, SliceStream, Streamable, UniformStream};

/// Owned row-major pixel buffer placed at `extents`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    extents: Rect,
    pixels: Vec<Color>,
}

impl Raster {
    /// Wrap `pixels`, which must hold exactly `extents.area()` colors.
    pub fn new(extents: Rect, pixels: Vec<Color>) -> StackResult<Self> {
        if pixels.len() != extents.area() as usize {
            return Err(StackError::validation(format!(
                "raster holds {} pixels, extents {:?} need {}",
                pixels.len(),
                extents,
                extents.area()
            )));
        }
        Ok(Self { extents, pixels })
    }

    /// Build a raster by evaluating `f(x, y)` over `extents`.
    pub fn from_fn(extents: Rect, mut f: impl FnMut(i16, i16) -> Color) -> Self {
        let mut pixels = Vec::with_capacity(extents.area() as usize);
        if !extents.is_empty() {
            for y in extents.y_min()..=extents.y_max() {
                for x in extents.x_min()..=extents.x_max() {
                    pixels.push(f(x, y));
                }
            }
        }
        Self { extents, pixels }
    }

    /// Row-major pixel data.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    fn pixel(&self, x: i16, y: i16) -> Color {
        if !self.extents.contains(x, y) {
            return Color::TRANSPARENT;
        }
        let col = (i32::from(x) - i32::from(self.extents.x_min())) as usize;
        let row = (i32::from(y) - i32::from(self.extents.y_min())) as usize;
        self.pixels[row * self.extents.width() as usize + col]
    }
}

impl Drawable for Raster {
    fn extents(&self) -> Rect {
        self.extents
    }

    fn draw_to(&self, surface: &mut Surface<'_>) {
        draw_stream(surface, self);
    }
}

impl Streamable for Raster {
    fn create_stream(&self) -> Box<dyn PixelStream + '_> {
        Box::new(SliceStream::new(&self.pixels))
    }
}

impl Rasterizable for Raster {
    fn read_colors(&self, xs: &[i16], ys: &[i16], out: &mut [Color]) {
        for ((&x, &y), o) in xs.iter().zip(ys).zip(out.iter_mut()) {
            *o = self.pixel(x, y);
        }
    }
}

/// Rectangle of a single color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolidColor {
    extents: Rect,
    color: Color,
}

impl SolidColor {
    /// `color` everywhere inside `extents`.
    pub fn new(extents: Rect, color: Color) -> Self {
        Self { extents, color }
    }

    /// The fill color.
    pub fn color(&self) -> Color {
        self.color
    }
}

impl Drawable for SolidColor {
    fn extents(&self) -> Rect {
        self.extents
    }

    fn draw_to(&self, surface: &mut Surface<'_>) {
        draw_stream(surface, self);
    }
}

impl Streamable for SolidColor {
    fn create_stream(&self) -> Box<dyn PixelStream + '_> {
        Box::new(UniformStream(self.color))
    }

    fn create_stream_clipped(&self, _clip: Rect) -> Box<dyn PixelStream + '_> {
        Box::new(UniformStream(self.color))
    }
}

impl Rasterizable for SolidColor {
    fn read_colors(&self, xs: &[i16], ys: &[i16], out: &mut [Color]) {
        for ((&x, &y), o) in xs.iter().zip(ys).zip(out.iter_mut()) {
            *o = if self.extents.contains(x, y) {
                self.color
            } else {
                Color::TRANSPARENT
            };
        }
    }

    fn read_color_rect(&self, rect: Rect, out: &mut [Color]) -> bool {
        if !rect.is_empty() && self.extents.contains_rect(rect) {
            out[0] = self.color;
            return true;
        }
        crate::rasterizable::read_color_rect_per_pixel(self, rect, out);
        let area = rect.area() as usize;
        area > 0 && out[1..area].iter().all(|&c| c == out[0])
    }
}

#[cfg(test)]
#[path = "../tests/unit/raster.rs"]
mod tests;
