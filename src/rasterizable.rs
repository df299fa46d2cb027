//! Random-access pixel sources.

use crate::PIXEL_BUFFER_SIZE;
use crate::color::Color;
use crate::foundation::geometry::Rect;
use crate::stream::{PixelStream, Streamable};

/// A source that can be sampled at arbitrary coordinates.
///
/// Coordinates outside [`Drawable::extents`](crate::device::Drawable::extents)
/// read as [`Color::TRANSPARENT`].
pub trait Rasterizable: Streamable {
    /// `out[i] = color at (xs[i], ys[i])`.
    fn read_colors(&self, xs: &[i16], ys: &[i16], out: &mut [Color]);

    /// Read all pixels of `rect` row-major into `out[..rect.area()]`.
    ///
    /// Returns `true` when the rectangle is uniform, in which case only
    /// `out[0]` is guaranteed to be meaningful.
    fn read_color_rect(&self, rect: Rect, out: &mut [Color]) -> bool {
        read_color_rect_per_pixel(self, rect, out);
        let area = rect.area() as usize;
        area > 0 && out[1..area].iter().all(|&c| c == out[0])
    }
}

/// Fill `out` with `rect`'s pixels using batched [`Rasterizable::read_colors`].
pub fn read_color_rect_per_pixel<R: Rasterizable + ?Sized>(
    source: &R,
    rect: Rect,
    out: &mut [Color],
) {
    let mut stream = RasterStream::new(source, rect);
    stream.read(&mut out[..rect.area() as usize]);
}

/// Row-major stream over `rect`, sampled from a random-access source.
pub fn rasterizable_stream<R: Rasterizable + ?Sized>(
    source: &R,
    rect: Rect,
) -> Box<dyn PixelStream + '_> {
    Box::new(RasterStream::new(source, rect))
}

struct RasterStream<'a, R: ?Sized> {
    source: &'a R,
    rect: Rect,
    x: i16,
    y: i16,
}

impl<'a, R: Rasterizable + ?Sized> RasterStream<'a, R> {
    fn new(source: &'a R, rect: Rect) -> Self {
        Self {
            source,
            rect,
            x: rect.x_min(),
            y: rect.y_min(),
        }
    }

    fn advance(&mut self, count: u32) {
        let width = self.rect.width().max(1) as i32;
        let offset = i32::from(self.x) - i32::from(self.rect.x_min()) + count as i32;
        self.y = (i32::from(self.y) + offset / width) as i16;
        self.x = (i32::from(self.rect.x_min()) + offset % width) as i16;
    }
}

impl<R: Rasterizable + ?Sized> PixelStream for RasterStream<'_, R> {
    fn read(&mut self, buf: &mut [Color]) {
        let mut xs = [0i16; PIXEL_BUFFER_SIZE];
        let mut ys = [0i16; PIXEL_BUFFER_SIZE];
        for batch in buf.chunks_mut(PIXEL_BUFFER_SIZE) {
            let n = batch.len();
            for i in 0..n {
                xs[i] = self.x;
                ys[i] = self.y;
                self.advance(1);
            }
            self.source.read_colors(&xs[..n], &ys[..n], batch);
        }
    }

    fn skip(&mut self, count: u32) {
        self.advance(count);
    }
}

#[cfg(test)]
#[path = "../tests/unit/rasterizable.rs"]
mod tests;
