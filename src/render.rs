//! Streaming pixels onto surfaces.

mod offscreen;
mod writers;

pub use offscreen::Offscreen;
pub use writers::{ColorWriter, PixelWriter};

use crate::PIXEL_BUFFER_SIZE;
use crate::color::{Color, alpha_blend};
use crate::device::{FillMode, Surface};
use crate::foundation::geometry::Rect;
use crate::stream::{PixelStream, Streamable};

/// Draw a streamable source onto `surface`.
///
/// The source's extents are translated by the surface offset and clipped
/// to its clip box; only that part of the source is streamed.
pub fn draw_stream<S: Streamable + ?Sized>(surface: &mut Surface<'_>, source: &S) {
    let (dx, dy) = (surface.dx(), surface.dy());
    let bounds = source
        .extents()
        .translate(dx, dy)
        .intersect(surface.clip_box());
    if bounds.is_empty() {
        return;
    }
    let mut stream = source.create_stream_clipped(bounds.untranslate(dx, dy));
    write_stream(surface, bounds, &mut stream);
}

/// Write a stream covering exactly `bounds` (device coordinates).
pub(crate) fn write_stream(
    surface: &mut Surface<'_>,
    bounds: Rect,
    stream: &mut dyn PixelStream,
) {
    let bg = surface.bgcolor();
    let mode = surface.blending_mode();
    let fill_mode = surface.fill_mode();
    let mut buf = [Color::TRANSPARENT; PIXEL_BUFFER_SIZE];

    match fill_mode {
        FillMode::Rectangle => {
            let out = surface.out();
            out.set_address(bounds, mode);
            let mut writer = ColorWriter::new(out);
            let mut left = u64::from(bounds.width()) * u64::from(bounds.height());
            while left > 0 {
                let n = left.min(PIXEL_BUFFER_SIZE as u64) as usize;
                let batch = &mut buf[..n];
                stream.read(batch);
                for c in batch.iter_mut() {
                    *c = onto_background(bg, *c);
                }
                writer.write(batch);
                left -= n as u64;
            }
            writer.finish();
        }
        FillMode::Visible => {
            let mut writer = PixelWriter::new(surface.out(), mode);
            for y in bounds.y_min()..=bounds.y_max() {
                let mut x = bounds.x_min();
                let mut left = bounds.width() as usize;
                while left > 0 {
                    let n = left.min(PIXEL_BUFFER_SIZE);
                    stream.read(&mut buf[..n]);
                    for &c in &buf[..n] {
                        if !c.is_transparent() {
                            writer.write(x, y, onto_background(bg, c));
                        }
                        x = x.wrapping_add(1);
                    }
                    left -= n;
                }
            }
            writer.finish();
        }
    }
}

/// Blend `c` onto the surface background, unless that background is
/// fully transparent.
#[inline]
pub(crate) fn onto_background(bg: Color, c: Color) -> Color {
    if bg.is_transparent() {
        c.canonical()
    } else {
        alpha_blend(bg, c.canonical())
    }
}

#[cfg(test)]
#[path = "../tests/unit/render.rs"]
mod tests;
