//! Sequential pixel sources.
//!
//! A stream yields the pixels of its extents in row-major order, left to
//! right and top to bottom. It has no notion of position beyond "how many
//! pixels were consumed"; callers are responsible for never reading past
//! the area it was created over.

use crate::PIXEL_BUFFER_SIZE;
use crate::color::{BlendingMode, Color, apply_blending_in_place};
use crate::device::Drawable;
use crate::foundation::geometry::Rect;

/// Forward-only producer of pixels.
pub trait PixelStream {
    /// Fill `buf` with the next `buf.len()` pixels.
    fn read(&mut self, buf: &mut [Color]);

    /// Advance past `count` pixels.
    fn skip(&mut self, count: u32) {
        let mut scratch = [Color::TRANSPARENT; PIXEL_BUFFER_SIZE];
        let mut left = count as usize;
        while left > 0 {
            let n = left.min(PIXEL_BUFFER_SIZE);
            self.read(&mut scratch[..n]);
            left -= n;
        }
    }
}

impl<S: PixelStream + ?Sized> PixelStream for Box<S> {
    fn read(&mut self, buf: &mut [Color]) {
        (**self).read(buf);
    }

    fn skip(&mut self, count: u32) {
        (**self).skip(count);
    }
}

/// A drawable that can hand out pixel streams over its extents.
pub trait Streamable: Drawable {
    /// Stream over the whole of `self.extents()`.
    fn create_stream(&self) -> Box<dyn PixelStream + '_>;

    /// Stream over `clip ∩ self.extents()`.
    fn create_stream_clipped(&self, clip: Rect) -> Box<dyn PixelStream + '_> {
        let extents = self.extents();
        if clip.contains_rect(extents) {
            return self.create_stream();
        }
        Box::new(SubRectangle::new(self.create_stream(), extents, clip))
    }
}

/// Restricts a stream over `extents` to a sub-rectangle of it.
pub struct SubRectangle<S> {
    inner: S,
    width: u32,
    line_skip: u32,
    remaining_in_line: u32,
}

impl<S: PixelStream> SubRectangle<S> {
    /// Wrap `inner`, a stream over `extents`, so that it yields only the
    /// pixels of `clip ∩ extents`.
    pub fn new(mut inner: S, extents: Rect, clip: Rect) -> Self {
        let clip = clip.intersect(extents);
        if clip.is_empty() {
            return Self {
                inner,
                width: 0,
                line_skip: 0,
                remaining_in_line: 0,
            };
        }
        let width = clip.width();
        let rows_above = (i32::from(clip.y_min()) - i32::from(extents.y_min())) as u32;
        let cols_left = (i32::from(clip.x_min()) - i32::from(extents.x_min())) as u32;
        let mut lead = u64::from(rows_above) * u64::from(extents.width()) + u64::from(cols_left);
        while lead > 0 {
            let step = lead.min(u64::from(u32::MAX)) as u32;
            inner.skip(step);
            lead -= u64::from(step);
        }
        Self {
            inner,
            width,
            line_skip: extents.width() - width,
            remaining_in_line: width,
        }
    }

    fn wrap_line(&mut self) {
        if self.remaining_in_line == 0 {
            if self.line_skip > 0 {
                self.inner.skip(self.line_skip);
            }
            self.remaining_in_line = self.width;
        }
    }
}

impl<S: PixelStream> PixelStream for SubRectangle<S> {
    fn read(&mut self, mut buf: &mut [Color]) {
        debug_assert!(self.width > 0 || buf.is_empty(), "read from empty sub-rectangle");
        if self.width == 0 {
            buf.fill(Color::TRANSPARENT);
            return;
        }
        while !buf.is_empty() {
            self.wrap_line();
            let n = (self.remaining_in_line as usize).min(buf.len());
            let (head, tail) = buf.split_at_mut(n);
            self.inner.read(head);
            self.remaining_in_line -= n as u32;
            buf = tail;
        }
    }

    fn skip(&mut self, mut count: u32) {
        if self.width == 0 {
            return;
        }
        while count > 0 {
            self.wrap_line();
            let n = self.remaining_in_line.min(count);
            self.inner.skip(n);
            self.remaining_in_line -= n;
            count -= n;
        }
    }
}

/// Stream that yields nothing but one color.
pub struct UniformStream(pub Color);

impl PixelStream for UniformStream {
    fn read(&mut self, buf: &mut [Color]) {
        buf.fill(self.0);
    }

    fn skip(&mut self, _count: u32) {}
}

/// Stream over an in-memory row-major pixel slice.
pub struct SliceStream<'a> {
    pixels: &'a [Color],
    pos: usize,
}

impl<'a> SliceStream<'a> {
    /// Stream the pixels of `pixels` in order.
    pub fn new(pixels: &'a [Color]) -> Self {
        Self { pixels, pos: 0 }
    }
}

impl PixelStream for SliceStream<'_> {
    fn read(&mut self, buf: &mut [Color]) {
        let end = self.pos + buf.len();
        debug_assert!(end <= self.pixels.len(), "read past end of slice stream");
        let end = end.min(self.pixels.len());
        let n = end - self.pos;
        buf[..n].copy_from_slice(&self.pixels[self.pos..end]);
        buf[n..].fill(Color::TRANSPARENT);
        self.pos = end;
    }

    fn skip(&mut self, count: u32) {
        self.pos = (self.pos + count as usize).min(self.pixels.len());
    }
}

/// Per-input cursor used while interpreting a compiled program.
///
/// Pulls pixels from the wrapped stream in batches of
/// [`PIXEL_BUFFER_SIZE`], canonicalizing every zero-alpha color to
/// [`Color::TRANSPARENT`]. `remaining` bounds how much is ever requested
/// from the wrapped stream.
pub struct BufferingStream<'a> {
    input: Option<Box<dyn PixelStream + 'a>>,
    remaining: u32,
    buf: [Color; PIXEL_BUFFER_SIZE],
    offset: usize,
    len: usize,
    position: u64,
}

impl<'a> BufferingStream<'a> {
    /// Wrap `input`, which holds exactly `count` pixels.
    pub fn new(input: Box<dyn PixelStream + 'a>, count: u32) -> Self {
        Self {
            input: Some(input),
            remaining: count,
            buf: [Color::TRANSPARENT; PIXEL_BUFFER_SIZE],
            offset: 0,
            len: 0,
            position: 0,
        }
    }

    /// Zero-length stream, used for inputs clipped away entirely.
    pub fn empty() -> Self {
        Self {
            input: None,
            remaining: 0,
            buf: [Color::TRANSPARENT; PIXEL_BUFFER_SIZE],
            offset: 0,
            len: 0,
            position: 0,
        }
    }

    /// Pixels consumed so far (read, blended or skipped).
    pub fn position(&self) -> u64 {
        self.position
    }

    fn fetch(&mut self) {
        let n = (self.remaining as usize).min(PIXEL_BUFFER_SIZE);
        debug_assert!(n > 0, "buffering stream exhausted");
        match self.input.as_mut() {
            Some(input) if n > 0 => {
                input.read(&mut self.buf[..n]);
                for c in &mut self.buf[..n] {
                    *c = c.canonical();
                }
                self.remaining -= n as u32;
                self.len = n;
            }
            _ => {
                self.buf.fill(Color::TRANSPARENT);
                self.len = PIXEL_BUFFER_SIZE;
            }
        }
        self.offset = 0;
    }

    fn available(&mut self) -> &[Color] {
        if self.offset == self.len {
            self.fetch();
        }
        &self.buf[self.offset..self.len]
    }

    fn consume(&mut self, n: usize) {
        self.offset += n;
        self.position += n as u64;
    }

    /// Take one pixel.
    pub fn next(&mut self) -> Color {
        let c = self.available()[0];
        self.consume(1);
        c
    }

    /// Overwrite `out` with the next `out.len()` pixels.
    pub fn read(&mut self, out: &mut [Color]) {
        let mut done = 0;
        while done < out.len() {
            let avail = self.available();
            let n = avail.len().min(out.len() - done);
            out[done..done + n].copy_from_slice(&avail[..n]);
            self.consume(n);
            done += n;
        }
    }

    /// Blend the next `out.len()` pixels onto `out` with `mode`.
    pub fn blend(&mut self, out: &mut [Color], mode: BlendingMode) {
        let mut done = 0;
        while done < out.len() {
            let avail = self.available();
            let n = avail.len().min(out.len() - done);
            let (start, end) = (self.offset, self.offset + n);
            apply_blending_in_place(mode, &mut out[done..done + n], &self.buf[start..end]);
            self.consume(n);
            done += n;
        }
    }

    /// Advance past `count` pixels without reading them.
    pub fn skip(&mut self, count: u32) {
        let buffered = (self.len - self.offset).min(count as usize);
        self.consume(buffered);
        let rest = count - buffered as u32;
        if rest == 0 {
            return;
        }
        debug_assert!(rest <= self.remaining, "skip past end of buffering stream");
        let rest = rest.min(self.remaining);
        if let Some(input) = self.input.as_mut() {
            input.skip(rest);
        }
        self.remaining -= rest;
        self.position += u64::from(rest);
    }
}

#[cfg(test)]
#[path = "../tests/unit/stream.rs"]
mod tests;
