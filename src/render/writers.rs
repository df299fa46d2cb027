use crate::PIXEL_BUFFER_SIZE;
use crate::color::{BlendingMode, Color};
use crate::device::DisplayOutput;

/// Batches sequential writes into an already-open address window.
///
/// Call [`ColorWriter::finish`] to flush; dropping the writer flushes as a
/// fallback.
pub struct ColorWriter<'o> {
    out: &'o mut dyn DisplayOutput,
    buf: [Color; PIXEL_BUFFER_SIZE],
    len: usize,
}

impl<'o> ColorWriter<'o> {
    /// Writer over `out`, whose address window the caller has set.
    pub fn new(out: &'o mut dyn DisplayOutput) -> Self {
        Self {
            out,
            buf: [Color::TRANSPARENT; PIXEL_BUFFER_SIZE],
            len: 0,
        }
    }

    /// Queue one pixel.
    pub fn push(&mut self, color: Color) {
        self.buf[self.len] = color;
        self.len += 1;
        if self.len == PIXEL_BUFFER_SIZE {
            self.flush();
        }
    }

    /// Push `count` copies of `color`.
    pub fn push_n(&mut self, color: Color, mut count: u32) {
        while count > 0 {
            let n = (PIXEL_BUFFER_SIZE - self.len).min(count as usize);
            self.buf[self.len..self.len + n].fill(color);
            self.len += n;
            count -= n as u32;
            if self.len == PIXEL_BUFFER_SIZE {
                self.flush();
            }
        }
    }

    /// Queue `colors`. Large slices on an empty buffer go straight to the
    /// device.
    pub fn write(&mut self, colors: &[Color]) {
        if self.len == 0 && colors.len() >= PIXEL_BUFFER_SIZE {
            self.out.write(colors);
            return;
        }
        for &c in colors {
            self.push(c);
        }
    }

    /// Send queued pixels to the device.
    pub fn flush(&mut self) {
        if self.len > 0 {
            self.out.write(&self.buf[..self.len]);
            self.len = 0;
        }
    }

    /// Flush and release the device.
    pub fn finish(mut self) {
        self.flush();
    }
}

impl Drop for ColorWriter<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Batches scattered single-pixel writes.
pub struct PixelWriter<'o> {
    out: &'o mut dyn DisplayOutput,
    mode: BlendingMode,
    xs: [i16; PIXEL_BUFFER_SIZE],
    ys: [i16; PIXEL_BUFFER_SIZE],
    colors: [Color; PIXEL_BUFFER_SIZE],
    len: usize,
}

impl<'o> PixelWriter<'o> {
    /// Writer over `out`; every pixel is written with `mode`.
    pub fn new(out: &'o mut dyn DisplayOutput, mode: BlendingMode) -> Self {
        Self {
            out,
            mode,
            xs: [0; PIXEL_BUFFER_SIZE],
            ys: [0; PIXEL_BUFFER_SIZE],
            colors: [Color::TRANSPARENT; PIXEL_BUFFER_SIZE],
            len: 0,
        }
    }

    /// Queue `color` at `(x, y)`.
    pub fn write(&mut self, x: i16, y: i16, color: Color) {
        self.xs[self.len] = x;
        self.ys[self.len] = y;
        self.colors[self.len] = color;
        self.len += 1;
        if self.len == PIXEL_BUFFER_SIZE {
            self.flush();
        }
    }

    /// Send queued pixels to the device.
    pub fn flush(&mut self) {
        if self.len > 0 {
            let n = self.len;
            self.out
                .write_pixels(self.mode, &self.xs[..n], &self.ys[..n], &self.colors[..n]);
            self.len = 0;
        }
    }

    /// Flush and release the device.
    pub fn finish(mut self) {
        self.flush();
    }
}

impl Drop for PixelWriter<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/writers.rs"]
mod tests;
