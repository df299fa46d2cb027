use super::bytecode::Instruction;
use super::mask::InputMask;
use super::vm::Engine;
use crate::PIXEL_BUFFER_SIZE;
use crate::color::{BlendingMode, Color};
use crate::device::Surface;
use crate::foundation::geometry::Rect;
use crate::render::{ColorWriter, PixelWriter, onto_background};
use crate::stream::BufferingStream;

/// Per-draw input state: one cursor and one blending mode per input slot.
pub(crate) struct Inputs<'s, 'a> {
    pub(crate) streams: &'s mut [BufferingStream<'a>],
    pub(crate) modes: &'s [BlendingMode],
}

impl Inputs<'_, '_> {
    pub(crate) fn skip(&mut self, input: usize, count: u32) {
        self.streams[input].skip(count);
    }

    /// Composite the next `buf.len()` pixels of every input in `inputs`,
    /// lowest index first, starting from a transparent destination.
    pub(crate) fn compose(&mut self, inputs: InputMask, buf: &mut [Color]) {
        let mut it = inputs.iter();
        let Some(first) = it.next() else {
            buf.fill(Color::TRANSPARENT);
            return;
        };
        let mode = self.modes[first];
        if mode.is_identity_over_transparent() {
            self.streams[first].read(buf);
        } else {
            buf.fill(Color::TRANSPARENT);
            self.streams[first].blend(buf, mode);
        }
        for i in it {
            self.streams[i].blend(buf, self.modes[i]);
        }
    }

    /// Advance every input in `inputs` by `count` without compositing.
    pub(crate) fn skip_all(&mut self, inputs: InputMask, count: u32) {
        for i in inputs {
            self.streams[i].skip(count);
        }
    }
}

/// Paint every pixel of `bounds` (device coordinates) in one address
/// window, using the surface background where nothing is drawn.
pub(crate) fn write_rect<W: AsRef<[u16]>>(
    engine: &mut Engine<W>,
    bounds: Rect,
    inputs: &mut Inputs<'_, '_>,
    surface: &mut Surface<'_>,
) {
    let bg = surface.bgcolor();
    let mode = surface.blending_mode();
    let out = surface.out();
    out.set_address(bounds, mode);
    let mut writer = ColorWriter::new(out);
    let mut buf = [Color::TRANSPARENT; PIXEL_BUFFER_SIZE];

    loop {
        let (mask, mut count) = match engine.next() {
            Instruction::Exit => break,
            Instruction::Blank { count } => {
                writer.push_n(bg, count);
                continue;
            }
            Instruction::Skip { input, count } => {
                inputs.skip(input, count);
                continue;
            }
            Instruction::WriteSingle { input, count } => (InputMask::single(input), count),
            Instruction::Write { inputs: mask, count } => (mask, count),
            Instruction::Loop { .. } | Instruction::Ret => continue,
        };
        while count > 0 {
            let n = (count as usize).min(PIXEL_BUFFER_SIZE);
            let batch = &mut buf[..n];
            inputs.compose(mask, batch);
            if !bg.is_transparent() {
                for c in batch.iter_mut() {
                    *c = onto_background(bg, *c);
                }
            }
            writer.write(batch);
            count -= n as u32;
        }
    }
    writer.finish();
}

/// Write only the non-transparent pixels of `bounds`.
pub(crate) fn write_visible<W: AsRef<[u16]>>(
    engine: &mut Engine<W>,
    bounds: Rect,
    inputs: &mut Inputs<'_, '_>,
    surface: &mut Surface<'_>,
) {
    let bg = surface.bgcolor();
    let mode = surface.blending_mode();
    let mut writer = PixelWriter::new(surface.out(), mode);
    let mut cursor = Cursor::new(bounds);
    let mut buf = [Color::TRANSPARENT; PIXEL_BUFFER_SIZE];

    loop {
        let (mask, mut count) = match engine.next() {
            Instruction::Exit => break,
            Instruction::Blank { count } => {
                cursor.advance(count);
                continue;
            }
            Instruction::Skip { input, count } => {
                inputs.skip(input, count);
                continue;
            }
            Instruction::WriteSingle { input, count } => (InputMask::single(input), count),
            Instruction::Write { inputs: mask, count } => (mask, count),
            Instruction::Loop { .. } | Instruction::Ret => continue,
        };
        while count > 0 {
            let n = (count as usize).min(PIXEL_BUFFER_SIZE);
            inputs.compose(mask, &mut buf[..n]);
            for &c in &buf[..n] {
                if !c.is_transparent() {
                    let (x, y) = cursor.position();
                    writer.write(x, y, onto_background(bg, c));
                }
                cursor.advance(1);
            }
            count -= n as u32;
        }
    }
    writer.finish();
}

/// Row-major position within a box.
struct Cursor {
    x_min: i32,
    width: u32,
    col: u32,
    y: i32,
}

impl Cursor {
    fn new(bounds: Rect) -> Self {
        Self {
            x_min: i32::from(bounds.x_min()),
            width: bounds.width().max(1),
            col: 0,
            y: i32::from(bounds.y_min()),
        }
    }

    fn advance(&mut self, count: u32) {
        let col = self.col + count;
        self.y += (col / self.width) as i32;
        self.col = col % self.width;
    }

    fn position(&self) -> (i16, i16) {
        ((self.x_min + self.col as i32) as i16, self.y as i16)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/consumers.rs"]
mod tests;
