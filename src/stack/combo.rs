use super::bytecode::{Instruction, Program};
use super::consumers::Inputs;
use super::mask::InputMask;
use super::vm::Engine;
use crate::color::{BlendingMode, Color};
use crate::stream::{BufferingStream, PixelStream};

#[derive(Debug, Clone, Copy)]
enum Run {
    Blank,
    Write(InputMask),
}

/// A compiled stack exposed as one lazy pixel stream.
///
/// Blank runs come out transparent; the background of whatever surface the
/// stream ends up on is not applied here.
pub(crate) struct ComboStream<'a> {
    engine: Engine<Program>,
    streams: Vec<BufferingStream<'a>>,
    modes: Vec<BlendingMode>,
    run: Run,
    remaining: u32,
    finished: bool,
}

impl<'a> ComboStream<'a> {
    pub(crate) fn new(
        program: Program,
        streams: Vec<BufferingStream<'a>>,
        modes: Vec<BlendingMode>,
    ) -> Self {
        Self {
            engine: Engine::new(program),
            streams,
            modes,
            run: Run::Blank,
            remaining: 0,
            finished: false,
        }
    }

    fn inputs(&mut self) -> Inputs<'_, 'a> {
        Inputs {
            streams: &mut self.streams,
            modes: &self.modes,
        }
    }

    /// Load the next pixel-producing run. Returns `false` at the end of the
    /// program.
    fn refill(&mut self) -> bool {
        while self.remaining == 0 {
            if self.finished {
                return false;
            }
            match self.engine.next() {
                Instruction::Exit => {
                    self.finished = true;
                    return false;
                }
                Instruction::Skip { input, count } => self.inputs().skip(input, count),
                Instruction::Blank { count } => {
                    self.run = Run::Blank;
                    self.remaining = count;
                }
                Instruction::WriteSingle { input, count } => {
                    self.run = Run::Write(InputMask::single(input));
                    self.remaining = count;
                }
                Instruction::Write { inputs, count } => {
                    self.run = Run::Write(inputs);
                    self.remaining = count;
                }
                Instruction::Loop { .. } | Instruction::Ret => {}
            }
        }
        true
    }
}

impl PixelStream for ComboStream<'_> {
    fn read(&mut self, mut buf: &mut [Color]) {
        while !buf.is_empty() {
            if !self.refill() {
                debug_assert!(false, "read past end of combined stream");
                buf.fill(Color::TRANSPARENT);
                return;
            }
            let n = (self.remaining as usize).min(buf.len());
            let (head, tail) = buf.split_at_mut(n);
            match self.run {
                Run::Blank => head.fill(Color::TRANSPARENT),
                Run::Write(mask) => self.inputs().compose(mask, head),
            }
            self.remaining -= n as u32;
            buf = tail;
        }
    }

    fn skip(&mut self, mut count: u32) {
        while count > 0 {
            if !self.refill() {
                return;
            }
            let n = self.remaining.min(count);
            if let Run::Write(mask) = self.run {
                self.inputs().skip_all(mask, n);
            }
            self.remaining -= n;
            count -= n;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/combo.rs"]
mod tests;
