use super::mask::InputMask;

/// Opcode words. Operands follow inline as 16-bit words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub(crate) enum Op {
    /// `[EXIT]`
    Exit = 0,
    /// `[LOOP, height_lo, height_hi]`
    Loop = 1,
    /// `[RET]`
    Ret = 2,
    /// `[BLANK, count]`
    Blank = 3,
    /// `[WRITE, mask, count]`
    Write = 4,
    /// `[WRITE_SINGLE, input, count]`
    WriteSingle = 5,
    /// `[SKIP, input, count_lo, count_hi]`
    Skip = 6,
}

impl Op {
    fn from_word(w: u16) -> Option<Self> {
        Some(match w {
            0 => Self::Exit,
            1 => Self::Loop,
            2 => Self::Ret,
            3 => Self::Blank,
            4 => Self::Write,
            5 => Self::WriteSingle,
            6 => Self::Skip,
            _ => return None,
        })
    }
}

/// One decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// End of program.
    Exit,
    /// Repeat the body up to the matching `Ret` `height` times.
    Loop {
        /// Number of passes over the body.
        height: u32,
    },
    /// End of a loop body.
    Ret,
    /// `count` pixels no input covers.
    Blank {
        /// Pixels in the run.
        count: u32,
    },
    /// Composite `inputs`, lowest index first, over `count` pixels.
    Write {
        /// Covering inputs.
        inputs: InputMask,
        /// Pixels in the run.
        count: u32,
    },
    /// `count` pixels taken from a single input as is.
    WriteSingle {
        /// Index of the input.
        input: usize,
        /// Pixels in the run.
        count: u32,
    },
    /// Advance an input's stream without using the pixels.
    Skip {
        /// Index of the input.
        input: usize,
        /// Pixels to skip.
        count: u32,
    },
}

/// Decode the instruction at `pc`. Returns it and the pc after its operands.
///
/// Anything undecodable, including running off the end, reads as `Exit`.
pub(crate) fn decode(words: &[u16], pc: usize) -> (Instruction, usize) {
    let word = |i: usize| words.get(pc + i).copied().unwrap_or(0);
    let wide = |i: usize| u32::from(word(i)) | (u32::from(word(i + 1)) << 16);
    let Some(op) = words.get(pc).copied().and_then(Op::from_word) else {
        debug_assert!(pc >= words.len(), "unknown opcode {} at {pc}", words[pc]);
        return (Instruction::Exit, pc + 1);
    };
    match op {
        Op::Exit => (Instruction::Exit, pc + 1),
        Op::Loop => (Instruction::Loop { height: wide(1) }, pc + 3),
        Op::Ret => (Instruction::Ret, pc + 1),
        Op::Blank => (
            Instruction::Blank {
                count: u32::from(word(1)),
            },
            pc + 2,
        ),
        Op::Write => (
            Instruction::Write {
                inputs: InputMask::from_bits(word(1)),
                count: u32::from(word(2)),
            },
            pc + 3,
        ),
        Op::WriteSingle => (
            Instruction::WriteSingle {
                input: usize::from(word(1)),
                count: u32::from(word(2)),
            },
            pc + 3,
        ),
        Op::Skip => (
            Instruction::Skip {
                input: usize::from(word(1)),
                count: wide(2),
            },
            pc + 4,
        ),
    }
}

/// Compiled composition: a flat sequence of 16-bit words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    words: Vec<u16>,
}

impl Program {
    /// Empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse `buf`'s allocation; its contents are discarded.
    pub(crate) fn from_buffer(mut buf: Vec<u16>) -> Self {
        buf.clear();
        Self { words: buf }
    }

    pub(crate) fn into_buffer(self) -> Vec<u16> {
        self.words
    }

    /// Raw encoded words.
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    /// Length in words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Return `true` when nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Static listing, loops not unrolled.
    pub fn instructions(&self) -> Vec<Instruction> {
        let mut out = Vec::new();
        let mut pc = 0;
        while pc < self.words.len() {
            let (instr, next) = decode(&self.words, pc);
            out.push(instr);
            pc = next;
        }
        out
    }

    fn op(&mut self, op: Op) {
        self.words.push(op as u16);
    }

    fn wide(&mut self, v: u32) {
        self.words.push(v as u16);
        self.words.push((v >> 16) as u16);
    }

    pub(crate) fn emit_exit(&mut self) {
        self.op(Op::Exit);
    }

    pub(crate) fn emit_loop(&mut self, height: u32) {
        self.op(Op::Loop);
        self.wide(height);
    }

    pub(crate) fn emit_ret(&mut self) {
        self.op(Op::Ret);
    }

    pub(crate) fn emit_blank(&mut self, count: u32) {
        for part in split_count(count) {
            self.op(Op::Blank);
            self.words.push(part);
        }
    }

    pub(crate) fn emit_write(&mut self, inputs: InputMask, count: u32) {
        for part in split_count(count) {
            self.op(Op::Write);
            self.words.push(inputs.bits());
            self.words.push(part);
        }
    }

    pub(crate) fn emit_write_single(&mut self, input: usize, count: u32) {
        for part in split_count(count) {
            self.op(Op::WriteSingle);
            self.words.push(input as u16);
            self.words.push(part);
        }
    }

    pub(crate) fn emit_skip(&mut self, input: usize, count: u32) {
        if count == 0 {
            return;
        }
        self.op(Op::Skip);
        self.words.push(input as u16);
        self.wide(count);
    }
}

impl AsRef<[u16]> for Program {
    fn as_ref(&self) -> &[u16] {
        &self.words
    }
}

/// Pieces of at most `u16::MAX` summing to `count`.
fn split_count(mut count: u32) -> impl Iterator<Item = u16> {
    std::iter::from_fn(move || {
        if count == 0 {
            return None;
        }
        let part = count.min(u32::from(u16::MAX));
        count -= part;
        Some(part as u16)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/stack/bytecode.rs"]
mod tests;
