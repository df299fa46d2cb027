use super::bytecode::{Instruction, decode};

/// Interpreter state for one pass over a program.
///
/// `next` hides loop control: `Loop` records the re-entry point and
/// count, `Ret` jumps back until the count is exhausted. Callers only ever
/// see `Exit`, `Blank`, `Write`, `WriteSingle` and `Skip`.
pub(crate) struct Engine<W> {
    words: W,
    pc: usize,
    loop_return: usize,
    loop_counter: u32,
}

impl<W: AsRef<[u16]>> Engine<W> {
    pub(crate) fn new(words: W) -> Self {
        Self {
            words,
            pc: 0,
            loop_return: 0,
            loop_counter: 0,
        }
    }

    pub(crate) fn next(&mut self) -> Instruction {
        loop {
            let (instr, next_pc) = decode(self.words.as_ref(), self.pc);
            self.pc = next_pc;
            match instr {
                Instruction::Loop { height } => {
                    self.loop_counter = height;
                    self.loop_return = self.pc;
                }
                Instruction::Ret => {
                    self.loop_counter = self.loop_counter.saturating_sub(1);
                    if self.loop_counter > 0 {
                        self.pc = self.loop_return;
                    }
                }
                Instruction::Exit => {
                    // Stay parked on the exit.
                    self.pc = next_pc - 1;
                    return Instruction::Exit;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/vm.rs"]
mod tests;
