use super::bytecode::Program;
use super::mask::InputMask;
use super::opts::StackOpts;
use super::partition::{Chunk, Partition};
use crate::color::BlendingMode;
use crate::foundation::geometry::Rect;

#[derive(Debug, Clone, Copy)]
struct Layer {
    /// Full extents of the input's stream, same coordinates as the bounds.
    extents: Rect,
    mode: BlendingMode,
    /// Overlaps the bounds; otherwise its stream is never touched.
    present: bool,
}

/// Inputs registered against one destination box, ready to compile.
#[derive(Debug, Clone)]
pub(crate) struct Composition {
    partition: Partition,
    layers: Vec<Layer>,
    opts: StackOpts,
}

impl Composition {
    pub(crate) fn new(bounds: Rect, opts: StackOpts) -> Self {
        Self {
            partition: Partition::new(bounds),
            layers: Vec::new(),
            opts,
        }
    }

    /// Register the next input. `extents` is where its stream's pixels
    /// lie; only the part inside the bounds is composited. Returns whether
    /// the input overlaps the bounds at all.
    pub(crate) fn add(&mut self, extents: Rect, mode: BlendingMode) -> bool {
        let index = self.layers.len();
        let present = self.partition.add(extents, index);
        self.layers.push(Layer {
            extents,
            mode,
            present,
        });
        present
    }

    pub(crate) fn block_count(&self) -> usize {
        self.partition.blocks().len()
    }

    pub(crate) fn compile(&self) -> Program {
        let mut prg = Program::new();
        self.compile_into(&mut prg);
        prg
    }

    /// Append the program for this composition to `prg`.
    pub(crate) fn compile_into(&self, prg: &mut Program) {
        let bounds = self.partition.bounds();

        // Rows above the bounds.
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.present && layer.extents.y_min() < bounds.y_min() {
                let rows = (i32::from(bounds.y_min()) - i32::from(layer.extents.y_min())) as u32;
                prg.emit_skip(i, rows * layer.extents.width());
            }
        }

        for block in self.partition.blocks() {
            prg.emit_loop(block.height);
            for i in block.all_inputs {
                let ext = self.layers[i].extents;
                if ext.x_min() < bounds.x_min() {
                    prg.emit_skip(i, (i32::from(bounds.x_min()) - i32::from(ext.x_min())) as u32);
                }
            }
            for chunk in &block.chunks {
                self.compile_chunk(chunk, prg);
            }
            for i in block.all_inputs {
                let ext = self.layers[i].extents;
                if ext.x_max() > bounds.x_max() {
                    prg.emit_skip(i, (i32::from(ext.x_max()) - i32::from(bounds.x_max())) as u32);
                }
            }
            prg.emit_ret();
        }
        prg.emit_exit();

        tracing::debug!(
            blocks = self.block_count(),
            words = prg.len(),
            inputs = self.layers.len(),
            "compiled composition"
        );
    }

    fn compile_chunk(&self, chunk: &Chunk, prg: &mut Program) {
        let width = chunk.width;
        let mut live = chunk.inputs;

        if self.opts.eliminate_dead_layers {
            let dead = self.dead_inputs(live);
            if !dead.is_empty() {
                tracing::trace!(?dead, width, "eliminated inputs");
                for i in dead {
                    prg.emit_skip(i, width);
                }
                live = live.difference(dead);
            }
        }

        if live.is_empty() {
            prg.emit_blank(width);
        } else if let Some(i) = live.single_index() {
            prg.emit_write_single(i, width);
        } else {
            prg.emit_write(live, width);
        }
    }

    /// Inputs of a chunk whose pixels cannot affect its result.
    ///
    /// Everything below the topmost input that ignores its destination is
    /// overwritten. Then, while the destination is still transparent,
    /// inputs that keep a transparent destination transparent add
    /// nothing.
    fn dead_inputs(&self, inputs: InputMask) -> InputMask {
        let mut dead = InputMask::EMPTY;
        let top = inputs
            .iter()
            .rev()
            .find(|&i| self.layers[i].mode.replaces_destination());
        if let Some(top) = top {
            dead = inputs.below(top);
        }
        for i in inputs.difference(dead) {
            if !self.layers[i].mode.clears_transparent_destination() {
                break;
            }
            dead.insert(i);
        }
        dead
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/compiler.rs"]
mod tests;
