//! Layer compositing.
//!
//! A [`StreamableStack`] composites sequential sources without an
//! intermediate frame buffer. Each draw partitions the destination into
//! row bands and column chunks of constant layer coverage, compiles that
//! partition into a small bytecode [`Program`], and interprets it while
//! pulling pixels from every layer's stream on demand. Program size depends
//! on the number of layers, never on the destination area.
//!
//! A [`RasterizableStack`] is the random-access sibling: it blends per
//! requested pixel or rectangle.

mod bytecode;
mod combo;
mod compiler;
mod consumers;
mod mask;
mod opts;
mod partition;
mod rasterizable_stack;
mod streamable_stack;
mod vm;

pub use bytecode::{Instruction, Program};
pub use mask::{InputMask, InputMaskIter, MAX_INPUTS};
pub use opts::StackOpts;
pub use rasterizable_stack::{RasterInput, RasterizableStack};
pub use streamable_stack::{Input, StreamableStack};
