use smallvec::{SmallVec, smallvec};

use super::mask::InputMask;
use crate::foundation::geometry::Rect;

/// Horizontal run of constant coverage within a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Chunk {
    pub(crate) width: u32,
    pub(crate) inputs: InputMask,
}

/// Band of rows sharing one chunk layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Block {
    pub(crate) height: u32,
    pub(crate) all_inputs: InputMask,
    pub(crate) chunks: SmallVec<[Chunk; 4]>,
}

impl Block {
    /// Make `col` a chunk boundary; returns the index of the chunk starting
    /// there (`chunks.len()` at the right edge).
    fn split_at_col(&mut self, col: u32) -> usize {
        let mut cursor = 0;
        for i in 0..self.chunks.len() {
            if cursor == col {
                return i;
            }
            let width = self.chunks[i].width;
            if col < cursor + width {
                let head = col - cursor;
                self.chunks[i].width = head;
                let tail = Chunk {
                    width: width - head,
                    inputs: self.chunks[i].inputs,
                };
                self.chunks.insert(i + 1, tail);
                return i + 1;
            }
            cursor += width;
        }
        self.chunks.len()
    }

    fn cover(&mut self, left: u32, right: u32, index: usize) {
        let first = self.split_at_col(left);
        let last = self.split_at_col(right);
        for chunk in &mut self.chunks[first..last] {
            chunk.inputs.insert(index);
        }
        self.all_inputs.insert(index);
    }
}

/// Row-banded, column-chunked coverage map of a destination box.
///
/// Heights of all blocks sum to the bounds height; widths of the chunks of
/// each block sum to the bounds width.
#[derive(Clone, Debug)]
pub(crate) struct Partition {
    bounds: Rect,
    blocks: Vec<Block>,
}

impl Partition {
    pub(crate) fn new(bounds: Rect) -> Self {
        let blocks = if bounds.is_empty() {
            Vec::new()
        } else {
            vec![Block {
                height: bounds.height(),
                all_inputs: InputMask::EMPTY,
                chunks: smallvec![Chunk {
                    width: bounds.width(),
                    inputs: InputMask::EMPTY,
                }],
            }]
        };
        Self { bounds, blocks }
    }

    pub(crate) fn bounds(&self) -> Rect {
        self.bounds
    }

    pub(crate) fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Fold input `index` covering `extents` into the partition. Returns
    /// `false`, leaving the partition unchanged, when `extents` misses the
    /// bounds.
    pub(crate) fn add(&mut self, extents: Rect, index: usize) -> bool {
        let clipped = extents.intersect(self.bounds);
        if clipped.is_empty() {
            return false;
        }
        let top = (i32::from(clipped.y_min()) - i32::from(self.bounds.y_min())) as u32;
        let left = (i32::from(clipped.x_min()) - i32::from(self.bounds.x_min())) as u32;
        let first = self.split_at_row(top);
        let last = self.split_at_row(top + clipped.height());
        for block in &mut self.blocks[first..last] {
            block.cover(left, left + clipped.width(), index);
        }
        true
    }

    fn split_at_row(&mut self, row: u32) -> usize {
        let mut cursor = 0;
        for i in 0..self.blocks.len() {
            if cursor == row {
                return i;
            }
            let height = self.blocks[i].height;
            if row < cursor + height {
                let head = row - cursor;
                let mut tail = self.blocks[i].clone();
                tail.height = height - head;
                self.blocks[i].height = head;
                self.blocks.insert(i + 1, tail);
                return i + 1;
            }
            cursor += height;
        }
        self.blocks.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/partition.rs"]
mod tests;
