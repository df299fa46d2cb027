use std::ops::{BitOr, BitOrAssign};

/// Hard upper bound on inputs per stack.
pub const MAX_INPUTS: usize = 16;

/// Set of input indices, each below [`MAX_INPUTS`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InputMask(u16);

impl InputMask {
    /// No inputs.
    pub const EMPTY: Self = Self(0);

    /// Mask holding only `index`.
    pub fn single(index: usize) -> Self {
        debug_assert!(index < MAX_INPUTS, "input index {index} out of range");
        Self(1 << index)
    }

    /// Bit `i` set means input `i` is a member.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw bits, as in [`InputMask::from_bits`].
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Return `true` when there are no members.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of members.
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Membership test; indices past [`MAX_INPUTS`] are never members.
    pub fn contains(self, index: usize) -> bool {
        index < MAX_INPUTS && self.0 & (1 << index) != 0
    }

    /// Add `index`.
    pub fn insert(&mut self, index: usize) {
        *self |= Self::single(index);
    }

    /// Drop `index` if present.
    pub fn remove(&mut self, index: usize) {
        if index < MAX_INPUTS {
            self.0 &= !(1 << index);
        }
    }

    /// Members strictly below `index`.
    pub fn below(self, index: usize) -> Self {
        let keep = if index >= MAX_INPUTS {
            u16::MAX
        } else {
            (1u16 << index) - 1
        };
        Self(self.0 & keep)
    }

    /// Members of `self` not in `other`.
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// The only member, if there is exactly one.
    pub fn single_index(self) -> Option<usize> {
        (self.len() == 1).then(|| self.0.trailing_zeros() as usize)
    }

    /// Members in ascending order.
    pub fn iter(self) -> InputMaskIter {
        InputMaskIter(self.0)
    }
}

impl BitOr for InputMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for InputMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::fmt::Debug for InputMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl IntoIterator for InputMask {
    type Item = usize;
    type IntoIter = InputMaskIter;

    fn into_iter(self) -> InputMaskIter {
        self.iter()
    }
}

/// Ascending iterator over an [`InputMask`]; reversible.
#[derive(Clone, Debug)]
pub struct InputMaskIter(u16);

impl Iterator for InputMaskIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let i = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(i)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for InputMaskIter {
    fn next_back(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let i = 15 - self.0.leading_zeros() as usize;
        self.0 &= !(1 << i);
        Some(i)
    }
}

impl ExactSizeIterator for InputMaskIter {}

#[cfg(test)]
#[path = "../../tests/unit/stack/mask.rs"]
mod tests;
