//! ARGB8888 colors and Porter-Duff blending.

mod blending;

pub use blending::{
    BlendingMode, alpha_blend, alpha_blend_over_opaque, apply_blending, apply_blending_in_place,
    apply_blending_in_place_indexed, apply_blending_single_source_in_place,
};

/// 32-bit ARGB color, alpha in the most significant byte.
///
/// Colors are straight (not premultiplied) alpha.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    /// Fully transparent black; the canonical zero-alpha color.
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self(0xFF00_0000);
    /// Opaque white.
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    /// Build a color from its channels.
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(u32::from_be_bytes([a, r, g, b]))
    }

    /// Alpha channel.
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel.
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Same color channels, alpha replaced.
    pub const fn with_a(self, a: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | ((a as u32) << 24))
    }

    /// Return `true` when alpha is zero, regardless of color channels.
    pub const fn is_transparent(self) -> bool {
        self.a() == 0
    }

    /// Map every zero-alpha color to [`Color::TRANSPARENT`].
    ///
    /// Streams canonicalize what they hand to the compositor, so that
    /// "transparent" has exactly one bit pattern inside a composition.
    pub const fn canonical(self) -> Self {
        if self.is_transparent() {
            Self::TRANSPARENT
        } else {
            self
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/color.rs"]
mod tests;
