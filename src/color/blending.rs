use super::Color;

/// Porter-Duff compositing operator applied when a source is drawn over a
/// destination.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BlendingMode {
    /// Source replaces destination.
    Source,
    /// Classic alpha compositing.
    #[default]
    SourceOver,
    /// Source where the destination is opaque.
    SourceIn,
    /// Source over destination, only inside the destination.
    SourceAtop,
    /// Destination left untouched.
    Destination,
    /// Destination drawn over the source.
    DestinationOver,
    /// Destination where the source is opaque.
    DestinationIn,
    /// Destination over source, only inside the source.
    DestinationAtop,
    /// Both source and destination cleared.
    Clear,
    /// Source where the destination is transparent.
    SourceOut,
    /// Destination where the source is transparent.
    DestinationOut,
    /// Source and destination where they do not overlap.
    Xor,
}

impl BlendingMode {
    /// Every mode, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Source,
        Self::SourceOver,
        Self::SourceIn,
        Self::SourceAtop,
        Self::Destination,
        Self::DestinationOver,
        Self::DestinationIn,
        Self::DestinationAtop,
        Self::Clear,
        Self::SourceOut,
        Self::DestinationOut,
        Self::Xor,
    ];

    /// Result does not depend on the destination at all.
    pub const fn replaces_destination(self) -> bool {
        matches!(self, Self::Source | Self::Clear)
    }

    /// Result is transparent whenever the destination is transparent.
    pub const fn clears_transparent_destination(self) -> bool {
        matches!(
            self,
            Self::Destination
                | Self::DestinationIn
                | Self::DestinationOut
                | Self::Clear
                | Self::SourceIn
                | Self::SourceAtop
        )
    }

    /// Blending onto a transparent destination yields the source unchanged.
    pub const fn is_identity_over_transparent(self) -> bool {
        matches!(
            self,
            Self::Source
                | Self::SourceOver
                | Self::DestinationOver
                | Self::DestinationAtop
                | Self::SourceOut
                | Self::Xor
        )
    }

    /// Per-pixel operator for this mode, as `op(dst, src)`.
    pub fn op(self) -> fn(Color, Color) -> Color {
        match self {
            Self::Source => |_, src: Color| src.canonical(),
            Self::SourceOver => alpha_blend,
            Self::SourceIn => source_in,
            Self::SourceAtop => source_atop,
            Self::Destination => |dst: Color, _| dst,
            Self::DestinationOver => |dst: Color, src: Color| alpha_blend(src, dst),
            Self::DestinationIn => |dst: Color, src: Color| source_in(src, dst),
            Self::DestinationAtop => |dst: Color, src: Color| source_atop(src, dst),
            Self::Clear => |_: Color, _: Color| Color::TRANSPARENT,
            Self::SourceOut => source_out,
            Self::DestinationOut => |dst: Color, src: Color| source_out(src, dst),
            Self::Xor => xor,
        }
    }
}

#[inline]
fn div_255(x: u32) -> u8 {
    (((x + 1) * 257) >> 16) as u8
}

#[inline]
fn div_255_rounded(x: u32) -> u8 {
    (((x + 128) * 257) >> 16) as u8
}

/// Composite `fg` over an opaque `bg`. The result is opaque.
pub fn alpha_blend_over_opaque(bg: Color, fg: Color) -> Color {
    let alpha = u32::from(fg.a());
    let inv = alpha ^ 0xFF;
    let ch = |f: u8, b: u8| div_255(alpha * u32::from(f) + inv * u32::from(b));
    Color::argb(
        0xFF,
        ch(fg.r(), bg.r()),
        ch(fg.g(), bg.g()),
        ch(fg.b(), bg.b()),
    )
}

/// Composite `fg` over `bg` (source-over).
///
/// The weights are chosen so that chained composition is associative:
/// `blend(blend(c, a), b) == blend(c, blend(a, b))` up to rounding of the
/// combined alpha.
pub fn alpha_blend(bg: Color, fg: Color) -> Color {
    let front = u32::from(fg.a());
    if front == 0xFF {
        return fg;
    }
    let back = u32::from(bg.a());
    if back == 0xFF {
        return alpha_blend_over_opaque(bg, fg);
    }
    if front == 0 {
        return bg;
    }
    if back == 0 {
        return fg;
    }

    let tmp = back * front;
    let alpha = back + front - ((tmp + (tmp >> 8)) >> 8);
    let front_multi = ((front + 1) << 8) / (alpha + 1);
    let back_multi = 256 - front_multi;
    let ch = |f: u8, b: u8| ((front_multi * u32::from(f) + back_multi * u32::from(b)) >> 8) as u8;
    Color::argb(
        alpha as u8,
        ch(fg.r(), bg.r()),
        ch(fg.g(), bg.g()),
        ch(fg.b(), bg.b()),
    )
}

fn source_atop(dst: Color, src: Color) -> Color {
    let sa = u32::from(src.a());
    let da = dst.a();
    if sa == 0xFF {
        return src.with_a(da).canonical();
    }
    if sa == 0 {
        return dst;
    }
    if da == 0 {
        return Color::TRANSPARENT;
    }
    let inv = 0xFF - sa;
    let ch = |s: u8, d: u8| div_255_rounded(sa * u32::from(s) + inv * u32::from(d));
    Color::argb(
        da,
        ch(src.r(), dst.r()),
        ch(src.g(), dst.g()),
        ch(src.b(), dst.b()),
    )
}

fn source_in(dst: Color, src: Color) -> Color {
    let da = u32::from(dst.a());
    let sa = u32::from(src.a());
    if da == 0xFF {
        return src.canonical();
    }
    if sa == 0xFF {
        return src.with_a(da as u8).canonical();
    }
    if sa == 0 {
        return Color::TRANSPARENT;
    }
    src.with_a(div_255_rounded(sa * da)).canonical()
}

fn source_out(dst: Color, src: Color) -> Color {
    let da = u32::from(dst.a());
    let sa = u32::from(src.a());
    if da == 0 {
        return src.canonical();
    }
    if sa == 0xFF {
        return src.with_a((0xFF - da) as u8).canonical();
    }
    if sa == 0 {
        return Color::TRANSPARENT;
    }
    src.with_a(div_255_rounded(sa * (0xFF - da))).canonical()
}

fn xor(dst: Color, src: Color) -> Color {
    let sa = u32::from(src.a());
    let da = u32::from(dst.a());
    if sa == 0xFF {
        return src.with_a((0xFF - da) as u8).canonical();
    }
    if sa == 0 {
        return dst;
    }
    if da == 0xFF {
        return dst.with_a((0xFF - sa) as u8);
    }
    if da == 0 {
        return src;
    }

    let src_part = sa * (0xFF - da);
    let dst_part = da * (0xFF - sa);
    let alpha = u32::from(div_255_rounded(src_part + dst_part));
    if alpha == 0 {
        return Color::TRANSPARENT;
    }
    let cs = ((src_part + alpha / 2) / alpha).min(0xFF);
    let cd = 0xFF - cs;
    let ch = |s: u8, d: u8| div_255_rounded(cs * u32::from(s) + cd * u32::from(d));
    Color::argb(
        alpha as u8,
        ch(src.r(), dst.r()),
        ch(src.g(), dst.g()),
        ch(src.b(), dst.b()),
    )
}

/// Blend a single `src` pixel onto `dst` with `mode`.
pub fn apply_blending(mode: BlendingMode, dst: Color, src: Color) -> Color {
    (mode.op())(dst, src)
}

/// `dst[i] = mode(dst[i], src[i])` over the common prefix of both slices.
pub fn apply_blending_in_place(mode: BlendingMode, dst: &mut [Color], src: &[Color]) {
    debug_assert_eq!(dst.len(), src.len());
    let op = mode.op();
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = op(*d, s);
    }
}

/// Blend one uniform `src` color onto every pixel of `dst`.
pub fn apply_blending_single_source_in_place(mode: BlendingMode, dst: &mut [Color], src: Color) {
    let op = mode.op();
    for d in dst {
        *d = op(*d, src);
    }
}

/// Blend `src[i]` onto `dst[index[i]]`.
pub fn apply_blending_in_place_indexed(
    mode: BlendingMode,
    dst: &mut [Color],
    src: &[Color],
    index: &[u32],
) {
    debug_assert_eq!(src.len(), index.len());
    let op = mode.op();
    for (&s, &i) in src.iter().zip(index) {
        let d = &mut dst[i as usize];
        *d = op(*d, s);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/blending.rs"]
mod tests;
