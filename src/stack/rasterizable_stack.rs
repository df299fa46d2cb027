use std::cell::Cell;

use super::mask::MAX_INPUTS;
use crate::PIXEL_BUFFER_SIZE;
use crate::color::{
    BlendingMode, Color, apply_blending, apply_blending_in_place, apply_blending_in_place_indexed,
    apply_blending_single_source_in_place,
};
use crate::device::{Drawable, Surface};
use crate::foundation::error::{StackError, StackResult};
use crate::foundation::geometry::Rect;
use crate::rasterizable::{Rasterizable, rasterizable_stream};
use crate::render::draw_stream;
use crate::stream::{PixelStream, Streamable};

/// One layer of a [`RasterizableStack`].
#[derive(Clone, Copy)]
pub struct RasterInput<'a> {
    source: &'a dyn Rasterizable,
    /// Stack coordinates.
    extents: Rect,
    dx: i16,
    dy: i16,
    mode: BlendingMode,
}

impl RasterInput<'_> {
    /// Set how this layer blends over the ones below it.
    pub fn with_mode(&mut self, mode: BlendingMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Extents in stack coordinates.
    pub fn extents(&self) -> Rect {
        self.extents
    }

    /// Horizontal offset from source to stack coordinates.
    pub fn dx(&self) -> i16 {
        self.dx
    }

    /// Vertical offset from source to stack coordinates.
    pub fn dy(&self) -> i16 {
        self.dy
    }

    /// Blending mode; `SourceOver` unless changed.
    pub fn blending_mode(&self) -> BlendingMode {
        self.mode
    }
}

impl std::fmt::Debug for RasterInput<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterInput")
            .field("extents", &self.extents)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Layer stack over random-access sources.
///
/// Nothing is compiled: each requested pixel or rectangle blends the
/// layers that cover it, bottom to top, starting from transparent.
pub struct RasterizableStack<'a> {
    extents: Rect,
    anchor_extents: Option<Rect>,
    inputs: Vec<RasterInput<'a>>,
    scratch: Cell<Vec<Color>>,
}

impl<'a> RasterizableStack<'a> {
    /// Empty stack covering `extents`.
    pub fn new(extents: Rect) -> Self {
        Self {
            extents,
            anchor_extents: None,
            inputs: Vec::new(),
            scratch: Cell::new(Vec::new()),
        }
    }

    /// Add `source` on top, at its own coordinates.
    ///
    /// Fails with [`StackError::Capacity`] once [`MAX_INPUTS`] layers are
    /// present, and with [`StackError::Validation`] when the layer spans
    /// more pixels than a `u32` can count.
    pub fn add_input(&mut self, source: &'a dyn Rasterizable) -> StackResult<&mut RasterInput<'a>> {
        let all = source.extents();
        self.push(source, all, 0, 0)
    }

    /// Add the `clip_box` part of `source` (source coordinates) on top.
    pub fn add_input_clipped(
        &mut self,
        source: &'a dyn Rasterizable,
        clip_box: Rect,
    ) -> StackResult<&mut RasterInput<'a>> {
        self.push(source, clip_box, 0, 0)
    }

    /// Add `source` on top, shifted by `(dx, dy)`.
    pub fn add_input_offset(
        &mut self,
        source: &'a dyn Rasterizable,
        dx: i16,
        dy: i16,
    ) -> StackResult<&mut RasterInput<'a>> {
        let all = source.extents();
        self.push(source, all, dx, dy)
    }

    /// Add the `clip_box` part of `source` on top, shifted by `(dx, dy)`.
    pub fn add_input_clipped_offset(
        &mut self,
        source: &'a dyn Rasterizable,
        clip_box: Rect,
        dx: i16,
        dy: i16,
    ) -> StackResult<&mut RasterInput<'a>> {
        self.push(source, clip_box, dx, dy)
    }

    fn push(
        &mut self,
        source: &'a dyn Rasterizable,
        clip_box: Rect,
        dx: i16,
        dy: i16,
    ) -> StackResult<&mut RasterInput<'a>> {
        if self.inputs.len() >= MAX_INPUTS {
            tracing::warn!(max = MAX_INPUTS, "stack is full, input rejected");
            return Err(StackError::capacity(MAX_INPUTS));
        }
        let extents = source.extents().intersect(clip_box).translate(dx, dy);
        if extents.checked_area().is_none() {
            tracing::warn!(?extents, "input too large, rejected");
            return Err(StackError::validation(format!(
                "input extents {extents:?} hold more than u32::MAX pixels"
            )));
        }
        self.inputs.push(RasterInput {
            source,
            extents,
            dx,
            dy,
            mode: BlendingMode::default(),
        });
        let last = self.inputs.len() - 1;
        Ok(&mut self.inputs[last])
    }

    /// Layers, bottom first.
    pub fn inputs(&self) -> &[RasterInput<'a>] {
        &self.inputs
    }

    /// Number of layers.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Change the area the stack covers.
    pub fn set_extents(&mut self, extents: Rect) {
        self.extents = extents;
    }

    /// Override the box used for alignment; defaults to the extents.
    pub fn set_anchor_extents(&mut self, anchor_extents: Rect) {
        self.anchor_extents = Some(anchor_extents);
    }

    /// Smallest box holding every input; empty when there are none.
    pub fn natural_extents(&self) -> Rect {
        self.inputs
            .iter()
            .fold(Rect::empty(), |acc, input| acc.extent(input.extents))
    }
}

impl Drawable for RasterizableStack<'_> {
    fn extents(&self) -> Rect {
        self.extents
    }

    fn anchor_extents(&self) -> Rect {
        self.anchor_extents.unwrap_or(self.extents)
    }

    fn draw_to(&self, surface: &mut Surface<'_>) {
        draw_stream(surface, self);
    }
}

impl Streamable for RasterizableStack<'_> {
    fn create_stream(&self) -> Box<dyn PixelStream + '_> {
        rasterizable_stream(self, self.extents)
    }

    fn create_stream_clipped(&self, clip: Rect) -> Box<dyn PixelStream + '_> {
        rasterizable_stream(self, self.extents.intersect(clip))
    }
}

impl Rasterizable for RasterizableStack<'_> {
    fn read_colors(&self, xs: &[i16], ys: &[i16], out: &mut [Color]) {
        let count = out.len().min(xs.len()).min(ys.len());
        let out = &mut out[..count];
        out.fill(Color::TRANSPARENT);

        let mut local_x = [0i16; PIXEL_BUFFER_SIZE];
        let mut local_y = [0i16; PIXEL_BUFFER_SIZE];
        let mut offsets = [0u32; PIXEL_BUFFER_SIZE];
        let mut colors = [Color::TRANSPARENT; PIXEL_BUFFER_SIZE];

        for input in &self.inputs {
            let mut offset = 0;
            while offset < count {
                let mut n = 0;
                while offset < count && n < PIXEL_BUFFER_SIZE {
                    if input.extents.contains(xs[offset], ys[offset]) {
                        local_x[n] = xs[offset] - input.dx;
                        local_y[n] = ys[offset] - input.dy;
                        offsets[n] = offset as u32;
                        n += 1;
                    }
                    offset += 1;
                }
                if n == 0 {
                    continue;
                }
                input
                    .source
                    .read_colors(&local_x[..n], &local_y[..n], &mut colors[..n]);
                canonicalize(&mut colors[..n]);
                apply_blending_in_place_indexed(input.mode, out, &colors[..n], &offsets[..n]);
            }
        }
    }

    /// Blend the covering layers over `rect`, staying on a single uniform
    /// color until some layer covers the rectangle only partially.
    #[tracing::instrument(skip(self, out), fields(inputs = self.inputs.len()))]
    fn read_color_rect(&self, rect: Rect, out: &mut [Color]) -> bool {
        let area = rect.area() as usize;
        if area == 0 {
            return false;
        }
        let width = rect.width() as usize;
        let mut uniform = true;
        out[0] = Color::TRANSPARENT;
        let mut buf = self.scratch.take();
        if buf.len() < area {
            buf.resize(area, Color::TRANSPARENT);
        }

        for input in &self.inputs {
            let clipped = input.extents.intersect(rect);
            if clipped.is_empty() {
                continue;
            }
            if uniform && !clipped.contains_rect(rect) {
                uniform = false;
                let first = out[0];
                out[1..area].fill(first);
            }
            let local = clipped.untranslate(input.dx, input.dy);
            let local_uniform = input.source.read_color_rect(local, &mut buf);
            let cw = clipped.width() as usize;
            let col = (i32::from(clipped.x_min()) - i32::from(rect.x_min())) as usize;
            let top = (i32::from(clipped.y_min()) - i32::from(rect.y_min())) as usize;

            if local_uniform {
                let color = buf[0].canonical();
                if uniform {
                    out[0] = apply_blending(input.mode, out[0], color);
                } else {
                    for row in 0..clipped.height() as usize {
                        let start = (top + row) * width + col;
                        apply_blending_single_source_in_place(
                            input.mode,
                            &mut out[start..start + cw],
                            color,
                        );
                    }
                }
            } else {
                if uniform {
                    uniform = false;
                    let first = out[0];
                    out[1..area].fill(first);
                }
                canonicalize(&mut buf[..clipped.area() as usize]);
                for row in 0..clipped.height() as usize {
                    let start = (top + row) * width + col;
                    apply_blending_in_place(
                        input.mode,
                        &mut out[start..start + cw],
                        &buf[row * cw..(row + 1) * cw],
                    );
                }
            }
        }

        self.scratch.set(buf);
        uniform || out[1..area].iter().all(|&c| c == out[0])
    }
}

fn canonicalize(colors: &mut [Color]) {
    for c in colors {
        *c = c.canonical();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/rasterizable_stack.rs"]
mod tests;
