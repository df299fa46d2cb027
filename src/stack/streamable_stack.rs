use std::cell::Cell;

use super::bytecode::Program;
use super::combo::ComboStream;
use super::compiler::Composition;
use super::consumers::{Inputs, write_rect, write_visible};
use super::mask::MAX_INPUTS;
use super::opts::StackOpts;
use super::vm::Engine;
use crate::color::BlendingMode;
use crate::device::{Drawable, FillMode, Surface};
use crate::foundation::error::{StackError, StackResult};
use crate::foundation::geometry::Rect;
use crate::stream::{BufferingStream, PixelStream, Streamable};

/// One layer of a [`StreamableStack`].
#[derive(Clone, Copy)]
pub struct Input<'a> {
    source: &'a dyn Streamable,
    /// Part of the source used, in source coordinates.
    clip: Rect,
    dx: i16,
    dy: i16,
    mode: BlendingMode,
}

impl<'a> Input<'a> {
    fn new(source: &'a dyn Streamable, clip_box: Rect, dx: i16, dy: i16) -> Self {
        Self {
            source,
            clip: source.extents().intersect(clip_box),
            dx,
            dy,
            mode: BlendingMode::default(),
        }
    }

    /// Set how this layer blends over the ones below it.
    pub fn with_mode(&mut self, mode: BlendingMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Extents in stack coordinates.
    pub fn extents(&self) -> Rect {
        self.clip.translate(self.dx, self.dy)
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

    fn create_stream(&self) -> Box<dyn PixelStream + 'a> {
        let source = self.source;
        if self.clip == source.extents() {
            source.create_stream()
        } else {
            source.create_stream_clipped(self.clip)
        }
    }
}

impl std::fmt::Debug for Input<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Input")
            .field("extents", &self.extents())
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Composites up to [`MAX_INPUTS`] streamable layers, writing every
/// destination pixel once and without an intermediate frame buffer.
///
/// Inputs are drawn in the order they are added: the first one is the
/// bottom layer. A layer only contributes inside its own extents.
pub struct StreamableStack<'a> {
    extents: Rect,
    anchor_extents: Option<Rect>,
    inputs: Vec<Input<'a>>,
    opts: StackOpts,
    scratch: Cell<Vec<u16>>,
}

impl<'a> StreamableStack<'a> {
    /// Empty stack drawn over `extents`.
    pub fn new(extents: Rect) -> Self {
        Self {
            extents,
            anchor_extents: None,
            inputs: Vec::new(),
            opts: StackOpts::default(),
            scratch: Cell::new(Vec::new()),
        }
    }

    /// Replace the compile options.
    pub fn with_opts(mut self, opts: StackOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Current compile options.
    pub fn opts(&self) -> StackOpts {
        self.opts
    }

    /// Add `source` on top, at its own coordinates.
    ///
    /// Fails with [`StackError::Capacity`] once [`MAX_INPUTS`] layers are
    /// present, and with [`StackError::Validation`] when the layer spans
    /// more pixels than a `u32` can count.
    pub fn add_input(&mut self, source: &'a dyn Streamable) -> StackResult<&mut Input<'a>> {
        let all = source.extents();
        self.push(Input::new(source, all, 0, 0))
    }

    /// Add `source`, restricted to `clip_box` (source coordinates).
    pub fn add_input_clipped(
        &mut self,
        source: &'a dyn Streamable,
        clip_box: Rect,
    ) -> StackResult<&mut Input<'a>> {
        self.push(Input::new(source, clip_box, 0, 0))
    }

    /// Add `source` on top, shifted by `(dx, dy)`.
    pub fn add_input_offset(
        &mut self,
        source: &'a dyn Streamable,
        dx: i16,
        dy: i16,
    ) -> StackResult<&mut Input<'a>> {
        let all = source.extents();
        self.push(Input::new(source, all, dx, dy))
    }

    /// Add the `clip_box` part of `source` on top, shifted by `(dx, dy)`.
    pub fn add_input_clipped_offset(
        &mut self,
        source: &'a dyn Streamable,
        clip_box: Rect,
        dx: i16,
        dy: i16,
    ) -> StackResult<&mut Input<'a>> {
        self.push(Input::new(source, clip_box, dx, dy))
    }

    fn push(&mut self, input: Input<'a>) -> StackResult<&mut Input<'a>> {
        if self.inputs.len() >= MAX_INPUTS {
            tracing::warn!(max = MAX_INPUTS, "stack is full, input rejected");
            return Err(StackError::capacity(MAX_INPUTS));
        }
        let extents = input.extents();
        if extents.checked_area().is_none() {
            tracing::warn!(?extents, "input too large, rejected");
            return Err(StackError::validation(format!(
                "input extents {extents:?} hold more than u32::MAX pixels"
            )));
        }
        self.inputs.push(input);
        let last = self.inputs.len() - 1;
        Ok(&mut self.inputs[last])
    }

    /// Layers, bottom first.
    pub fn inputs(&self) -> &[Input<'a>] {
        &self.inputs
    }

    /// Number of layers.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Change the area the stack draws over.
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
            .fold(Rect::empty(), |acc, input| acc.extent(input.extents()))
    }

    /// Compile the program that composites `bounds` (stack coordinates).
    pub fn compile_for(&self, bounds: Rect) -> Program {
        let mut composition = Composition::new(bounds, self.opts);
        for input in &self.inputs {
            composition.add(input.extents(), input.mode);
        }
        composition.compile()
    }

    /// Register every input against `bounds` and open streams for the ones
    /// that overlap it.
    fn prepare(
        &self,
        bounds: Rect,
    ) -> (Composition, Vec<BufferingStream<'a>>, Vec<BlendingMode>) {
        let mut composition = Composition::new(bounds, self.opts);
        let mut streams = Vec::with_capacity(self.inputs.len());
        let mut modes = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let extents = input.extents();
            if composition.add(extents, input.mode) {
                streams.push(BufferingStream::new(input.create_stream(), extents.area()));
            } else {
                streams.push(BufferingStream::empty());
            }
            modes.push(input.mode);
        }
        (composition, streams, modes)
    }
}

impl Drawable for StreamableStack<'_> {
    fn extents(&self) -> Rect {
        self.extents
    }

    fn anchor_extents(&self) -> Rect {
        self.anchor_extents.unwrap_or(self.extents)
    }

    #[tracing::instrument(skip(self, surface), fields(inputs = self.inputs.len()))]
    fn draw_to(&self, surface: &mut Surface<'_>) {
        let (dx, dy) = (surface.dx(), surface.dy());
        let bounds = self.extents.translate(dx, dy).intersect(surface.clip_box());
        if bounds.is_empty() {
            return;
        }
        let (composition, mut streams, modes) = self.prepare(bounds.untranslate(dx, dy));

        let mut program = Program::from_buffer(self.scratch.take());
        composition.compile_into(&mut program);
        {
            let mut engine = Engine::new(program.words());
            let mut inputs = Inputs {
                streams: &mut streams,
                modes: &modes,
            };
            match surface.fill_mode() {
                FillMode::Rectangle => write_rect(&mut engine, bounds, &mut inputs, surface),
                FillMode::Visible => write_visible(&mut engine, bounds, &mut inputs, surface),
            }
        }
        self.scratch.set(program.into_buffer());
    }
}

impl Streamable for StreamableStack<'_> {
    fn create_stream(&self) -> Box<dyn PixelStream + '_> {
        self.create_stream_clipped(self.extents)
    }

    #[tracing::instrument(skip(self), fields(inputs = self.inputs.len()))]
    fn create_stream_clipped(&self, clip: Rect) -> Box<dyn PixelStream + '_> {
        let bounds = self.extents.intersect(clip);
        let (composition, streams, modes) = self.prepare(bounds);
        Box::new(ComboStream::new(composition.compile(), streams, modes))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/streamable_stack.rs"]
mod tests;
