//! Output devices and the drawing surface handed to drawables.

use crate::color::{BlendingMode, Color};
use crate::foundation::geometry::Rect;

/// Whether a drawable must paint its whole bounding box or only the pixels
/// it actually changes.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Only non-transparent pixels are written.
    #[default]
    Visible,
    /// Every pixel of the bounding box is written, using the surface
    /// background where the content is transparent.
    Rectangle,
}

/// Sink for pixel writes.
///
/// Writes are either sequential into an address window (`set_address` +
/// `write`) or scattered (`write_pixels`). The blending mode says how the
/// written color combines with what the device already holds.
pub trait DisplayOutput {
    /// Start a sequential write into `window`, row-major.
    fn set_address(&mut self, window: Rect, mode: BlendingMode);

    /// Write the next pixels into the current address window.
    fn write(&mut self, colors: &[Color]);

    /// Write `colors[i]` at `(xs[i], ys[i])`.
    fn write_pixels(&mut self, mode: BlendingMode, xs: &[i16], ys: &[i16], colors: &[Color]);

    /// Color the device assumes its background to be.
    fn bg_color_hint(&self) -> Color {
        Color::TRANSPARENT
    }
}

/// Target of a draw: a device plus offset, clipping and fill settings.
pub struct Surface<'a> {
    out: &'a mut dyn DisplayOutput,
    dx: i16,
    dy: i16,
    clip_box: Rect,
    bgcolor: Color,
    fill_mode: FillMode,
    blending_mode: BlendingMode,
}

impl<'a> Surface<'a> {
    /// Surface drawing into `out`, clipped to `clip_box` (device
    /// coordinates). The background defaults to the device's hint.
    pub fn new(out: &'a mut dyn DisplayOutput, clip_box: Rect) -> Self {
        let bgcolor = out.bg_color_hint();
        Self {
            out,
            dx: 0,
            dy: 0,
            clip_box,
            bgcolor,
            fill_mode: FillMode::default(),
            blending_mode: BlendingMode::default(),
        }
    }

    /// Offset added to drawable coordinates to get device coordinates.
    pub fn with_offset(mut self, dx: i16, dy: i16) -> Self {
        self.dx = dx;
        self.dy = dy;
        self
    }

    /// Color that drawn pixels are composed over before output.
    pub fn with_bgcolor(mut self, bgcolor: Color) -> Self {
        self.bgcolor = bgcolor;
        self
    }

    /// Whether fully transparent pixels are written.
    pub fn with_fill_mode(mut self, fill_mode: FillMode) -> Self {
        self.fill_mode = fill_mode;
        self
    }

    /// Mode used when writing to the device.
    pub fn with_blending_mode(mut self, blending_mode: BlendingMode) -> Self {
        self.blending_mode = blending_mode;
        self
    }

    /// The device being drawn to.
    pub fn out(&mut self) -> &mut dyn DisplayOutput {
        &mut *self.out
    }

    /// Horizontal offset.
    pub fn dx(&self) -> i16 {
        self.dx
    }

    /// Vertical offset.
    pub fn dy(&self) -> i16 {
        self.dy
    }

    /// Writable area in device coordinates.
    pub fn clip_box(&self) -> Rect {
        self.clip_box
    }

    /// Background color.
    pub fn bgcolor(&self) -> Color {
        self.bgcolor
    }

    /// Fill mode.
    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    /// Device blending mode.
    pub fn blending_mode(&self) -> BlendingMode {
        self.blending_mode
    }

    /// Draw `object` unless it falls entirely outside the clip box.
    pub fn draw_object(&mut self, object: &dyn Drawable) {
        let visible = object
            .extents()
            .translate(self.dx, self.dy)
            .intersect(self.clip_box);
        if visible.is_empty() {
            return;
        }
        object.draw_to(self);
    }
}

/// Anything that can paint itself onto a [`Surface`].
pub trait Drawable {
    /// Bounding box in the object's own coordinates.
    fn extents(&self) -> Rect;

    /// Box used for alignment; defaults to the extents.
    fn anchor_extents(&self) -> Rect {
        self.extents()
    }

    /// Paint onto `surface`, translated by its offset and clipped to its
    /// clip box.
    fn draw_to(&self, surface: &mut Surface<'_>);
}
