//! `layerstack` composites ordered stacks of overlapping, possibly
//! translucent pixel sources onto a destination, writing each destination
//! pixel exactly once and without a full-frame buffer.
//!
//! The moving parts:
//! - [`Color`] and [`BlendingMode`]: ARGB8888 pixels and Porter-Duff
//!   blending with bit-exact fixed point arithmetic.
//! - [`PixelStream`] / [`Streamable`] and [`Rasterizable`]: sequential and
//!   random-access pixel sources.
//! - [`DisplayOutput`] and [`Surface`]: where pixels go. [`Offscreen`] is an
//!   in-memory device.
//! - [`StreamableStack`] and [`RasterizableStack`]: the compositors.
//!
//! ```no_run
//! use layerstack::{
//!     BlendingMode, Color, Drawable, FillMode, Offscreen, Rect, SolidColor, StreamableStack,
//!     Surface,
//! };
//!
//! # fn main() -> layerstack::StackResult<()> {
//! let back = SolidColor::new(Rect::new(0, 0, 31, 31), Color::WHITE);
//! let front = SolidColor::new(Rect::new(8, 8, 23, 23), Color(0x80FF_0000));
//!
//! let mut stack = StreamableStack::new(Rect::new(0, 0, 31, 31));
//! stack.add_input(&back)?;
//! stack.add_input(&front)?.with_mode(BlendingMode::SourceOver);
//!
//! let mut screen = Offscreen::with_size(32, 32, Color::BLACK)?;
//! let mut surface = Surface::new(&mut screen, Rect::new(0, 0, 31, 31))
//!     .with_fill_mode(FillMode::Rectangle);
//! stack.draw_to(&mut surface);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod color;
pub mod device;
mod foundation;
pub mod rasterizable;
pub mod raster;
pub mod render;
pub mod stack;
pub mod stream;

/// Pixels buffered per batch by writers and buffering streams.
pub const PIXEL_BUFFER_SIZE: usize = 64;

pub use color::{BlendingMode, Color};
pub use device::{DisplayOutput, Drawable, FillMode, Surface};
pub use foundation::error::{StackError, StackResult};
pub use foundation::geometry::Rect;
pub use raster::{Raster, SolidColor};
pub use rasterizable::Rasterizable;
pub use render::{Offscreen, draw_stream};
pub use stack::{
    Input, InputMask, Instruction, MAX_INPUTS, Program, RasterInput, RasterizableStack,
    StackOpts, StreamableStack,
};
pub use stream::{BufferingStream, PixelStream, Streamable};
