//! Surface module: the pixel target controls draw into.
//!
//! This module contains:
//! - [`Rgb`]: True-color representation
//! - [`Surface`]: A grid of pixels with clipped drawing primitives
//! - [`Glyphs`]: The font boundary, with the built-in [`BlockFont`]
//!
//! Rendering proper is a collaborator concern; the engine only relies on a
//! control being able to produce an image sized to its current bounds.

mod color;
mod font;
#[allow(clippy::module_inception)]
mod surface;

pub use color::Rgb;
pub use font::{BlockFont, Glyphs};
pub use surface::{Blend, Surface, SurfaceError};
