//! sketchcast painting - stroke capture and rasterization
//!
//! This crate provides the drawing side of the canvas:
//! - [`types::Path`] / [`types::Drawing`] - Vector strokes as captured from the pointer
//! - [`recorder`] - Stroke recorder driven by pointer down/move/up
//! - [`pen`] - Fixed round pen turning paths into clipped stroke segments
//! - [`surface`] - CPU RGBA8 surface the segments are stamped on
//! - [`raster`] - Drawing to bitmap to PNG

pub mod constants;
pub mod pen;
pub mod raster;
pub mod recorder;
pub mod surface;
pub mod types;

pub use constants::*;
pub use pen::*;
pub use raster::*;
pub use recorder::*;
pub use surface::*;
pub use types::*;
