//! sketchcast - draw on a canvas, get a guess of what it is
//!
//! [`DrawingScreen`] ties the stroke recorder to the inference dispatcher:
//! every completed stroke sends the whole drawing off for a guess, and the
//! latest guess is exposed for display.

pub mod config;
pub mod input;
mod screen;

pub use config::AppConfig;
pub use input::{CanvasInput, InputError};
pub use screen::DrawingScreen;
