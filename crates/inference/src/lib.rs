//! Drawing inference for sketchcast
//!
//! Sends rasterized drawings to an image-understanding service and keeps the
//! latest guess in an observable cell.

mod dispatcher;
mod gemini;
mod state;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use dispatcher::{DispatchHandle, InferenceDispatcher};
pub use gemini::GeminiBackend;
pub use state::{GUESS_PREFIX, GuessBoard, GuessState, LOADING_TEXT, NO_GUESS_TEXT};

use std::future::Future;

use painting::RasterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("API key not configured (set {})", sketchcast_config::ENV_API_KEY)]
    MissingApiKey,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("Prompt blocked: {0}")]
    Blocked(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Could not encode drawing: {0}")]
    Encode(#[from] RasterError),
}

/// Outcome of one inference call: the guess text, if the service gave any
pub type InferenceOutcome = Result<Option<String>, InferenceError>;

/// A single image + prompt request
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    /// Dispatch sequence number, unique per dispatcher
    pub id: u64,
    /// PNG-encoded drawing
    pub image_png: Vec<u8>,
    /// Natural-language instruction sent with the image
    pub prompt: String,
}

impl InferenceRequest {
    pub const MIME_TYPE: &'static str = "image/png";
}

/// Trait for inference backends
pub trait InferenceBackend: Send + Sync + 'static {
    /// Ask the service what the image shows.
    ///
    /// `Ok(None)` means the call succeeded but produced no text.
    fn guess(&self, request: InferenceRequest) -> impl Future<Output = InferenceOutcome> + Send;
}
