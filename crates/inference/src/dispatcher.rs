//! Stroke-completion dispatch: rasterize, then ask the backend off-thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use painting::{Drawing, render_png_scaled};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::state::GuessBoard;
use crate::{InferenceBackend, InferenceError, InferenceRequest};

/// A dispatch that has been handed to the runtime
#[derive(Debug)]
pub struct DispatchHandle {
    id: u64,
    task: JoinHandle<()>,
}

impl DispatchHandle {
    /// Sequence number of the request (first dispatch is 1)
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the outcome has been written to the board
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!("Dispatch {} task failed: {}", self.id, e);
        }
    }
}

/// Sends each completed drawing to an [`InferenceBackend`].
///
/// Every call to [`dispatch`](Self::dispatch) runs independently: there is
/// no queueing, de-duplication or cancellation, and the board keeps
/// whichever outcome arrives last.
pub struct InferenceDispatcher<B> {
    backend: Arc<B>,
    board: Arc<GuessBoard>,
    runtime: Handle,
    prompt: String,
    scale: f32,
    next_id: AtomicU64,
}

impl<B> std::fmt::Debug for InferenceDispatcher<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceDispatcher")
            .field("prompt", &self.prompt)
            .field("scale", &self.scale)
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}

impl<B: InferenceBackend> InferenceDispatcher<B> {
    pub fn new(
        backend: Arc<B>,
        board: Arc<GuessBoard>,
        runtime: Handle,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            board,
            runtime,
            prompt: prompt.into(),
            scale: 1.0,
            next_id: AtomicU64::new(1),
        }
    }

    /// Display scale applied to path coordinates and the pen width when
    /// rasterizing. Paths are in logical pixels; the bitmap is physical.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn board(&self) -> &Arc<GuessBoard> {
        &self.board
    }

    /// Rasterize `drawing` onto a `width`x`height` physical bitmap and
    /// request a guess.
    ///
    /// The board is marked loading before this returns. Rasterization runs
    /// on the calling thread; the request itself runs on the runtime, and
    /// its outcome (or error) is written to the board when it resolves.
    pub fn dispatch(&self, drawing: &Drawing, width: u32, height: u32) -> DispatchHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.board.begin();

        info!(
            "Dispatch {}: {} paths on {}x{} canvas (scale {})",
            id,
            drawing.len(),
            width,
            height,
            self.scale
        );

        let request = render_png_scaled(drawing.iter(), width, height, self.scale)
            .map(|image_png| InferenceRequest {
                id,
                image_png,
                prompt: self.prompt.clone(),
            })
            .map_err(InferenceError::from);

        let backend = Arc::clone(&self.backend);
        let board = Arc::clone(&self.board);

        let task = self.runtime.spawn(async move {
            let outcome = match request {
                Ok(request) => backend.guess(request).await,
                Err(e) => Err(e),
            };
            match &outcome {
                Ok(Some(text)) => info!("Dispatch {} resolved: {:?}", id, text),
                Ok(None) => info!("Dispatch {} resolved without text", id),
                Err(e) => warn!("Dispatch {} failed: {}", id, e),
            }
            board.resolve(outcome);
        });

        DispatchHandle { id, task }
    }
}
