//! The drawing screen: canvas, guess line and reset control.

use std::sync::Arc;

use painting::{Drawing, Point, StrokeRecorder};
use sketchcast_config::DisplayConfig;
use sketchcast_inference::{
    DispatchHandle, GuessBoard, GuessState, InferenceBackend, InferenceDispatcher,
};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::info;

use crate::input::CanvasInput;

/// Pointer events in, guesses out.
///
/// All methods are synchronous and meant to be called from the single task
/// that owns the screen. Only the network call runs elsewhere.
///
/// Pointer positions are recorded in logical pixels. The drawing is scaled
/// by `DisplayConfig::scale` only when it is rasterized for a guess.
pub struct DrawingScreen<B> {
    recorder: StrokeRecorder,
    dispatcher: InferenceDispatcher<B>,
    board: Arc<GuessBoard>,
    display: DisplayConfig,
}

impl<B: InferenceBackend> DrawingScreen<B> {
    pub fn new(
        backend: Arc<B>,
        display: DisplayConfig,
        prompt: impl Into<String>,
        runtime: Handle,
    ) -> Self {
        let board = Arc::new(GuessBoard::new());
        let dispatcher = InferenceDispatcher::new(backend, Arc::clone(&board), runtime, prompt)
            .with_scale(display.scale);
        Self {
            recorder: StrokeRecorder::new(),
            dispatcher,
            board,
            display,
        }
    }

    /// Bitmap size used for inference, in physical pixels
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.display.scaled_width(), self.display.scaled_height())
    }

    pub fn pointer_down(&mut self, point: Point) {
        self.recorder.pointer_down(point);
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.recorder.pointer_move(point);
    }

    /// Finish the stroke and send the drawing for a guess.
    ///
    /// Returns `None` when no stroke was in progress.
    pub fn pointer_up(&mut self) -> Option<DispatchHandle> {
        let snapshot = self.recorder.pointer_up()?;
        let (width, height) = self.canvas_size();
        Some(self.dispatcher.dispatch(&snapshot, width, height))
    }

    /// Reset control: clear the canvas and the guess.
    ///
    /// Requests already in flight are not cancelled and may still write
    /// their guess afterwards.
    pub fn reset(&mut self) {
        self.recorder.clear();
        self.board.reset();
        info!("Canvas reset");
    }

    /// Apply one input message
    pub fn handle(&mut self, input: CanvasInput) -> Option<DispatchHandle> {
        match input {
            CanvasInput::PointerDown(point) => self.pointer_down(point),
            CanvasInput::PointerMove(point) => self.pointer_move(point),
            CanvasInput::PointerUp => return self.pointer_up(),
            CanvasInput::Reset => self.reset(),
        }
        None
    }

    pub fn drawing(&self) -> &Drawing {
        self.recorder.drawing()
    }

    pub fn recorder(&self) -> &StrokeRecorder {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut StrokeRecorder {
        &mut self.recorder
    }

    pub fn guess(&self) -> GuessState {
        self.board.current()
    }

    /// Current text of the guess line
    pub fn display_text(&self) -> String {
        self.board.current().display_text()
    }

    /// Follow guess updates
    pub fn subscribe(&self) -> watch::Receiver<GuessState> {
        self.board.subscribe()
    }
}
