//! In-memory backend whose answers are released by the test.
//!
//! Each request is matched to a [`Responder`] by its dispatch id, so tests
//! decide exactly when (and in which order) outstanding requests resolve.
//! A responder may be used before or after the request arrives.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::{InferenceBackend, InferenceError, InferenceOutcome, InferenceRequest};

struct Slot {
    tx: Option<oneshot::Sender<InferenceOutcome>>,
    rx: Option<oneshot::Receiver<InferenceOutcome>>,
}

impl Slot {
    fn new() -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            tx: Some(tx),
            rx: Some(rx),
        }
    }
}

/// Releases the outcome of one scripted request
pub struct Responder(oneshot::Sender<InferenceOutcome>);

impl Responder {
    pub fn respond(self, text: impl Into<String>) {
        self.send(Ok(Some(text.into())));
    }

    /// Succeed without any text
    pub fn respond_empty(self) {
        self.send(Ok(None));
    }

    pub fn fail(self, error: InferenceError) {
        self.send(Err(error));
    }

    fn send(self, outcome: InferenceOutcome) {
        // The request may already have been abandoned; nothing to do then
        let _ = self.0.send(outcome);
    }
}

#[derive(Default)]
pub struct ScriptedBackend {
    slots: Mutex<HashMap<u64, Slot>>,
    requests: Mutex<Vec<InferenceRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Responder for the request with dispatch id `id`.
    ///
    /// # Panics
    /// If the responder for `id` was already taken.
    pub fn responder(&self, id: u64) -> Responder {
        let tx = self
            .with_slot(id, |slot| slot.tx.take())
            .unwrap_or_else(|| panic!("responder for request {id} already taken"));
        Responder(tx)
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<InferenceRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn with_slot<R>(&self, id: u64, f: impl FnOnce(&mut Slot) -> R) -> R {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        f(slots.entry(id).or_insert_with(Slot::new))
    }
}

impl InferenceBackend for ScriptedBackend {
    async fn guess(&self, request: InferenceRequest) -> InferenceOutcome {
        let id = request.id;
        let rx = self.with_slot(id, |slot| slot.rx.take());
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        match rx {
            Some(rx) => rx.await.unwrap_or_else(|_| {
                Err(InferenceError::Connection(format!(
                    "responder for request {id} dropped"
                )))
            }),
            None => Err(InferenceError::InvalidResponse(format!(
                "request {id} sent twice"
            ))),
        }
    }
}
