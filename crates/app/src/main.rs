//! sketchcast - headless host for the drawing screen
//!
//! Reads canvas input messages from stdin (see [`sketchcast::input`]) and
//! prints the guess line to stdout whenever it changes. Logs go to stderr.

use std::sync::Arc;

use sketchcast::{AppConfig, CanvasInput, DrawingScreen};
use sketchcast_inference::GeminiBackend;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env();
    let (width, height) = config.canvas_size();

    info!(
        "Starting sketchcast with model {} on a {}x{} canvas",
        config.inference.model, width, height
    );
    if config.inference.api_key.is_none() {
        warn!("No API key configured; every guess will report an error");
    }

    let backend = match GeminiBackend::new(&config.inference) {
        Ok(backend) => {
            info!("Guesses go to {}", backend.url());
            Arc::new(backend)
        }
        Err(e) => {
            error!("Failed to create inference client: {}", e);
            std::process::exit(1);
        }
    };

    let mut screen = DrawingScreen::new(
        backend,
        config.display.clone(),
        config.inference.prompt.clone(),
        Handle::current(),
    );

    // Guess line printer
    let mut updates = screen.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let line = updates.borrow_and_update().display_text();
            println!("{}", line);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = Vec::new();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };

        match CanvasInput::parse_line(&line) {
            Ok(Some(input)) => {
                if let Some(dispatch) = screen.handle(input) {
                    pending.push(dispatch);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("{}, skipping line", e),
        }

        pending.retain(|dispatch| !dispatch.is_finished());
    }

    info!("Input closed, waiting for {} outstanding guesses", pending.len());
    for dispatch in pending {
        dispatch.join().await;
    }

    // Dropping the screen closes the guess channel and ends the printer
    drop(screen);
    if let Err(e) = printer.await {
        error!("Printer task failed: {}", e);
    }
}
