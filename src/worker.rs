//! Export worker
//!
//! PNG encoding of a full-size gradient takes long enough to drop frames, so
//! exports run on a dedicated thread fed through crossbeam channels.

use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::export::export_png;
use crate::gradient::Gradient;

/// Messages sent from the UI thread to the worker
#[derive(Debug)]
pub enum WorkerMessage {
    /// Render `gradient` at `width` x `height` and write it to `path`
    ExportPng {
        gradient: Gradient,
        width: u32,
        height: u32,
        path: PathBuf,
    },
    /// Shutdown signal
    Shutdown,
}

/// Responses sent from the worker back to the UI thread
#[derive(Debug)]
pub enum WorkerResponse {
    ExportComplete { path: PathBuf, render_time: u64 },
    Error(String),
}

/// Handle to the worker thread and its channels
pub struct WorkerHandle {
    pub request_tx: Sender<WorkerMessage>,
    pub response_rx: Receiver<WorkerResponse>,
    thread: JoinHandle<()>,
}

impl WorkerHandle {
    /// Stop the worker and wait for it to finish
    pub fn shutdown(self) {
        let _ = self.request_tx.send(WorkerMessage::Shutdown);
        let _ = self.thread.join();
    }
}

/// Spawn the export worker thread
pub fn spawn_worker() -> Result<WorkerHandle> {
    let (request_tx, request_rx) = unbounded::<WorkerMessage>();
    let (response_tx, response_rx) = unbounded::<WorkerResponse>();

    let thread = thread::Builder::new()
        .name("export-worker".to_string())
        .spawn(move || worker_loop(request_rx, response_tx))
        .context("failed to spawn export worker")?;

    Ok(WorkerHandle {
        request_tx,
        response_rx,
        thread,
    })
}

/// Process messages until shutdown or until the UI side hangs up
fn worker_loop(rx: Receiver<WorkerMessage>, tx: Sender<WorkerResponse>) {
    while let Ok(msg) = rx.recv() {
        match msg {
            WorkerMessage::Shutdown => break,

            WorkerMessage::ExportPng {
                gradient,
                width,
                height,
                path,
            } => {
                let start = Instant::now();

                let response = match export_png(&gradient, width, height, &path) {
                    Ok(()) => {
                        let render_time = start.elapsed().as_millis() as u64;
                        tracing::info!(path = %path.display(), render_time, "exported gradient");
                        WorkerResponse::ExportComplete { path, render_time }
                    }
                    Err(e) => {
                        let message = format!("{:#}", e);
                        tracing::warn!(error = %message, "export failed");
                        WorkerResponse::Error(message)
                    }
                };

                let _ = tx.send(response);
            }
        }
    }
}
