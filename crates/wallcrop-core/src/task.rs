//! Running one request off the caller's thread.
//!
//! A [`CropTask`] owns everything a request needs and runs it on a single
//! named worker thread. Its completion callback fires exactly once, whether
//! the run succeeds, fails, panics, or the worker never starts.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::error::CropError;
use crate::pipeline::{CropOutcome, CropPipeline};
use crate::request::CropRequest;
use crate::sink::WallpaperSink;
use crate::source::{SourceRef, SourceResolver};

const WORKER_NAME: &str = "wallcrop-task";

/// A crop request bundled with its pipeline and output sink.
pub struct CropTask<R, S> {
    pipeline: Arc<CropPipeline<R>>,
    source: SourceRef,
    request: CropRequest,
    sink: S,
}

/// Handle to a spawned [`CropTask`].
pub struct CropTaskHandle<S> {
    handle: JoinHandle<S>,
}

impl<S> CropTaskHandle<S> {
    /// Wait for the worker and take the sink back.
    ///
    /// The callback has already run by the time this returns `Ok`.
    pub fn join(self) -> Result<S, CropError> {
        self.handle
            .join()
            .map_err(|payload| CropError::Panicked(panic_message(payload.as_ref())))
    }
}

impl<R, S> CropTask<R, S>
where
    R: SourceResolver + 'static,
    S: WallpaperSink + 'static,
{
    pub fn new(
        pipeline: Arc<CropPipeline<R>>,
        source: SourceRef,
        request: CropRequest,
        sink: S,
    ) -> Self {
        Self {
            pipeline,
            source,
            request,
            sink,
        }
    }

    /// Run on the current thread.
    pub fn run(mut self) -> Result<CropOutcome, CropError> {
        self.pipeline.run(&self.source, &self.request, &mut self.sink)
    }

    /// Run on a new worker thread and report through `on_complete`.
    ///
    /// # Returns
    ///
    /// A handle to the worker, or `None` if no thread could be started. In
    /// that case `on_complete` has already been called on this thread with
    /// `CropError::WorkerUnavailable`.
    pub fn spawn<F>(self, on_complete: F) -> Option<CropTaskHandle<S>>
    where
        F: FnOnce(Result<CropOutcome, CropError>) + Send + 'static,
    {
        // Shared so the callback survives a failed spawn.
        let callback = Arc::new(Mutex::new(Some(on_complete)));
        let worker_callback = Arc::clone(&callback);

        let spawned = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || {
                let CropTask {
                    pipeline,
                    source,
                    request,
                    mut sink,
                } = self;

                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    pipeline.run(&source, &request, &mut sink)
                }))
                .unwrap_or_else(|payload| {
                    let message = panic_message(payload.as_ref());
                    log::warn!("Crop worker for {} panicked: {}", source, message);
                    Err(CropError::Panicked(message))
                });

                complete(&worker_callback, result);
                sink
            });

        match spawned {
            Ok(handle) => Some(CropTaskHandle { handle }),
            Err(err) => {
                log::warn!("Cannot start crop worker: {}", err);
                complete(&callback, Err(CropError::WorkerUnavailable(err)));
                None
            }
        }
    }
}

/// Invoke the callback in `slot` unless it already ran.
fn complete<F>(slot: &Mutex<Option<F>>, result: Result<CropOutcome, CropError>)
where
    F: FnOnce(Result<CropOutcome, CropError>),
{
    let callback = match slot.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    };
    if let Some(callback) = callback {
        callback(result);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
