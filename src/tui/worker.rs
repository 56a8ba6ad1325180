//! Background prediction worker.
//!
//! Runs a classifier call off the UI thread and reports progress over a
//! channel, so the TUI keeps redrawing while the configured pacing delay
//! elapses.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::application::PredictionService;
use crate::domain::{ClinicalInput, Prediction};

/// Progress updates from the prediction worker.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionProgress {
    /// Checking the form values against field bounds
    Validating,
    /// Input accepted, classifier running
    Running,
    /// Finished; the flag is set when legacy placeholders were substituted
    Complete(Prediction, bool),
    Error(String),
}

/// Handle to a running prediction worker.
pub struct PredictionWorkerHandle {
    progress_rx: Receiver<PredictionProgress>,
    _handle: JoinHandle<()>,
}

impl PredictionWorkerHandle {
    /// Next progress update, if one is waiting.
    #[must_use]
    pub fn try_recv(&self) -> Option<PredictionProgress> {
        self.progress_rx.try_recv().ok()
    }

    /// Block up to `timeout` for the next update.
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<PredictionProgress> {
        self.progress_rx.recv_timeout(timeout).ok()
    }
}

/// Spawns prediction jobs.
pub struct PredictionWorker;

impl PredictionWorker {
    /// Start a prediction on a background thread.
    pub fn spawn(
        service: Arc<PredictionService>,
        input: ClinicalInput,
        pacing: Duration,
    ) -> PredictionWorkerHandle {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_with_progress(&service, &input, pacing, &tx);
        });

        PredictionWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_with_progress(
        service: &PredictionService,
        input: &ClinicalInput,
        pacing: Duration,
        tx: &Sender<PredictionProgress>,
    ) {
        let _ = tx.send(PredictionProgress::Validating);

        if !pacing.is_zero() {
            thread::sleep(pacing / 2);
        }
        let _ = tx.send(PredictionProgress::Running);

        let outcome = service.predict_input(input);
        if !pacing.is_zero() {
            thread::sleep(pacing / 2);
        }

        // The receiver is gone if the user left the screen; nothing to do then.
        let _ = match outcome {
            Ok(prediction) => tx.send(PredictionProgress::Complete(
                prediction,
                input.uses_placeholders(),
            )),
            Err(e) => {
                tracing::warn!("{} prediction failed: {}", input.model(), e);
                tx.send(PredictionProgress::Error(e.to_string()))
            }
        };
    }
}
