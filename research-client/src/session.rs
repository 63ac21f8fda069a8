//! Session coordinator: the single writer of [`ViewState`].
//!
//! Wires user submissions into the polling controller and folds the
//! controller's poll signals back into the view. All free-text report fields
//! reach the UI only through the markdown renderer, via [`ViewModel`].

use std::sync::Arc;

use research_types::ResearchRequest;
use tokio::sync::mpsc;

use crate::api::ResearchApi;
use crate::error::ResearchError;
use crate::poller::{
    PollEvent, PollSignal, PollerState, PollingController, DEFAULT_POLL_INTERVAL,
};
use crate::view::{self, ViewModel, ViewState};

/// Step text shown before the first status snapshot arrives.
const INITIAL_STEP: &str = "initializing";

pub struct ResearchSession {
    controller: PollingController,
    signals: mpsc::UnboundedReceiver<PollSignal>,
    view: ViewState,
}

impl ResearchSession {
    pub fn new(api: Arc<dyn ResearchApi>) -> Self {
        Self::with_interval(api, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(api: Arc<dyn ResearchApi>, interval: std::time::Duration) -> Self {
        let (controller, signals) = PollingController::new(api, interval);
        Self {
            controller,
            signals,
            view: ViewState::Idle,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Render instructions for the current state. Pure projection.
    pub fn view_model(&self) -> ViewModel {
        view::render(&self.view)
    }

    /// Submit a research request.
    ///
    /// An empty or whitespace-only topic is rejected locally without touching
    /// the network and leaves the view in `Idle`. A start failure surfaces as
    /// the `Failed` view (and requires [`reset`](Self::reset) before retrying).
    pub async fn submit(&mut self, request: &ResearchRequest) -> Result<(), ResearchError> {
        let topic = request.topic.trim();
        if topic.is_empty() {
            return Err(ResearchError::Validation(
                "research topic must not be empty".to_string(),
            ));
        }
        let topic = topic.to_string();

        match self.controller.submit(request).await {
            Ok(()) => {
                self.view = ViewState::InProgress {
                    topic,
                    percent: 0,
                    step: INITIAL_STEP.to_string(),
                };
                Ok(())
            }
            // Leave the current terminal/progress view alone.
            Err(ResearchError::AlreadyActive) => Err(ResearchError::AlreadyActive),
            Err(e) => {
                self.view = ViewState::Failed {
                    message: fail_message(&e.to_string()),
                };
                Err(e)
            }
        }
    }

    /// Wait for the next live poll signal and apply it to the view.
    ///
    /// Stale signals (from a generation that was reset away) are discarded
    /// without waking the caller. Returns `None` only once the controller is
    /// gone, which cannot happen while the session is alive.
    pub async fn next_event(&mut self) -> Option<&ViewState> {
        loop {
            let signal = self.signals.recv().await?;
            if self.apply(signal) {
                return Some(&self.view);
            }
        }
    }

    /// Abandon the current job and return to the input form.
    pub fn reset(&mut self) {
        self.controller.reset();
        self.view = ViewState::Idle;
    }

    fn apply(&mut self, signal: PollSignal) -> bool {
        if !self.controller.is_live(signal.generation) {
            tracing::debug!(generation = signal.generation, "discarding stale poll signal");
            return false;
        }

        match signal.event {
            PollEvent::Progress {
                progress,
                current_step,
            } => {
                if let ViewState::InProgress { percent, step, .. } = &mut self.view {
                    *percent = progress_percent(progress);
                    *step = current_step;
                }
            }
            PollEvent::Completed(report) => {
                self.controller.finish(PollerState::Completed);
                self.view = ViewState::Completed(report);
            }
            PollEvent::ReportMissing => {
                // Backend contract violation; render nothing rather than a
                // partial report.
                self.controller.reset();
                self.view = ViewState::Idle;
            }
            PollEvent::Failed(cause) => {
                self.controller.finish(PollerState::Failed);
                self.view = ViewState::Failed {
                    message: fail_message(&cause),
                };
            }
        }
        true
    }
}

fn fail_message(cause: &str) -> String {
    format!("Research failed: {cause}")
}

fn progress_percent(progress: f64) -> u8 {
    (progress.clamp(0.0, 1.0) * 100.0).round() as u8
}
