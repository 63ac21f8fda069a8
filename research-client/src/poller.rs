//! Polling controller: owns the single active job's lifecycle.
//!
//! State machine: `Idle → Starting → Polling → Completed | Failed`, with
//! `reset()` as the only exit from a terminal state. While in `Polling` a
//! spawned task fetches the job status on a fixed interval and forwards each
//! result as a [`PollSignal`] tagged with the generation it was produced
//! under. The consumer must drop signals whose generation is stale; together
//! with aborting the task on reset this guarantees that a late in-flight
//! fetch can never touch a newer job's view.

use std::sync::Arc;
use std::time::Duration;

use research_types::{JobHandle, Report, ResearchRequest, StatusKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::ResearchApi;
use crate::error::ResearchError;

/// Fixed poll cadence; the backend advances coarse steps, so 2s is plenty.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Sentinel used when the backend reports failure without a message.
pub const UNKNOWN_ERROR: &str = "unknown error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Starting,
    Polling,
    Completed,
    Failed,
}

impl PollerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One result of a poll tick, forwarded to the view coordinator.
#[derive(Debug)]
pub enum PollEvent {
    /// Job still running; latest progress snapshot.
    Progress { progress: f64, current_step: String },
    /// Job finished with a report.
    Completed(Box<Report>),
    /// Backend said `completed` but attached no report. Contract violation;
    /// logged and surfaced as its own event so the consumer can bail out.
    ReportMissing,
    /// Job failed, either reported by the backend or via a transport error.
    Failed(String),
}

/// A [`PollEvent`] tagged with the submission generation that produced it.
#[derive(Debug)]
pub struct PollSignal {
    pub generation: u64,
    pub event: PollEvent,
}

pub struct PollingController {
    api: Arc<dyn ResearchApi>,
    interval: Duration,
    state: PollerState,
    handle: Option<JobHandle>,
    generation: u64,
    task: Option<JoinHandle<()>>,
    signals: mpsc::UnboundedSender<PollSignal>,
}

impl PollingController {
    /// Build a controller and the signal stream its poll task will feed.
    pub fn new(
        api: Arc<dyn ResearchApi>,
        interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<PollSignal>) {
        let (signals, rx) = mpsc::unbounded_channel();
        (
            Self {
                api,
                interval,
                state: PollerState::Idle,
                handle: None,
                generation: 0,
                task: None,
                signals,
            },
            rx,
        )
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    pub fn job_handle(&self) -> Option<&JobHandle> {
        self.handle.as_ref()
    }

    /// Start a new job. Only accepted from `Idle`.
    ///
    /// On start failure the controller lands in `Failed` with no handle
    /// retained; `reset()` is required before the next attempt.
    pub async fn submit(&mut self, request: &ResearchRequest) -> Result<(), ResearchError> {
        if self.state != PollerState::Idle {
            return Err(ResearchError::AlreadyActive);
        }

        self.state = PollerState::Starting;
        let handle = match self.api.start_research(request).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(error = %e, "research start failed");
                self.state = PollerState::Failed;
                return Err(e);
            }
        };

        tracing::info!(research_id = %handle.as_str(), "research job started, polling");
        self.generation += 1;
        self.handle = Some(handle.clone());
        self.task = Some(self.spawn_poll_loop(handle, self.generation));
        self.state = PollerState::Polling;
        Ok(())
    }

    /// True when a signal with this generation is still current.
    pub fn is_live(&self, generation: u64) -> bool {
        self.state == PollerState::Polling && generation == self.generation
    }

    /// Record the terminal outcome carried by a live signal.
    pub fn finish(&mut self, outcome: PollerState) {
        debug_assert!(outcome.is_terminal());
        self.state = outcome;
        self.handle = None;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Return to `Idle`, cancelling any pending schedule. Always available.
    pub fn reset(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        // Stale in-flight results are fenced off even if abort raced the send.
        self.generation += 1;
        self.handle = None;
        self.state = PollerState::Idle;
    }

    fn spawn_poll_loop(&self, handle: JobHandle, generation: u64) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let signals = self.signals.clone();
        let interval = self.interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval fires immediately; consume that so the first fetch
            // happens one full period after polling starts.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                tracing::debug!(research_id = %handle.as_str(), "poll tick");

                let event = match api.fetch_status(&handle).await {
                    Ok(status) => match status.status {
                        StatusKind::Running => {
                            let _ = signals.send(PollSignal {
                                generation,
                                event: PollEvent::Progress {
                                    progress: status.progress,
                                    current_step: status.current_step,
                                },
                            });
                            continue;
                        }
                        StatusKind::Completed => match status.report {
                            Some(report) => PollEvent::Completed(Box::new(report)),
                            None => {
                                tracing::warn!(
                                    research_id = %handle.as_str(),
                                    "backend reported completed without a report"
                                );
                                PollEvent::ReportMissing
                            }
                        },
                        StatusKind::Failed => PollEvent::Failed(
                            status.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
                        ),
                    },
                    Err(e) => PollEvent::Failed(e.to_string()),
                };

                // Terminal: forward and stop the schedule.
                let _ = signals.send(PollSignal { generation, event });
                break;
            }
        })
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use research_types::JobStatus;

    struct StartOnlyApi {
        fail_start: bool,
    }

    #[async_trait]
    impl ResearchApi for StartOnlyApi {
        async fn start_research(
            &self,
            _request: &ResearchRequest,
        ) -> Result<JobHandle, ResearchError> {
            if self.fail_start {
                Err(ResearchError::HttpStatus {
                    endpoint: "/api/research/start",
                    status: 500,
                })
            } else {
                Ok(JobHandle("job-1".to_string()))
            }
        }

        async fn fetch_status(&self, _handle: &JobHandle) -> Result<JobStatus, ResearchError> {
            Err(ResearchError::Transport {
                endpoint: "/api/research/status",
                message: "not scripted".to_string(),
            })
        }
    }

    fn request() -> ResearchRequest {
        ResearchRequest {
            topic: "t".to_string(),
            depth: 3,
            max_sources: 10,
            academic_only: false,
        }
    }

    #[tokio::test]
    async fn submit_is_only_accepted_from_idle() {
        let (mut controller, _rx) = PollingController::new(
            Arc::new(StartOnlyApi { fail_start: false }),
            Duration::from_secs(60),
        );

        controller.submit(&request()).await.unwrap();
        assert_eq!(controller.state(), PollerState::Polling);

        let err = controller.submit(&request()).await.unwrap_err();
        assert!(matches!(err, ResearchError::AlreadyActive));
    }

    #[tokio::test]
    async fn start_failure_lands_in_failed_without_handle() {
        let (mut controller, _rx) = PollingController::new(
            Arc::new(StartOnlyApi { fail_start: true }),
            Duration::from_secs(60),
        );

        let err = controller.submit(&request()).await.unwrap_err();
        assert!(matches!(err, ResearchError::HttpStatus { status: 500, .. }));
        assert_eq!(controller.state(), PollerState::Failed);
        assert!(controller.job_handle().is_none());

        controller.reset();
        assert_eq!(controller.state(), PollerState::Idle);
    }

    #[tokio::test]
    async fn reset_bumps_generation_so_old_signals_go_stale() {
        let (mut controller, _rx) = PollingController::new(
            Arc::new(StartOnlyApi { fail_start: false }),
            Duration::from_secs(60),
        );

        controller.submit(&request()).await.unwrap();
        let live_generation = 1;
        assert!(controller.is_live(live_generation));

        controller.reset();
        assert!(!controller.is_live(live_generation));

        controller.submit(&request()).await.unwrap();
        assert!(!controller.is_live(live_generation));
        assert!(controller.is_live(live_generation + 2));
    }
}
