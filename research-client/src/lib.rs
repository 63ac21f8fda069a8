//! Client core for the deep-research backend.
//!
//! Owns the lifecycle of a single research job: submit it, poll its status
//! on a fixed interval, and project the result into a render-ready view
//! model. The actual UI binding (form capture, DOM/TUI drawing) lives
//! outside this crate and consumes [`ViewModel`] trees.
//!
//! Typical wiring:
//!
//! ```no_run
//! use std::sync::Arc;
//! use research_client::{JobClient, ResearchSession};
//! use research_types::ResearchRequest;
//!
//! # async fn run() -> Result<(), research_client::ResearchError> {
//! let client = Arc::new(JobClient::new("http://localhost:8000"));
//! let mut session = ResearchSession::new(client);
//!
//! session
//!     .submit(&ResearchRequest {
//!         topic: "rust async runtimes".to_string(),
//!         depth: 3,
//!         max_sources: 10,
//!         academic_only: false,
//!     })
//!     .await?;
//!
//! while session.view().is_in_progress() {
//!     let _ = session.next_event().await;
//!     let _instructions = session.view_model();
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod markdown;
pub mod poller;
pub mod session;
pub mod view;

pub use api::{JobClient, ResearchApi};
pub use error::ResearchError;
pub use poller::{PollerState, PollingController, DEFAULT_POLL_INTERVAL};
pub use session::ResearchSession;
pub use view::{ReportView, SourceView, StepView, ViewModel, ViewState};
