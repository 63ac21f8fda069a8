//! Wire types shared between the deep-research client and backend
//!
//! These mirror the backend's JSON contracts:
//! - `POST /api/research/start` — [`ResearchRequest`] in, [`StartResearchResponse`] out
//! - `GET /api/research/status/{id}` — [`JobStatus`] out, with the full
//!   [`Report`] attached once the job completes
//!
//! Serializable with serde for JSON over HTTP.

use serde::{Deserialize, Serialize};

// ============================================================================
// Requests
// ============================================================================

/// Parameters for one research run.
///
/// `depth` and `max_sources` are clamped to their declared ranges by the
/// input surface before this struct is built; the client trusts its caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResearchRequest {
    /// Research topic or question
    pub topic: String,
    /// Research depth level (1-5)
    pub depth: u8,
    /// Maximum number of sources to consult (3-20)
    pub max_sources: u8,
    /// Restrict search to academic sites
    pub academic_only: bool,
}

/// Response body of a successful start call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartResearchResponse {
    pub research_id: String,
}

// ============================================================================
// Job identity
// ============================================================================

/// Opaque identifier for one in-flight research job.
///
/// At most one handle is active at a time on the client side; a new job may
/// only start after the previous one reached a terminal state or was reset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct JobHandle(pub String);

impl JobHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Status polling
// ============================================================================

/// Coarse lifecycle phase reported by the backend.
///
/// Older backend builds report `in_progress` instead of `running`; both
/// deserialize to [`StatusKind::Running`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    #[serde(alias = "in_progress")]
    Running,
    Completed,
    Failed,
}

/// One status snapshot. Ephemeral: only the latest snapshot matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    pub status: StatusKind,
    /// Fraction complete, 0.0..=1.0
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub current_step: String,
    /// Present iff status is `completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
    /// May be present when status is `failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Report
// ============================================================================

/// Structured final output of a completed job.
///
/// `summary`, `detailed_analysis`, each key finding and each step answer are
/// markdown in the constrained subset the client renderer supports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub topic: String,
    pub summary: String,
    pub key_findings: Vec<String>,
    pub detailed_analysis: String,
    #[serde(default)]
    pub analysis_steps: Vec<AnalysisStep>,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

/// One question/answer pair from the analysis phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisStep {
    pub question: String,
    pub answer: String,
    /// Citation identifiers, display-only
    #[serde(default)]
    pub sources: Vec<String>,
}

/// A consulted source. Display rule: fall back to the URL when the title is
/// empty or absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl SourceRef {
    /// Display text for this source, applying the title-or-url policy.
    pub fn display_text(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.url,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
