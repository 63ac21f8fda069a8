//! View state and its pure projection into render instructions.
//!
//! [`ViewState`] is the single source of truth for what the UI shows; it is
//! owned and mutated only by the session coordinator. [`render`] maps it to a
//! [`ViewModel`], a surface-agnostic instruction tree a UI binding layer can
//! consume. One variant is active at a time, so exactly one view region is
//! ever visible and switching states implicitly hides the other three.

use research_types::Report;

use crate::markdown;

/// Sentinel shown for an analysis step with no citations.
pub const NO_SOURCES: &str = "no specific sources";

/// What the UI currently displays. Exactly one variant active.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    InProgress {
        topic: String,
        percent: u8,
        step: String,
    },
    Completed(Box<Report>),
    Failed {
        message: String,
    },
}

impl ViewState {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress { .. })
    }
}

/// Render-instruction tree for one view region.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewModel {
    /// Input form visible, nothing else.
    Idle,
    Progress {
        topic: String,
        percent: u8,
        step: String,
    },
    Report(ReportView),
    Error {
        message: String,
    },
}

/// A completed report with all free-text fields already rendered to HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub topic: String,
    pub summary_html: String,
    /// One `<li>`-ready fragment per key finding, document order preserved.
    pub key_findings_html: Vec<String>,
    pub analysis_html: String,
    /// Independently collapsible entries, document order preserved.
    pub steps: Vec<StepView>,
    pub sources: Vec<SourceView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    pub question: String,
    pub answer_html: String,
    /// Comma-joined citation identifiers, or the [`NO_SOURCES`] sentinel.
    pub citations: String,
}

/// Anchor data for one consulted source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceView {
    pub href: String,
    pub label: String,
}

/// Project the current view state into render instructions. Pure.
pub fn render(state: &ViewState) -> ViewModel {
    match state {
        ViewState::Idle => ViewModel::Idle,
        ViewState::InProgress {
            topic,
            percent,
            step,
        } => ViewModel::Progress {
            topic: topic.clone(),
            percent: *percent,
            step: step.clone(),
        },
        ViewState::Completed(report) => ViewModel::Report(render_report(report)),
        ViewState::Failed { message } => ViewModel::Error {
            message: message.clone(),
        },
    }
}

fn render_report(report: &Report) -> ReportView {
    ReportView {
        topic: report.topic.clone(),
        summary_html: markdown::render(&report.summary),
        key_findings_html: report
            .key_findings
            .iter()
            .map(|finding| markdown::render(finding))
            .collect(),
        analysis_html: markdown::render(&report.detailed_analysis),
        steps: report
            .analysis_steps
            .iter()
            .map(|step| StepView {
                question: step.question.clone(),
                answer_html: markdown::render(&step.answer),
                citations: if step.sources.is_empty() {
                    NO_SOURCES.to_string()
                } else {
                    step.sources.join(", ")
                },
            })
            .collect(),
        sources: report
            .sources
            .iter()
            .map(|source| SourceView {
                href: source.url.clone(),
                label: source.display_text().to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_types::{AnalysisStep, SourceRef};

    fn sample_report() -> Report {
        Report {
            topic: "rust memory model".to_string(),
            summary: "**Short** version".to_string(),
            key_findings: vec!["first".to_string(), "second".to_string()],
            detailed_analysis: "# Analysis\nbody".to_string(),
            analysis_steps: vec![
                AnalysisStep {
                    question: "q1".to_string(),
                    answer: "*a1*".to_string(),
                    sources: vec!["s1".to_string(), "s2".to_string()],
                },
                AnalysisStep {
                    question: "q2".to_string(),
                    answer: "a2".to_string(),
                    sources: vec![],
                },
            ],
            sources: vec![
                SourceRef {
                    url: "http://a".to_string(),
                    title: Some("".to_string()),
                },
                SourceRef {
                    url: "http://b".to_string(),
                    title: Some("B paper".to_string()),
                },
            ],
        }
    }

    #[test]
    fn idle_and_failed_project_directly() {
        assert_eq!(render(&ViewState::Idle), ViewModel::Idle);

        let failed = ViewState::Failed {
            message: "Research failed: timeout".to_string(),
        };
        assert_eq!(
            render(&failed),
            ViewModel::Error {
                message: "Research failed: timeout".to_string()
            }
        );
    }

    #[test]
    fn report_fields_pass_through_markdown() {
        let ViewModel::Report(view) = render(&ViewState::Completed(Box::new(sample_report())))
        else {
            panic!("expected report view");
        };

        assert_eq!(view.summary_html, "<strong>Short</strong> version");
        assert_eq!(view.analysis_html, "<h3>Analysis</h3>body");
        assert_eq!(view.key_findings_html, vec!["first", "second"]);
    }

    #[test]
    fn step_citations_join_or_fall_back_to_sentinel() {
        let ViewModel::Report(view) = render(&ViewState::Completed(Box::new(sample_report())))
        else {
            panic!("expected report view");
        };

        assert_eq!(view.steps[0].citations, "s1, s2");
        assert_eq!(view.steps[0].answer_html, "<em>a1</em>");
        assert_eq!(view.steps[1].citations, NO_SOURCES);
    }

    #[test]
    fn source_label_uses_url_when_title_blank() {
        let ViewModel::Report(view) = render(&ViewState::Completed(Box::new(sample_report())))
        else {
            panic!("expected report view");
        };

        assert_eq!(view.sources[0].href, "http://a");
        assert_eq!(view.sources[0].label, "http://a");
        assert_eq!(view.sources[1].label, "B paper");
    }

    #[test]
    fn report_order_is_preserved() {
        let ViewModel::Report(view) = render(&ViewState::Completed(Box::new(sample_report())))
        else {
            panic!("expected report view");
        };

        assert_eq!(view.steps[0].question, "q1");
        assert_eq!(view.steps[1].question, "q2");
        assert_eq!(view.sources[0].href, "http://a");
        assert_eq!(view.sources[1].href, "http://b");
    }
}
