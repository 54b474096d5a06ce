//! View state for one user session and the pure reducer that updates it.
//!
//! Every flow (roadmap, insights, positioning, interview) owns a `Slot`. A slot
//! remembers the ticket of the request it is waiting for; completions carrying
//! any other ticket are stale and leave the state untouched.

use serde::{Deserialize, Serialize};

use crate::analysis::insights::InsightsResult;
use crate::analysis::interview::InterviewQuestion;
use crate::analysis::positioning::PositioningResult;
use crate::analysis::query::CareerQuery;
use crate::analysis::roadmap::RoadmapReport;
use crate::llm_client::LlmError;

pub const GENERIC_FAILURE_MESSAGE: &str =
    "Unable to analyze career data. Please verify inputs and try again.";
pub const CONFIGURATION_FAILURE_MESSAGE: &str =
    "Configuration Error: Invalid or Missing API Key in environment.";

/// Maps a gateway failure to the message shown to the user.
pub fn user_message(err: &LlmError) -> &'static str {
    if err.is_configuration_error() {
        CONFIGURATION_FAILURE_MESSAGE
    } else {
        GENERIC_FAILURE_MESSAGE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot<T> {
    pub loading: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    #[serde(skip)]
    ticket: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            loading: false,
            data: None,
            error: None,
            ticket: 0,
        }
    }
}

impl<T> Slot<T> {
    pub fn status(&self) -> SlotStatus {
        if self.loading {
            SlotStatus::Loading
        } else if self.error.is_some() {
            SlotStatus::Failed
        } else if self.data.is_some() {
            SlotStatus::Ready
        } else {
            SlotStatus::Idle
        }
    }

    #[cfg(test)]
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Ticket 0 is never issued, so a cleared slot accepts no completion.
    fn is_current(&self, ticket: u64) -> bool {
        ticket != 0 && self.ticket == ticket
    }

    /// Prior data stays visible until a newer result replaces it.
    fn begin(&mut self, ticket: u64) {
        self.loading = true;
        self.error = None;
        self.ticket = ticket;
    }

    fn succeed(&mut self, data: T) {
        self.loading = false;
        self.error = None;
        self.data = Some(data);
    }

    fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Roadmap,
    Salary,
    Market,
    Companies,
    Positioning,
    Interview,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub query: Option<CareerQuery>,
    pub roadmap: Slot<RoadmapReport>,
    pub insights: Slot<InsightsResult>,
    pub positioning: Slot<PositioningResult>,
    pub interview: Slot<Vec<InterviewQuestion>>,
    pub active_tab: Tab,
}

#[derive(Debug, Clone)]
pub enum Action {
    Submit { query: CareerQuery, ticket: u64 },
    RoadmapLoaded { ticket: u64, report: RoadmapReport },
    RoadmapFailed { ticket: u64, message: String },
    /// Issued once the roadmap identified by `roadmap_ticket` has landed.
    InsightsStarted { roadmap_ticket: u64, ticket: u64 },
    InsightsLoaded { ticket: u64, insights: InsightsResult },
    InsightsFailed { ticket: u64, message: String },
    PositioningStarted { ticket: u64 },
    PositioningLoaded { ticket: u64, result: PositioningResult },
    PositioningFailed { ticket: u64, message: String },
    InterviewStarted { ticket: u64 },
    InterviewLoaded { ticket: u64, questions: Vec<InterviewQuestion> },
    InterviewFailed { ticket: u64, message: String },
    SetTab(Tab),
    ResetPositioning,
    Reset,
}

/// True when `action` would change state: user actions always apply,
/// completions only when their ticket is the one the slot awaits.
pub fn is_current(state: &ViewState, action: &Action) -> bool {
    match action {
        Action::RoadmapLoaded { ticket, .. } | Action::RoadmapFailed { ticket, .. } => {
            state.roadmap.is_current(*ticket)
        }
        Action::InsightsStarted { roadmap_ticket, .. } => state.roadmap.is_current(*roadmap_ticket),
        Action::InsightsLoaded { ticket, .. } | Action::InsightsFailed { ticket, .. } => {
            state.insights.is_current(*ticket)
        }
        Action::PositioningLoaded { ticket, .. } | Action::PositioningFailed { ticket, .. } => {
            state.positioning.is_current(*ticket)
        }
        Action::InterviewLoaded { ticket, .. } | Action::InterviewFailed { ticket, .. } => {
            state.interview.is_current(*ticket)
        }
        Action::Submit { .. }
        | Action::PositioningStarted { .. }
        | Action::InterviewStarted { .. }
        | Action::SetTab(_)
        | Action::ResetPositioning
        | Action::Reset => true,
    }
}

pub fn reduce(mut state: ViewState, action: Action) -> ViewState {
    if !is_current(&state, &action) {
        return state;
    }

    match action {
        Action::Submit { query, ticket } => {
            state.query = Some(query);
            state.roadmap.begin(ticket);
            // Everything below the roadmap belongs to the previous query.
            state.insights = Slot::default();
            state.positioning = Slot::default();
            state.interview = Slot::default();
            // Insights wait on the roadmap; no request is in flight yet.
            state.insights.begin(0);
            state.active_tab = Tab::Roadmap;
        }
        Action::RoadmapLoaded { report, .. } => state.roadmap.succeed(report),
        Action::RoadmapFailed { message, .. } => {
            state.roadmap.fail(message);
            state.insights.loading = false;
        }
        Action::InsightsStarted { ticket, .. } => state.insights.begin(ticket),
        Action::InsightsLoaded { insights, .. } => state.insights.succeed(insights),
        Action::InsightsFailed { message, .. } => state.insights.fail(message),
        Action::PositioningStarted { ticket } => state.positioning.begin(ticket),
        Action::PositioningLoaded { result, .. } => state.positioning.succeed(result),
        Action::PositioningFailed { message, .. } => state.positioning.fail(message),
        Action::InterviewStarted { ticket } => state.interview.begin(ticket),
        Action::InterviewLoaded { questions, .. } => state.interview.succeed(questions),
        Action::InterviewFailed { message, .. } => state.interview.fail(message),
        Action::SetTab(tab) => state.active_tab = tab,
        Action::ResetPositioning => state.positioning = Slot::default(),
        Action::Reset => state = ViewState::default(),
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::query::fixtures;

    fn report(summary: &str) -> RoadmapReport {
        let mut report = RoadmapReport::default();
        report.data.role_summary = Some(summary.to_string());
        report
    }

    fn submitted(ticket: u64) -> ViewState {
        reduce(
            ViewState::default(),
            Action::Submit {
                query: fixtures::query(),
                ticket,
            },
        )
    }

    #[test]
    fn test_submit_starts_roadmap_and_pending_insights() {
        let state = submitted(1);
        assert_eq!(state.roadmap.status(), SlotStatus::Loading);
        assert!(state.insights.loading);
        assert_eq!(state.query, Some(fixtures::query()));
        assert_eq!(state.active_tab, Tab::Roadmap);
    }

    #[test]
    fn test_resubmit_clears_results_of_previous_query() {
        let mut state = reduce(
            submitted(1),
            Action::RoadmapLoaded {
                ticket: 1,
                report: report("first"),
            },
        );
        state = reduce(
            state,
            Action::InsightsStarted {
                roadmap_ticket: 1,
                ticket: 2,
            },
        );
        state = reduce(
            state,
            Action::InsightsLoaded {
                ticket: 2,
                insights: InsightsResult::default(),
            },
        );
        state = reduce(state, Action::PositioningStarted { ticket: 3 });
        state = reduce(
            state,
            Action::PositioningLoaded {
                ticket: 3,
                result: PositioningResult::default(),
            },
        );

        let state = reduce(
            state,
            Action::Submit {
                query: fixtures::query(),
                ticket: 4,
            },
        );

        assert!(state.insights.data.is_none());
        assert!(state.insights.loading);
        assert_eq!(state.positioning.status(), SlotStatus::Idle);
        assert_eq!(state.interview.status(), SlotStatus::Idle);
        assert!(state.roadmap.data.is_some());
    }

    #[test]
    fn test_roadmap_success() {
        let state = reduce(
            submitted(1),
            Action::RoadmapLoaded {
                ticket: 1,
                report: report("A"),
            },
        );
        assert_eq!(state.roadmap.status(), SlotStatus::Ready);
        assert!(state.insights.loading);
    }

    #[test]
    fn test_stale_roadmap_is_ignored() {
        let state = reduce(
            submitted(1),
            Action::Submit {
                query: fixtures::query(),
                ticket: 2,
            },
        );
        let state = reduce(
            state,
            Action::RoadmapLoaded {
                ticket: 1,
                report: report("old"),
            },
        );
        assert!(state.roadmap.data.is_none());
        assert!(state.roadmap.loading);
    }

    #[test]
    fn test_failure_keeps_prior_roadmap_and_stops_insights() {
        let state = reduce(
            submitted(1),
            Action::RoadmapLoaded {
                ticket: 1,
                report: report("first"),
            },
        );
        let state = reduce(
            state,
            Action::Submit {
                query: fixtures::query(),
                ticket: 2,
            },
        );
        let state = reduce(
            state,
            Action::RoadmapFailed {
                ticket: 2,
                message: GENERIC_FAILURE_MESSAGE.to_string(),
            },
        );

        assert_eq!(state.roadmap.status(), SlotStatus::Failed);
        assert_eq!(
            state.roadmap.data.as_ref().unwrap().data.role_summary.as_deref(),
            Some("first")
        );
        assert!(!state.insights.loading);
    }

    #[test]
    fn test_insights_failure_leaves_roadmap_alone() {
        let state = reduce(
            submitted(1),
            Action::RoadmapLoaded {
                ticket: 1,
                report: report("A"),
            },
        );
        let state = reduce(
            state,
            Action::InsightsStarted {
                roadmap_ticket: 1,
                ticket: 2,
            },
        );
        let before = state.roadmap.clone();
        let state = reduce(
            state,
            Action::InsightsFailed {
                ticket: 2,
                message: "boom".into(),
            },
        );
        assert_eq!(state.roadmap, before);
        assert_eq!(state.insights.status(), SlotStatus::Failed);
    }

    #[test]
    fn test_insights_for_superseded_roadmap_never_start() {
        let state = reduce(
            submitted(1),
            Action::Submit {
                query: fixtures::query(),
                ticket: 2,
            },
        );
        let state = reduce(
            state,
            Action::InsightsStarted {
                roadmap_ticket: 1,
                ticket: 3,
            },
        );
        assert_eq!(state.insights.ticket(), 0);
    }

    #[test]
    fn test_reset_positioning_drops_in_flight_result() {
        let state = reduce(ViewState::default(), Action::PositioningStarted { ticket: 4 });
        let state = reduce(state, Action::ResetPositioning);
        let state = reduce(
            state,
            Action::PositioningLoaded {
                ticket: 4,
                result: PositioningResult::default(),
            },
        );
        assert_eq!(state.positioning.status(), SlotStatus::Idle);
    }

    #[test]
    fn test_set_tab_and_reset() {
        let state = reduce(submitted(1), Action::SetTab(Tab::Interview));
        assert_eq!(state.active_tab, Tab::Interview);
        let state = reduce(state, Action::Reset);
        assert_eq!(state, ViewState::default());
    }

    #[test]
    fn test_user_message_classification() {
        assert_eq!(
            user_message(&LlmError::MissingApiKey),
            CONFIGURATION_FAILURE_MESSAGE
        );
        assert_eq!(
            user_message(&LlmError::Api {
                status: 400,
                message: "API key not valid. Please pass a valid API key.".into()
            }),
            CONFIGURATION_FAILURE_MESSAGE
        );
        assert_eq!(
            user_message(&LlmError::Extract(crate::llm_client::ExtractError::NoJson)),
            GENERIC_FAILURE_MESSAGE
        );
    }
}
