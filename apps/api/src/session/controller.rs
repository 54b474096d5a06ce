//! Session controller. Sequences gateway calls and feeds their outcomes
//! through the reducer.
//!
//! Flow: submit → roadmap → (on success) local insights in the background.
//! Positioning and interview questions are requested on demand. Each flow
//! keeps one task handle; triggering a flow again aborts the previous task
//! and issues a fresh ticket, so a late reply can never overwrite newer state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::insights::fetch_local_insights;
use crate::analysis::interview::generate_interview_questions;
use crate::analysis::positioning::analyze_positioning;
use crate::analysis::query::{CandidateProfile, CareerQuery, ValidationError};
use crate::analysis::roadmap::generate_roadmap;
use crate::llm_client::TextCompletion;
use crate::session::state::{is_current, reduce, user_message, Action, Tab, ViewState};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("submit a career query before requesting this analysis")]
    NoQuery,
}

#[derive(Default)]
struct FlowTasks {
    roadmap: Option<JoinHandle<()>>,
    insights: Option<JoinHandle<()>>,
    positioning: Option<JoinHandle<()>>,
    interview: Option<JoinHandle<()>>,
}

fn supersede(slot: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = slot.take() {
        handle.abort();
    }
}

pub struct SessionController {
    id: Uuid,
    created_at: DateTime<Utc>,
    llm: Arc<dyn TextCompletion>,
    state: watch::Sender<ViewState>,
    // Flow starts dispatch their start action while holding this lock, which
    // keeps the roadmap → insights hand-off consistent with a concurrent submit.
    tasks: Mutex<FlowTasks>,
    tickets: AtomicU64,
}

impl SessionController {
    pub fn new(llm: Arc<dyn TextCompletion>) -> Arc<Self> {
        let (state, _) = watch::channel(ViewState::default());
        Arc::new(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            llm,
            state,
            tasks: Mutex::new(FlowTasks::default()),
            tickets: AtomicU64::new(0),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Validates the query and starts the roadmap flow. An invalid query
    /// never reaches the network.
    pub fn submit(self: &Arc<Self>, query: CareerQuery) -> Result<(), SessionError> {
        query.validate()?;

        let ticket = self.next_ticket();
        info!(session = %self.id, ticket, "Roadmap flow started");

        let mut tasks = self.lock_tasks();
        Self::abort_all(&mut tasks);
        self.dispatch(Action::Submit {
            query: query.clone(),
            ticket,
        });
        tasks.roadmap = Some(self.spawn_roadmap(ticket, query));
        Ok(())
    }

    pub fn request_positioning(
        self: &Arc<Self>,
        profile: CandidateProfile,
    ) -> Result<(), SessionError> {
        profile.validate()?;
        let query = self.current_query()?;

        let ticket = self.next_ticket();
        info!(session = %self.id, ticket, "Requesting positioning analysis");

        let mut tasks = self.lock_tasks();
        supersede(&mut tasks.positioning);
        self.dispatch(Action::PositioningStarted { ticket });

        let this = Arc::clone(self);
        tasks.positioning = Some(tokio::spawn(async move {
            let action = match analyze_positioning(this.llm.as_ref(), &query, &profile).await {
                Ok(result) => Action::PositioningLoaded { ticket, result },
                Err(e) => {
                    error!(session = %this.id, ticket, "Positioning analysis failed: {e}");
                    Action::PositioningFailed {
                        ticket,
                        message: user_message(&e).to_string(),
                    }
                }
            };
            this.dispatch(action);
        }));
        Ok(())
    }

    pub fn request_interview(self: &Arc<Self>) -> Result<(), SessionError> {
        let role = self.current_query()?.role;

        let ticket = self.next_ticket();
        info!(session = %self.id, ticket, "Requesting interview questions for '{role}'");

        let mut tasks = self.lock_tasks();
        supersede(&mut tasks.interview);
        self.dispatch(Action::InterviewStarted { ticket });

        let this = Arc::clone(self);
        tasks.interview = Some(tokio::spawn(async move {
            let action = match generate_interview_questions(this.llm.as_ref(), &role).await {
                Ok(questions) => Action::InterviewLoaded { ticket, questions },
                Err(e) => {
                    error!(session = %this.id, ticket, "Interview question generation failed: {e}");
                    Action::InterviewFailed {
                        ticket,
                        message: user_message(&e).to_string(),
                    }
                }
            };
            this.dispatch(action);
        }));
        Ok(())
    }

    pub fn set_tab(&self, tab: Tab) {
        self.dispatch(Action::SetTab(tab));
    }

    pub fn reset_positioning(&self) {
        let mut tasks = self.lock_tasks();
        supersede(&mut tasks.positioning);
        self.dispatch(Action::ResetPositioning);
    }

    /// Clears every slot and the query, aborting anything in flight.
    pub fn reset(&self) {
        let mut tasks = self.lock_tasks();
        Self::abort_all(&mut tasks);
        self.dispatch(Action::Reset);
    }

    /// Aborts in-flight work. Called when the session is discarded.
    pub fn shutdown(&self) {
        let mut tasks = self.lock_tasks();
        Self::abort_all(&mut tasks);
    }

    fn abort_all(tasks: &mut FlowTasks) {
        supersede(&mut tasks.roadmap);
        supersede(&mut tasks.insights);
        supersede(&mut tasks.positioning);
        supersede(&mut tasks.interview);
    }

    fn spawn_roadmap(self: &Arc<Self>, ticket: u64, query: CareerQuery) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            match generate_roadmap(this.llm.as_ref(), &query).await {
                Ok(report) => {
                    if this.dispatch(Action::RoadmapLoaded { ticket, report }) {
                        this.start_insights(ticket, query);
                    }
                }
                Err(e) => {
                    error!(session = %this.id, ticket, "Roadmap generation failed: {e}");
                    this.dispatch(Action::RoadmapFailed {
                        ticket,
                        message: user_message(&e).to_string(),
                    });
                }
            }
        })
    }

    /// Starts the background insights fetch for the roadmap `roadmap_ticket`.
    /// Does nothing if a newer submit has replaced that roadmap.
    fn start_insights(self: &Arc<Self>, roadmap_ticket: u64, query: CareerQuery) {
        let ticket = self.next_ticket();

        let mut tasks = self.lock_tasks();
        if !self.dispatch(Action::InsightsStarted {
            roadmap_ticket,
            ticket,
        }) {
            return;
        }
        supersede(&mut tasks.insights);

        let this = Arc::clone(self);
        tasks.insights = Some(tokio::spawn(async move {
            let action =
                match fetch_local_insights(this.llm.as_ref(), &query.role, &query.location).await {
                    Ok(insights) => Action::InsightsLoaded { ticket, insights },
                    Err(e) => {
                        // The roadmap is already on screen; insights are best effort.
                        warn!(session = %this.id, ticket, "Local insights failed: {e}");
                        Action::InsightsFailed {
                            ticket,
                            message: user_message(&e).to_string(),
                        }
                    }
                };
            this.dispatch(action);
        }));
    }

    /// Applies `action` through the reducer. Returns false for stale completions.
    fn dispatch(&self, action: Action) -> bool {
        let mut applied = false;
        self.state.send_modify(|state| {
            applied = is_current(state, &action);
            *state = reduce(std::mem::take(state), action);
        });
        applied
    }

    fn current_query(&self) -> Result<CareerQuery, SessionError> {
        self.state.borrow().query.clone().ok_or(SessionError::NoQuery)
    }

    fn next_ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn lock_tasks(&self) -> MutexGuard<'_, FlowTasks> {
        // Task handles stay valid even if a holder panicked.
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
