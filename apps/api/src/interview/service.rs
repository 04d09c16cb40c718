//! SessionService — the single owner of the interview core.
//!
//! All state lives in one `Snapshot` behind an async mutex. Scoring calls
//! run with the lock released; when they return, `finalize` re-checks that
//! the session, step and question are still the ones that were scored, so a
//! stale result (after a restart, or after the timer already filled the
//! slot) is dropped instead of corrupting the new state.
//!
//! Every mutation ends with a snapshot write. A failed write is logged and
//! the in-memory snapshot stays authoritative.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::interview::questions::QuestionSource;
use crate::interview::scoring::{ScoringError, ScoringOracle};
use crate::interview::session::{Advance, SessionError, Step, Tick};
use crate::interview::timer::TimerView;
use crate::models::profile::{CandidateProfile, ProfileError, ProfileForm};
use crate::models::question::Question;
use crate::models::result::CandidateResult;
use crate::resume::decode::{ResumeUpload, UploadError};
use crate::resume::{self, ResumeIntake};
use crate::results::{self, ResultQuery, ResultSummary};
use crate::store::{Snapshot, SnapshotStore};

/// Recorded when the countdown runs out with nothing typed.
pub const NO_ANSWER_TEXT: &str = "No answer provided (time expired)";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("The answer to question {} is still being evaluated", .0 + 1)]
    EvaluationPending(usize),

    #[error("Answer text is empty")]
    EmptyAnswer,

    #[error("Result {0} not found")]
    ResultNotFound(Uuid),
}

/// What happened to an answer handed to `finalize`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Finalized {
    /// The session moved on before the answer arrived; nothing was recorded.
    Stale,
    Next { index: usize },
    Completed { result: CandidateResult },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Idle,
    Running { remaining: u32 },
    /// Time ran out while a submitted answer was being scored; that
    /// evaluation will finalize the question.
    Deferred { index: usize },
    /// Time ran out with a staged draft; it is being scored in the
    /// background and will finalize the question.
    ScoringDraft { index: usize },
    Expired(Finalized),
}

/// Shown on startup when the previous run stopped mid-interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryPrompt {
    pub question_number: usize,
    pub total_questions: usize,
    pub answered: usize,
}

/// Read-only projection of the session for the display layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub step: Step,
    pub profile: CandidateProfile,
    pub current_question: Option<Question>,
    pub question_number: Option<usize>,
    pub total_questions: usize,
    pub answered: usize,
    pub paused: bool,
    pub unfinished: bool,
    pub evaluating: bool,
    pub draft: String,
    pub timer: Option<TimerView>,
    pub started_at: Option<DateTime<Utc>>,
}

/// At most one answer is scored at a time.
#[derive(Debug, Clone, Copy)]
struct PendingEvaluation {
    session_id: Uuid,
    index: usize,
    /// The countdown hit zero while scoring was in flight.
    expired: bool,
}

struct Inner {
    snapshot: Snapshot,
    pending: Option<PendingEvaluation>,
    recovery: Option<RecoveryPrompt>,
}

impl Inner {
    /// Clears the pending slot if it belongs to this evaluation and reports
    /// whether the countdown expired meanwhile.
    fn settle(&mut self, session_id: Uuid, index: usize) -> bool {
        match self.pending {
            Some(p) if p.session_id == session_id && p.index == index => {
                self.pending = None;
                p.expired
            }
            _ => false,
        }
    }

    fn view(&self) -> SessionView {
        let session = &self.snapshot.session;
        let question = session.current_question().cloned();
        let timer = match (&question, session.step()) {
            (Some(q), Step::Interview) => Some(TimerView::new(session.remaining_seconds(), q.time_limit_seconds)),
            _ => None,
        };

        SessionView {
            id: session.id(),
            step: session.step(),
            profile: session.profile().clone(),
            question_number: session.current_index().map(|i| i + 1),
            current_question: question,
            total_questions: session.questions().len(),
            answered: session.responses().len(),
            paused: session.is_paused(),
            unfinished: session.is_unfinished(),
            evaluating: self.pending.is_some(),
            draft: session.draft().to_string(),
            timer,
            started_at: session.started_at(),
        }
    }
}

pub struct SessionService {
    inner: Mutex<Inner>,
    store: Arc<dyn SnapshotStore>,
    oracle: Arc<dyn ScoringOracle>,
    questions: Arc<dyn QuestionSource>,
    max_resume_bytes: usize,
}

impl SessionService {
    /// Loads the last snapshot, or starts empty if there is none or it
    /// cannot be read.
    pub async fn open(
        store: Arc<dyn SnapshotStore>,
        oracle: Arc<dyn ScoringOracle>,
        questions: Arc<dyn QuestionSource>,
        max_resume_bytes: usize,
    ) -> Self {
        let snapshot = match store.load().await {
            Ok(Some(snapshot)) => {
                info!(
                    results = snapshot.results.len(),
                    step = ?snapshot.session.step(),
                    "snapshot loaded"
                );
                snapshot
            }
            Ok(None) => Snapshot::default(),
            Err(e) => {
                warn!(error = %e, "could not load snapshot, starting empty");
                Snapshot::default()
            }
        };

        Self {
            inner: Mutex::new(Inner {
                snapshot,
                pending: None,
                recovery: None,
            }),
            store,
            oracle,
            questions,
            max_resume_bytes,
        }
    }

    async fn persist(&self, snapshot: &Snapshot) {
        if let Err(e) = self.store.save(snapshot).await {
            warn!(error = %e, "snapshot write failed, keeping in-memory state");
        }
    }

    async fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().await
    }

    /// Run once at startup. An interview left running by the previous
    /// process is suspended until the candidate chooses to continue or
    /// restart.
    pub async fn recover(&self) -> Option<RecoveryPrompt> {
        let mut inner = self.lock().await;
        if !inner.snapshot.session.check_unfinished() {
            return None;
        }
        if let Err(e) = inner.snapshot.session.pause() {
            warn!(error = %e, "unfinished session could not be suspended");
            return None;
        }

        let session = &inner.snapshot.session;
        let prompt = RecoveryPrompt {
            question_number: session.current_index().map_or(0, |i| i + 1),
            total_questions: session.questions().len(),
            answered: session.responses().len(),
        };
        info!(
            question = prompt.question_number,
            total = prompt.total_questions,
            "unfinished interview found"
        );
        inner.recovery = Some(prompt.clone());
        self.persist(&inner.snapshot).await;
        Some(prompt)
    }

    pub async fn recovery_prompt(&self) -> Option<RecoveryPrompt> {
        self.lock().await.recovery.clone()
    }

    pub async fn view(&self) -> SessionView {
        self.lock().await.view()
    }

    pub async fn upload_resume(&self, upload: ResumeUpload) -> Result<ResumeIntake, ServiceError> {
        let intake = resume::ingest(&upload, self.max_resume_bytes)?;

        let mut inner = self.lock().await;
        inner
            .snapshot
            .session
            .attach_resume(intake.raw_text.clone(), intake.fields.clone())?;
        self.persist(&inner.snapshot).await;
        Ok(intake)
    }

    /// Confirms the profile and starts the interview with a fresh question set.
    pub async fn submit_profile(&self, form: ProfileForm) -> Result<SessionView, ServiceError> {
        let mut inner = self.lock().await;
        let raw_text = inner.snapshot.session.profile().raw_text.clone();
        let profile = form.into_profile(raw_text)?;

        let session = &mut inner.snapshot.session;
        session.confirm_profile(profile)?;
        let result = session.start_interview(self.questions.questions(), Utc::now());
        self.persist(&inner.snapshot).await;
        result?;

        info!(
            session_id = %inner.snapshot.session.id(),
            questions = inner.snapshot.session.questions().len(),
            "interview started"
        );
        Ok(inner.view())
    }

    pub async fn stage_draft(&self, text: String) -> Result<(), ServiceError> {
        let mut inner = self.lock().await;
        inner.snapshot.session.stage_draft(text)?;
        self.persist(&inner.snapshot).await;
        Ok(())
    }

    pub async fn pause(&self) -> Result<SessionView, ServiceError> {
        let mut inner = self.lock().await;
        inner.snapshot.session.pause()?;
        self.persist(&inner.snapshot).await;
        info!("interview paused");
        Ok(inner.view())
    }

    pub async fn resume(&self) -> Result<SessionView, ServiceError> {
        let mut inner = self.lock().await;
        inner.snapshot.session.resume()?;
        inner.recovery = None;
        self.persist(&inner.snapshot).await;
        info!("interview resumed");
        Ok(inner.view())
    }

    /// Throws away the current session. Completed results are kept.
    pub async fn restart(&self) -> SessionView {
        let mut inner = self.lock().await;
        inner.snapshot.session.reset();
        inner.pending = None;
        inner.recovery = None;
        self.persist(&inner.snapshot).await;
        info!(session_id = %inner.snapshot.session.id(), "session restarted");
        inner.view()
    }

    /// Scores `text` for the current question, then records it and moves on.
    ///
    /// On a scoring failure nothing is recorded and the candidate may retry,
    /// unless the countdown ran out meanwhile; then the answer is kept with
    /// score 0 so the interview cannot stall on an expired question.
    pub async fn submit_answer(&self, text: String) -> Result<Finalized, ServiceError> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ServiceError::EmptyAnswer);
        }

        let (session_id, index, question) = {
            let mut inner = self.lock().await;
            if let Some(pending) = inner.pending {
                return Err(ServiceError::EvaluationPending(pending.index));
            }
            let session = &inner.snapshot.session;
            if session.step() != Step::Interview {
                return Err(SessionError::InvalidStep {
                    operation: "submit an answer",
                    actual: session.step(),
                }
                .into());
            }
            let index = session.current_index().ok_or(SessionError::NoActiveQuestion)?;
            if session.is_answered(index) {
                return Err(SessionError::AlreadyAnswered(index).into());
            }
            let question = session
                .current_question()
                .cloned()
                .ok_or(SessionError::NoActiveQuestion)?;
            let session_id = session.id();

            inner.pending = Some(PendingEvaluation {
                session_id,
                index,
                expired: false,
            });
            (session_id, index, question)
        };

        let scored = self.oracle.score(&text, &question).await;

        let mut inner = self.lock().await;
        let expired = inner.settle(session_id, index);
        match scored {
            Ok(score) => self.finalize_locked(&mut inner, session_id, index, text, score).await,
            Err(e) if expired => {
                warn!(error = %e, index, "scoring failed after time expired, recording 0");
                self.finalize_locked(&mut inner, session_id, index, text, 0).await
            }
            Err(e) => {
                warn!(error = %e, index, "scoring failed, answer not recorded");
                Err(e.into())
            }
        }
    }

    /// One countdown step. On expiry with nothing typed the question is
    /// closed out here. A staged draft is scored on a spawned task, so the
    /// countdown never waits on the oracle.
    pub async fn tick(self: &Arc<Self>) -> TickOutcome {
        let mut inner = self.lock().await;
        let session_id = inner.snapshot.session.id();

        let index = match inner.snapshot.session.tick() {
            Tick::Idle => return TickOutcome::Idle,
            Tick::Running { remaining } => {
                self.persist(&inner.snapshot).await;
                return TickOutcome::Running { remaining };
            }
            Tick::Expired { index } => index,
        };
        info!(index, "question time expired");

        if let Some(pending) = inner.pending.as_mut() {
            if pending.session_id == session_id && pending.index == index {
                pending.expired = true;
                self.persist(&inner.snapshot).await;
                return TickOutcome::Deferred { index };
            }
        }

        let draft = inner.snapshot.session.draft().trim().to_string();
        if draft.is_empty() {
            let outcome = self
                .finalize_locked(&mut inner, session_id, index, NO_ANSWER_TEXT.to_string(), 0)
                .await;
            return TickOutcome::Expired(outcome.unwrap_or(Finalized::Stale));
        }

        let Some(question) = inner.snapshot.session.current_question().cloned() else {
            return TickOutcome::Idle;
        };
        inner.pending = Some(PendingEvaluation {
            session_id,
            index,
            expired: true,
        });
        drop(inner);

        let service = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = service
                .score_expired_draft(session_id, index, draft, question)
                .await;
            debug!(?outcome, index, "staged answer finalized");
        });
        TickOutcome::ScoringDraft { index }
    }

    async fn score_expired_draft(
        &self,
        session_id: Uuid,
        index: usize,
        draft: String,
        question: Question,
    ) -> Finalized {
        let score = match self.oracle.score(&draft, &question).await {
            Ok(score) => score,
            Err(e) => {
                warn!(error = %e, index, "scoring the staged answer failed, recording 0");
                0
            }
        };

        let mut inner = self.lock().await;
        inner.settle(session_id, index);
        self.finalize_locked(&mut inner, session_id, index, draft, score)
            .await
            .unwrap_or(Finalized::Stale)
    }

    /// Records `text`/`score` for question `index` of session `session_id`
    /// and advances, unless that question is no longer the open one.
    #[cfg(test)]
    async fn finalize(
        &self,
        session_id: Uuid,
        index: usize,
        text: String,
        score: u8,
    ) -> Result<Finalized, ServiceError> {
        let mut inner = self.lock().await;
        self.finalize_locked(&mut inner, session_id, index, text, score)
            .await
    }

    async fn finalize_locked(
        &self,
        inner: &mut Inner,
        session_id: Uuid,
        index: usize,
        text: String,
        score: u8,
    ) -> Result<Finalized, ServiceError> {
        let session = &mut inner.snapshot.session;
        if session.id() != session_id
            || session.step() != Step::Interview
            || session.current_index() != Some(index)
            || session.is_answered(index)
        {
            debug!(%session_id, index, "dropping stale answer");
            return Ok(Finalized::Stale);
        }

        session.submit_answer(text, score)?;
        let outcome = match session.advance(Utc::now())? {
            Advance::Next { index } => Finalized::Next { index },
            Advance::AlreadyCompleted => Finalized::Stale,
            Advance::Completed(result) => {
                info!(
                    result_id = %result.id,
                    overall_score = result.overall_score,
                    "interview completed"
                );
                inner.snapshot.results.push(result.clone());
                inner.snapshot.session.reset();
                inner.recovery = None;
                Finalized::Completed { result }
            }
        };
        self.persist(&inner.snapshot).await;
        Ok(outcome)
    }

    pub async fn list_results(&self, query: &ResultQuery) -> Vec<ResultSummary> {
        results::list(&self.lock().await.snapshot.results, query)
    }

    pub async fn get_result(&self, id: Uuid) -> Result<CandidateResult, ServiceError> {
        let inner = self.lock().await;
        results::find(&inner.snapshot.results, id)
            .cloned()
            .ok_or(ServiceError::ResultNotFound(id))
    }
}
