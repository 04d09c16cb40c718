use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::profile::CandidateProfile;
use crate::models::question::Question;
use crate::models::result::{build_summary, mean_score, overall_score, CandidateResult, QuestionRecord};
use crate::resume::extractor::ExtractedFields;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    ResumeUpload,
    ProfileCompletion,
    Interview,
    Completed,
}

/// An answer and the score it received. Stored as one value so neither can
/// exist without the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedAnswer {
    pub text: String,
    pub score: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {operation} while the session is in step {actual:?}")]
    InvalidStep {
        operation: &'static str,
        actual: Step,
    },

    #[error("Session is not paused")]
    NotPaused,

    #[error("No question is active")]
    NoActiveQuestion,

    #[error("Question {0} already has an answer")]
    AlreadyAnswered(usize),

    #[error("Question {0} has not been answered yet")]
    Unanswered(usize),

    #[error("The question source returned no questions")]
    NoQuestions,

    #[error("Score {0} is outside 0-100")]
    ScoreOutOfRange(u8),
}

/// Result of [`InterviewSession::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Next { index: usize },
    Completed(CandidateResult),
    AlreadyCompleted,
}

/// Result of one countdown step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Nothing is counting down (wrong step, paused, or already expired).
    Idle,
    Running { remaining: u32 },
    /// The countdown for `index` hit zero. Reported once per index.
    Expired { index: usize },
}

/// One candidate's pass through upload, profile and the timed interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSession {
    id: Uuid,
    step: Step,
    profile: CandidateProfile,
    questions: Vec<Question>,
    current_index: Option<usize>,
    responses: BTreeMap<usize, RecordedAnswer>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    paused: bool,
    unfinished: bool,
    remaining_seconds: u32,
    #[serde(default)]
    draft: String,
    #[serde(skip)]
    expired_index: Option<usize>,
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            step: Step::ResumeUpload,
            profile: CandidateProfile::default(),
            questions: Vec::new(),
            current_index: None,
            responses: BTreeMap::new(),
            started_at: None,
            ended_at: None,
            paused: false,
            unfinished: false,
            remaining_seconds: 0,
            draft: String::new(),
            expired_index: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn profile(&self) -> &CandidateProfile {
        &self.profile
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_index.and_then(|i| self.questions.get(i))
    }

    pub fn responses(&self) -> &BTreeMap<usize, RecordedAnswer> {
        &self.responses
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_unfinished(&self) -> bool {
        self.unfinished
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.responses.contains_key(&index)
    }

    fn require(&self, step: Step, operation: &'static str) -> Result<(), SessionError> {
        if self.step != step {
            return Err(SessionError::InvalidStep {
                operation,
                actual: self.step,
            });
        }
        Ok(())
    }

    fn active_index(&self) -> Result<usize, SessionError> {
        self.current_index
            .filter(|i| *i < self.questions.len())
            .ok_or(SessionError::NoActiveQuestion)
    }

    /// Keeps the recovered text and pre-fills the profile with whatever the
    /// extractor found. A repeated upload replaces both.
    pub fn attach_resume(&mut self, raw_text: String, fields: ExtractedFields) -> Result<(), SessionError> {
        self.require(Step::ResumeUpload, "attach a resume")?;
        self.profile = CandidateProfile {
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            raw_text,
        };
        Ok(())
    }

    /// Accepts an already-validated profile.
    pub fn confirm_profile(&mut self, profile: CandidateProfile) -> Result<(), SessionError> {
        if !matches!(self.step, Step::ResumeUpload | Step::ProfileCompletion) {
            return Err(SessionError::InvalidStep {
                operation: "confirm the profile",
                actual: self.step,
            });
        }
        self.profile = profile;
        self.step = Step::ProfileCompletion;
        Ok(())
    }

    pub fn start_interview(&mut self, questions: Vec<Question>, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.require(Step::ProfileCompletion, "start the interview")?;
        let first = questions.first().ok_or(SessionError::NoQuestions)?;

        self.remaining_seconds = first.time_limit_seconds;
        self.questions = questions;
        self.current_index = Some(0);
        self.started_at = Some(now);
        self.step = Step::Interview;
        Ok(())
    }

    pub fn stage_draft(&mut self, text: String) -> Result<(), SessionError> {
        self.require(Step::Interview, "stage an answer")?;
        self.draft = text;
        Ok(())
    }

    /// Records `text` and `score` for the current question. Does not advance.
    pub fn submit_answer(&mut self, text: String, score: u8) -> Result<usize, SessionError> {
        self.require(Step::Interview, "submit an answer")?;
        let index = self.active_index()?;
        if score > 100 {
            return Err(SessionError::ScoreOutOfRange(score));
        }
        if self.responses.contains_key(&index) {
            return Err(SessionError::AlreadyAnswered(index));
        }
        self.responses.insert(index, RecordedAnswer { text, score });
        Ok(index)
    }

    /// Moves past an answered question, completing the session after the
    /// last one. A no-op once completed.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Advance, SessionError> {
        if self.step == Step::Completed {
            return Ok(Advance::AlreadyCompleted);
        }
        self.require(Step::Interview, "advance")?;
        let index = self.active_index()?;
        if !self.responses.contains_key(&index) {
            return Err(SessionError::Unanswered(index));
        }

        self.draft.clear();
        let next = index + 1;
        if let Some(question) = self.questions.get(next) {
            self.current_index = Some(next);
            self.remaining_seconds = question.time_limit_seconds;
            return Ok(Advance::Next { index: next });
        }

        self.step = Step::Completed;
        self.ended_at = Some(now);
        self.paused = false;
        self.unfinished = false;
        self.remaining_seconds = 0;
        Ok(Advance::Completed(self.result(now)))
    }

    fn result(&self, completed_at: DateTime<Utc>) -> CandidateResult {
        let records: Vec<QuestionRecord> = self
            .responses
            .iter()
            .filter_map(|(i, answer)| {
                self.questions.get(*i).map(|question| QuestionRecord {
                    question: question.clone(),
                    answer: answer.text.clone(),
                    score: answer.score,
                })
            })
            .collect();
        let scores: Vec<u8> = records.iter().map(|r| r.score).collect();

        CandidateResult {
            id: self.id,
            name: self.profile.name.clone(),
            email: self.profile.email.clone(),
            phone: self.profile.phone.clone(),
            resume_text: self.profile.raw_text.clone(),
            overall_score: overall_score(&scores),
            summary: build_summary(mean_score(&scores)),
            records,
            started_at: self.started_at,
            completed_at,
        }
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        self.require(Step::Interview, "pause")?;
        self.paused = true;
        self.unfinished = true;
        Ok(())
    }

    /// The countdown continues from where it stopped.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        if !self.paused {
            return Err(SessionError::NotPaused);
        }
        self.paused = false;
        self.unfinished = false;
        Ok(())
    }

    /// True when an interview was started and never finished.
    pub fn check_unfinished(&self) -> bool {
        !self.questions.is_empty()
            && self.current_index.is_some_and(|i| i < self.questions.len())
            && self.ended_at.is_none()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn tick(&mut self) -> Tick {
        if self.step != Step::Interview || self.paused {
            return Tick::Idle;
        }
        let Ok(index) = self.active_index() else {
            return Tick::Idle;
        };
        if self.expired_index == Some(index) || self.responses.contains_key(&index) {
            return Tick::Idle;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.expired_index = Some(index);
            Tick::Expired { index }
        } else {
            Tick::Running {
                remaining: self.remaining_seconds,
            }
        }
    }
}
