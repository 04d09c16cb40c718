//! Scoring oracle — grades a free-text answer against its question.
//!
//! Default: `HeuristicScorer` (local, instant, optionally jittered).
//! Alternative: `LlmScorer` (asks the LLM client for a 0–100 grade).
//!
//! `SessionService` holds an `Arc<dyn ScoringOracle>` chosen at startup.

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

use crate::interview::prompts::{SCORE_PROMPT_TEMPLATE, SCORE_SYSTEM};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::question::{Difficulty, Question};

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Scoring service unavailable: {0}")]
    Unavailable(String),

    #[error("LLM grading failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Grader returned score {0}, expected 0-100")]
    InvalidScore(i64),
}

/// Implement this to swap graders without touching the session code.
/// Implementations may fail; callers decide whether to retry.
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    async fn score(&self, answer: &str, question: &Question) -> Result<u8, ScoringError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicScorer
// ────────────────────────────────────────────────────────────────────────────

/// Length- and difficulty-based grader.
///
/// 1. base 50; +20 over 200 chars, +10 over 100, −20 under 30
/// 2. +10 Easy, −10 Hard
/// 3. uniform jitter in ±`variation`, clamp to 0–100
/// 4. above 70, a 70% chance of +10 (capped at 90)
///
/// With `variation == 0` steps 3 and 4 are skipped and grading is
/// deterministic.
#[derive(Debug, Clone)]
pub struct HeuristicScorer {
    variation: f64,
}

impl HeuristicScorer {
    pub fn new(variation: f64) -> Self {
        Self {
            variation: variation.abs(),
        }
    }

    pub fn deterministic() -> Self {
        Self::new(0.0)
    }

    fn grade(&self, answer: &str, question: &Question) -> u8 {
        let base = baseline(answer, question.difficulty) as f64;
        if self.variation == 0.0 {
            return base.clamp(0.0, 100.0) as u8;
        }

        let mut rng = rand::thread_rng();
        let jittered = (base + rng.gen_range(-self.variation..=self.variation))
            .round()
            .clamp(0.0, 100.0);
        let mut score = jittered as u8;
        if score > 70 && rng.gen_bool(0.7) {
            score = (score + 10).min(90);
        }
        score
    }
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self::new(10.0)
    }
}

#[async_trait]
impl ScoringOracle for HeuristicScorer {
    async fn score(&self, answer: &str, question: &Question) -> Result<u8, ScoringError> {
        Ok(self.grade(answer, question))
    }
}

/// Steps 1 and 2 of the heuristic.
pub fn baseline(answer: &str, difficulty: Difficulty) -> i32 {
    let length = answer.trim().chars().count();
    let mut score = 50;

    if length > 200 {
        score += 20;
    } else if length > 100 {
        score += 10;
    } else if length < 30 {
        score -= 20;
    }

    match difficulty {
        Difficulty::Easy => score += 10,
        Difficulty::Medium => {}
        Difficulty::Hard => score -= 10,
    }
    score
}

// ────────────────────────────────────────────────────────────────────────────
// LlmScorer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LlmGrade {
    score: i64,
}

pub struct LlmScorer(pub LlmClient);

#[async_trait]
impl ScoringOracle for LlmScorer {
    async fn score(&self, answer: &str, question: &Question) -> Result<u8, ScoringError> {
        let prompt = build_score_prompt(answer, question);
        let system = format!("{SCORE_SYSTEM} {JSON_ONLY_SYSTEM}");
        let grade: LlmGrade = self
            .0
            .call_json(&prompt, &system)
            .await
            .map_err(|err| match err {
                e @ (LlmError::Http(_) | LlmError::Exhausted { .. }) => {
                    ScoringError::Unavailable(e.to_string())
                }
                other => ScoringError::Llm(other),
            })?;
        validate_grade(grade.score)
    }
}

fn build_score_prompt(answer: &str, question: &Question) -> String {
    SCORE_PROMPT_TEMPLATE
        .replace("{difficulty}", &format!("{:?}", question.difficulty))
        .replace("{category}", &question.category)
        .replace("{question}", &question.text)
        .replace("{answer}", answer)
}

fn validate_grade(score: i64) -> Result<u8, ScoringError> {
    u8::try_from(score)
        .ok()
        .filter(|s| *s <= 100)
        .ok_or(ScoringError::InvalidScore(score))
}
