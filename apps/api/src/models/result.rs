use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::question::Question;

/// One question of a finished interview with the answer and score it received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: Question,
    pub answer: String,
    pub score: u8,
}

/// Final record of a completed interview. Emitted once per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume_text: String,
    pub overall_score: u8,
    pub summary: String,
    pub records: Vec<QuestionRecord>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: DateTime<Utc>,
}

/// Coarse reading of a 0–100 score for the reviewer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Strong, // ≥ 80
    Fair,   // 60 – 79
    Weak,   // < 60
}

impl ScoreBand {
    pub fn of(score: u8) -> Self {
        if score >= 80 {
            ScoreBand::Strong
        } else if score >= 60 {
            ScoreBand::Fair
        } else {
            ScoreBand::Weak
        }
    }
}

/// Mean of the recorded scores. Zero for an empty slice.
pub fn mean_score(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let total: u32 = scores.iter().map(|&s| s as u32).sum();
    total as f64 / scores.len() as f64
}

/// `round(mean)` with halves rounding up.
pub fn overall_score(scores: &[u8]) -> u8 {
    mean_score(scores).round().clamp(0.0, 100.0) as u8
}

/// One-line verdict keyed off the unrounded mean.
pub fn build_summary(mean: f64) -> String {
    let level = if mean >= 80.0 {
        "excellent"
    } else if mean >= 60.0 {
        "good"
    } else {
        "basic"
    };
    format!("Candidate showed {level} understanding of full-stack concepts.")
}
