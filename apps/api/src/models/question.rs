use serde::{Deserialize, Serialize};

/// Difficulty tier of an interview question. Feeds both the countdown length
/// and the heuristic scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub difficulty: Difficulty,
    pub time_limit_seconds: u32,
    pub category: String,
}
