use crate::models::question::{Difficulty, Question};

/// Supplies the ordered question set for a session. Called once per session,
/// when the confirmed profile moves the interview to its first question.
pub trait QuestionSource: Send + Sync {
    fn questions(&self) -> Vec<Question>;
}

/// A fixed, ordered list of questions.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Two questions per tier, easy first: 20s, 60s and 120s to answer.
    pub fn full_stack() -> Self {
        Self::new(vec![
            question(1, "What is React and what are its main features?", Difficulty::Easy, 20, "React"),
            question(
                2,
                "Explain the difference between let, const, and var in JavaScript.",
                Difficulty::Easy,
                20,
                "JavaScript",
            ),
            question(
                3,
                "How would you optimize the performance of a React application?",
                Difficulty::Medium,
                60,
                "React",
            ),
            question(
                4,
                "Explain RESTful API design principles and best practices.",
                Difficulty::Medium,
                60,
                "Backend",
            ),
            question(
                5,
                "Describe how you would implement server-side rendering with React and Node.js. What are the challenges?",
                Difficulty::Hard,
                120,
                "Full Stack",
            ),
            question(
                6,
                "Explain microservices architecture and discuss when you would choose it over a monolithic architecture.",
                Difficulty::Hard,
                120,
                "Architecture",
            ),
        ])
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::full_stack()
    }
}

impl QuestionSource for QuestionBank {
    fn questions(&self) -> Vec<Question> {
        self.questions.clone()
    }
}

pub fn question(
    id: u32,
    text: &str,
    difficulty: Difficulty,
    time_limit_seconds: u32,
    category: &str,
) -> Question {
    Question {
        id,
        text: text.to_string(),
        difficulty,
        time_limit_seconds,
        category: category.to_string(),
    }
}
