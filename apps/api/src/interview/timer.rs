use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::interview::service::{SessionService, TickOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Calm,
    Warning,
    Critical,
}

/// Countdown as the display layer renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerView {
    pub remaining_seconds: u32,
    pub duration_seconds: u32,
    pub display: String,
    pub urgency: Urgency,
}

impl TimerView {
    pub fn new(remaining_seconds: u32, duration_seconds: u32) -> Self {
        Self {
            remaining_seconds,
            duration_seconds,
            display: format_clock(remaining_seconds),
            urgency: urgency(remaining_seconds, duration_seconds),
        }
    }
}

/// `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Calm above half the limit, Warning above a quarter, Critical below.
pub fn urgency(remaining: u32, duration: u32) -> Urgency {
    if duration == 0 {
        return Urgency::Critical;
    }
    let percent = remaining as f64 / duration as f64 * 100.0;
    if percent > 50.0 {
        Urgency::Calm
    } else if percent > 25.0 {
        Urgency::Warning
    } else {
        Urgency::Critical
    }
}

/// Drives the countdown: one `SessionService::tick` per `period`.
/// Missed ticks are skipped, so a stalled runtime never fast-forwards a
/// question.
pub fn spawn_ticker(service: Arc<SessionService>, period: Duration) -> JoinHandle<()> {
    info!(period_ms = period.as_millis() as u64, "countdown ticker started");
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            match service.tick().await {
                TickOutcome::Idle | TickOutcome::Running { .. } => {}
                outcome => debug!(?outcome, "countdown tick"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::interview::questions::{question, QuestionBank};
    use crate::interview::scoring::{HeuristicScorer, ScoringError, ScoringOracle};
    use crate::interview::session::Step;
    use crate::models::profile::ProfileForm;
    use crate::models::question::{Difficulty, Question};
    use crate::store::MemoryStore;

    /// Never answers.
    struct StuckScorer;

    #[async_trait]
    impl ScoringOracle for StuckScorer {
        async fn score(&self, _answer: &str, _question: &Question) -> Result<u8, ScoringError> {
            std::future::pending().await
        }
    }

    fn jane() -> ProfileForm {
        ProfileForm {
            name: "Jane Doe".to_string(),
            email: "jane@site.org".to_string(),
            phone: "5551234567".to_string(),
        }
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(60), "1:00");
        assert_eq!(format_clock(119), "1:59");
    }

    #[test]
    fn test_urgency_thresholds() {
        assert_eq!(urgency(20, 20), Urgency::Calm);
        assert_eq!(urgency(11, 20), Urgency::Calm);
        assert_eq!(urgency(10, 20), Urgency::Warning);
        assert_eq!(urgency(6, 20), Urgency::Warning);
        assert_eq!(urgency(5, 20), Urgency::Critical);
        assert_eq!(urgency(0, 0), Urgency::Critical);
    }

    #[test]
    fn test_timer_view_projection() {
        let view = TimerView::new(45, 60);
        assert_eq!(view.display, "0:45");
        assert_eq!(view.urgency, Urgency::Calm);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_expires_question_after_its_limit() {
        let bank = QuestionBank::new(vec![
            question(1, "First?", Difficulty::Easy, 3, "General"),
            question(2, "Second?", Difficulty::Easy, 3, "General"),
        ]);
        let service = Arc::new(
            SessionService::open(
                Arc::new(MemoryStore::new()),
                Arc::new(HeuristicScorer::deterministic()),
                Arc::new(bank),
                1024,
            )
            .await,
        );
        service.submit_profile(jane()).await.unwrap();

        let handle = spawn_ticker(service.clone(), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let view = service.view().await;
        assert_eq!(view.question_number, Some(1));
        assert_eq!(view.timer.map(|t| t.remaining_seconds), Some(1));

        tokio::time::sleep(Duration::from_secs(1)).await;
        let view = service.view().await;
        assert_eq!(view.question_number, Some(2));
        assert_eq!(view.answered, 1);
        assert_eq!(view.step, Step::Interview);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_keeps_counting_while_a_draft_is_scored() {
        let bank = QuestionBank::new(vec![question(1, "Only?", Difficulty::Easy, 2, "General")]);
        let service = Arc::new(
            SessionService::open(
                Arc::new(MemoryStore::new()),
                Arc::new(StuckScorer),
                Arc::new(bank),
                1024,
            )
            .await,
        );
        service.submit_profile(jane()).await.unwrap();
        service.stage_draft("draft".to_string()).await.unwrap();

        let handle = spawn_ticker(service.clone(), Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(service.view().await.evaluating);

        service.restart().await;
        service.submit_profile(jane()).await.unwrap();
        let before = service.view().await.timer.map(|t| t.remaining_seconds);
        tokio::time::sleep(Duration::from_secs(1)).await;
        let after = service.view().await.timer.map(|t| t.remaining_seconds);
        assert_eq!(before, Some(2));
        assert_eq!(after, Some(1));

        handle.abort();
    }
}
