// src/engine/scorer.rs

use crate::error::AppError;
use crate::models::attempt::AttemptState;
use crate::models::result::{ExamResult, QuestionResult, ScoreSummary};
use crate::session::{SessionStore, keys};

/// Computes the per-question breakdown and aggregate score of an
/// attempt. Pure; the session store is untouched.
pub fn score_attempt(attempt: &AttemptState) -> ExamResult {
    let mut details = Vec::with_capacity(attempt.total());
    let mut earned_points: i64 = 0;
    let mut total_points: i64 = 0;

    for question in &attempt.questions {
        let selected = attempt.selected_for(question.id).to_vec();
        let is_correct = question.is_correct(&selected);

        total_points += i64::from(question.points);
        if is_correct {
            earned_points += i64::from(question.points);
        }

        details.push(QuestionResult {
            question: question.text.clone(),
            options: question.choices.clone(),
            selected,
            correct_answers: question.answers.clone(),
            is_correct,
            points: question.points,
            explanation: question.explanation.clone(),
        });
    }

    let percentage = if total_points > 0 {
        (earned_points as f64 / total_points as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };

    ExamResult {
        submitted: true,
        details,
        score: ScoreSummary {
            earned_points,
            total_points,
            percentage,
        },
    }
}

/// Scores the attempt and then deletes it from the session store.
/// This is the only path that clears an attempt; once the result
/// exists the attempt cannot be scored again.
pub async fn finalize(
    store: &dyn SessionStore,
    session_id: &str,
    attempt: &AttemptState,
) -> Result<ExamResult, AppError> {
    let result = score_attempt(attempt);

    for key in keys::ALL {
        store.delete(session_id, key).await?;
    }

    tracing::info!(
        "Scored attempt for exam type {}: {}/{} points",
        attempt.exam_type_id,
        result.score.earned_points,
        result.score.total_points
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attempt::QuestionSnapshot;
    use crate::models::exam::Choice;
    use crate::session::MemorySessionStore;
    use serde_json::json;
    use std::collections::HashMap;

    fn snapshot(id: i64, answers: &[&str], points: i32) -> QuestionSnapshot {
        QuestionSnapshot {
            id,
            text: format!("question {id}"),
            choices: vec![
                Choice { label: "A".to_string(), text: "first".to_string() },
                Choice { label: "B".to_string(), text: "second".to_string() },
                Choice { label: "C".to_string(), text: "third".to_string() },
            ],
            points,
            answers: answers.iter().map(|s| s.to_string()).collect(),
            explanation: format!("because {id}"),
        }
    }

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn scores_only_exact_matches() {
        let mut attempt = AttemptState::new(
            1,
            0,
            vec![
                snapshot(1, &["A"], 1),
                snapshot(2, &["A", "C"], 2),
                snapshot(3, &["B"], 3),
            ],
        );
        attempt.merge_answers(HashMap::from([
            (1, labels(&["A"])),        // correct
            (2, labels(&["A"])),        // subset, wrong
            (3, labels(&["B"])),        // correct
        ]));

        let result = score_attempt(&attempt);
        assert_eq!(result.score.earned_points, 4);
        assert_eq!(result.score.total_points, 6);
        assert_eq!(result.score.percentage, 66.7);

        assert!(result.details[0].is_correct);
        assert!(!result.details[1].is_correct);
        assert!(result.details[2].is_correct);
        // An unanswered or wrong question still reports what was selected.
        assert_eq!(result.details[1].selected, labels(&["A"]));
        assert_eq!(result.details[1].correct_answers, labels(&["A", "C"]));
    }

    #[test]
    fn unanswered_questions_count_as_wrong() {
        let attempt = AttemptState::new(1, 0, vec![snapshot(1, &["A"], 5)]);
        let result = score_attempt(&attempt);
        assert_eq!(result.score.earned_points, 0);
        assert_eq!(result.score.total_points, 5);
        assert!(result.details[0].selected.is_empty());
    }

    #[test]
    fn superset_selection_gets_no_partial_credit() {
        let mut attempt = AttemptState::new(1, 0, vec![snapshot(1, &["A", "C"], 2)]);
        attempt.merge_answers(HashMap::from([(1, labels(&["A", "C", "B"]))]));
        let result = score_attempt(&attempt);
        assert_eq!(result.score.earned_points, 0);
    }

    #[test]
    fn empty_attempt_scores_zero_without_dividing() {
        let attempt = AttemptState::new(1, 0, vec![]);
        let result = score_attempt(&attempt);
        assert!(result.submitted);
        assert!(result.details.is_empty());
        assert_eq!(result.score.earned_points, 0);
        assert_eq!(result.score.total_points, 0);
        assert_eq!(result.score.percentage, 0.0);
    }

    #[tokio::test]
    async fn finalize_purges_the_attempt() {
        let store = MemorySessionStore::new();
        for key in keys::ALL {
            store.set("sid", key, json!("anything")).await.unwrap();
        }

        let attempt = AttemptState::new(1, 0, vec![snapshot(1, &["A"], 1)]);
        let result = finalize(&store, "sid", &attempt).await.unwrap();
        assert!(result.submitted);

        for key in keys::ALL {
            assert_eq!(store.get("sid", key).await.unwrap(), None);
        }
    }
}
