// src/engine/navigator.rs

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::manager::{AttemptManager, remaining_seconds};
use crate::engine::scorer;
use crate::error::AppError;
use crate::models::attempt::{AttemptState, NavAction};
use crate::models::exam::ExamPage;
use crate::models::result::{ExamResult, QuestionPrompt, QuestionView};

/// What one request asked for. A plain read carries no submission;
/// the advisory index comes from the `q` query parameter and is
/// clamped before use.
#[derive(Debug, Default)]
pub struct ExamRequest {
    pub advisory_index: Option<usize>,
    pub submission: Option<Submission>,
}

#[derive(Debug)]
pub struct Submission {
    pub answers: HashMap<i64, Vec<String>>,
    pub action: Option<NavAction>,
}

/// What the caller should answer with.
#[derive(Debug)]
pub enum Outcome {
    /// Render the question at this view.
    Question(Box<QuestionView>),
    /// 303 to the same page at this index, so a refresh cannot replay
    /// the form submission.
    Redirect(usize),
    /// The attempt is over and purged; show the result.
    Finished(Box<ExamResult>),
}

/// The per-request state machine over an attempt: resolve, check the
/// deadline, merge answers, then render, redirect or score.
#[derive(Clone)]
pub struct Navigator {
    manager: Arc<AttemptManager>,
}

impl Navigator {
    pub fn new(manager: Arc<AttemptManager>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &AttemptManager {
        &self.manager
    }

    pub async fn handle(
        &self,
        session_id: &str,
        page: &ExamPage,
        request: ExamRequest,
        now: i64,
    ) -> Result<Outcome, AppError> {
        let mut attempt = self
            .manager
            .resolve(session_id, page, now)
            .await?
            .into_attempt();

        let settings = page.effective_settings();
        let remaining = remaining_seconds(&attempt, settings.duration_minutes, now);

        // Expiry wins over whatever the request asked for. A pool that
        // sampled zero questions has nothing to show either; score it
        // straight away (0 of 0 points).
        if remaining <= 0 || attempt.questions.is_empty() {
            let result = scorer::finalize(self.manager.store(), session_id, &attempt).await?;
            return Ok(Outcome::Finished(Box::new(result)));
        }

        let index = attempt.clamp_index(request.advisory_index.unwrap_or(attempt.current_index));

        let Some(submission) = request.submission else {
            // Plain read: render, mutate nothing.
            return Ok(Outcome::Question(Box::new(question_view(
                page, &attempt, index, remaining,
            ))));
        };

        attempt.merge_answers(submission.answers);

        match submission.action {
            Some(NavAction::Next) if index + 1 < attempt.total() => {
                attempt.current_index = index + 1;
                self.manager.save(session_id, &attempt).await?;
                Ok(Outcome::Redirect(attempt.current_index))
            }
            Some(NavAction::Prev) => {
                // No-op at the first question, but still redirect so
                // the POST never renders in place.
                attempt.current_index = index.saturating_sub(1);
                self.manager.save(session_id, &attempt).await?;
                Ok(Outcome::Redirect(attempt.current_index))
            }
            _ => {
                // Explicit finish, or advancing past the last question.
                let result =
                    scorer::finalize(self.manager.store(), session_id, &attempt).await?;
                Ok(Outcome::Finished(Box::new(result)))
            }
        }
    }
}

fn question_view(
    page: &ExamPage,
    attempt: &AttemptState,
    index: usize,
    remaining: i64,
) -> QuestionView {
    let question = &attempt.questions[index];
    QuestionView {
        slug: page.slug.clone(),
        current_index: index,
        total: attempt.total(),
        answered: attempt.answered_count(),
        remaining_seconds: remaining,
        selected_labels: attempt.selected_for(question.id).to_vec(),
        question: QuestionPrompt {
            id: question.id,
            text: question.text.clone(),
            choices: question.choices.clone(),
            points: question.points,
            expected_selections: question.answers.len(),
        },
    }
}
