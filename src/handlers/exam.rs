// src/handlers/exam.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use crate::{
    engine::{ExamRequest, Outcome, Submission},
    error::AppError,
    models::attempt::SubmitExamRequest,
    models::exam::{ExamPage, ExamPageSummary},
    state::AppState,
    utils::visitor,
};

/// Query parameters of the exam page.
///
/// `q` is advisory only: it is parsed leniently (garbage reads as
/// absent) and clamped against the attempt before use.
#[derive(Debug, Deserialize)]
pub struct ExamPageQuery {
    pub q: Option<String>,
}

impl ExamPageQuery {
    fn advisory_index(&self) -> Option<usize> {
        self.q.as_deref().and_then(|raw| raw.parse().ok())
    }
}

/// Lists the configured exam pages with their effective settings.
pub async fn list_exam_pages(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let pages = state.catalog.pages().await?;
    let summaries: Vec<ExamPageSummary> = pages.iter().map(ExamPageSummary::from).collect();
    Ok(Json(summaries))
}

/// Renders the current question of the visitor's attempt, creating
/// the attempt on first contact. Expired attempts score immediately
/// and answer with the result instead.
pub async fn show_exam(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ExamPageQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let page = load_page(&state, &slug).await?;
    let (session_id, set_cookie) = visitor::ensure_visitor(&headers);

    let request = ExamRequest {
        advisory_index: params.advisory_index(),
        submission: None,
    };
    let outcome = state
        .navigator
        .handle(&session_id, &page, request, Utc::now().timestamp())
        .await?;

    Ok(respond(&slug, outcome, set_cookie))
}

/// Records submitted answers and applies the navigation action:
/// advance or retreat redirect back to the page, anything else
/// finishes the attempt and answers with the scored result.
pub async fn submit_exam(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ExamPageQuery>,
    headers: HeaderMap,
    Json(payload): Json<SubmitExamRequest>,
) -> Result<Response, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let page = load_page(&state, &slug).await?;
    let (session_id, set_cookie) = visitor::ensure_visitor(&headers);

    let request = ExamRequest {
        advisory_index: params.advisory_index(),
        submission: Some(Submission {
            answers: payload.answers,
            action: payload.action,
        }),
    };
    let outcome = state
        .navigator
        .handle(&session_id, &page, request, Utc::now().timestamp())
        .await?;

    Ok(respond(&slug, outcome, set_cookie))
}

async fn load_page(state: &AppState, slug: &str) -> Result<ExamPage, AppError> {
    state
        .catalog
        .page(slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No exam page '{slug}'")))
}

fn respond(slug: &str, outcome: Outcome, set_cookie: Option<String>) -> Response {
    let mut response = match outcome {
        Outcome::Question(view) => Json(*view).into_response(),
        Outcome::Finished(result) => Json(*result).into_response(),
        Outcome::Redirect(index) => {
            Redirect::to(&format!("/api/exams/{slug}?q={index}")).into_response()
        }
    };

    if let Some(cookie) = set_cookie {
        response
            .headers_mut()
            .insert(SET_COOKIE, cookie.parse().unwrap());
    }

    response
}
