// tests/exam_flow_tests.rs

use std::sync::Arc;

use mockexam_backend::catalog::MemoryExamCatalog;
use mockexam_backend::config::Config;
use mockexam_backend::routes;
use mockexam_backend::session::MemorySessionStore;
use mockexam_backend::state::AppState;
use mockexam_backend::models::exam::{Choice, ExamPage, ExamQuestion, ExamType};

fn test_config() -> Config {
    Config {
        database_url: "postgres://unused-in-tests".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        rust_log: "error".to_string(),
    }
}

fn choice(label: &str, text: &str) -> Choice {
    Choice {
        label: label.to_string(),
        text: text.to_string(),
    }
}

/// Three questions worth 1, 2 and 3 points; question 302 expects two
/// labels.
fn sample_catalog() -> MemoryExamCatalog {
    let exam_type = ExamType {
        id: 3,
        code: "theory".to_string(),
        name: "Theory exam".to_string(),
        default_question_count: 3,
        default_duration_minutes: 60,
    };
    let page = ExamPage {
        id: 1,
        slug: "driving-theory".to_string(),
        title: "Driving theory mock exam".to_string(),
        exam_type: exam_type.clone(),
        question_count: None,
        duration_minutes: None,
    };
    let questions = vec![
        ExamQuestion {
            id: 301,
            exam_type_id: 3,
            module: "signs".to_string(),
            question_text: "What does a red octagon mean?".to_string(),
            choices: vec![choice("A", "Stop"), choice("B", "Yield"), choice("C", "Go")],
            answers: vec!["A".to_string()],
            points: 1,
            explanation: "A red octagon is a stop sign.".to_string(),
        },
        ExamQuestion {
            id: 302,
            exam_type_id: 3,
            module: "rules".to_string(),
            question_text: "When must you use headlights?".to_string(),
            choices: vec![
                choice("A", "At night"),
                choice("B", "In fog"),
                choice("C", "Never"),
            ],
            answers: vec!["A".to_string(), "B".to_string()],
            points: 2,
            explanation: String::new(),
        },
        ExamQuestion {
            id: 303,
            exam_type_id: 3,
            module: "rules".to_string(),
            question_text: "Who has right of way at an uncontrolled junction?".to_string(),
            choices: vec![choice("A", "Traffic from the right"), choice("B", "Nobody")],
            answers: vec!["A".to_string()],
            points: 3,
            explanation: String::new(),
        },
    ];
    MemoryExamCatalog::new(vec![page], questions)
}

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    let state = AppState::new(
        Arc::new(sample_catalog()),
        Arc::new(MemorySessionStore::new()),
        test_config(),
    );
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Client that does not follow redirects, so 303 responses from
/// next/prev can be asserted directly.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn sid_cookie(response: &reqwest::Response) -> String {
    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("first contact sets the visitor cookie")
        .to_str()
        .unwrap();
    set_cookie
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn listing_shows_configured_pages() {
    let address = spawn_app().await;
    let client = client();

    let response = client
        .get(format!("{}/api/exams", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let pages: serde_json::Value = response.json().await.unwrap();
    assert_eq!(pages[0]["slug"], "driving-theory");
    assert_eq!(pages[0]["question_count"], 3);
    assert_eq!(pages[0]["duration_minutes"], 60);
}

#[tokio::test]
async fn unknown_slug_is_404() {
    let address = spawn_app().await;
    let client = client();

    let response = client
        .get(format!("{}/api/exams/no-such-exam", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn first_contact_renders_question_and_sets_cookie() {
    let address = spawn_app().await;
    let client = client();

    let response = client
        .get(format!("{}/api/exams/driving-theory", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let cookie = sid_cookie(&response);
    assert!(cookie.starts_with("sid="));

    let view: serde_json::Value = response.json().await.unwrap();
    assert_eq!(view["current_index"], 0);
    assert_eq!(view["total"], 3);
    assert_eq!(view["answered"], 0);
    assert!(view["remaining_seconds"].as_i64().unwrap() > 0);
    // Correct answers never leak into the question view.
    assert!(view["question"].get("answers").is_none());
    assert!(view["question"]["expected_selections"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn resuming_keeps_the_same_questions() {
    let address = spawn_app().await;
    let client = client();

    let first = client
        .get(format!("{}/api/exams/driving-theory", address))
        .send()
        .await
        .unwrap();
    let cookie = sid_cookie(&first);
    let first: serde_json::Value = first.json().await.unwrap();

    let second = client
        .get(format!("{}/api/exams/driving-theory", address))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert!(second.headers().get("set-cookie").is_none());
    let second: serde_json::Value = second.json().await.unwrap();

    assert_eq!(first["question"]["id"], second["question"]["id"]);
}

#[tokio::test]
async fn advisory_index_is_clamped() {
    let address = spawn_app().await;
    let client = client();

    let first = client
        .get(format!("{}/api/exams/driving-theory", address))
        .send()
        .await
        .unwrap();
    let cookie = sid_cookie(&first);

    let response = client
        .get(format!("{}/api/exams/driving-theory?q=999", address))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    let view: serde_json::Value = response.json().await.unwrap();
    assert_eq!(view["current_index"], 2);

    // Garbage q reads as absent rather than erroring.
    let response = client
        .get(format!("{}/api/exams/driving-theory?q=banana", address))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn full_attempt_flow_scores_and_starts_over() {
    let address = spawn_app().await;
    let client = client();
    let url = format!("{}/api/exams/driving-theory", address);

    // Walk the attempt answering "A" everywhere.
    let first = client.get(&url).send().await.unwrap();
    let cookie = sid_cookie(&first);
    let mut view: serde_json::Value = first.json().await.unwrap();

    for step in 0..3 {
        let qid = view["question"]["id"].as_i64().unwrap();
        // "A" is correct for 301 and 303; for 302 it is a subset of
        // the two correct labels, so it scores nothing.
        let labels = vec!["A"];
        let is_last = step == 2;
        let action = if is_last {
            serde_json::Value::Null
        } else {
            serde_json::json!("next")
        };
        let mut answers = serde_json::Map::new();
        answers.insert(qid.to_string(), serde_json::json!(labels));
        let body = serde_json::json!({ "answers": answers, "action": action });

        let response = client
            .post(format!("{}?q={}", url, step))
            .header("cookie", &cookie)
            .json(&body)
            .send()
            .await
            .unwrap();

        if is_last {
            assert_eq!(response.status().as_u16(), 200);
            let result: serde_json::Value = response.json().await.unwrap();
            assert_eq!(result["submitted"], true);
            // 301 (1pt) and 303 (3pt) correct, 302 (2pt) a subset.
            assert_eq!(result["score"]["earned_points"], 4);
            assert_eq!(result["score"]["total_points"], 6);
            assert_eq!(result["score"]["percentage"], 66.7);
            assert_eq!(result["details"].as_array().unwrap().len(), 3);
        } else {
            // Post/redirect/get: navigation answers with a 303.
            assert_eq!(response.status().as_u16(), 303);
            let location = response.headers()["location"].to_str().unwrap().to_string();
            assert!(location.ends_with(&format!("q={}", step + 1)));

            let next = client
                .get(format!("{}{}", address, location))
                .header("cookie", &cookie)
                .send()
                .await
                .unwrap();
            view = next.json().await.unwrap();
            assert_eq!(view["current_index"], step + 1);
        }
    }

    // The attempt is purged: the next read starts a brand-new one.
    let again = client
        .get(&url)
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    let view: serde_json::Value = again.json().await.unwrap();
    assert_eq!(view["current_index"], 0);
    assert_eq!(view["answered"], 0);
}

#[tokio::test]
async fn retreat_at_first_question_redirects_to_itself() {
    let address = spawn_app().await;
    let client = client();
    let url = format!("{}/api/exams/driving-theory", address);

    let first = client.get(&url).send().await.unwrap();
    let cookie = sid_cookie(&first);

    let response = client
        .post(&url)
        .header("cookie", &cookie)
        .json(&serde_json::json!({ "action": "prev" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 303);
    let location = response.headers()["location"].to_str().unwrap();
    assert!(location.ends_with("q=0"));
}

#[tokio::test]
async fn malformed_answer_labels_are_rejected() {
    let address = spawn_app().await;
    let client = client();
    let url = format!("{}/api/exams/driving-theory", address);

    let first = client.get(&url).send().await.unwrap();
    let cookie = sid_cookie(&first);

    let response = client
        .post(&url)
        .header("cookie", &cookie)
        .json(&serde_json::json!({
            "answers": { "301": ["this label is far too long to be real"] },
            "action": "next",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}
