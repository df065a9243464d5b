use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

use training_backend::error::Result;
use training_backend::mailer::Mailer;
use training_backend::middleware::rate_limit::{new_rps_state, rps_middleware};
use training_backend::{routes, AppState};

/// Accepts everything so flows under test never hit a real provider.
struct NullMailer;

#[async_trait]
impl Mailer for NullMailer {
    async fn send(&self, _to: &str, _subject: &str, _html: &str) -> Result<()> {
        Ok(())
    }
}

async fn test_state() -> AppState {
    dotenvy::dotenv().ok();
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("EMAIL_API_URL", "http://localhost/send");
    env::set_var("EMAIL_API_KEY", "test-key");
    env::set_var("EMAIL_FROM", "noreply@example.com");
    env::set_var("APP_BASE_URL", "http://localhost:3000");
    env::set_var("PUBLIC_RPS", "100");

    // Several tests share the binary; only the first init sticks.
    let _ = training_backend::config::init_config();

    let pool = training_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    AppState::with_mailer(pool, Arc::new(NullMailer))
}

fn json_request(method: &str, uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
#[ignore = "needs a PostgreSQL instance reachable through DATABASE_URL"]
async fn course_lifecycle_end_to_end() {
    let state = test_state().await;
    let app = Router::new()
        .route(
            "/api/courses",
            get(routes::courses::list_courses).post(routes::courses::create_course),
        )
        .route(
            "/api/courses/:id",
            get(routes::courses::get_course).delete(routes::courses::delete_course),
        )
        .route(
            "/api/courses/:id/status",
            patch(routes::courses::update_course_status),
        )
        .route("/api/candidates", post(routes::candidates::create_candidate))
        .route(
            "/api/candidates/:id",
            axum::routing::delete(routes::candidates::delete_candidate),
        )
        .with_state(state);

    let marker = Uuid::new_v4();
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/courses",
            json!({
                "name": format!("Curso Teste {marker}"),
                "startDate": "2026-09-01",
                "endDate": "2026-12-18",
                "maxStudents": 20
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let course = body_json(resp).await;
    assert_eq!(course["status"], "OPEN");
    assert_eq!(course["candidatesCount"], 0);
    let course_id = course["id"].as_str().unwrap().to_string();

    // The unfiltered list is cached, but the create above invalidated it,
    // so the new course must show up immediately.
    let resp = app
        .clone()
        .oneshot(empty_request("GET", "/api/courses"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let listed = body_json(resp).await;
    assert!(listed
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["id"] == course_id.as_str()));

    let resp = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/courses/{course_id}/status"),
            json!({ "status": "IN_PROGRESS" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Same again after the status change, well inside the snapshot TTL.
    let resp = app
        .clone()
        .oneshot(empty_request("GET", "/api/courses"))
        .await
        .unwrap();
    let listed = body_json(resp).await;
    let entry = listed
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == course_id.as_str())
        .expect("course in list");
    assert_eq!(entry["status"], "IN_PROGRESS");

    let mut candidate_ids = Vec::new();
    for i in 0..2 {
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/candidates",
                json!({
                    "name": format!("Candidato {i}"),
                    "email": format!("lifecycle_{i}_{marker}@example.com"),
                    "courseId": course_id
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let candidate = body_json(resp).await;
        candidate_ids.push(candidate["id"].as_str().unwrap().to_string());
    }

    let resp = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/courses/{course_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["candidatesCount"], 2);

    // Attached candidates block the delete.
    let resp = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/courses/{course_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("candidatos associados"));

    for id in &candidate_ids {
        let resp = app
            .clone()
            .oneshot(empty_request("DELETE", &format!("/api/candidates/{id}")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    let resp = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/courses/{course_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/courses/{course_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "needs a PostgreSQL instance reachable through DATABASE_URL"]
async fn public_application_records_a_notification() {
    let state = test_state().await;
    let public_api = Router::new()
        .route("/api/candidates", post(routes::candidates::create_candidate))
        .layer(from_fn_with_state(new_rps_state(100), rps_middleware));
    let app = Router::new()
        .merge(public_api)
        .route(
            "/api/notifications",
            get(routes::notifications::list_notifications),
        )
        .with_state(state);

    let marker = Uuid::new_v4();
    let name = format!("Aplicante {marker}");
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/candidates",
            json!({
                "name": name,
                "email": format!("apply_{marker}@example.com"),
                "age": 22
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let candidate = body_json(resp).await;
    assert_eq!(candidate["status"], "REGISTERED");

    let resp = app
        .clone()
        .oneshot(empty_request("GET", "/api/notifications"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let recorded = body["items"].as_array().unwrap().iter().any(|n| {
        n["title"] == "Nova candidatura" && n["message"].as_str().unwrap().contains(&name)
    });
    assert!(recorded, "application should leave a notification behind");
}

#[tokio::test]
#[ignore = "needs a PostgreSQL instance reachable through DATABASE_URL"]
async fn bulk_status_update_is_all_or_nothing() {
    let state = test_state().await;
    let app = Router::new()
        .route("/api/candidates", post(routes::candidates::create_candidate))
        .route(
            "/api/candidates/bulk-status",
            post(routes::candidates::bulk_update_status),
        )
        .route(
            "/api/candidates/:id",
            get(routes::candidates::get_candidate),
        )
        .with_state(state);

    let marker = Uuid::new_v4();
    let mut ids = Vec::new();
    for i in 0..2 {
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/candidates",
                json!({
                    "name": format!("Bulk {i}"),
                    "email": format!("bulk_{i}_{marker}@example.com")
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        ids.push(body_json(resp).await["id"].as_str().unwrap().to_string());
    }

    // One unknown id fails the whole batch.
    let mut with_ghost = ids.clone();
    with_ghost.push(Uuid::new_v4().to_string());
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/candidates/bulk-status",
            json!({ "ids": with_ghost, "status": "ACCEPTED" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    for id in &ids {
        let resp = app
            .clone()
            .oneshot(empty_request("GET", &format!("/api/candidates/{id}")))
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["status"], "REGISTERED");
    }

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/candidates/bulk-status",
            json!({ "ids": ids, "status": "ACCEPTED" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated.as_array().unwrap().len(), 2);
    assert!(updated
        .as_array()
        .unwrap()
        .iter()
        .all(|c| c["status"] == "ACCEPTED"));
}

#[tokio::test]
#[ignore = "needs a PostgreSQL instance reachable through DATABASE_URL"]
async fn communication_send_reports_the_tally() {
    let state = test_state().await;
    let app = Router::new()
        .route("/api/candidates", post(routes::candidates::create_candidate))
        .route(
            "/api/communication/send",
            post(routes::communication::send_communication),
        )
        .with_state(state);

    let marker = Uuid::new_v4();
    let mut ids = Vec::new();
    for i in 0..2 {
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/candidates",
                json!({
                    "name": format!("Destinatário {i}"),
                    "email": format!("comm_{i}_{marker}@example.com")
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        ids.push(body_json(resp).await["id"].as_str().unwrap().to_string());
    }

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/communication/send",
            json!({
                "mode": "custom",
                "candidateIds": ids,
                "subject": "Olá {nome}",
                "message": "Novidades do curso {curso}"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let report = body_json(resp).await;
    assert_eq!(report["success"], 2);
    assert_eq!(report["failed"], 0);
    assert_eq!(report["errors"].as_array().unwrap().len(), 0);

    // Criteria that resolve nobody are rejected before any send.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/communication/send",
            json!({
                "mode": "custom",
                "candidateIds": [Uuid::new_v4().to_string()],
                "subject": "Olá",
                "message": "corpo"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "needs a PostgreSQL instance reachable through DATABASE_URL"]
async fn invalid_bodies_always_return_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/api/candidates", post(routes::candidates::create_candidate))
        .with_state(state);

    // Well-formed JSON failing validation carries the field list.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/candidates",
            json!({ "name": "", "email": "not-an-email" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Dados inválidos");
    assert!(body["fields"].as_array().unwrap().len() >= 2);

    // Malformed JSON gets the generic body message.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/candidates")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "Corpo do pedido inválido");
}

#[tokio::test]
#[ignore = "needs a PostgreSQL instance reachable through DATABASE_URL"]
async fn candidate_export_downloads_csv() {
    let state = test_state().await;
    let app = Router::new()
        .route("/api/candidates", post(routes::candidates::create_candidate))
        .route(
            "/api/candidates/export",
            get(routes::export::export_candidates),
        )
        .with_state(state);

    let marker = Uuid::new_v4();
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/candidates",
            json!({
                "name": "Exportada",
                "email": format!("export_{marker}@example.com")
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .oneshot(empty_request("GET", "/api/candidates/export"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()["content-type"],
        "text/csv; charset=utf-8"
    );
    assert!(resp.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .contains("candidatos_"));
    let bytes = to_bytes(resp.into_body(), 16 * 1024 * 1024).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with(
        "Nome,Email,Telefone,País,Idade,Escolaridade,Curso,Estado,Data de Candidatura"
    ));
}
