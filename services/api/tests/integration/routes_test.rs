use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use chrono::Duration;
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

use carlot_api::infra::mailer::{LogMailer, Mailer};
use carlot_api::router::build_router;
use carlot_api::state::AppState;
use carlot_testing::auth::test_token_service;

/// Full router over a connection that was never opened. Anything that reaches
/// the store fails, so a passing request proves the handler stopped early.
fn app() -> Router {
    build_router(AppState {
        db: DatabaseConnection::Disconnected,
        tokens: test_token_service(),
        mailer: Mailer::Log(LogMailer),
        code_ttl: Duration::minutes(15),
    })
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn should_reject_blank_email_on_login() {
    let resp = app()
        .oneshot(post_json("/auth/login", r#"{"email":"   "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["kind"], "MISSING_EMAIL");
    assert_eq!(body["message"], "missing email");
}

#[tokio::test]
async fn should_reject_absent_email_on_login() {
    let resp = app()
        .oneshot(post_json("/auth/login", "{}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["kind"], "MISSING_EMAIL");
}

#[tokio::test]
async fn should_answer_liveness_without_database() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}
