//! HTTP transport tests against an in-process axum server.
//!
//! Each test binds a fresh listener on `127.0.0.1:0`, so they run in
//! parallel without port clashes and need no network access.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use bloggen::{
    BlogGenError, BlogService, ClientConfig, GenerationForm, GenerationState, HttpBlogService,
    LanguageCode, SourceKind,
};
use serde_json::{json, Value};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Route library logs to the test harness. `RUST_LOG=bloggen=debug` shows
/// the request/response trail of a failing test.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

async fn serve(app: Router) -> String {
    init_tracing();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn service(base: &str, timeout_secs: u64) -> HttpBlogService {
    let config = ClientConfig::builder()
        .api_url(base)
        .timeout_secs(timeout_secs)
        .build()
        .unwrap();
    HttpBlogService::new(config).unwrap()
}

/// Echoes the request body back inside the envelope the real service uses.
fn echo_app() -> Router {
    Router::new()
        .route(
            "/blogs/topic",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "data": { "blog": {
                        "title": format!("On {}", body["topic"].as_str().unwrap_or("?")),
                        "content": format!("lang={}", body["language"].as_str().unwrap_or("?")),
                    }}
                }))
            }),
        )
        .route(
            "/blogs/youtube",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "blog": {
                        "title": { "content": "From video" },
                        "content": body["youtube_url"],
                    },
                    "video_id": "abc123",
                }))
            }),
        )
        .route(
            "/health",
            get(|| async {
                Json(json!({
                    "status": "healthy",
                    "routes": ["/blogs/topic", "/blogs/youtube"],
                }))
            }),
        )
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn topic_request_round_trips_through_form() {
    let base = serve(echo_app()).await;
    let svc = service(&base, 5);

    let mut form = GenerationForm::new(SourceKind::Topic);
    form.set_language(LanguageCode::Tamil);
    form.set_input("  The Future of AI ");
    let state = form.submit(&svc).await.unwrap();

    let GenerationState::Succeeded(blog) = state else {
        panic!("expected success, got {state:?}");
    };
    assert_eq!(blog.title, "On The Future of AI");
    assert_eq!(blog.content, "lang=tamil");
    assert_eq!(blog.language, LanguageCode::Tamil);
    assert_eq!(blog.video_id, None);
}

#[tokio::test]
async fn youtube_request_sends_snake_case_url_and_reads_video_id() {
    let base = serve(echo_app()).await;
    let svc = service(&base, 5);

    let mut form = GenerationForm::new(SourceKind::Video);
    form.set_input("https://youtu.be/abc123");
    form.submit(&svc).await.unwrap();

    let blog = form.latest_blog().expect("blog");
    assert_eq!(blog.title, "From video");
    assert_eq!(blog.content, "https://youtu.be/abc123");
    assert_eq!(blog.video_id.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn server_error_detail_reaches_the_form() {
    let app = Router::new().route(
        "/blogs/youtube",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "quota exceeded" })),
            )
        }),
    );
    let base = serve(app).await;
    let svc = service(&base, 5);

    let mut form = GenerationForm::new(SourceKind::Video);
    form.set_input("https://www.youtube.com/watch?v=abc123");
    let state = form.submit(&svc).await.unwrap();

    assert_eq!(state, &GenerationState::Failed("quota exceeded".into()));
    assert_eq!(form.input(), "https://www.youtube.com/watch?v=abc123");
}

#[tokio::test]
async fn missing_route_is_server_error_without_detail() {
    let base = serve(Router::new()).await;
    let svc = service(&base, 5);
    let request = bloggen::build(SourceKind::Topic, "x", LanguageCode::English).unwrap();

    let err = svc.generate(&request).await.unwrap_err();
    assert!(
        matches!(err, BlogGenError::Server { status: 404, detail: None }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn non_json_success_is_normalisation_error() {
    let app = Router::new().route("/blogs/topic", post(|| async { "plain text, not json" }));
    let base = serve(app).await;
    let svc = service(&base, 5);

    let mut form = GenerationForm::new(SourceKind::Topic);
    form.set_input("x");
    let state = form.submit(&svc).await.unwrap();

    let GenerationState::Failed(msg) = state else {
        panic!("expected failure, got {state:?}");
    };
    assert!(msg.starts_with("Response body is not valid JSON"), "got {msg}");
}

#[tokio::test]
async fn empty_envelope_is_invalid_format() {
    let app = Router::new().route("/blogs/topic", post(|| async { Json(json!({})) }));
    let base = serve(app).await;
    let svc = service(&base, 5);

    let mut form = GenerationForm::new(SourceKind::Topic);
    form.set_input("x");
    assert_eq!(
        form.submit(&svc).await.unwrap(),
        &GenerationState::Failed("Invalid response format".into())
    );
}

#[tokio::test]
async fn slow_service_times_out_as_transport_error() {
    let app = Router::new().route(
        "/blogs/topic",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "title": "too late" }))
        }),
    );
    let base = serve(app).await;
    let svc = service(&base, 1);
    let request = bloggen::build(SourceKind::Topic, "x", LanguageCode::English).unwrap();

    let err = svc.generate(&request).await.unwrap_err();
    match err {
        BlogGenError::Transport { reason } => assert!(reason.contains("timed out"), "got {reason}"),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    init_tracing();
    // Grab a free port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let svc = service(&format!("http://{addr}"), 5);
    let mut form = GenerationForm::new(SourceKind::Topic);
    form.set_input("offline");
    let state = form.submit(&svc).await.unwrap();

    let GenerationState::Failed(msg) = state else {
        panic!("expected failure, got {state:?}");
    };
    assert!(msg.contains("Could not reach the blog service"), "got {msg}");
    assert_eq!(form.input(), "offline");
}

#[tokio::test]
async fn health_lists_routes() {
    let base = serve(echo_app()).await;
    let health = service(&base, 5).health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.routes, vec!["/blogs/topic", "/blogs/youtube"]);
}
