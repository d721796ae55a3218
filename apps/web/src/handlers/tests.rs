use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use devdiary_core::GatewayError;
use devdiary_core::domain::{Author, Credentials, Post, PostStatus, Registration, User};
use devdiary_core::ports::{SessionStore, UserGateway};
use devdiary_infra::{InMemoryBackend, InMemorySessionStore};
use PostStatus::{Draft, Published};

use super::configure_routes;
use crate::config::SessionConfig;
use crate::observability::{REQUEST_ID_HEADER, RequestIdMiddleware};
use crate::state::AppState;

const BODY: &str = "<p>Step-by-step guide to deploying a <strong>REST API</strong> \
                    on AWS Lambda without servers.</p>";

fn state(backend: Arc<InMemoryBackend>) -> AppState {
    AppState::in_memory(
        backend,
        Arc::new(InMemorySessionStore::new()),
        SessionConfig::default(),
    )
}

macro_rules! app {
    ($backend:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new(state($backend)))
                .configure(configure_routes),
        )
        .await
    };
}

/// Register an account and hand back the session cookie.
macro_rules! sign_up {
    ($app:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "name": "Waqas Ahmad",
                "email": $email,
                "password": "password1",
            }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        session_cookie(&resp)
    }};
}

fn session_cookie<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Cookie<'static> {
    let name = SessionConfig::default().cookie_name;
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
        .expect("session cookie set")
}

fn seeded(id: &str, title: &str, status: PostStatus, day: u32, tags: &[&str]) -> Post {
    let created = Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap();
    Post {
        id: id.to_string(),
        title: title.to_string(),
        handle: id.to_string(),
        content: BODY.to_string(),
        featured_image: None,
        author: Author {
            id: "author-1".to_string(),
            name: "Waqas Ahmad".to_string(),
        },
        status,
        created_at: created,
        updated_at: created,
        published_at: (status == PostStatus::Published).then_some(created),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        reading_time: day,
    }
}

async fn seeded_backend() -> Arc<InMemoryBackend> {
    let backend = Arc::new(InMemoryBackend::new());
    let posts = [
        seeded("intro-to-serverless", "Intro to Serverless", Published, 5, &["aws", "serverless"]),
        seeded("zero-downtime-deploys", "zero downtime deploys", Published, 1, &["devops"]),
        seeded("api-gateway-tips", "API Gateway tips", Published, 9, &["aws"]),
        seeded("unfinished-draft", "Unfinished draft", Draft, 12, &["aws", "draft"]),
    ];
    for post in posts {
        backend.insert_post(post).await;
    }
    backend
}

fn titles(body: &Value) -> Vec<&str> {
    body["data"]["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect()
}

#[actix_rt::test]
async fn test_health_reports_backend_and_request_id() {
    let app = app!(Arc::new(InMemoryBackend::new()));

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header((REQUEST_ID_HEADER, "req-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap(),
        "req-123"
    );

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "memory");
}

#[actix_rt::test]
async fn test_register_me_logout_cycle() {
    let app = app!(Arc::new(InMemoryBackend::new()));
    let cookie = sign_up!(app, "waqas@example.com");

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["loggedIn"], true);
    assert_eq!(body["data"]["user"]["email"], "waqas@example.com");
    assert_eq!(body["data"]["user"]["initials"], "WA");

    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(session_cookie(&resp).value(), "");

    // The old cookie no longer maps to a token.
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_login_with_existing_account() {
    let app = app!(Arc::new(InMemoryBackend::new()));
    sign_up!(app, "waqas@example.com");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "waqas@example.com", "password": "password1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!session_cookie(&resp).value().is_empty());

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "waqas@example.com", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_register_validation_errors() {
    let app = app!(Arc::new(InMemoryBackend::new()));

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "W", "email": "not-an-email", "password": "short" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 422);
    assert!(body["errors"]["name"].is_array());
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"]["password"].is_array());
}

#[actix_rt::test]
async fn test_protected_route_requires_session() {
    let app = app!(Arc::new(InMemoryBackend::new()));

    let req = test::TestRequest::get().uri("/api/my-posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Authentication Required");

    // A cookie for a session that is gone gets cleared.
    let req = test::TestRequest::get()
        .uri("/api/my-posts")
        .cookie(Cookie::new(SessionConfig::default().cookie_name, "unknown-session"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(session_cookie(&resp).value(), "");
}

/// Accounts from the in-memory backend, with a switch that makes the backend
/// stop honouring every token it issued.
struct RevocableUsers {
    inner: Arc<InMemoryBackend>,
    rejecting: AtomicBool,
}

#[async_trait]
impl UserGateway for RevocableUsers {
    async fn login(&self, credentials: &Credentials) -> Result<String, GatewayError> {
        self.inner.login(credentials).await
    }

    async fn register(&self, registration: &Registration) -> Result<String, GatewayError> {
        self.inner.register(registration).await
    }

    async fn profile(&self, token: &str) -> Result<User, GatewayError> {
        if self.rejecting.load(Ordering::SeqCst) {
            return Err(GatewayError::api(401, "Not authorized, token failed"));
        }
        self.inner.profile(token).await
    }
}

#[actix_rt::test]
async fn test_rejected_token_ends_session() {
    let backend = Arc::new(InMemoryBackend::new());
    let users = Arc::new(RevocableUsers {
        inner: backend.clone(),
        rejecting: AtomicBool::new(false),
    });
    let store = Arc::new(InMemorySessionStore::new());
    let state = AppState::from_parts(
        backend,
        users.clone(),
        store.clone(),
        SessionConfig::default(),
        "memory",
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let cookie = sign_up!(app, "waqas@example.com");
    assert!(store.load(cookie.value()).await.unwrap().is_some());

    users.rejecting.store(true, Ordering::SeqCst);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(session_cookie(&resp).value(), "");
    assert_eq!(store.load(cookie.value()).await.unwrap(), None);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Authentication Required");
}

#[actix_rt::test]
async fn test_my_posts_lifecycle() {
    let app = app!(Arc::new(InMemoryBackend::new()));
    let cookie = sign_up!(app, "waqas@example.com");

    let req = test::TestRequest::post()
        .uri("/api/my-posts")
        .cookie(cookie.clone())
        .set_json(json!({
            "title": "Intro to Serverless",
            "image": "",
            "content": BODY,
            "tags": ["aws", " serverless ", "aws"],
            "status": "published",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let id = body["data"]["_id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["handle"], "intro-to-serverless");
    assert_eq!(body["data"]["tags"], json!(["aws", "serverless"]));

    let req = test::TestRequest::post()
        .uri("/api/my-posts")
        .cookie(cookie.clone())
        .set_json(json!({ "title": "Hey", "image": "nope", "content": "short" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["title"][0], "Title must be at least 5 characters");
    assert!(body["errors"]["image"].is_array());
    assert!(body["errors"]["content"].is_array());

    let req = test::TestRequest::put()
        .uri(&format!("/api/my-posts/{id}"))
        .cookie(cookie.clone())
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri(&format!("/api/my-posts/{id}"))
        .cookie(cookie.clone())
        .set_json(json!({ "status": "draft" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "draft");

    let req = test::TestRequest::get()
        .uri("/api/my-posts?status=draft")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(titles(&body), vec!["Intro to Serverless"]);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/my-posts/{id}"))
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/my-posts/{id}"))
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_other_authors_posts_are_forbidden() {
    let app = app!(Arc::new(InMemoryBackend::new()));
    let owner = sign_up!(app, "owner@example.com");
    let other = sign_up!(app, "other@example.com");

    let req = test::TestRequest::post()
        .uri("/api/my-posts")
        .cookie(owner)
        .set_json(json!({ "title": "Owned by someone", "content": BODY }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let id = body["data"]["_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/my-posts/{id}"))
        .cookie(other)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_public_listing_defaults_to_newest_published() {
    let app = app!(seeded_backend().await);

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        titles(&body),
        vec!["API Gateway tips", "Intro to Serverless", "zero downtime deploys"]
    );
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["tags"], json!(["aws", "devops", "serverless"]));
}

#[actix_rt::test]
async fn test_public_listing_controls() {
    let app = app!(seeded_backend().await);

    let req = test::TestRequest::get()
        .uri("/api/posts?tag=aws&sort=title")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(titles(&body), vec!["API Gateway tips", "Intro to Serverless"]);

    // Drafts never leak, whatever status is asked for.
    let req = test::TestRequest::get()
        .uri("/api/posts?status=draft&q=draft")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(titles(&body).is_empty());

    let req = test::TestRequest::get()
        .uri("/api/posts?q=SERVER&sort=oldest")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(titles(&body), vec!["Intro to Serverless"]);

    let req = test::TestRequest::get().uri("/api/posts?sort=bogus").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(titles(&body).len(), 3);
}

#[actix_rt::test]
async fn test_post_page_metadata() {
    let app = app!(seeded_backend().await);

    let req = test::TestRequest::get()
        .uri("/api/posts/intro-to-serverless")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["post"]["title"], "Intro to Serverless");
    assert_eq!(body["data"]["displayDate"], "March 5, 2024");
    assert_eq!(body["data"]["authorInitials"], "WA");
    let description = body["data"]["description"].as_str().unwrap();
    assert!(description.starts_with("Step-by-step guide"));
    assert!(!description.contains('<'));

    let req = test::TestRequest::get()
        .uri("/api/posts/unfinished-draft")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_tags_and_search() {
    let app = app!(seeded_backend().await);

    let req = test::TestRequest::get().uri("/api/tags").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["tags"], json!(["aws", "devops", "serverless"]));

    let req = test::TestRequest::get()
        .uri("/api/posts/search?q=gateway")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let found = body["data"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["title"], "API Gateway tips");
}
