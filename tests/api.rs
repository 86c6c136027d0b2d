use std::io::Cursor;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tower::ServiceExt;

use folio::application::admin::{AdminService, AdminTokenVerifier};
use folio::application::images::ImageNormalizer;
use folio::application::notify::{Notification, Notifier, NotifyError};
use folio::application::repos::{AdminRepo, EntityRepo};
use folio::cache::SharedCache;
use folio::domain::entities::{Project, Review, Skill};
use folio::infra::bootstrap::{Backends, StateOptions, assemble_state};
use folio::infra::http::{RouterOptions, UploadLimits, build_router};
use folio::infra::memory::MemoryRepositories;

const BOUNDARY: &str = "folio-test-boundary";
const ADMIN_TOKEN: &str = "let-me-in";
const LIST_TTL: Duration = Duration::from_secs(60);

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingNotifier {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("notifier lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn dispatch(&self, notification: Notification) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Transport("relay unreachable".into()));
        }
        self.sent.lock().expect("notifier lock").push(notification);
        Ok(())
    }
}

struct Harness {
    router: Router,
    repos: MemoryRepositories,
    notifier: Arc<RecordingNotifier>,
}

fn default_limits() -> UploadLimits {
    UploadLimits {
        max_file_bytes: 5 * 1024 * 1024,
        max_gallery_images: 10,
        max_request_bytes: 60 * 1024 * 1024,
    }
}

fn harness() -> Harness {
    harness_with(RecordingNotifier::default(), default_limits())
}

fn harness_with(notifier: RecordingNotifier, uploads: UploadLimits) -> Harness {
    let repos = MemoryRepositories::new();
    let notifier = Arc::new(notifier);
    let cache = Arc::new(SharedCache::with_capacity(
        NonZeroUsize::new(16).expect("non-zero capacity"),
    ));
    let digest = hex::encode(Sha256::digest(ADMIN_TOKEN.as_bytes()));

    let state = assemble_state(
        Backends::uniform(Arc::new(repos.clone())),
        cache,
        notifier.clone(),
        StateOptions {
            list_ttl: LIST_TTL,
            normalizer: ImageNormalizer::default(),
            uploads,
            admin_token: AdminTokenVerifier::from_hex(Some(&digest)),
        },
    );
    let router = build_router(state, &RouterOptions::default());

    Harness {
        router,
        repos,
        notifier,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be json")
    };
    (status, body)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, Vec<u8>),
}

fn multipart_request(uri: &str, parts: Vec<Part<'_>>) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 90]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

fn project_text_parts() -> Vec<Part<'static>> {
    vec![
        Part::Text("category", "web"),
        Part::Text("description", "A portfolio site"),
        Part::Text("githubRepoLink", "https://github.com/example/folio"),
        Part::Text("deployedLink", "https://folio.example.com"),
    ]
}

async fn stored_projects(repos: &MemoryRepositories) -> Vec<Project> {
    EntityRepo::<Project>::list_all(repos)
        .await
        .expect("list projects")
}

#[tokio::test(start_paused = true)]
async fn review_submission_is_listed_after_the_cache_expires() {
    let h = harness();

    let (status, body) = send(&h.router, empty_request(Method::GET, "/getreviews")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "reviews": [] }));

    let (status, body) = send(
        &h.router,
        json_request(
            Method::POST,
            "/reviews",
            json!({ "name": "Ada", "review": "Great work", "Rating": "5" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Review submitted successfully");

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(
        sent[0]
            .text_body
            .contains("Great work by Ada has given 5 star Rating")
    );

    let (_, body) = send(&h.router, empty_request(Method::GET, "/getreviews")).await;
    assert_eq!(body["reviews"], json!([]), "cached list is served until expiry");

    tokio::time::advance(LIST_TTL + Duration::from_secs(1)).await;

    let (status, body) = send(&h.router, empty_request(Method::GET, "/getreviews")).await;
    assert_eq!(status, StatusCode::OK);
    let reviews = body["reviews"].as_array().expect("reviews array");
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["name"], "Ada");
    assert_eq!(reviews[0]["text"], "Great work");
    assert_eq!(reviews[0]["rating"], 5.0);
    assert!(reviews[0]["id"].is_string());
    assert!(reviews[0]["createdAt"].is_string());
}

#[tokio::test]
async fn review_without_rating_is_rejected() {
    let h = harness();

    let (status, body) = send(
        &h.router,
        json_request(
            Method::POST,
            "/reviews",
            json!({ "name": "Ada", "review": "Great work" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(h.notifier.sent().is_empty());
    let stored = EntityRepo::<Review>::list_all(&h.repos)
        .await
        .expect("list reviews");
    assert!(stored.is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_notification_still_persists_the_review() {
    let h = harness_with(RecordingNotifier::failing(), default_limits());

    let (status, body) = send(
        &h.router,
        json_request(
            Method::POST,
            "/reviews",
            json!({ "name": "Grace", "review": "Solid", "Rating": 4 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let (_, body) = send(&h.router, empty_request(Method::GET, "/getreviews")).await;
    let reviews = body["reviews"].as_array().expect("reviews array");
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["name"], "Grace");
}

#[tokio::test(start_paused = true)]
async fn deleted_review_lingers_until_the_list_expires() {
    let h = harness();
    send(
        &h.router,
        json_request(
            Method::POST,
            "/reviews",
            json!({ "name": "Ada", "review": "Great work", "Rating": 5 }),
        ),
    )
    .await;

    let (_, body) = send(&h.router, empty_request(Method::GET, "/getreviews")).await;
    let id = body["reviews"][0]["id"]
        .as_str()
        .expect("review id")
        .to_string();

    let (status, body) = send(
        &h.router,
        empty_request(Method::DELETE, &format!("/deleteReview/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Review deleted successfully");

    let (_, body) = send(&h.router, empty_request(Method::GET, "/getreviews")).await;
    assert_eq!(body["reviews"].as_array().map(Vec::len), Some(1));

    tokio::time::advance(LIST_TTL + Duration::from_secs(1)).await;
    let (_, body) = send(&h.router, empty_request(Method::GET, "/getreviews")).await;
    assert_eq!(body["reviews"], json!([]));

    let (status, body) = send(
        &h.router,
        empty_request(Method::DELETE, &format!("/deleteReview/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Review not found");
}

#[tokio::test]
async fn malformed_ids_are_not_found() {
    let h = harness();
    for (uri, label) in [
        ("/deleteReview/not-a-uuid", "Review"),
        ("/deleteProject/42", "Project"),
        ("/deleteSkill/xyz", "Skill"),
    ] {
        let (status, body) = send(&h.router, empty_request(Method::DELETE, uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], format!("{label} not found"));
    }
}

#[tokio::test]
async fn contact_is_saved_and_owner_notified() {
    let h = harness();

    let (status, body) = send(
        &h.router,
        json_request(
            Method::POST,
            "/contact",
            json!({
                "Query": "Need a landing page",
                "email": "client@example.com",
                "contact": "+1 555 0100"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Contact details saved successfully");

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Client contact for service");
    assert!(sent[0].text_body.contains("client@example.com"));
}

#[tokio::test]
async fn contact_with_missing_fields_is_rejected() {
    let h = harness();

    let (status, body) = send(
        &h.router,
        json_request(Method::POST, "/contact", json!({ "email": "client@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn project_upload_normalizes_every_image() {
    let h = harness();

    let mut parts = project_text_parts();
    parts.push(Part::File("logo", "logo.png", png(2400, 600)));
    parts.push(Part::File("uiuxImages", "a.png", png(600, 400)));
    parts.push(Part::File("uiuxImages", "b.png", png(300, 900)));

    let (status, body) = send(&h.router, multipart_request("/uploadProject", parts)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Uploading projects successful");

    let (status, body) = send(&h.router, empty_request(Method::GET, "/getProjects")).await;
    assert_eq!(status, StatusCode::OK);
    let projects = body.as_array().expect("projects array");
    assert_eq!(projects.len(), 1);
    let project = &projects[0];
    assert_eq!(project["category"], "web");
    assert_eq!(project["githubRepoLink"], "https://github.com/example/folio");

    let logo = STANDARD
        .decode(project["logo"].as_str().expect("logo base64"))
        .expect("valid base64");
    assert_eq!(
        image::guess_format(&logo).expect("known format"),
        image::ImageFormat::Jpeg
    );
    let decoded = image::load_from_memory(&logo).expect("decodable logo");
    assert_eq!((decoded.width(), decoded.height()), (1200, 300));

    let gallery = project["uiuxImages"].as_array().expect("gallery array");
    let heights: Vec<u32> = gallery
        .iter()
        .map(|entry| {
            let bytes = STANDARD
                .decode(entry.as_str().expect("base64 entry"))
                .expect("valid base64");
            let image = image::load_from_memory(&bytes).expect("decodable gallery image");
            assert_eq!(image.width(), 1200);
            image.height()
        })
        .collect();
    assert_eq!(heights, vec![800, 3600], "gallery keeps upload order");
}

#[tokio::test]
async fn project_without_logo_is_rejected_before_persisting() {
    let h = harness();

    let mut parts = project_text_parts();
    parts.push(Part::File("uiuxImages", "a.png", png(64, 64)));

    let (status, body) = send(&h.router, multipart_request("/uploadProject", parts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Uploading projects failed");
    assert!(body["error"].as_str().is_some_and(|e| e.contains("logo")));
    assert!(stored_projects(&h.repos).await.is_empty());
}

#[tokio::test]
async fn undecodable_gallery_image_fails_the_whole_upload() {
    let h = harness();

    let mut parts = project_text_parts();
    parts.push(Part::File("logo", "logo.png", png(64, 64)));
    parts.push(Part::File("uiuxImages", "a.png", png(64, 64)));
    parts.push(Part::File("uiuxImages", "b.txt", b"definitely not pixels".to_vec()));

    let (status, body) = send(&h.router, multipart_request("/uploadProject", parts)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Uploading projects failed");
    assert!(stored_projects(&h.repos).await.is_empty());
}

#[tokio::test]
async fn oversized_file_is_rejected_with_413() {
    let limits = UploadLimits {
        max_file_bytes: 1024,
        ..default_limits()
    };
    let h = harness_with(RecordingNotifier::default(), limits);

    let mut parts = project_text_parts();
    parts.push(Part::File("logo", "logo.bin", vec![0u8; 4096]));

    let (status, body) = send(&h.router, multipart_request("/uploadProject", parts)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["message"], "Uploading projects failed");
    assert!(stored_projects(&h.repos).await.is_empty());
}

#[tokio::test]
async fn too_many_gallery_images_are_rejected() {
    let h = harness();

    let mut parts = project_text_parts();
    parts.push(Part::File("logo", "logo.png", png(32, 32)));
    for _ in 0..11 {
        parts.push(Part::File("uiuxImages", "shot.png", vec![1, 2, 3]));
    }

    let (status, body) = send(&h.router, multipart_request("/uploadProject", parts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.contains("uiuxImages"))
    );
    assert!(stored_projects(&h.repos).await.is_empty());
}

#[tokio::test]
async fn project_delete_refreshes_the_cached_list() {
    let h = harness();

    let mut parts = project_text_parts();
    parts.push(Part::File("logo", "logo.png", png(32, 32)));
    let (status, _) = send(&h.router, multipart_request("/uploadProject", parts)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&h.router, empty_request(Method::GET, "/getProjects")).await;
    let id = body[0]["id"].as_str().expect("project id").to_string();

    let (status, body) = send(
        &h.router,
        empty_request(Method::DELETE, &format!("/deleteProject/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project deleted successfully");

    let (_, body) = send(&h.router, empty_request(Method::GET, "/getProjects")).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn skill_icon_is_stored_verbatim() {
    let h = harness();
    let icon = b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>".to_vec();

    let (status, body) = send(
        &h.router,
        multipart_request(
            "/uploadSkill",
            vec![
                Part::Text("name", "Rust"),
                Part::Text("experience", "Advanced"),
                Part::Text("duration", "4 years"),
                Part::File("icon", "rust.svg", icon.clone()),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Skill uploaded successfully");

    let skills = EntityRepo::<Skill>::list_all(&h.repos)
        .await
        .expect("list skills");
    assert_eq!(skills.len(), 1);
    assert_eq!(&skills[0].icon[..], icon.as_slice());

    let (_, body) = send(&h.router, empty_request(Method::GET, "/getSkills")).await;
    assert_eq!(body[0]["name"], "Rust");
    assert_eq!(body[0]["icon"], STANDARD.encode(&icon));
}

#[tokio::test]
async fn skill_without_icon_is_rejected() {
    let h = harness();

    let (status, body) = send(
        &h.router,
        multipart_request(
            "/uploadSkill",
            vec![
                Part::Text("name", "Rust"),
                Part::Text("experience", "Advanced"),
                Part::Text("duration", "4 years"),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Uploading skill failed");
}

#[tokio::test]
async fn admin_email_requires_a_seeded_admin() {
    let h = harness();

    let (status, body) = send(&h.router, empty_request(Method::GET, "/getAdmin")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Admin email not found");

    let admins: Arc<dyn AdminRepo> = Arc::new(h.repos.clone());
    AdminService::new(admins)
        .seed_admin("owner@example.com")
        .await
        .expect("seed admin");

    let (status, body) = send(&h.router, empty_request(Method::GET, "/getAdmin")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "email": "owner@example.com" }));
}

#[tokio::test]
async fn guarded_admin_email_checks_the_bearer_token() {
    let h = harness();
    h.repos
        .upsert_admin("owner@example.com")
        .await
        .expect("seed admin");

    let (status, body) = send(&h.router, empty_request(Method::GET, "/getAdminEmail")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let wrong = Request::builder()
        .uri("/getAdminEmail")
        .header(header::AUTHORIZATION, "Bearer nope")
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(&h.router, wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let right = Request::builder()
        .uri("/getAdminEmail")
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(&h.router, right).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "owner@example.com");
}

#[tokio::test]
async fn health_reports_no_content() {
    let h = harness();
    let (status, body) = send(&h.router, empty_request(Method::GET, "/healthz")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let h = harness();
    let response = h
        .router
        .clone()
        .oneshot(empty_request(Method::GET, "/getSkills"))
        .await
        .expect("router should respond");
    assert!(response.headers().contains_key("x-request-id"));

    let request = Request::builder()
        .uri("/getSkills")
        .header("x-request-id", "trace-42")
        .body(Body::empty())
        .expect("request");
    let response = h
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("trace-42")
    );
}

fn raw_request(uri: &str, content_type: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn unreadable_review_bodies_answer_json_errors() {
    let h = harness();
    let cases = [
        raw_request("/reviews", "application/json", "{not json"),
        raw_request(
            "/reviews",
            "application/json",
            r#"{"name": 5, "review": "ok", "Rating": 5}"#,
        ),
        raw_request("/reviews", "text/plain", r#"{"name": "Ada"}"#),
    ];

    for request in cases {
        let (status, body) = send(&h.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string(), "{body}");
    }
    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn unreadable_contact_bodies_answer_json_errors() {
    let h = harness();
    let cases = [
        raw_request("/contact", "application/json", "[1, 2"),
        raw_request("/contact", "text/plain", "Query=hi"),
    ];

    for request in cases {
        let (status, body) = send(&h.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string(), "{body}");
    }
}

#[tokio::test]
async fn tall_sliver_logo_fails_without_persisting() {
    let h = harness();

    let mut parts = project_text_parts();
    parts.push(Part::File("logo", "sliver.png", png(1, 200)));

    let (status, body) = send(&h.router, multipart_request("/uploadProject", parts)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Uploading projects failed");
    assert!(stored_projects(&h.repos).await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn project_upload_is_hidden_until_the_list_expires() {
    let h = harness();

    let (_, body) = send(&h.router, empty_request(Method::GET, "/getProjects")).await;
    assert_eq!(body, json!([]));

    let mut parts = project_text_parts();
    parts.push(Part::File("logo", "logo.png", png(16, 16)));
    let (status, _) = send(&h.router, multipart_request("/uploadProject", parts)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored_projects(&h.repos).await.len(), 1);

    let (_, body) = send(&h.router, empty_request(Method::GET, "/getProjects")).await;
    assert_eq!(body, json!([]), "create does not invalidate the cached list");

    tokio::time::advance(LIST_TTL + Duration::from_secs(1)).await;
    let (_, body) = send(&h.router, empty_request(Method::GET, "/getProjects")).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test(start_paused = true)]
async fn skill_upload_is_hidden_until_the_list_expires() {
    let h = harness();

    let (_, body) = send(&h.router, empty_request(Method::GET, "/getSkills")).await;
    assert_eq!(body, json!([]));

    let (status, _) = send(
        &h.router,
        multipart_request(
            "/uploadSkill",
            vec![
                Part::Text("name", "Go"),
                Part::File("icon", "go.svg", b"<svg/>".to_vec()),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&h.router, empty_request(Method::GET, "/getSkills")).await;
    assert_eq!(body, json!([]));

    tokio::time::advance(LIST_TTL + Duration::from_secs(1)).await;
    let (_, body) = send(&h.router, empty_request(Method::GET, "/getSkills")).await;
    assert_eq!(body[0]["name"], "Go");
}

#[tokio::test]
async fn skill_delete_refreshes_the_cached_list() {
    let h = harness();

    let (status, _) = send(
        &h.router,
        multipart_request(
            "/uploadSkill",
            vec![
                Part::Text("name", "Rust"),
                Part::File("icon", "rust.svg", b"<svg/>".to_vec()),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&h.router, empty_request(Method::GET, "/getSkills")).await;
    let id = body[0]["id"].as_str().expect("skill id").to_string();

    let (status, body) = send(
        &h.router,
        empty_request(Method::DELETE, &format!("/deleteSkill/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Skill deleted successfully");

    let (_, body) = send(&h.router, empty_request(Method::GET, "/getSkills")).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn unknown_well_formed_ids_are_not_found() {
    let h = harness();
    let missing = uuid::Uuid::new_v4();
    for (path, label) in [("deleteProject", "Project"), ("deleteSkill", "Skill")] {
        let (status, body) = send(
            &h.router,
            empty_request(Method::DELETE, &format!("/{path}/{missing}")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(body["error"], format!("{label} not found"));
    }
}
