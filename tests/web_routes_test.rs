//! Integration tests for web routes, driven through the real router.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use khamsa_blog::config::Config;
use khamsa_blog::db::{self, Database};
use khamsa_blog::posts::{PostCollection, PostDraft};
use khamsa_blog::web::{create_app, run_until, AppState};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

const ADMIN_PASSWORD: &str = "open-sesame";
const BOUNDARY: &str = "khamsa-test-boundary";

struct TestApp {
    app: Router,
    state: AppState,
    dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = Config {
            site_name: "Khamsa Travels".to_string(),
            secret_key: "integration-test-secret".to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
            session_ttl: Duration::from_secs(3600),
            secure_cookies: false,
            database_path: dir.path().join("blog.sqlite"),
            posts_path: dir.path().join("posts.json"),
            static_dir: dir.path().join("static"),
            max_upload_bytes: 1024 * 1024,
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
        };
        let db = Database::new(&config.database_path).await.unwrap();
        let state = AppState::new(config, db);

        Self {
            app: create_app(state.clone()),
            state,
            dir,
        }
    }

    /// A second app state over the same stores with a tweaked configuration.
    fn state_with(&self, tweak: impl FnOnce(&mut Config)) -> AppState {
        let mut config = (*self.state.config).clone();
        tweak(&mut config);
        AppState::new(config, self.state.db.clone())
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn post_multipart(&self, uri: &str, body: Vec<u8>, cookie: &str) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header(header::COOKIE, cookie)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Log in and return a `Cookie` header value carrying the session.
    async fn login(&self) -> String {
        let response = self
            .post_form("/login", &format!("password={ADMIN_PASSWORD}"), None)
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin");

        set_cookies(&response)
            .into_iter()
            .find(|c| c.starts_with("session="))
            .and_then(|c| c.split(';').next().map(str::to_string))
            .expect("login should set a session cookie")
    }

    async fn seed_post(&self, title: &str, content: &str, published: bool, hours: i64) {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::hours(hours);
        let draft = PostDraft::from_form(title, content, published);
        self.state
            .posts
            .modify(|posts| Some(posts.insert(draft, None, created_at)))
            .await
            .unwrap();
    }

    async fn posts(&self) -> PostCollection {
        self.state.posts.load().await.unwrap()
    }

    fn uploads(&self) -> Vec<String> {
        std::fs::read_dir(self.dir.path().join("static").join("uploads"))
            .map(|entries| {
                entries
                    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// The `flash=...` pair from a redirect, ready to send back as a cookie.
fn flash_cookie(response: &Response<Body>) -> String {
    set_cookies(response)
        .into_iter()
        .find(|c| c.starts_with("flash="))
        .and_then(|c| c.split(';').next().map(str::to_string))
        .expect("response should set a flash cookie")
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn multipart_body(fields: &[(&str, &str)], cover: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = cover {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"cover\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

// ========== Public pages ==========

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new().await;

    let response = app.get("/healthz", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn test_home_empty() {
    let app = TestApp::new().await;

    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No posts yet."));

    // The post document is created on first load.
    assert!(app.dir.path().join("posts.json").exists());
}

#[tokio::test]
async fn test_search_respects_visibility() {
    let app = TestApp::new().await;
    app.seed_post("Hello World", "A first look at Marrakech.", true, 1)
        .await;
    app.seed_post("Draft world notes", "Unfinished thoughts here.", false, 2)
        .await;
    app.seed_post("Desert camp", "Nights under the stars.", true, 3)
        .await;

    let anon = body_text(app.get("/?q=WORLD", None).await).await;
    assert!(anon.contains("Hello World"));
    assert!(!anon.contains("Draft world notes"));
    assert!(!anon.contains("Desert camp"));

    let cookie = app.login().await;
    let admin = body_text(app.get("/?q=world", Some(&cookie)).await).await;
    assert!(admin.contains("Hello World"));
    assert!(admin.contains("Draft world notes"));
    assert!(!admin.contains("Desert camp"));
}

#[tokio::test]
async fn test_listing_pagination() {
    let app = TestApp::new().await;
    for i in 1..=13 {
        app.seed_post(&format!("Trip {i:02}"), "Long enough body text.", true, i)
            .await;
    }

    let page1 = body_text(app.get("/", None).await).await;
    assert_eq!(page1.matches(r#"class="post-card""#).count(), 6);
    assert!(page1.contains("Trip 13"));
    assert!(page1.contains("Trip 08"));
    assert!(!page1.contains("Trip 07"));
    assert!(page1.contains(r#"href="/?page=3""#));

    let page3 = body_text(app.get("/?page=3", None).await).await;
    assert_eq!(page3.matches(r#"class="post-card""#).count(), 1);
    assert!(page3.contains("Trip 01"));

    // Unusable page numbers fall back to the first page.
    let fallback = body_text(app.get("/?page=banana", None).await).await;
    assert!(fallback.contains("Trip 13"));
}

#[tokio::test]
async fn test_view_post_visibility() {
    let app = TestApp::new().await;
    app.seed_post("Blue city", "Chefchaouen in the spring.", true, 1)
        .await;
    app.seed_post("Secret draft", "Not ready for readers.", false, 2)
        .await;

    let response = app.get("/post/blue-city", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Chefchaouen in the spring."));

    let response = app.get("/post/secret-draft", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/post/no-such-post", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let cookie = app.login().await;
    let response = app.get("/post/secret-draft", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_flash_shown_once() {
    let app = TestApp::new().await;

    let response = app
        .post_form("/feedback", "name=Amina&message=Lovely+blog", None)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let flash = flash_cookie(&response);

    let response = app.get("/", Some(&flash)).await;
    assert!(set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("flash=;") && c.contains("Max-Age=0")));
    assert!(body_text(response).await.contains("Thanks for your feedback!"));
}

// ========== Feedback ==========

#[tokio::test]
async fn test_feedback_rating_coercion() {
    let app = TestApp::new().await;
    let pool = app.state.db.pool();

    app.post_form("/feedback", "name=Amina&rating=7&message=Great+trip", None)
        .await;
    app.post_form(
        "/feedback",
        "name=Omar&email=omar%40example.com&rating=4&message=Nice+photos",
        None,
    )
    .await;

    let page = db::list_feedbacks_page(pool, 1, 12).await.unwrap();
    assert_eq!(page.total, 2);
    let amina = page.items.iter().find(|f| f.name == "Amina").unwrap();
    let omar = page.items.iter().find(|f| f.name == "Omar").unwrap();
    assert_eq!(amina.rating, None);
    assert_eq!(amina.email, None);
    assert_eq!(omar.rating, Some(4));
    assert_eq!(omar.email.as_deref(), Some("omar@example.com"));
}

#[tokio::test]
async fn test_feedback_missing_message_rejected() {
    let app = TestApp::new().await;

    let response = app.post_form("/feedback", "name=Amina&rating=5", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/feedback");

    let flash = flash_cookie(&response);
    let page = body_text(app.get("/feedback", Some(&flash)).await).await;
    assert!(page.contains("Please provide your name and a valid message."));

    assert_eq!(db::count_feedbacks(app.state.db.pool()).await.unwrap(), 0);
}

// ========== Auth ==========

#[tokio::test]
async fn test_admin_routes_require_login() {
    let app = TestApp::new().await;

    for uri in ["/admin", "/admin/new", "/admin/feedbacks", "/admin/edit/1"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login", "{uri}");
    }

    let response = app.post_form("/admin/delete/1", "", None).await;
    assert_eq!(location(&response), "/login");

    let response = app
        .get("/admin", Some("session=made-up-token"))
        .await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_wrong_password() {
    let app = TestApp::new().await;

    let response = app.post_form("/login", "password=guess", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("session=")));
    assert!(body_text(response).await.contains("Wrong password."));
}

#[tokio::test]
async fn test_login_logout_cycle() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let response = app.get("/admin", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Already logged in: the login page bounces to the dashboard.
    let response = app.get("/login", Some(&cookie)).await;
    assert_eq!(location(&response), "/admin");

    let response = app.get("/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("session=;") && c.contains("Max-Age=0")));

    // The server-side session is gone even if the browser replays the cookie.
    let response = app.get("/admin", Some(&cookie)).await;
    assert_eq!(location(&response), "/login");
}

// ========== Admin post CRUD ==========

#[tokio::test]
async fn test_create_post_unpublished() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let body = multipart_body(
        &[
            ("title", "Hello World!"),
            ("content", "This is a long enough post body."),
        ],
        Some(("", b"")),
    );
    let response = app.post_multipart("/admin/new", body, &cookie).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");

    let posts = app.posts().await;
    assert_eq!(posts.len(), 1);
    let post = posts.find_by_id(1).unwrap();
    assert_eq!(post.slug, "hello-world");
    assert!(!post.published);
    assert_eq!(post.cover_image, "");
    assert!(app.uploads().is_empty());
}

#[tokio::test]
async fn test_create_post_duplicate_title_gets_suffix() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    for _ in 0..2 {
        let body = multipart_body(
            &[
                ("title", "Atlas Mountains"),
                ("content", "Trekking to Toubkal summit."),
                ("published", "on"),
            ],
            None,
        );
        app.post_multipart("/admin/new", body, &cookie).await;
    }

    let posts = app.posts().await;
    let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["atlas-mountains", "atlas-mountains-2"]);
    assert!(posts.iter().all(|p| p.published));
}

#[tokio::test]
async fn test_create_post_validation_writes_nothing() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let body = multipart_body(
        &[("title", "Too short"), ("content", "tiny")],
        Some(("photo.png", b"\x89PNG not really")),
    );
    let response = app.post_multipart("/admin/new", body, &cookie).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/new");

    assert!(app.posts().await.is_empty());
    assert!(app.uploads().is_empty());
}

#[tokio::test]
async fn test_create_post_with_cover() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let body = multipart_body(
        &[
            ("title", "Essaouira"),
            ("content", "Windy beaches and blue boats."),
            ("published", "on"),
        ],
        Some(("harbour photo.JPG", b"jpeg bytes")),
    );
    app.post_multipart("/admin/new", body, &cookie).await;

    let posts = app.posts().await;
    let post = posts.find_by_slug("essaouira").unwrap();
    assert!(post.cover_image.ends_with(".jpg"));
    assert_eq!(app.uploads(), vec![post.cover_image.clone()]);

    let response = app.get("/post/essaouira", None).await;
    let html = body_text(response).await;
    assert!(html.contains(&format!("/static/uploads/{}", post.cover_image)));

    let response = app
        .get(&format!("/static/uploads/{}", post.cover_image), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "jpeg bytes");
}

#[tokio::test]
async fn test_create_post_rejected_cover() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let body = multipart_body(
        &[
            ("title", "Fes"),
            ("content", "Tanneries and the medina."),
            ("published", "on"),
        ],
        Some(("animation.gif", b"GIF89a")),
    );
    let response = app.post_multipart("/admin/new", body, &cookie).await;
    let flash = flash_cookie(&response);

    let posts = app.posts().await;
    assert_eq!(posts.find_by_slug("fes").unwrap().cover_image, "");
    assert!(app.uploads().is_empty());

    let dashboard = body_text(
        app.get("/admin", Some(&format!("{cookie}; {flash}")))
            .await,
    )
    .await;
    assert!(dashboard.contains("Only JPG/PNG/WEBP images are allowed."));
    assert!(dashboard.contains("Post created."));
}

#[tokio::test]
async fn test_edit_post_keeps_cover_and_recomputes_slug() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let body = multipart_body(
        &[
            ("title", "Sahara"),
            ("content", "Camel trek to Erg Chebbi."),
            ("published", "on"),
        ],
        Some(("dunes.webp", b"webp bytes")),
    );
    app.post_multipart("/admin/new", body, &cookie).await;
    let original = app.posts().await.find_by_id(1).unwrap().clone();

    let form = body_text(app.get("/admin/edit/1", Some(&cookie)).await).await;
    assert!(form.contains(r#"value="Sahara""#));

    let body = multipart_body(
        &[
            ("title", "Sahara at Night"),
            ("content", "Camel trek to Erg Chebbi, then stars."),
        ],
        Some(("", b"")),
    );
    let response = app.post_multipart("/admin/edit/1", body, &cookie).await;
    assert_eq!(location(&response), "/admin");

    let posts = app.posts().await;
    let edited = posts.find_by_id(1).unwrap();
    assert_eq!(edited.slug, "sahara-at-night");
    assert_eq!(edited.cover_image, original.cover_image);
    assert_eq!(edited.created_at, original.created_at);
    assert!(!edited.published);
}

#[tokio::test]
async fn test_edit_invalid_redirects_back() {
    let app = TestApp::new().await;
    app.seed_post("Rabat", "Kasbah of the Udayas.", true, 1).await;
    let cookie = app.login().await;

    let body = multipart_body(&[("title", ""), ("content", "Kasbah of the Udayas.")], None);
    let response = app.post_multipart("/admin/edit/1", body, &cookie).await;
    assert_eq!(location(&response), "/admin/edit/1");
    assert_eq!(app.posts().await.find_by_id(1).unwrap().title, "Rabat");

    let body = multipart_body(&[("title", "Ghost"), ("content", "Nobody home here.")], None);
    let response = app.post_multipart("/admin/edit/99", body, &cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_post() {
    let app = TestApp::new().await;
    app.seed_post("Tangier", "Gateway to Africa.", true, 1).await;
    let cookie = app.login().await;

    let response = app.post_form("/admin/delete/42", "", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.posts().await.len(), 1);

    let response = app.post_form("/admin/delete/1", "", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
    assert!(app.posts().await.is_empty());
}

// ========== Admin feedback ==========

#[tokio::test]
async fn test_admin_feedback_list_and_delete() {
    let app = TestApp::new().await;
    for i in 0..13 {
        app.post_form(
            "/feedback",
            &format!("name=Visitor+{i}&message=Message+number+{i}"),
            None,
        )
        .await;
    }
    let cookie = app.login().await;

    let page1 = body_text(app.get("/admin/feedbacks", Some(&cookie)).await).await;
    assert_eq!(page1.matches("/admin/feedbacks/delete/").count(), 12);
    assert!(page1.contains("13 total"));

    let page2 = body_text(app.get("/admin/feedbacks?page=2", Some(&cookie)).await).await;
    assert_eq!(page2.matches("/admin/feedbacks/delete/").count(), 1);

    let response = app
        .post_form("/admin/feedbacks/delete/1", "", Some(&cookie))
        .await;
    assert_eq!(location(&response), "/admin/feedbacks");
    assert_eq!(db::count_feedbacks(app.state.db.pool()).await.unwrap(), 12);

    // Deleting again is not an error.
    let response = app
        .post_form("/admin/feedbacks/delete/1", "", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(db::count_feedbacks(app.state.db.pool()).await.unwrap(), 12);
}

// ========== Server lifecycle ==========

#[tokio::test]
async fn test_server_bind_failure_is_reported() {
    let app = TestApp::new().await;
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();
    let state = app.state_with(|config| config.web_port = port);

    let shutdown = CancellationToken::new();
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        run_until(state, shutdown.clone(), std::future::pending()),
    )
    .await
    .expect("a server that cannot bind should return instead of waiting for a signal");

    assert!(result.is_err());
    assert!(shutdown.is_cancelled());
}

#[tokio::test]
async fn test_server_stops_on_signal() {
    let app = TestApp::new().await;
    let state = app.state_with(|_| {});

    let shutdown = CancellationToken::new();
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        run_until(
            state,
            shutdown.clone(),
            tokio::time::sleep(Duration::from_millis(50)),
        ),
    )
    .await
    .unwrap();

    assert!(result.is_ok());
    assert!(shutdown.is_cancelled());
}

#[tokio::test]
async fn test_huge_upload_limit() {
    let app = TestApp::new().await;
    let router = create_app(app.state_with(|config| config.max_upload_bytes = usize::MAX));

    let response = router
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
