//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full
//! axum router, plus utilities for user creation and JWT generation.
//!
//! ## Shared Resources
//!
//! Use [`try_test_app()`] to get an app backed by a shared connection pool.
//! It returns `None` when `AMORA_TEST_DATABASE_URL` is not set, so DB-backed
//! tests skip themselves on machines without the test container.
//!
//! ## Cleanup Guards
//!
//! Use [`CleanupGuard`] for RAII-based cleanup that runs even if a test
//! panics. Deleting a user cascades to their likes and messages.
#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use amora_server::api::{create_router, AppState};
use amora_server::auth::jwt;
use amora_server::config::Config;
use amora_server::db;
use axum::body::Body;
use axum::http::{self, Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tower::ServiceExt;
use uuid::Uuid;

// ============================================================================
// Shared resources
// ============================================================================

/// Shared database pool across all tests in the same binary.
static SHARED_POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Shared config across all tests in the same binary.
static SHARED_CONFIG: OnceCell<Config> = OnceCell::const_new();

/// Get or create a shared config.
pub async fn shared_config() -> &'static Config {
    SHARED_CONFIG
        .get_or_init(|| async { Config::default_for_test() })
        .await
}

/// Get or create a shared database pool with migrations applied.
///
/// Reuses a single pool across all test cases in the same binary,
/// avoiding connection exhaustion from creating pools per-test.
pub async fn shared_pool() -> &'static PgPool {
    SHARED_POOL
        .get_or_init(|| async {
            let config = shared_config().await;
            let pool = db::create_pool(&config.database_url)
                .await
                .expect("Failed to connect to test DB");
            db::run_migrations(&pool)
                .await
                .expect("Failed to run migrations on test DB");
            pool
        })
        .await
}

// ============================================================================
// Cleanup Guard
// ============================================================================

/// Async cleanup action type.
type CleanupAction = Box<dyn FnOnce(PgPool) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

/// RAII guard that runs cleanup actions on drop, even if the test panics.
pub struct CleanupGuard {
    pool: PgPool,
    actions: Vec<CleanupAction>,
}

impl CleanupGuard {
    /// Create a new cleanup guard for the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            actions: Vec::new(),
        }
    }

    /// Register a generic async cleanup action.
    pub fn add<F, Fut>(&mut self, action: F)
    where
        F: FnOnce(PgPool) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.actions
            .push(Box::new(move |pool| Box::pin(action(pool))));
    }

    /// Register cleanup to delete a user by ID.
    ///
    /// Likes and messages reference users with `ON DELETE CASCADE`, so this
    /// removes everything a test created through that user.
    pub fn delete_user(&mut self, user_id: Uuid) {
        self.add(move |pool| async move {
            let _ = sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(user_id)
                .execute(&pool)
                .await;
        });
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let actions = std::mem::take(&mut self.actions);
        if actions.is_empty() {
            return;
        }

        let pool = self.pool.clone();
        let handle = tokio::runtime::Handle::current();

        // Spawn a blocking thread to run async cleanup.
        // This works regardless of tokio runtime flavor.
        std::thread::spawn(move || {
            handle.block_on(async move {
                for action in actions {
                    action(pool.clone()).await;
                }
            });
        })
        .join()
        .expect("Cleanup thread panicked");
    }
}

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub config: Arc<Config>,
}

impl TestApp {
    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// Create a [`CleanupGuard`] for this app's pool.
    pub fn cleanup_guard(&self) -> CleanupGuard {
        CleanupGuard::new(self.pool.clone())
    }
}

/// Build a [`TestApp`] over the shared pool, or `None` when no test
/// database is configured.
///
/// Tests should early-return on `None`:
///
/// ```ignore
/// let Some(app) = try_test_app().await else { return };
/// ```
pub async fn try_test_app() -> Option<TestApp> {
    if std::env::var("AMORA_TEST_DATABASE_URL").is_err() {
        eprintln!("skipping: AMORA_TEST_DATABASE_URL not set");
        return None;
    }

    let pool = shared_pool().await.clone();
    let config = shared_config().await.clone();

    let state = AppState::new(pool.clone(), config.clone());
    let router = create_router(state);

    Some(TestApp {
        router,
        pool,
        config: Arc::new(config),
    })
}

// ============================================================================
// User & Auth helpers
// ============================================================================

/// Create a test user and return `(user_id, username)`.
pub async fn create_test_user(pool: &PgPool) -> (Uuid, String) {
    let test_id = Uuid::now_v7().simple().to_string();
    let username = format!("httptest_{}", &test_id[test_id.len() - 12..]);
    let date_of_birth = NaiveDate::from_ymd_opt(1990, 6, 15).expect("valid date");

    let user = db::create_user(
        pool,
        &username,
        "HTTP Test User",
        date_of_birth,
        "Lisbon",
        Some("https://example.test/photo.png"),
    )
    .await
    .expect("Failed to create test user");

    (user.id, username)
}

/// Generate a valid access token for a user.
pub fn generate_access_token(config: &Config, user_id: Uuid) -> String {
    jwt::issue_access_token(user_id, &config.jwt_secret, config.jwt_access_expiry)
        .expect("Failed to issue test token")
}

/// Collect a response body into JSON.
pub async fn body_to_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect body")
        .to_bytes();

    if bytes.is_empty() {
        return serde_json::Value::Null;
    }

    serde_json::from_slice(&bytes).expect("Response body was not valid JSON")
}

/// Parse the `Pagination` header of a response.
pub fn pagination_header(response: &Response<Body>) -> Option<serde_json::Value> {
    response
        .headers()
        .get("Pagination")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| serde_json::from_str(v).ok())
}
