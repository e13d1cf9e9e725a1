//! Common test utilities for integration tests
//!
//! - Fresh migrated in-memory database per test
//! - Router built over that database
//! - Request helpers that return status, headers and parsed JSON
//! - Sign-up + login helper returning a session cookie

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use minishop_api::{
    app::{build_router, AppState},
    config::Config,
};
use minishop_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig},
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub state: AppState,
    pub app: Router,
}

/// Response pieces the tests look at
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestContext {
    /// Creates a new test context over a private in-memory database
    pub async fn new() -> anyhow::Result<Self> {
        let db = create_pool(DatabaseConfig::in_memory()).await?;
        run_migrations(&db).await?;

        let state = AppState::new(db.clone(), Config::default());
        let app = build_router(state.clone());

        Ok(TestContext { db, state, app })
    }

    /// Sends a request through the router
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// Sends a prebuilt request
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, None, cookie).await
    }

    pub async fn post(&self, uri: &str, body: Option<Value>, cookie: Option<&str>) -> TestResponse {
        self.request(Method::POST, uri, body, cookie).await
    }

    pub async fn put(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.request(Method::PUT, uri, Some(body), cookie).await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, None, cookie).await
    }

    /// Creates a user through the API
    pub async fn signup(&self, username: &str, password: &str) -> i64 {
        let response = self
            .post(
                "/api/user/add",
                Some(json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().unwrap()
    }

    /// Logs in and returns the `name=value` cookie pair
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post(
                "/login",
                Some(json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        session_cookie(&response.headers).expect("login should set a session cookie")
    }

    /// Signs up and logs in a fresh user
    pub async fn login_as(&self, username: &str) -> String {
        self.signup(username, "password").await;
        self.login(username, "password").await
    }

    /// Adds a product with an authenticated request, returning its ID
    pub async fn add_product(&self, cookie: &str, body: Value) -> i64 {
        let response = self.post("/api/products/add", Some(body), Some(cookie)).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().unwrap()
    }
}

/// Extracts the session cookie pair from `Set-Cookie`
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| cookie::Cookie::parse(v.to_string()).ok())
        .find(|c| c.name() == "minishop_session")
        .map(|c| format!("{}={}", c.name(), c.value()))
}
