//! Shared helpers for router-level tests.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`
//! against the in-memory account store.

#![allow(dead_code)]

use auth::{AuthConfig, AuthContext, InMemoryAccountRepository, auth_router_generic};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use platform::password::HashCost;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ACCESS_SECRET: &str = "test-access-secret";
pub const REFRESH_SECRET: &str = "test-refresh-secret";
pub const COOKIE_NAME: &str = "refreshToken";

pub fn test_config() -> AuthConfig {
    AuthConfig {
        hash_cost: HashCost::minimal(),
        cookie_secure: false,
        ..AuthConfig::with_secrets(ACCESS_SECRET, REFRESH_SECRET)
    }
}

pub struct TestApp {
    pub router: Router,
    pub repo: InMemoryAccountRepository,
    pub config: AuthConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AuthConfig) -> Self {
        Self::with_repo(InMemoryAccountRepository::new(), config)
    }

    pub fn with_repo(repo: InMemoryAccountRepository, config: AuthConfig) -> Self {
        let ctx = AuthContext::new(config.clone()).expect("test config is valid");
        Self {
            router: auth_router_generic(repo.clone(), ctx),
            repo,
            config,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> TestResponse {
        self.send(post_json(
            "/auth/register",
            json!({ "name": name, "email": email, "password": password }),
        ))
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.send(post_json(
            "/auth/login",
            json!({ "email": email, "password": password }),
        ))
        .await
    }

    pub async fn refresh(&self, refresh_token: Option<&str>) -> TestResponse {
        self.send(post_with_cookie("/auth/refresh", refresh_token)).await
    }

    pub async fn logout(&self, refresh_token: Option<&str>) -> TestResponse {
        self.send(post_with_cookie("/auth/logout", refresh_token)).await
    }

    pub async fn profile(&self, access_token: &str) -> TestResponse {
        self.send(
            Request::get("/user/profile")
                .header(header::AUTHORIZATION, format!("Bearer {access_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn access_token(&self) -> String {
        self.body["tokens"]["accessToken"]
            .as_str()
            .expect("accessToken in body")
            .to_string()
    }

    /// Raw `Set-Cookie` header for the refresh cookie, if one was sent.
    pub fn refresh_set_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&format!("{COOKIE_NAME}=")))
            .map(str::to_string)
    }

    /// Value of the refresh cookie set by this response.
    pub fn refresh_token(&self) -> String {
        let set_cookie = self.refresh_set_cookie().expect("refresh cookie set");
        let pair = set_cookie.split(';').next().unwrap_or_default();
        pair.trim_start_matches(&format!("{COOKIE_NAME}="))
            .to_string()
    }

    pub fn cookie_cleared(&self) -> bool {
        self.refresh_set_cookie()
            .is_some_and(|c| c.starts_with(&format!("{COOKIE_NAME}=;")) && c.contains("Max-Age=0"))
    }

    pub fn detail(&self) -> &str {
        self.body["detail"].as_str().unwrap_or_default()
    }
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_with_cookie(uri: &str, refresh_token: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri);
    if let Some(token) = refresh_token {
        builder = builder.header(header::COOKIE, format!("{COOKIE_NAME}={token}"));
    }
    builder.body(Body::empty()).unwrap()
}
