//! Registration, login and profile flows through the full router.

mod common;

use std::collections::HashSet;

use auth::application::TokenIssuer;
use auth::domain::TokenKind;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{TestApp, post_json};
use serde_json::json;

const PASSWORD: &str = "Passw0rdX";

mod register_tests {
    use super::*;

    #[tokio::test]
    async fn register_returns_account_tokens_and_cookie() {
        let app = TestApp::new();
        let res = app.register("Ann", "Ann@Example.com", PASSWORD).await;

        assert_eq!(res.status, StatusCode::CREATED);
        assert_eq!(res.body["user"]["name"], "Ann");
        assert_eq!(res.body["user"]["email"], "ann@example.com");
        assert!(res.body["user"]["id"].is_string());
        assert!(res.body["user"]["createdAt"].is_string());
        assert!(res.body["user"].get("passwordHash").is_none());
        assert!(res.body["user"].get("tokenVersion").is_none());
        assert_eq!(res.body["tokens"]["expiresIn"], "15m");

        let cookie = res.refresh_set_cookie().expect("refresh cookie");
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/"));
        assert!(!res.refresh_token().is_empty());
        assert_eq!(app.repo.len().await, 1);
    }

    #[tokio::test]
    async fn issued_tokens_name_the_new_account_at_version_zero() {
        let app = TestApp::new();
        let res = app.register("Ann", "ann@example.com", PASSWORD).await;
        let issuer = TokenIssuer::from_config(&app.config);

        let access = issuer
            .verify(&res.access_token(), TokenKind::Access)
            .expect("access token verifies");
        let refresh = issuer
            .verify(&res.refresh_token(), TokenKind::Refresh)
            .expect("refresh token verifies");

        let id = res.body["user"]["id"].as_str().unwrap();
        assert_eq!(access.account_id.to_string(), id);
        assert_eq!(refresh.account_id.to_string(), id);
        assert_eq!(access.claims.token_version.value(), 0);
        assert_eq!(refresh.claims.token_version.value(), 0);
        assert_eq!(access.claims.exp - access.claims.iat, 15 * 60);
        assert_eq!(refresh.claims.exp - refresh.claims.iat, 7 * 24 * 60 * 60);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_regardless_of_case() {
        let app = TestApp::new();
        assert_eq!(
            app.register("Ann", "ann@example.com", PASSWORD).await.status,
            StatusCode::CREATED
        );

        let res = app.register("Other", "  ANN@example.COM ", PASSWORD).await;
        assert_eq!(res.status, StatusCode::CONFLICT);
        assert_eq!(res.detail(), "Email already in use.");
        assert!(res.refresh_set_cookie().is_none());
        assert_eq!(app.repo.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicates_create_exactly_one_account() {
        let app = std::sync::Arc::new(TestApp::new());

        let mut handles = Vec::new();
        for i in 0..8 {
            let app = app.clone();
            handles.push(tokio::spawn(async move {
                app.register(&format!("User {i}"), "race@example.com", PASSWORD)
                    .await
                    .status
            }));
        }

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                StatusCode::CREATED => created += 1,
                StatusCode::CONFLICT => conflicts += 1,
                other => panic!("unexpected status {other}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(conflicts, 7);
        assert_eq!(app.repo.len().await, 1);
    }

    #[tokio::test]
    async fn invalid_fields_are_reported_together() {
        let app = TestApp::new();
        let res = app.register("A", "not-an-email", "short").await;

        assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(res.detail(), "Validation failed.");

        let fields: HashSet<&str> = res.body["errors"]
            .as_array()
            .expect("errors array")
            .iter()
            .filter_map(|e| e["field"].as_str())
            .collect();
        assert!(fields.contains("name"));
        assert!(fields.contains("email"));
        assert!(fields.contains("password"));
        assert!(app.repo.is_empty().await);
    }

    #[tokio::test]
    async fn missing_fields_are_validation_errors() {
        let app = TestApp::new();
        let res = app
            .send(post_json("/auth/register", json!({ "email": "ann@example.com" })))
            .await;

        assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
        let errors = res.body["errors"].as_array().unwrap();
        assert!(errors.iter().any(|e| e["field"] == "name"));
        assert!(errors.iter().any(|e| e["field"] == "password"));
    }

    #[tokio::test]
    async fn weak_password_lists_each_rule() {
        let app = TestApp::new();
        let res = app.register("Ann", "ann@example.com", "alllowercase").await;

        assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
        let password_errors = res.body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|e| e["field"] == "password")
            .count();
        // uppercase and digit
        assert_eq!(password_errors, 2);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let app = TestApp::new();
        let res = app
            .send(
                Request::post("/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"name\": "))
                    .unwrap(),
            )
            .await;

        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["status"], 400);
    }
}

mod login_tests {
    use super::*;

    #[tokio::test]
    async fn login_with_valid_credentials() {
        let app = TestApp::new();
        let registered = app.register("Ann", "ann@example.com", PASSWORD).await;

        let res = app.login("ANN@example.com", PASSWORD).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body["user"]["id"], registered.body["user"]["id"]);
        assert!(!res.access_token().is_empty());
        assert!(!res.refresh_token().is_empty());
        assert_ne!(res.access_token(), registered.access_token());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let app = TestApp::new();
        app.register("Ann", "ann@example.com", PASSWORD).await;

        let wrong_password = app.login("ann@example.com", "Wr0ngPassword").await;
        let unknown_email = app.login("nobody@example.com", PASSWORD).await;

        assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.body, unknown_email.body);
        assert_eq!(wrong_password.detail(), "Invalid credentials.");
        assert!(wrong_password.refresh_set_cookie().is_none());
    }

    #[tokio::test]
    async fn oversized_password_is_rejected_as_invalid_credentials() {
        let app = TestApp::new();
        app.register("Ann", "ann@example.com", PASSWORD).await;

        let res = app.login("ann@example.com", &"A1a".repeat(100)).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_login_body_is_unprocessable() {
        let app = TestApp::new();
        let res = app.login("not-an-email", "").await;

        assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(res.body["errors"].as_array().is_some_and(|e| !e.is_empty()));
    }
}

mod profile_tests {
    use super::*;

    #[tokio::test]
    async fn register_login_profile_logout_profile() {
        let app = TestApp::new();
        app.register("Ann", "ann@example.com", PASSWORD).await;

        let login = app.login("ann@example.com", PASSWORD).await;
        assert_eq!(login.status, StatusCode::OK);
        let access = login.access_token();

        let profile = app.profile(&access).await;
        assert_eq!(profile.status, StatusCode::OK);
        assert_eq!(profile.body["email"], "ann@example.com");
        assert_eq!(profile.body["name"], "Ann");

        let logout = app.logout(Some(&login.refresh_token())).await;
        assert_eq!(logout.status, StatusCode::OK);
        assert_eq!(logout.body["message"], "Logged out successfully.");
        assert!(logout.cookie_cleared());

        let after = app.profile(&access).await;
        assert_eq!(after.status, StatusCode::UNAUTHORIZED);
        assert_eq!(after.detail(), "Invalid credentials.");
    }

    #[tokio::test]
    async fn missing_or_malformed_authorization_is_rejected() {
        let app = TestApp::new();

        let missing = app
            .send(Request::get("/user/profile").body(Body::empty()).unwrap())
            .await;
        let wrong_scheme = app
            .send(
                Request::get("/user/profile")
                    .header(header::AUTHORIZATION, "Basic abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        let garbage = app.profile("not.a.jwt").await;

        for res in [&missing, &wrong_scheme, &garbage] {
            assert_eq!(res.status, StatusCode::UNAUTHORIZED);
            assert_eq!(res.body, missing.body);
        }
    }

    #[tokio::test]
    async fn refresh_token_is_not_accepted_as_bearer() {
        let app = TestApp::new();
        let res = app.register("Ann", "ann@example.com", PASSWORD).await;

        let profile = app.profile(&res.refresh_token()).await;
        assert_eq!(profile.status, StatusCode::UNAUTHORIZED);
    }
}

mod misc_tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_ok() {
        let app = TestApp::new();
        let res = app
            .send(Request::get("/health").body(Body::empty()).unwrap())
            .await;

        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn unknown_route_names_method_and_path() {
        let app = TestApp::new();
        let res = app
            .send(Request::delete("/nope/here").body(Body::empty()).unwrap())
            .await;

        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.detail(), "Route DELETE /nope/here not found.");
    }
}
