// Handlers module
// One submodule per deployed function, plus the router that hosts them

pub mod leads;
pub mod notice;
pub mod proposals;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{any, get, post},
    Router,
};

use crate::{config::Config, db::Database, middleware::create_middleware_stack};

/// Shared state injected into every handler: the datastore pool and the
/// process-wide configuration, both built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
}

/// Health check handler
/// Returns "OK" with 200 status for monitoring purposes
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Builds the router hosting all three functions behind the shared
/// middleware stack (trace, CORS, timeout).
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Terminal OAuth notice; responds to any method
        .route("/functions/oauth-notice", any(notice::oauth_notice))
        // Lead preparation reset; POST only, structured 405 otherwise
        .route(
            "/functions/reset-lead-prep",
            post(leads::reset_lead_prep).fallback(leads::method_not_allowed),
        )
        // Shared proposal password verification
        .route(
            "/functions/verify-proposal-password",
            post(proposals::verify_proposal_password),
        )
        .with_state(state)
        .layer(create_middleware_stack())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, Environment};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    // State with a lazily-connecting pool; requests that never reach the
    // datastore can be exercised without a running Postgres.
    fn test_state() -> AppState {
        let db_config = DatabaseConfig {
            host: "localhost".to_string(),
            port: 5432,
            database: "test".to_string(),
            username: "test".to_string(),
            password: "test".to_string(),
            ssl_mode: "disable".to_string(),
            max_connections: 2,
            connection_timeout: Duration::from_secs(1),
            connection_string: None,
            service_key: None,
        };

        AppState {
            db: Database::new(db_config.clone()).unwrap(),
            config: Arc::new(Config {
                port: 8080,
                database: db_config,
                public_base_url: "https://app.example.com".to_string(),
                environment: Environment::Local,
            }),
        }
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");
    }

    #[tokio::test]
    async fn test_oauth_notice_is_gone_on_get() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/functions/oauth-notice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GONE);
        let body = body_string(response).await;
        assert!(body.contains("permanently"));
        assert!(body.contains("https://app.example.com/settings/integrations"));
    }

    #[tokio::test]
    async fn test_oauth_notice_is_gone_on_post_too() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/functions/oauth-notice")
                    .body(Body::from("ignored"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GONE);
    }

    #[tokio::test]
    async fn test_reset_rejects_wrong_method_with_json_body() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/functions/reset-lead-prep")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn test_verify_requires_share_token() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/functions/verify-proposal-password")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"password": "secret123"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Share token is required");
    }

    #[tokio::test]
    async fn test_verify_requires_password() {
        let app = create_router(test_state());

        // The password check fires regardless of token validity, so no
        // datastore lookup happens here.
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/functions/verify-proposal-password")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"share_token": "tok_abc123"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Password is required");
    }

    #[tokio::test]
    async fn test_verify_treats_malformed_body_as_internal_fault() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/functions/verify-proposal-password")
                    .header("content-type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_cors_preflight_succeeds() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/functions/verify-proposal-password")
                    .header("origin", "https://caller.example.com")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_responses_carry_cors_headers() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/functions/oauth-notice")
                    .header("origin", "https://caller.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }
}
