//! Tests for the portal HTTP client.
//!
//! These tests use mock servers to verify client behavior without a real
//! backend.

use nyamedia_client::{ClientConfig, ClientError, NyamediaClient};
use nyamedia_core::{PortalApi, PortalError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> NyamediaClient {
    NyamediaClient::new(ClientConfig::new(server.uri())).unwrap()
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_valid_https_url() {
        assert!(NyamediaClient::new(ClientConfig::new("https://media.example.com")).is_ok());
    }

    #[test]
    fn test_trailing_slash_removed() {
        let client = NyamediaClient::new(ClientConfig::new("https://media.example.com/")).unwrap();
        assert_eq!(client.base_url(), "https://media.example.com");
    }

    #[test]
    fn test_empty_url_rejected() {
        let result = NyamediaClient::new(ClientConfig::new(""));
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_relative_url_rejected() {
        let result = NyamediaClient::new(ClientConfig::new("/api"));
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }
}

// =============================================================================
// Registration Check Tests
// =============================================================================

mod check_user {
    use super::*;

    #[tokio::test]
    async fn test_registered_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/check_user/123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "registered": true,
                "database_username": "foo"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let status = client_for(&server).check_user(123).await.unwrap();

        assert!(status.registered);
        assert_eq!(status.database_username.as_deref(), Some("foo"));
    }

    #[tokio::test]
    async fn test_unregistered_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/check_user/7"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"registered": false})),
            )
            .mount(&server)
            .await;

        let status = client_for(&server).check_user(7).await.unwrap();

        assert!(!status.registered);
        assert!(status.database_username.is_none());
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/check_user/1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
            .mount(&server)
            .await;

        let result = client_for(&server).check_user(1).await;

        match result {
            Err(ClientError::ServerError { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "database unavailable");
            }
            other => panic!("Expected ServerError, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/check_user/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).check_user(1).await;

        assert!(matches!(result, Err(ClientError::ParseError(_))));
    }
}

// =============================================================================
// Media List Tests
// =============================================================================

mod media_lists {
    use super::*;

    #[tokio::test]
    async fn test_pending_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/pending"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "source": "x", "media_id": "y", "created_at": "2024-01-01"},
                {"id": 2, "source": "tmdb", "media_id": "603", "title": "The Matrix",
                 "poster": "https://img.example/603.jpg", "status": 0,
                 "created_at": "2024-01-02", "requested_by": "nya"}
            ])))
            .mount(&server)
            .await;

        let items = client_for(&server).pending().await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source, "x");
        assert!(items[0].poster.is_none());
        assert_eq!(items[1].title.as_deref(), Some("The Matrix"));
        assert_eq!(items[1].extra.get("requested_by"), Some(&serde_json::json!("nya")));
    }

    #[tokio::test]
    async fn test_archived_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/archived"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let items = client_for(&server).archived().await.unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_list_that_is_not_an_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/archived"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).archived().await;

        assert!(matches!(result, Err(ClientError::ParseError(_))));
    }
}

// =============================================================================
// PortalApi Integration Tests
// =============================================================================

mod portal_api {
    use super::*;

    #[tokio::test]
    async fn test_errors_convert_to_portal_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/pending"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let api: &dyn PortalApi = &client_for(&server);
        let err = api.pending().await.unwrap_err();

        assert!(matches!(err, PortalError::Server { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_network_error() {
        // Nothing listens on the discard port
        let client = NyamediaClient::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();

        let err = PortalApi::check_user(&client, 1).await.unwrap_err();

        assert!(matches!(err, PortalError::Network(_)));
    }
}
