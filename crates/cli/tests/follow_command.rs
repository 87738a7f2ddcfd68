//! `follow` against a mock API server.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eduhire_cli::commands::follow;
use eduhire_client::{ApiClient, ClientConfig};

fn api(server: &MockServer) -> ApiClient {
    ApiClient::new(&ClientConfig {
        base_url: format!("{}/api", server.uri()),
        token: None,
        request_timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn follow_shows_pending_then_confirmed_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/institutions/sunrise/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "slug": "sunrise",
            "name": "Sunrise",
            "is_following": false,
            "follower_count": 4
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/institutions/sunrise/follow/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Followed successfully",
            "is_following": true,
            "follower_count": 6
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut out = Vec::new();
    follow(&api(&server), "sunrise", &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "Following sunrise (5 followers)...",
            "Following sunrise (6 followers)",
        ]
    );
}

#[tokio::test]
async fn rejected_follow_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/institutions/sunrise/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_following": true,
            "follower_count": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/institutions/sunrise/follow/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "Authentication credentials were not provided." })),
        )
        .mount(&server)
        .await;

    let err = follow(&api(&server), "sunrise", &mut Vec::new())
        .await
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("Authentication credentials were not provided."));
}
