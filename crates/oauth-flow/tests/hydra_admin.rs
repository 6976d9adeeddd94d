//! Consent workflow against a mock Hydra admin API.

use oauth_flow::{
    AdminApi, AdminApiError, AdminConfig, ConsentEngine, ConsentForm, ConsentResponse,
    HydraAdminClient, DENY_ACCESS_SUBMIT_VALUE,
};
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONSENT_PATH: &str = "/admin/oauth2/auth/requests/consent";

fn engine(server: &MockServer) -> ConsentEngine<HydraAdminClient> {
    ConsentEngine::new(HydraAdminClient::new(
        AdminConfig {
            admin_url: Url::parse(&server.uri()).unwrap(),
        },
        reqwest::Client::new(),
    ))
}

async fn mount_consent_request(server: &MockServer, challenge: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(CONSENT_PATH))
        .and(query_param("consent_challenge", challenge))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_skip_accepts_over_http() {
    let server = MockServer::start().await;
    mount_consent_request(
        &server,
        "ch-1",
        serde_json::json!({
            "challenge": "ch-1",
            "skip": true,
            "subject": "user@example.com",
            "requested_scope": ["openid", "profile"],
            "requested_access_token_audience": ["api1"],
            "client": {"client_id": "reference-app"}
        }),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path(format!("{}/accept", CONSENT_PATH)))
        .and(query_param("consent_challenge", "ch-1"))
        .and(body_json(serde_json::json!({
            "grant_scope": ["openid", "profile"],
            "grant_access_token_audience": ["api1"],
            "remember": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"redirect_to": "http://localhost:4444/oauth2/auth?consent_verifier=v1"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let response = engine(&server).process_initial_consent_request("ch-1").await.unwrap();

    assert_eq!(
        response,
        ConsentResponse::Skip {
            redirect_to: Url::parse("http://localhost:4444/oauth2/auth?consent_verifier=v1").unwrap(),
        }
    );
}

#[tokio::test]
async fn test_display_ui_makes_no_writes() {
    let server = MockServer::start().await;
    mount_consent_request(
        &server,
        "ch-2",
        serde_json::json!({
            "skip": false,
            "requested_scope": ["openid", "email"],
            "requested_access_token_audience": []
        }),
    )
    .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = engine(&server).process_initial_consent_request("ch-2").await.unwrap();

    assert_eq!(
        response,
        ConsentResponse::DisplayUi {
            requested_scope: vec!["openid".to_string(), "email".to_string()],
            consent_challenge: "ch-2".to_string(),
        }
    );
}

#[tokio::test]
async fn test_deny_sends_reject() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{}/reject", CONSENT_PATH)))
        .and(query_param("consent_challenge", "ch-3"))
        .and(body_json(serde_json::json!({
            "error": "access_denied",
            "error_description": "The resource owner denied the request"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"redirect_to": "http://127.0.0.1:8080/callback?error=access_denied"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let response = engine(&server)
        .process_consent_form(ConsentForm {
            consent_challenge: "ch-3".to_string(),
            submit: DENY_ACCESS_SUBMIT_VALUE.to_string(),
            ..ConsentForm::default()
        })
        .await
        .unwrap();

    assert!(matches!(response, ConsentResponse::Rejected { .. }));
}

#[tokio::test]
async fn test_accept_grants_server_audience() {
    let server = MockServer::start().await;
    mount_consent_request(
        &server,
        "ch-4",
        serde_json::json!({
            "skip": false,
            "requested_scope": ["openid", "profile"],
            "requested_access_token_audience": ["api1"]
        }),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path(format!("{}/accept", CONSENT_PATH)))
        .and(body_json(serde_json::json!({
            "grant_scope": ["openid"],
            "grant_access_token_audience": ["api1"],
            "remember": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"redirect_to": "http://localhost:4444/oauth2/auth?consent_verifier=v4"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let response = engine(&server)
        .process_consent_form(ConsentForm {
            consent_challenge: "ch-4".to_string(),
            submit: "Allow access".to_string(),
            remember: true,
            scopes: vec!["openid".to_string()],
        })
        .await
        .unwrap();

    assert!(matches!(response, ConsentResponse::Accepted { .. }));
}

#[tokio::test]
async fn test_admin_error_status_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CONSENT_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error":"Not Found"}"#))
        .mount(&server)
        .await;

    let err = engine(&server)
        .process_initial_consent_request("unknown")
        .await
        .unwrap_err();

    match err {
        AdminApiError::Status { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("Not Found"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_undecodable_redirect_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{}/reject", CONSENT_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let client = HydraAdminClient::new(
        AdminConfig {
            admin_url: Url::parse(&server.uri()).unwrap(),
        },
        reqwest::Client::new(),
    );
    let err = client.reject_consent_request("ch-5").await.unwrap_err();

    assert!(matches!(err, AdminApiError::Decode(_)));
}
