//! Integration tests for the login flow against a mock identity service.
//!
//! Tests the full Cognito + PKCE exchange, rejected credentials, missing
//! response fields, and that a failed login leaves the session untouched.

mod common;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono_tz::Europe::Amsterdam;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::user_json;
use lovens_api::LovensClient;
use lovens_core::config::ApiConfig;
use lovens_core::constants::DEFAULT_CLIENT_ID;
use lovens_core::error::LvError;

fn client_for(server: &MockServer) -> LovensClient {
    LovensClient::with_config(ApiConfig::with_base_url(&server.uri())).unwrap()
}

/// Mount the two settings endpoints, the issuer pointing back at `server`.
async fn mount_settings(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/client/{DEFAULT_CLIENT_ID}/setting/loginpage")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "idp_client_id": "idp-client",
            "idp_issuer_id": format!("{}/cognito", server.uri()),
            "login_page_allowed_redirect_uris": ["https://app.lovens.test/callback"],
            "idp_redirect_uri": "https://login.lovens.test/idp",
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/client/idp-client/setting/signinpage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cognito_config": {"aws_user_pools_web_client_id": "cognito-client"}
        })))
        .mount(server)
        .await;
}

async fn mount_cognito(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/cognito"))
        .and(header("x-amz-target", "AWSCognitoIdentityProviderService.InitiateAuth"))
        .and(header("content-type", "application/x-amz-json-1.1"))
        .and(body_string_contains("\"USERNAME\":\"rider@example.test\""))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_oauth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth"))
        .and(body_string_contains("idp_authorization_code_idtoken"))
        .and(body_string_contains("\"code\":\"cognito-token\""))
        .and(body_string_contains("\"code_challenge_method\":\"S256\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "auth-code"})))
        .expect(1)
        .mount(server)
        .await;

    let basic = STANDARD.encode(format!("{DEFAULT_CLIENT_ID}:"));
    Mock::given(method("POST"))
        .and(path("/oauth"))
        .and(header("authorization", format!("Basic {basic}")))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code"))
        .and(body_string_contains("code_verifier="))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "api-token"})),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_profile(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/user/me"))
        .and(header("authorization", format!("Bearer {token}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(server)
        .await;
}

fn cognito_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "AuthenticationResult": {"AccessToken": "cognito-token", "TokenType": "Bearer"}
    }))
}

#[tokio::test]
async fn full_login_flow() {
    let server = MockServer::start().await;
    mount_settings(&server).await;
    mount_cognito(&server, cognito_ok()).await;
    mount_oauth(&server).await;
    mount_profile(&server, "api-token").await;

    let mut client = client_for(&server);
    assert!(!client.is_authenticated());

    client.login("rider@example.test", "secret").await.unwrap();

    assert!(client.is_authenticated());
    assert_eq!(client.timezone().unwrap(), Amsterdam);
    assert_eq!(client.get_user().await.unwrap().id, 4);
}

#[tokio::test]
async fn rejected_password_is_authentication_error() {
    let server = MockServer::start().await;
    mount_settings(&server).await;
    mount_cognito(
        &server,
        ResponseTemplate::new(400).set_body_json(json!({
            "__type": "NotAuthorizedException",
            "message": "Incorrect username or password."
        })),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/oauth"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let err = client.login("rider@example.test", "wrong").await.unwrap_err();

    match err {
        LvError::Authentication { status, message } => {
            assert_eq!(status, Some(400));
            assert!(message.contains("Incorrect username or password."));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn missing_token_field_names_the_field() {
    let server = MockServer::start().await;
    mount_settings(&server).await;
    mount_cognito(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"ChallengeName": "NEW_PASSWORD_REQUIRED"})),
    )
    .await;

    let mut client = client_for(&server);
    let err = client.login("rider@example.test", "secret").await.unwrap_err();
    assert!(err.is_authentication());
    assert!(err.to_string().contains("AuthenticationResult.AccessToken"));
}

#[tokio::test]
async fn failed_login_keeps_previous_session() {
    let server = MockServer::start().await;
    mount_profile(&server, "old-token").await;
    Mock::given(method("GET"))
        .and(path(format!("/client/{DEFAULT_CLIENT_ID}/setting/loginpage")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.login_with_token("old-token").await.unwrap();

    let err = client.login("rider@example.test", "secret").await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(client.is_authenticated());
    assert_eq!(client.get_user().await.unwrap().timezone, Amsterdam);
}

#[tokio::test]
async fn rejected_token_is_not_adopted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "invalid token"})))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let err = client.login_with_token("bogus").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(!client.is_authenticated());
    assert!(client.timezone().unwrap_err().is_authentication());
}
