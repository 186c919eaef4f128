//! Login against the Conneq identity service.
//!
//! The identity service fronts an AWS Cognito user pool. Obtaining an API
//! bearer token takes six steps:
//!
//! 1. fetch the login page settings of our OAuth client
//! 2. fetch the Cognito app client id of the identity provider
//! 3. exchange username/password for a Cognito access token
//! 4. create a PKCE verifier/challenge pair
//! 5. trade the Cognito token and the challenge for an authorization code
//! 6. redeem the code and verifier for the bearer token
//!
//! Any rejection along the way is an `LvError::Authentication`.

use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use rand::RngCore;
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tracing::debug;

use lovens_core::config::ApiConfig;
use lovens_core::constants::login_page;
use lovens_core::error::{LvError, LvResult};

use crate::transport::{HttpRequest, HttpResponse, RequestBody, Transport};

/// Login page settings of an OAuth client.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginSettings {
    pub idp_client_id: String,
    pub idp_issuer_id: String,
    pub login_page_allowed_redirect_uris: Vec<String>,
    pub idp_redirect_uri: String,
}

impl LoginSettings {
    fn redirect_uri(&self) -> LvResult<&str> {
        self.login_page_allowed_redirect_uris
            .first()
            .map(String::as_str)
            .ok_or_else(|| auth_error(None, "login settings list no redirect uri"))
    }
}

/// PKCE verifier and its S256 challenge.
#[derive(Debug, Clone)]
pub struct CodeChallenge {
    pub challenge: String,
    pub verifier: String,
}

/// Create a PKCE pair: an alphanumeric verifier from 40 random bytes and the
/// unpadded URL-safe base64 SHA-256 of it.
pub fn create_code_challenge() -> CodeChallenge {
    let mut bytes = [0u8; 40];
    rand::thread_rng().fill_bytes(&mut bytes);
    let verifier: String = URL_SAFE
        .encode(bytes)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    CodeChallenge {
        challenge: challenge_for(&verifier),
        verifier,
    }
}

fn challenge_for(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

fn auth_error(status: Option<u16>, message: impl Into<String>) -> LvError {
    LvError::Authentication {
        status,
        message: message.into(),
    }
}

/// Runs the login steps over a transport.
pub struct LoginFlow<'a> {
    transport: &'a dyn Transport,
    config: &'a ApiConfig,
}

impl<'a> LoginFlow<'a> {
    pub fn new(transport: &'a dyn Transport, config: &'a ApiConfig) -> Self {
        Self { transport, config }
    }

    /// Run every step and return the API bearer token.
    pub async fn run(&self, username: &str, password: &str) -> LvResult<String> {
        let settings = self.login_settings().await?;
        let cognito_client_id = self.cognito_client_id(&settings).await?;
        let cognito_token = self
            .cognito_token(&settings, &cognito_client_id, username, password)
            .await?;
        let pkce = create_code_challenge();
        let code = self
            .authorization_code(&settings, &cognito_token, &pkce.challenge)
            .await?;
        self.access_token(&settings, &code, &pkce.verifier).await
    }

    fn identity_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.identity_base_url)
    }

    /// Send one step; non-2xx means the login was rejected.
    async fn exchange(&self, step: &str, request: HttpRequest) -> LvResult<Value> {
        debug!("login step: {step}");
        let response: HttpResponse = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(auth_error(
                Some(response.status),
                format!("{step}: {}", response.server_message()),
            ));
        }
        response.parse_json()
    }

    pub async fn login_settings(&self) -> LvResult<LoginSettings> {
        let url = self.identity_url(&format!(
            "/client/{}/setting/loginpage",
            self.config.client_id
        ));
        let value = self.exchange("login settings", HttpRequest::get(url)).await?;
        serde_json::from_value(value)
            .map_err(|e| auth_error(None, format!("login settings: {e}")))
    }

    async fn cognito_client_id(&self, settings: &LoginSettings) -> LvResult<String> {
        let url = self.identity_url(&format!(
            "/client/{}/setting/signinpage",
            settings.idp_client_id
        ));
        let value = self.exchange("sign-in settings", HttpRequest::get(url)).await?;
        required_str(&value, &["cognito_config", "aws_user_pools_web_client_id"])
    }

    async fn cognito_token(
        &self,
        settings: &LoginSettings,
        cognito_client_id: &str,
        username: &str,
        password: &str,
    ) -> LvResult<String> {
        let body = json!({
            "AuthFlow": "USER_PASSWORD_AUTH",
            "ClientId": cognito_client_id,
            "AuthParameters": {"USERNAME": username, "PASSWORD": password},
            "ClientMetadata": {},
        });
        let request = HttpRequest::post(settings.idp_issuer_id.clone())
            .header("Referer", format!("{}/", login_page::COGNITO_ORIGIN))
            .header("Origin", login_page::COGNITO_ORIGIN)
            .header("X-Amz-Target", "AWSCognitoIdentityProviderService.InitiateAuth")
            .body(RequestBody::Raw {
                content_type: "application/x-amz-json-1.1".into(),
                body: body.to_string(),
            });
        let value = self.exchange("password authentication", request).await?;
        required_str(&value, &["AuthenticationResult", "AccessToken"])
    }

    async fn authorization_code(
        &self,
        settings: &LoginSettings,
        cognito_token: &str,
        challenge: &str,
    ) -> LvResult<String> {
        let body = json!({
            "client_id": self.config.client_id,
            "issuer_id": settings.idp_issuer_id,
            "code": cognito_token,
            "redirect_uri": settings.redirect_uri()?,
            "idp_redirect_uri": settings.idp_redirect_uri,
            "grant_type": "idp_authorization_code_idtoken",
            "code_challenge": challenge,
            "code_challenge_method": "S256",
        });
        let request = HttpRequest::post(self.identity_url("/oauth"))
            .header("Referer", format!("{}/", login_page::IDS_ORIGIN))
            .header("Origin", login_page::IDS_ORIGIN)
            .body(RequestBody::Json(body));
        let value = self.exchange("authorization code", request).await?;
        required_str(&value, &["code"])
    }

    async fn access_token(
        &self,
        settings: &LoginSettings,
        code: &str,
        verifier: &str,
    ) -> LvResult<String> {
        let basic = STANDARD.encode(format!(
            "{}:{}",
            self.config.client_id, self.config.client_secret
        ));
        let form = vec![
            ("code".to_string(), code.to_string()),
            ("code_verifier".to_string(), verifier.to_string()),
            ("redirect_uri".to_string(), settings.redirect_uri()?.to_string()),
            ("grant_type".to_string(), "authorization_code".to_string()),
        ];
        let request = HttpRequest::post(self.identity_url("/oauth"))
            .header("Authorization", format!("Basic {basic}"))
            .body(RequestBody::Form(form));
        let value = self.exchange("access token", request).await?;
        required_str(&value, &["access_token"])
    }
}

/// Walk `path` into `value` and return the string found there.
fn required_str(value: &Value, path: &[&str]) -> LvResult<String> {
    path.iter()
        .try_fold(value, |v, key| v.get(*key))
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| auth_error(None, format!("response lacks `{}`", path.join("."))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_challenge_shape() {
        let pkce = create_code_challenge();
        assert!(!pkce.verifier.is_empty());
        assert!(pkce.verifier.len() <= 56);
        assert!(pkce.verifier.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(pkce.challenge.len(), 43);
        assert!(!pkce.challenge.contains('='));
        assert_eq!(pkce.challenge, challenge_for(&pkce.verifier));
    }

    #[test]
    fn test_code_challenges_differ() {
        assert_ne!(create_code_challenge().verifier, create_code_challenge().verifier);
    }

    #[test]
    fn test_challenge_matches_rfc7636_example() {
        assert_eq!(
            challenge_for("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_required_str() {
        let value = json!({"AuthenticationResult": {"AccessToken": "tok"}});
        assert_eq!(
            required_str(&value, &["AuthenticationResult", "AccessToken"]).unwrap(),
            "tok"
        );
        let err = required_str(&value, &["code"]).unwrap_err();
        assert!(err.is_authentication());
        assert!(err.to_string().contains("`code`"));
    }

    #[test]
    fn test_login_settings_without_redirect() {
        let settings = LoginSettings {
            idp_client_id: "a".into(),
            idp_issuer_id: "b".into(),
            login_page_allowed_redirect_uris: vec![],
            idp_redirect_uri: "c".into(),
        };
        assert!(settings.redirect_uri().is_err());
    }
}
