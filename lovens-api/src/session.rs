//! Authenticated session.
//!
//! Holds the bearer token and subject timezone and turns
//! (method, path, query, body) into a decoded JSON payload. Every call is
//! exactly one round trip: there is no refresh token, so an expired session
//! surfaces as `LvError::Authentication` and the caller has to log in again.

use std::sync::Arc;

use chrono_tz::Tz;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use lovens_core::config::ApiConfig;
use lovens_core::error::{LvError, LvResult};

use crate::transport::{HttpRequest, HttpResponse, RequestBody, Transport};

/// Session state, owned by the client.
pub struct Session {
    transport: Arc<dyn Transport>,
    config: ApiConfig,
    token: Option<String>,
    timezone: Option<Tz>,
}

impl Session {
    pub fn new(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config,
            token: None,
            timezone: None,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The subject timezone learned at login.
    pub fn timezone(&self) -> LvResult<Tz> {
        self.timezone.ok_or_else(LvError::not_authenticated)
    }

    /// Install a freshly issued token and the matching subject timezone.
    pub(crate) fn establish(&mut self, token: String, timezone: Tz) {
        self.token = Some(token);
        self.timezone = Some(timezone);
    }

    /// Full URL of an API path such as `/bike/12`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base_url)
    }

    /// Perform an authenticated API call and return the decoded payload.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        json: Option<Value>,
    ) -> LvResult<Value> {
        let token = self.token.as_deref().ok_or_else(LvError::not_authenticated)?;
        self.request_with_token(token, method, path, query, json).await
    }

    /// GET shorthand.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> LvResult<Value> {
        self.request(Method::GET, path, query, None).await
    }

    /// Perform an API call with an explicit token.
    ///
    /// Used during login, before the token is installed.
    pub(crate) async fn request_with_token(
        &self,
        token: &str,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        json: Option<Value>,
    ) -> LvResult<Value> {
        debug!("{} {}", method, path);

        let mut request = HttpRequest::new(method, self.api_url(path))
            .header("Authorization", format!("Bearer {token}"));
        for (key, value) in query {
            request = request.query(*key, value.clone());
        }
        if let Some(body) = json {
            request = request.body(RequestBody::Json(body));
        }

        let response = self.transport.send(request).await?;
        check_status(path, response)
    }
}

/// Map an API response to its payload or the matching error.
fn check_status(endpoint: &str, response: HttpResponse) -> LvResult<Value> {
    match response.status {
        401 | 403 => {
            let message = response.server_message();
            warn!("{endpoint} rejected credentials ({}): {message}", response.status);
            Err(LvError::Authentication {
                status: Some(response.status),
                message,
            })
        }
        _ if response.is_success() => response.parse_json(),
        status => Err(LvError::Api {
            status,
            endpoint: endpoint.to_string(),
            body: response.body,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_status_success() {
        let value = check_status("/bike", HttpResponse::json(200, &json!([{"id": 1}]))).unwrap();
        assert_eq!(value[0]["id"], 1);
    }

    #[test]
    fn test_check_status_auth() {
        for status in [401, 403] {
            let err = check_status("/bike", HttpResponse::json(status, &json!({"message": "expired"})))
                .unwrap_err();
            match err {
                LvError::Authentication { status: s, message } => {
                    assert_eq!(s, Some(status));
                    assert_eq!(message, "expired");
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn test_check_status_api_error_keeps_body() {
        let err = check_status("/bike/9", HttpResponse::new(404, "not found")).unwrap_err();
        match err {
            LvError::Api { status, endpoint, body } => {
                assert_eq!(status, 404);
                assert_eq!(endpoint, "/bike/9");
                assert_eq!(body, "not found");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
