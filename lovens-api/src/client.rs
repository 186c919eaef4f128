//! Lovens API client.
//!
//! `LovensClient` owns the session and the clock. Resource accessors live in
//! `crate::endpoints` as further `impl LovensClient` blocks.

use std::sync::Arc;

use chrono::DateTime;
use chrono_tz::Tz;
use reqwest::Method;
use serde_json::Value;
use tracing::info;

use lovens_core::config::ApiConfig;
use lovens_core::error::LvResult;
use lovens_models::User;

use crate::auth::LoginFlow;
use crate::clock::{Clock, SystemClock};
use crate::session::Session;
use crate::transport::{HttpTransport, Transport};

/// Client for the Lovens bike telemetry API.
///
/// A client starts unauthenticated; call `login` (or `login_with_token`)
/// before any accessor. Logging in takes `&mut self`, so it can never overlap
/// with an accessor on the same client.
pub struct LovensClient {
    session: Session,
    clock: Arc<dyn Clock>,
}

impl LovensClient {
    /// Create a client for the public Lovens endpoints.
    pub fn new() -> LvResult<Self> {
        Self::with_config(ApiConfig::default())
    }

    /// Create a client for the endpoints in `config`.
    pub fn with_config(config: ApiConfig) -> LvResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            session: Session::new(config, transport),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for default time windows.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Log in with username and password.
    ///
    /// On success the client holds a bearer token and knows the subject
    /// timezone. On failure any previous session is left as it was.
    pub async fn login(&mut self, username: &str, password: &str) -> LvResult<()> {
        let token = LoginFlow::new(self.session.transport(), self.session.config())
            .run(username, password)
            .await?;
        self.adopt_token(token).await
    }

    /// Adopt a bearer token obtained elsewhere.
    pub async fn login_with_token(&mut self, token: impl Into<String>) -> LvResult<()> {
        self.adopt_token(token.into()).await
    }

    /// Look up the subject timezone with `token`, then install both.
    async fn adopt_token(&mut self, token: String) -> LvResult<()> {
        let profile = self
            .session
            .request_with_token(&token, Method::GET, "/user/me", &[], None)
            .await?;
        let user = User::from_server_map(&profile)?;
        info!("logged in as user {} ({})", user.id, user.timezone);
        self.session.establish(token, user.timezone);
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// The subject timezone. Fails when not logged in.
    pub fn timezone(&self) -> LvResult<Tz> {
        self.session.timezone()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current instant in the subject timezone.
    pub(crate) fn now(&self, tz: Tz) -> DateTime<Tz> {
        self.clock.now().with_timezone(&tz)
    }

    /// Perform a raw authenticated API call.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        json: Option<Value>,
    ) -> LvResult<Value> {
        self.session.request(method, path, query, json).await
    }

    /// Authenticated GET returning the decoded payload.
    pub(crate) async fn get(&self, path: &str, query: &[(&str, String)]) -> LvResult<Value> {
        self.session.get(path, query).await
    }
}
