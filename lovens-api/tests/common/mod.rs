//! Shared test utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use lovens_api::{FixedClock, HttpRequest, HttpResponse, LovensClient, Transport};
use lovens_core::config::ApiConfig;
use lovens_core::error::LvResult;

pub const TEST_BASE_URL: &str = "https://api.lovens.test";
pub const TEST_TOKEN: &str = "test-token";

type Handler = Box<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

/// In-memory transport answering from a closure and recording every request.
pub struct FakeTransport {
    handler: Handler,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new(handler: impl Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was made")
    }

    pub fn clear(&self) {
        self.requests.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> LvResult<HttpResponse> {
        let response = (self.handler)(&request);
        self.requests.lock().unwrap().push(request);
        Ok(response)
    }
}

/// Path of a request URL relative to the test base URL.
pub fn path_of(request: &HttpRequest) -> &str {
    request
        .url
        .strip_prefix(TEST_BASE_URL)
        .unwrap_or(&request.url)
}

/// Profile of the test user, in Amsterdam.
pub fn user_json() -> Value {
    json!({
        "id": 4,
        "name": "Test Rider",
        "email": "rider@example.test",
        "timezone": "Europe/Amsterdam",
        "language": "nl",
    })
}

pub fn test_config() -> ApiConfig {
    ApiConfig::with_base_url(TEST_BASE_URL)
}

/// Noon UTC on 2023-04-01.
pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2023, 4, 1, 12, 0, 0).unwrap()))
}

/// A client over a fake transport, logged in with a token.
///
/// `/user/me` is answered with `user_json()`; every other request goes to
/// `handler`. The login request is cleared from the record.
pub async fn logged_in_client(
    handler: impl Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
) -> (LovensClient, Arc<FakeTransport>) {
    let transport = FakeTransport::new(move |request| {
        if path_of(request) == "/user/me" {
            HttpResponse::json(200, &user_json())
        } else {
            handler(request)
        }
    });
    let mut client = LovensClient::with_transport(test_config(), transport.clone())
        .with_clock(fixed_clock());
    client
        .login_with_token(TEST_TOKEN)
        .await
        .expect("token login should succeed");
    transport.clear();
    (client, transport)
}

/// A client that never logged in.
pub fn anonymous_client() -> (LovensClient, Arc<FakeTransport>) {
    let transport = FakeTransport::new(|_| HttpResponse::new(500, "unexpected request"));
    let client = LovensClient::with_transport(test_config(), transport.clone());
    (client, transport)
}

/// A half-hour ride record with id `id`.
pub fn ride_json(id: i64) -> Value {
    json!({
        "id": id,
        "bike_id": 12,
        "start_date": format!("2023-03-{:02}T08:00:00+0100", (id % 28) + 1),
        "end_date": format!("2023-03-{:02}T08:30:00+0100", (id % 28) + 1),
        "distance_traveled": 4.2,
        "calories": 120,
    })
}
