//! Scripted transport and sleeper shared by the client tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use super::http_transport::{BoxFuture, HttpRequest, HttpResponse, HttpTransport, TransportError};
use super::retry::{RetryPolicy, Sleeper};
use super::{ApiKey, SendlyClient};

pub(crate) const TEST_KEY: &str = "sk_test_v1_abc123";
pub(crate) const TEST_BASE_URL: &str = "https://api.test/api";

enum Scripted {
    Response(HttpResponse),
    Error(String),
    Hang,
}

#[derive(Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    script: VecDeque<Scripted>,
    requests: Vec<HttpRequest>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, response: HttpResponse) -> &Self {
        self.state
            .lock()
            .unwrap()
            .script
            .push_back(Scripted::Response(response));
        self
    }

    pub(crate) fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push(json_response(status, &body, &[]))
    }

    pub(crate) fn push_error(&self, message: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .script
            .push_back(Scripted::Error(message.to_owned()));
        self
    }

    /// Script an exchange that never completes.
    pub(crate) fn push_hang(&self) -> &Self {
        self.state.lock().unwrap().script.push_back(Scripted::Hang);
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }
}

impl HttpTransport for FakeTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            let next = {
                let mut state = self.state.lock().unwrap();
                state.requests.push(request);
                state.script.pop_front()
            };
            match next.expect("no scripted response left") {
                Scripted::Response(response) => Ok(response),
                Scripted::Error(message) => Err(message.into()),
                Scripted::Hang => std::future::pending().await,
            }
        })
    }
}

/// Records requested delays and returns immediately.
#[derive(Clone, Default)]
pub(crate) struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub(crate) fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        self.delays.lock().unwrap().push(duration);
        Box::pin(async {})
    }
}

pub(crate) fn json_response(
    status: u16,
    body: &Value,
    headers: &[(&'static str, &'static str)],
) -> HttpResponse {
    let mut map = http::HeaderMap::new();
    map.insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    for &(name, value) in headers {
        map.insert(name, http::HeaderValue::from_static(value));
    }
    HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        map,
        serde_json::to_vec(body).unwrap(),
    )
}

pub(crate) fn text_response(status: u16, body: &str) -> HttpResponse {
    let mut map = http::HeaderMap::new();
    map.insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("text/plain"),
    );
    HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        map,
        body.as_bytes().to_vec(),
    )
}

/// Client over `transport` with deterministic backoff and no real sleeping.
pub(crate) fn client_with(
    transport: &FakeTransport,
    sleeper: &RecordingSleeper,
    max_retries: u32,
) -> SendlyClient {
    SendlyClient::builder(ApiKey::new(TEST_KEY).unwrap())
        .base_url(TEST_BASE_URL)
        .max_retries(max_retries)
        .retry_policy(RetryPolicy::new().with_max_jitter(Duration::ZERO))
        .transport(transport.clone())
        .sleeper(sleeper.clone())
        .build()
        .unwrap()
}

/// Single-attempt client, for facade tests.
pub(crate) fn client(transport: &FakeTransport) -> SendlyClient {
    client_with(transport, &RecordingSleeper::default(), 0)
}

pub(crate) fn body_json(request: &HttpRequest) -> Value {
    serde_json::from_slice(request.body.as_deref().expect("request has no body")).unwrap()
}

/// Path and query of the request URL, relative to the API root.
pub(crate) fn target(request: &HttpRequest) -> String {
    let url = request.url.as_str();
    url.strip_prefix(TEST_BASE_URL).unwrap_or(url).to_owned()
}
