//! An in-memory [`Transport`] which records requests and replays canned
//! responses

use std::{collections::VecDeque, sync::Mutex, time::Duration};

use reqwest::{
    header::{HeaderName, AUTHORIZATION, CONTENT_TYPE},
    Method, Request, StatusCode,
};

use crate::{Response, Result, Transport};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
    pub timeout: Option<Duration>,
}

impl From<&Request> for RecordedRequest {
    fn from(request: &Request) -> Self {
        let header = |name: HeaderName| {
            request
                .headers()
                .get(name)
                .map(|value| value.to_str().unwrap().to_string())
        };

        Self {
            method: request.method().clone(),
            url: request.url().to_string(),
            authorization: header(AUTHORIZATION),
            content_type: header(CONTENT_TYPE),
            body: body_text(request),
            timeout: request.timeout().copied(),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<Response>>,
    requests: Mutex<Vec<RecordedRequest>>,
    hang: bool,
    fail: bool,
}

impl FakeTransport {
    /// Queue a response
    pub fn respond(self, status: u16, body: &str) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.responses
            .lock()
            .unwrap()
            .push_back(Response::new(status, body));
        self
    }

    /// Never answer
    pub fn hang(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Fail every request as if the connection couldn't be made
    pub fn fail(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        self.requests.lock().unwrap().push((&request).into());

        if self.hang {
            std::future::pending::<()>().await;
        }

        if self.fail {
            return Err(transport_error().into());
        }

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no canned response left");
        Ok(response)
    }
}

/// A genuine `reqwest::Error`, built without touching the network
fn transport_error() -> reqwest::Error {
    reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err()
}

pub fn body_text(request: &Request) -> String {
    request
        .body()
        .and_then(reqwest::Body::as_bytes)
        .map(|bytes| String::from_utf8(bytes.to_vec()).unwrap())
        .unwrap_or_default()
}
