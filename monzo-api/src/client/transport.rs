use std::future::Future;

use reqwest::{Request, StatusCode};

use crate::{Error, Result};

/// A response as read back from the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    body: Vec<u8>,
}

impl Response {
    /// Create a response from its status code and raw body
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The HTTP status code
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The raw response body
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Anything other than `200 OK` is a failure, carrying the body verbatim
    pub(crate) fn error_for_status(self) -> Result<Self> {
        if self.status == StatusCode::OK {
            Ok(self)
        } else {
            Err(Error::Status {
                status: self.status,
                body: String::from_utf8_lossy(&self.body).into_owned(),
            })
        }
    }
}

/// Executes fully-built requests.
///
/// [`reqwest::Client`] is the default implementation. Alternative transports
/// can be supplied through [`ClientBuilder::transport`](crate::ClientBuilder::transport).
pub trait Transport {
    /// Send a request and read back the complete response.
    ///
    /// Implementations should only fail if no response could be read. Status
    /// codes are interpreted by the caller.
    fn send(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

impl Transport for reqwest::Client {
    async fn send(&self, request: Request) -> Result<Response> {
        let response = self.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?;

        Ok(Response::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use test_case::test_case;

    use super::Response;
    use crate::Error;

    #[test]
    fn ok_passes_through() {
        let response = Response::new(StatusCode::OK, "{}");
        assert_eq!(response.clone().error_for_status().unwrap(), response);
    }

    #[test_case(StatusCode::CREATED ; "other success codes")]
    #[test_case(StatusCode::UNAUTHORIZED ; "unauthorised")]
    #[test_case(StatusCode::INTERNAL_SERVER_ERROR ; "server error")]
    fn anything_else_is_an_error(status: StatusCode) {
        let response = Response::new(status, "plain text reason");

        match response.error_for_status() {
            Err(Error::Status { status: s, body }) => {
                assert_eq!(s, status);
                assert_eq!(body, "plain text reason");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
