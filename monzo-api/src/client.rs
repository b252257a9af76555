use std::{fmt, time::Duration};

use reqwest::{
    header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Method, Request,
};
use serde::{Deserialize, Serialize};
use tracing::Level;
use url::{form_urlencoded, Url};

use crate::{envelope, Error, Result};

mod call;
pub use call::{Call, CallOptions};
mod transport;
pub use transport::{Response, Transport};

/// The root of the Monzo API
pub const API_BASE: &str = "https://api.monzo.com/";

/// A client to the Monzo API.
///
/// The client holds a bearer token and a [`Transport`]. Every API operation
/// is a method on the client which returns a [`Call`]; nothing is sent until
/// the call is awaited.
#[derive(Clone)]
pub struct Client<R = reqwest::Client> {
    access_token: String,
    base_url: String,
    timeout: Option<Duration>,
    transport: R,
}

impl Client {
    /// Create a client using the default transport
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::builder(access_token).build()
    }

    /// Configure a client before creating it
    pub fn builder(access_token: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            access_token: access_token.into(),
            base_url: API_BASE.to_string(),
            timeout: None,
            transport: reqwest::Client::new(),
        }
    }
}

impl<R> Client<R> {
    /// The bearer token used to authenticate requests
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The transport requests are sent through
    pub fn transport(&self) -> &R {
        &self.transport
    }

    /// Start building an authenticated request for the endpoint at `segments`
    /// (relative to the API base).
    ///
    /// Segments are percent-encoded, so ids can be passed through as-is.
    pub fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder<'_> {
        RequestBuilder {
            access_token: &self.access_token,
            method,
            url: endpoint(&self.base_url, segments),
            body: None,
        }
    }

    /// Wrap a built request into a [`Call`] whose response is unwrapped from
    /// the envelope `key`
    pub(crate) fn call_enveloped<T>(&self, request: Result<Request>, key: &'static str) -> Call<'_, T, R>
    where
        T: serde::de::DeserializeOwned,
    {
        Call::new(self, request, move |response| {
            Ok(envelope::decode(response.body(), key)?)
        })
    }

    /// Wrap a built request into a [`Call`] that ignores the response body
    pub(crate) fn call_empty(&self, request: Result<Request>) -> Call<'_, (), R> {
        Call::new(self, request, |_response| Ok(()))
    }

    /// Check that the access token is accepted by the API
    pub fn whoami(&self) -> Call<'_, WhoAmI, R> {
        let request = self.request(Method::GET, &["ping", "whoami"]).build();
        Call::new(self, request, |response| {
            Ok(envelope::decode_unwrapped(response.body())?)
        })
    }
}

impl<R: Transport> Client<R> {
    /// Send a built request, honouring the client default timeout and the
    /// per-call options
    pub(crate) async fn dispatch(
        &self,
        mut request: Request,
        options: &CallOptions,
    ) -> Result<Response> {
        if let Some(timeout) = options.timeout.or(self.timeout) {
            *request.timeout_mut() = Some(timeout);
        }

        tracing::event!(Level::DEBUG, method = %request.method(), url = %request.url(), "sending request");

        let exchange = self.transport.send(request);
        let response = match &options.cancel {
            Some(token) => token
                .run_until_cancelled(exchange)
                .await
                .ok_or(Error::Cancelled)??,
            None => exchange.await?,
        };

        if response.status() != reqwest::StatusCode::OK {
            tracing::event!(Level::WARN, status = %response.status(), "request failed");
        }

        response.error_for_status()
    }
}

impl<R> fmt::Debug for Client<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for a [`Client`]
#[derive(Debug)]
pub struct ClientBuilder<R = reqwest::Client> {
    access_token: String,
    base_url: String,
    timeout: Option<Duration>,
    transport: R,
}

impl<R> ClientBuilder<R> {
    /// Point the client at a different API root.
    ///
    /// An unusable URL is reported as a construction error by every request.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Default deadline for every request sent by the client
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Execute requests through a different [`Transport`]
    pub fn transport<T: Transport>(self, transport: T) -> ClientBuilder<T> {
        ClientBuilder {
            access_token: self.access_token,
            base_url: self.base_url,
            timeout: self.timeout,
            transport,
        }
    }

    /// Create the [`Client`]
    pub fn build(self) -> Client<R> {
        Client {
            access_token: self.access_token,
            base_url: self.base_url,
            timeout: self.timeout,
            transport: self.transport,
        }
    }
}

/// Builds an authenticated request against the API. See [`Client::request`].
#[derive(Debug)]
#[must_use]
pub struct RequestBuilder<'a> {
    access_token: &'a str,
    method: Method,
    url: Result<Url>,
    body: Option<Body>,
}

#[derive(Debug)]
struct Body {
    content_type: &'static str,
    bytes: Vec<u8>,
}

impl RequestBuilder<'_> {
    /// Append query parameters
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(K, V)> = pairs.into_iter().collect();
        if pairs.is_empty() {
            return self;
        }

        if let Ok(url) = &mut self.url {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        self
    }

    /// Send the given pairs as an `application/x-www-form-urlencoded` body
    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        self.body = Some(Body {
            content_type: "application/x-www-form-urlencoded",
            bytes: encoded.into_bytes(),
        });
        self
    }

    /// Send an already-serialised JSON document as the body
    pub fn json(mut self, document: Vec<u8>) -> Self {
        self.body = Some(Body {
            content_type: "application/json",
            bytes: document,
        });
        self
    }

    /// Build the request. No network traffic is involved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if the access token is empty or cannot
    /// be sent as a header, or if the endpoint could not be formed.
    pub fn build(self) -> Result<Request> {
        if self.access_token.is_empty() {
            return Err(Error::Construction("access token is empty".to_string()));
        }

        let mut request = Request::new(self.method, self.url?);

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", self.access_token))
            .map_err(|_| {
                Error::Construction("access token is not a valid header value".to_string())
            })?;
        authorization.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, authorization);

        if let Some(body) = self.body {
            request
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(body.content_type));
            *request.body_mut() = Some(body.bytes.into());
        }

        Ok(request)
    }
}

fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| Error::Construction(format!("invalid base url '{base_url}': {e}")))?;

    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(Error::Construction(format!(
            "empty path segment in '{}'",
            segments.join("/")
        )));
    }

    url.path_segments_mut()
        .map_err(|()| Error::Construction(format!("'{base_url}' cannot be used as a base url")))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Details of the token the client authenticates with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmI {
    /// Whether the token is valid
    pub authenticated: bool,

    /// The id of the OAuth client the token was issued to
    pub client_id: String,

    /// The id of the user the token belongs to
    pub user_id: String,
}
