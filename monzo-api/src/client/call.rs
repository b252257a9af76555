use std::{fmt, future::IntoFuture, time::Duration};

use futures_util::future::BoxFuture;
use reqwest::Request;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::{transport::Response, Client, Transport};
use crate::Result;

/// Per-call deadline and cancellation settings
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub(crate) timeout: Option<Duration>,
    pub(crate) cancel: Option<CancellationToken>,
}

impl CallOptions {
    /// Abort the request if no response is received within `timeout`.
    ///
    /// This overrides any default set on the [`Client`].
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Abort the request with [`Error::Cancelled`](crate::Error::Cancelled)
    /// as soon as `token` is cancelled
    #[must_use]
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

type Decoder<'a, T> = Box<dyn FnOnce(Response) -> Result<T> + Send + 'a>;

/// A prepared API call.
///
/// The request is built when the `Call` is created, but nothing is sent
/// until it is awaited. Awaiting performs exactly one HTTP exchange.
///
/// ```no_run
/// # async fn run() -> monzo_api::Result<()> {
/// use std::time::Duration;
///
/// let client = monzo_api::Client::new("ACCESS_TOKEN");
/// let accounts = client
///     .accounts()
///     .timeout(Duration::from_secs(5))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[must_use = "calls do nothing unless awaited"]
pub struct Call<'a, T, R = reqwest::Client> {
    client: &'a Client<R>,
    request: Result<Request>,
    decode: Decoder<'a, T>,
    options: CallOptions,
}

impl<'a, T, R> Call<'a, T, R> {
    pub(crate) fn new(
        client: &'a Client<R>,
        request: Result<Request>,
        decode: impl FnOnce(Response) -> Result<T> + Send + 'a,
    ) -> Self {
        Self {
            client,
            request,
            decode: Box::new(decode),
            options: CallOptions::default(),
        }
    }

    /// Set a deadline for this call
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.timeout(timeout);
        self
    }

    /// Cancel this call when `token` is cancelled
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.options = self.options.cancel_on(token);
        self
    }

    /// Replace the deadline and cancellation settings wholesale
    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    /// The request that will be sent, if it could be built
    #[must_use]
    pub fn request(&self) -> Option<&Request> {
        self.request.as_ref().ok()
    }
}

impl<T, R> Call<'_, T, R>
where
    R: Transport + Sync,
{
    /// Send the request and decode the response.
    ///
    /// This is what awaiting the `Call` does.
    ///
    /// # Errors
    ///
    /// Construction errors recorded while the request was built are returned
    /// without touching the network. Otherwise this fails on transport
    /// errors, non-200 responses, cancellation, or a response that cannot be
    /// decoded.
    pub async fn send(self) -> Result<T> {
        let Self {
            client,
            request,
            decode,
            options,
        } = self;

        let request = request?;
        let span = tracing::debug_span!(
            "call",
            method = %request.method(),
            path = %request.url().path(),
        );

        async move {
            let response = client.dispatch(request, &options).await?;
            decode(response)
        }
        .instrument(span)
        .await
    }
}

impl<'a, T, R> IntoFuture for Call<'a, T, R>
where
    R: Transport + Sync,
    T: Send + 'a,
{
    type Output = Result<T>;
    type IntoFuture = BoxFuture<'a, Result<T>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.send())
    }
}

impl<T, R> fmt::Debug for Call<'_, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("request", &self.request)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
