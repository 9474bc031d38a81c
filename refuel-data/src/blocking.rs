//! Synchronous bridge over the async `reqwest` client.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = "refuel-engine/0.1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while constructing an HTTP-backed collaborator.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The configured base URL does not parse.
    #[error("invalid base URL `{url}`")]
    InvalidBaseUrl {
        /// Rejected URL.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime")]
    Runtime(#[source] std::io::Error),
}

/// An HTTP client paired with the runtime that drives it.
///
/// Outside any Tokio runtime, and inside a `current_thread` runtime, calls
/// block on the owned runtime. Inside a multi-threaded runtime they use the
/// caller's handle through [`tokio::task::block_in_place`].
pub(crate) struct BlockingHttp {
    client: Client,
    runtime: Runtime,
}

impl std::fmt::Debug for BlockingHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingHttp")
            .field("client", &self.client)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl BlockingHttp {
    pub(crate) fn new(user_agent: &str, timeout: Duration) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self { client, runtime })
    }

    pub(crate) const fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

/// Validate `base_url` and strip any trailing slash.
pub(crate) fn normalise_base_url(base_url: &str) -> Result<String, ProviderBuildError> {
    url::Url::parse(base_url).map_err(|source| ProviderBuildError::InvalidBaseUrl {
        url: base_url.to_owned(),
        source,
    })?;
    Ok(base_url.trim_end_matches('/').to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:5000/", "http://localhost:5000")]
    #[case("https://router.example.com/osrm", "https://router.example.com/osrm")]
    fn base_urls_lose_trailing_slashes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalise_base_url(input).expect("valid url"), expected);
    }

    #[rstest]
    fn relative_base_urls_are_rejected() {
        let err = normalise_base_url("/route/v1").expect_err("not absolute");
        assert!(matches!(err, ProviderBuildError::InvalidBaseUrl { .. }));
    }

    #[rstest]
    fn runs_futures_outside_a_runtime() {
        let http = BlockingHttp::new(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT).expect("client builds");
        assert_eq!(http.block_on(async { 41 + 1 }), 42);
    }
}
