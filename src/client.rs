use std::time::{Duration, Instant};

use http_body_util::{BodyExt, Full};
use hyper::{
    body::Bytes,
    header::{CONTENT_TYPE, USER_AGENT},
    Method, Request,
};
use hyper_tls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::error::{LookupError, Result};

/// A single HTTP request to a provider endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Plain GET of the URL.
    Get(String),
    /// POST of one urlencoded form field.
    PostForm {
        url: String,
        key: &'static str,
        value: String,
    },
}

impl Query {
    pub fn url(&self) -> &str {
        match self {
            Self::Get(url) => url,
            Self::PostForm { url, .. } => url,
        }
    }
}

/// HTTP client used by the remote providers.
///
/// Every request carries the `ipgeo/<version>` user agent and is bounded by
/// the timeout given at construction, body included.
pub struct HttpClient {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    user_agent: String,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        let client =
            Client::builder(TokioExecutor::new()).build::<_, Full<Bytes>>(HttpsConnector::new());
        Self {
            client,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            timeout,
        }
    }

    fn build_request(&self, query: &Query) -> Result<Request<Full<Bytes>>> {
        let request = match query {
            Query::Get(url) => Request::builder()
                .method(Method::GET)
                .uri(url)
                .header(USER_AGENT, &self.user_agent)
                .body(Full::new(Bytes::new()))?,
            Query::PostForm { url, key, value } => {
                let form = format!("{}={}", key, urlencoding::encode(value));
                Request::builder()
                    .method(Method::POST)
                    .uri(url)
                    .header(USER_AGENT, &self.user_agent)
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Full::new(Bytes::from(form)))?
            }
        };
        Ok(request)
    }

    /// Sends `query` once and returns the response body.
    ///
    /// Connection failures, timeouts and non-success statuses are all
    /// reported as [`LookupError::Network`].
    pub async fn send(&self, query: &Query) -> Result<Bytes> {
        let request = self.build_request(query)?;
        let start_time = Instant::now();

        let body = tokio::time::timeout(self.timeout, async {
            let response = self.client.request(request).await?;
            let status = response.status();
            if !status.is_success() {
                return Err(LookupError::Network(format!(
                    "HTTP Error {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown reason")
                )));
            }
            Ok::<_, LookupError>(response.into_body().collect().await?.to_bytes())
        })
        .await
        .map_err(|_| LookupError::Network("timed out".to_string()))??;

        #[cfg(feature = "log")]
        log::debug!(
            "{}: received {} bytes in {:?}",
            query.url(),
            body.len(),
            start_time.elapsed()
        );
        #[cfg(not(feature = "log"))]
        let _ = start_time;
        Ok(body)
    }
}
