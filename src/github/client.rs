//! GitHub API client implementation

use crate::core::{UpliftError, UpliftResult};
use crate::di::traits::{ConfigProvider, Transport};
use crate::release::ReleaseSource;
use async_trait::async_trait;
use reqwest::{header, Client as HttpClient, StatusCode};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// HTTP transport backed by the GitHub REST API
pub struct GitHubClient {
    http_client: HttpClient,
    token: Option<String>,
    rate_limiter: Arc<RateLimiter>,
}

/// Last rate limit state reported by the API
struct RateLimiter {
    remaining: Mutex<Option<u64>>,
    reset_time: Mutex<SystemTime>,
}

impl GitHubClient {
    /// Create a new GitHub client
    ///
    /// `GITHUB_TOKEN`, when set, is sent as a bearer token.
    pub fn new(config: &dyn ConfigProvider) -> UpliftResult<Self> {
        let token = std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(config.user_agent())
                .map_err(|e| UpliftError::Config(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        if let Some(ref token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| UpliftError::Config(format!("Invalid GitHub token: {}", e)))?,
            );
        }

        let mut builder = HttpClient::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout());

        if let Some(proxy) = config.proxy().filter(|p| !p.trim().is_empty()) {
            let proxy_url = normalize_proxy(proxy);
            debug!(proxy = %proxy_url, "Routing requests through proxy");
            builder = builder.proxy(reqwest::Proxy::all(&proxy_url).map_err(|e| {
                UpliftError::Config(format!("Invalid proxy '{}': {}", proxy, e))
            })?);
        }

        let http_client = builder.build().map_err(|e| {
            UpliftError::RemoteFetch(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            http_client,
            token,
            rate_limiter: Arc::new(RateLimiter {
                remaining: Mutex::new(None),
                reset_time: Mutex::new(SystemTime::now()),
            }),
        })
    }

    /// Send a GET request and check the response status
    async fn request(&self, url: &str) -> UpliftResult<reqwest::Response> {
        self.check_rate_limit().await?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| UpliftError::RemoteFetch(format!("Request to {} failed: {}", url, e)))?;

        self.update_rate_limit(&response).await;

        let status = response.status();
        if !status.is_success() {
            if matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
                && self.is_rate_limited().await
            {
                return Err(self.rate_limit_error().await);
            }
            return Err(UpliftError::RemoteFetch(format!(
                "GitHub returned HTTP {} for {}",
                status, url
            )));
        }

        Ok(response)
    }

    async fn is_rate_limited(&self) -> bool {
        *self.rate_limiter.remaining.lock().await == Some(0)
    }

    /// Fail fast while a known rate limit window is still closed
    async fn check_rate_limit(&self) -> UpliftResult<()> {
        if self.is_rate_limited().await
            && SystemTime::now() < *self.rate_limiter.reset_time.lock().await
        {
            return Err(self.rate_limit_error().await);
        }
        Ok(())
    }

    async fn rate_limit_error(&self) -> UpliftError {
        let reset_time = *self.rate_limiter.reset_time.lock().await;
        let wait = reset_time
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO);
        UpliftError::RemoteFetch(format!(
            "GitHub API rate limit exceeded. Reset in {} seconds.{}",
            wait.as_secs(),
            if self.token.is_none() {
                " Consider setting GITHUB_TOKEN to raise the limit."
            } else {
                ""
            }
        ))
    }

    /// Update rate limit from response headers
    async fn update_rate_limit(&self, response: &reqwest::Response) {
        let header_u64 = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
        };

        if let Some(remaining) = header_u64("x-ratelimit-remaining") {
            *self.rate_limiter.remaining.lock().await = Some(remaining);
        }
        if let Some(reset) = header_u64("x-ratelimit-reset") {
            *self.rate_limiter.reset_time.lock().await =
                SystemTime::UNIX_EPOCH + Duration::from_secs(reset);
        }
    }

    async fn stream_to_file(
        &self,
        mut response: reqwest::Response,
        url: &str,
        dest: &Path,
    ) -> UpliftResult<u64> {
        let save_failed = |e: std::io::Error| {
            UpliftError::RemoteFetch(format!("Cannot save {} to {}: {}", url, dest.display(), e))
        };
        let mut file = tokio::fs::File::create(dest).await.map_err(save_failed)?;
        let mut written: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| UpliftError::RemoteFetch(format!("Download of {} failed: {}", url, e)))?
        {
            file.write_all(&chunk).await.map_err(save_failed)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(save_failed)?;

        Ok(written)
    }
}

#[async_trait]
impl Transport for GitHubClient {
    async fn get_json(&self, url: &str) -> UpliftResult<Vec<u8>> {
        debug!(url = %url, "GET");
        let response = self.request(url).await?;
        let body = response.bytes().await.map_err(|e| {
            UpliftError::RemoteFetch(format!("Failed to read response from {}: {}", url, e))
        })?;
        Ok(body.to_vec())
    }

    async fn download_to_file(&self, url: &str, dest: &Path) -> UpliftResult<u64> {
        info!(url = %url, dest = %dest.display(), "Downloading archive");
        let response = self.request(url).await?;

        let written = match self.stream_to_file(response, url, dest).await {
            Ok(0) => Err(UpliftError::RemoteFetch(format!(
                "Download of {} returned no data",
                url
            ))),
            other => other,
        };

        if written.is_err() {
            if let Err(e) = tokio::fs::remove_file(dest).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(file = %dest.display(), error = %e, "Could not remove partial download");
                }
            }
        }
        written
    }
}

/// URL of the release or tag listing of a repository
pub fn listing_url(api_url: &str, owner: &str, repository: &str, source: ReleaseSource) -> String {
    format!(
        "{}/repos/{}/{}/{}",
        api_url.trim_end_matches('/'),
        urlencoding::encode(owner),
        urlencoding::encode(repository),
        source.endpoint()
    )
}

/// Accept bare `host:port` proxies by assuming plain HTTP
fn normalize_proxy(proxy: &str) -> String {
    let proxy = proxy.trim();
    if proxy.contains("://") {
        proxy.to_string()
    } else {
        format!("http://{}", proxy)
    }
}
