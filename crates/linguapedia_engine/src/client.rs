use std::time::Duration;

use linguapedia_core::{ArticleRoute, CacheEntry, SearchRequest, StatusReport, Verdict};
use linguapedia_logging::{lp_debug, lp_info};
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect, Response, StatusCode};
use url::Url;

use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Where the poll loop gets job status from. The seam lets tests script responses.
#[async_trait::async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, route: &ArticleRoute) -> Result<StatusReport, FetchError>;
}

/// HTTP client for the synthesis backend.
///
/// Redirects are never followed: the backend answers form posts and
/// destructive actions with a redirect, and the caller gets the `Location`.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base: Url,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, FetchError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("{base} cannot be used as a base url"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Joins percent-encoded path segments onto the base url.
    pub fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                FetchError::new(FailureKind::InvalidUrl, "base url cannot carry a path")
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    pub async fn status(&self, route: &ArticleRoute) -> Result<StatusReport, FetchError> {
        let url = self.endpoint(route.status_segments())?;
        lp_debug!("GET {}", url);
        let response = send(self.client.get(url)).await?;
        let status = response.status();
        if status.is_success() {
            let body = response.text().await.map_err(map_reqwest_error)?;
            return StatusReport::from_json(&body)
                .map_err(|err| FetchError::new(FailureKind::InvalidPayload, err.to_string()));
        }

        // An error status carrying a terminal report (an unknown job) is still an answer.
        let body = response.text().await.unwrap_or_default();
        match StatusReport::from_json(&body) {
            Ok(report) if report.verdict() != Verdict::Continue => {
                lp_debug!("{} answered {} with a terminal report", route, status);
                Ok(report)
            }
            _ => Err(http_status_error(status)),
        }
    }

    /// Posts the search form and returns where the backend sends the user
    /// (normally the job's status page), resolved against the base url.
    pub async fn submit_search(&self, request: &SearchRequest) -> Result<String, FetchError> {
        let url = self.endpoint(["search"])?;
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(request.form_fields())
            .finish();
        lp_info!(
            "Submitting search title={:?} language={} max_translations={}",
            request.title(),
            request.language().code,
            request.max_translations()
        );
        let response = send(
            self.client
                .post(url)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body),
        )
        .await?;
        self.redirect_target(&response)?
            .ok_or_else(|| FetchError::new(FailureKind::MissingLocation, "search was not redirected"))
    }

    /// Asks the backend to redo synthesis for `route`, bypassing its cache.
    /// Returns the redirect target when the backend gives one.
    pub async fn regenerate(&self, route: &ArticleRoute) -> Result<Option<String>, FetchError> {
        let url = self.endpoint(route.regenerate_segments())?;
        lp_info!("Requesting regeneration of {}", route);
        let response = send(self.client.get(url)).await?;
        self.redirect_target(&response)
    }

    pub async fn download_article(&self, route: &ArticleRoute) -> Result<String, FetchError> {
        let url = self.endpoint(route.download_segments())?;
        lp_debug!("GET {}", url);
        let response = require_success(send(self.client.get(url)).await?)?;
        response.text().await.map_err(map_reqwest_error)
    }

    pub async fn list_cache(&self) -> Result<Vec<CacheEntry>, FetchError> {
        let url = self.endpoint(["api", "cache"])?;
        lp_debug!("GET {}", url);
        let response = require_success(send(self.client.get(url)).await?)?;
        let body = response.text().await.map_err(map_reqwest_error)?;
        serde_json::from_str(&body)
            .map_err(|err| FetchError::new(FailureKind::InvalidPayload, err.to_string()))
    }

    pub async fn clear_cache(&self) -> Result<(), FetchError> {
        let url = self.endpoint(["cache", "clear"])?;
        lp_info!("Clearing the article cache");
        let response = send(self.client.post(url)).await?;
        self.redirect_target(&response).map(|_| ())
    }

    /// Accepts 2xx and 3xx answers. For 3xx, returns the resolved `Location`.
    fn redirect_target(&self, response: &Response) -> Result<Option<String>, FetchError> {
        let status = response.status();
        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| {
                    FetchError::new(FailureKind::MissingLocation, status.to_string())
                })?;
            let resolved = self
                .base
                .join(location)
                .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
            return Ok(Some(resolved.to_string()));
        }
        if status.is_success() {
            return Ok(None);
        }
        Err(http_status_error(status))
    }
}

#[async_trait::async_trait]
impl StatusSource for BackendClient {
    async fn fetch_status(&self, route: &ArticleRoute) -> Result<StatusReport, FetchError> {
        self.status(route).await
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<Response, FetchError> {
    request.send().await.map_err(map_reqwest_error)
}

fn require_success(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(http_status_error(status))
    }
}

fn http_status_error(status: StatusCode) -> FetchError {
    FetchError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::InvalidPayload, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
