//! TMDB API client.
//!
//! Looks up `GET /movie/{id}` and builds the poster URL from the
//! `poster_path` field of the response. Transient failures (timeouts,
//! refused connections, 429 and 5xx) are retried with exponential
//! backoff; anything else falls straight through to the placeholder.

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::{PosterError, PosterResult};
use crate::source::{PosterSource, DEFAULT_PLACEHOLDER_URL};

pub const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MovieDetails {
    #[serde(default)]
    poster_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Connection settings for [`TmdbClient`].
#[derive(Debug, Clone)]
pub struct TmdbSettings {
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
    pub placeholder_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retries after the first attempt, for transient failures only.
    pub max_retries: usize,
    /// Delay before the first retry; doubles on each further attempt.
    pub retry_delay: Duration,
}

impl TmdbSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: TMDB_API_BASE.to_string(),
            image_base_url: TMDB_IMAGE_BASE.to_string(),
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// TMDB-backed poster source.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: Client,
    settings: TmdbSettings,
}

impl TmdbClient {
    /// Create a new TMDB client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: TmdbSettings) -> PosterResult<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .user_agent("marquee/0.1.0 (https://github.com/oxur/marquee)")
            .build()?;

        Ok(Self { http, settings })
    }

    /// Fetch the `poster_path` for a movie with a single request.
    ///
    /// Returns `Ok(None)` when TMDB knows the movie but has no poster.
    pub async fn fetch_poster_path(&self, movie_id: u64) -> PosterResult<Option<String>> {
        let url = format!(
            "{}/movie/{}",
            self.settings.base_url.trim_end_matches('/'),
            movie_id
        );

        let response = self
            .http
            .get(url.as_str())
            .query(&[
                ("api_key", self.settings.api_key.as_str()),
                ("language", "en-US"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(PosterError::RateLimited);
        }
        if !status.is_success() {
            return Err(PosterError::Status {
                status: status.as_u16(),
            });
        }

        let details: MovieDetails = response
            .json()
            .await
            .map_err(|e| PosterError::Parse(e.to_string()))?;

        Ok(details.poster_path.filter(|p| !p.is_empty()))
    }

    /// [`fetch_poster_path`](Self::fetch_poster_path) with retries for
    /// transient failures.
    pub async fn fetch_poster_path_with_retry(
        &self,
        movie_id: u64,
    ) -> PosterResult<Option<String>> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.settings.retry_delay)
            .with_max_times(self.settings.max_retries);

        let client = self;
        (move || async move { client.fetch_poster_path(movie_id).await })
            .retry(backoff)
            .when(PosterError::is_transient)
            .notify(|err, delay| {
                log::debug!(
                    "Retrying TMDB lookup for movie {} in {:?}: {}",
                    movie_id,
                    delay,
                    err
                );
            })
            .await
    }

    /// Full image URL for a TMDB `poster_path`.
    pub fn image_url(&self, poster_path: &str) -> String {
        let base = self.settings.image_base_url.trim_end_matches('/');
        if poster_path.starts_with('/') {
            format!("{}{}", base, poster_path)
        } else {
            format!("{}/{}", base, poster_path)
        }
    }
}

#[async_trait]
impl PosterSource for TmdbClient {
    async fn poster_url(&self, external_id: Option<u64>) -> String {
        let Some(movie_id) = external_id else {
            return self.settings.placeholder_url.clone();
        };

        match self.fetch_poster_path_with_retry(movie_id).await {
            Ok(Some(path)) => self.image_url(&path),
            Ok(None) => {
                log::debug!("TMDB has no poster for movie {}", movie_id);
                self.settings.placeholder_url.clone()
            }
            Err(e) => {
                log::warn!("Poster lookup for movie {} failed: {}", movie_id, e);
                self.settings.placeholder_url.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const PLACEHOLDER: &str = "https://example.com/placeholder.png";

    /// Serve canned responses, one per connection, in order. The last
    /// response repeats once the list is exhausted.
    async fn serve(responses: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let (status, body) = responses[n.min(responses.len() - 1)];

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(read) => request.extend_from_slice(&buf[..read]),
                    }
                }

                let reply = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });

        (format!("http://{}", addr), hits)
    }

    fn client(base_url: &str, max_retries: usize) -> TmdbClient {
        let mut settings = TmdbSettings::new("test-key");
        settings.base_url = base_url.to_string();
        settings.placeholder_url = PLACEHOLDER.to_string();
        settings.max_retries = max_retries;
        settings.retry_delay = Duration::from_millis(5);
        settings.timeout = Duration::from_secs(5);
        TmdbClient::new(settings).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = TmdbClient::new(TmdbSettings::new("test-key"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_image_url() {
        let client = TmdbClient::new(TmdbSettings::new("k")).unwrap();
        assert_eq!(
            client.image_url("/abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            client.image_url("abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_movie_details_deserialize() {
        let details: MovieDetails =
            serde_json::from_str(r#"{"id": 603, "poster_path": "/p.jpg", "title": "The Matrix"}"#)
                .unwrap();
        assert_eq!(details.poster_path.as_deref(), Some("/p.jpg"));

        let details: MovieDetails = serde_json::from_str(r#"{"poster_path": null}"#).unwrap();
        assert!(details.poster_path.is_none());

        let details: MovieDetails = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(details.poster_path.is_none());
    }

    #[tokio::test]
    async fn test_poster_url_success() {
        let (base, _) = serve(vec![(200, r#"{"poster_path": "/matrix.jpg"}"#)]).await;
        let url = client(&base, 0).poster_url(Some(603)).await;
        assert_eq!(url, "https://image.tmdb.org/t/p/w500/matrix.jpg");
    }

    #[tokio::test]
    async fn test_poster_url_without_id_skips_request() {
        let (base, hits) = serve(vec![(200, r#"{"poster_path": "/x.jpg"}"#)]).await;
        let url = client(&base, 0).poster_url(None).await;
        assert_eq!(url, PLACEHOLDER);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_poster_path_falls_back() {
        let (base, _) = serve(vec![(200, r#"{"poster_path": null}"#)]).await;
        assert_eq!(client(&base, 0).poster_url(Some(1)).await, PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let (base, hits) = serve(vec![(404, r#"{"status_code": 34}"#)]).await;
        assert_eq!(client(&base, 3).poster_url(Some(1)).await, PLACEHOLDER);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let (base, hits) = serve(vec![
            (503, "{}"),
            (503, "{}"),
            (200, r#"{"poster_path": "/late.jpg"}"#),
        ])
        .await;
        let url = client(&base, 2).poster_url(Some(1)).await;
        assert_eq!(url, "https://image.tmdb.org/t/p/w500/late.jpg");
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_exhausted_falls_back() {
        let (base, hits) = serve(vec![(500, "{}")]).await;
        assert_eq!(client(&base, 1).poster_url(Some(1)).await, PLACEHOLDER);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let (base, _) = serve(vec![(200, "not json")]).await;
        assert_eq!(client(&base, 0).poster_url(Some(1)).await, PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_unreachable_host_falls_back() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = client(&format!("http://{}", addr), 0)
            .poster_url(Some(1))
            .await;
        assert_eq!(url, PLACEHOLDER);
    }
}
