use async_trait::async_trait;

/// Image shown when no poster can be found.
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://via.placeholder.com/500x750?text=No+Poster";

/// Something that can turn a movie's external id into a poster URL.
///
/// Implementations must always return a displayable URL.
#[async_trait]
pub trait PosterSource: Send + Sync + std::fmt::Debug {
    async fn poster_url(&self, external_id: Option<u64>) -> String;
}

/// Poster source used when no TMDB API key is configured.
#[derive(Debug, Clone)]
pub struct PlaceholderPosters {
    placeholder_url: String,
}

impl PlaceholderPosters {
    pub fn new(placeholder_url: impl Into<String>) -> Self {
        Self {
            placeholder_url: placeholder_url.into(),
        }
    }
}

impl Default for PlaceholderPosters {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_URL)
    }
}

#[async_trait]
impl PosterSource for PlaceholderPosters {
    async fn poster_url(&self, _external_id: Option<u64>) -> String {
        self.placeholder_url.clone()
    }
}
