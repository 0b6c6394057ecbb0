//! Reference photos from Unsplash's random photo search.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::AppConfig;

/// Stock photo illustrating a style. `url` is `None` when nothing matched.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ReferenceImage {
    /// Image URL, as returned by Unsplash.
    pub url: Option<String>,
}

/// Why the image lookup failed.
#[derive(Debug)]
pub enum ImageError {
    /// `UNSPLASH_ACCESS_KEY` was not configured.
    MissingAccessKey,
    /// The base URL could not be combined into a request URL.
    Url(url::ParseError),
    /// The request never completed.
    Transport(reqwest::Error),
    /// Unsplash answered with a non-success status.
    Status(u16),
    /// The body was not JSON.
    Malformed(serde_json::Error),
}

impl std::fmt::Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAccessKey => write!(f, "UNSPLASH_ACCESS_KEY is not set"),
            Self::Url(err) => write!(f, "Invalid Unsplash URL: {err}"),
            Self::Transport(err) => write!(f, "Request to Unsplash failed: {err}"),
            Self::Status(status) => write!(f, "Unsplash answered {status}"),
            Self::Malformed(err) => write!(f, "Failed to parse Unsplash response: {err}"),
        }
    }
}

impl std::error::Error for ImageError {}

impl From<reqwest::Error> for ImageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

impl From<url::ParseError> for ImageError {
    fn from(err: url::ParseError) -> Self {
        Self::Url(err)
    }
}

#[derive(Deserialize, Debug)]
struct RandomPhoto {
    #[serde(default)]
    urls: Option<PhotoUrls>,
}

#[derive(Deserialize, Debug)]
struct PhotoUrls {
    #[serde(default)]
    regular: Option<String>,
}

fn random_photo_url(config: &AppConfig, access_key: &str, query: &str) -> Result<Url, ImageError> {
    let base = format!("{}/photos/random", config.unsplash_base_url);
    Ok(Url::parse_with_params(
        &base,
        [("query", query), ("client_id", access_key)],
    )?)
}

/// Looks up one photo matching `query`.
///
/// A well-formed answer without `urls.regular` is an empty [`ReferenceImage`],
/// not an error.
pub async fn fetch_reference_image(
    client: &reqwest::Client,
    config: &AppConfig,
    query: &str,
) -> Result<ReferenceImage, ImageError> {
    let access_key = config
        .unsplash_access_key
        .as_deref()
        .ok_or(ImageError::MissingAccessKey)?;
    let url = random_photo_url(config, access_key, query)?;

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ImageError::Status(status.as_u16()));
    }
    let bytes = response.bytes().await?;
    let photo: RandomPhoto = serde_json::from_slice(&bytes).map_err(ImageError::Malformed)?;
    let url = photo.urls.and_then(|urls| urls.regular);
    debug!("Unsplash image for {query}: {url:?}");
    Ok(ReferenceImage { url })
}
