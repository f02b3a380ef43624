//! Avatar resolution and inlining.
//!
//! Candidates are tried strictly in order and the first one that yields a
//! non-empty image body wins. The winner is embedded as a `data:` URI so the
//! rendered card has no external image reference.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info, warn};

use crate::client::{HttpFetch, HttpResponse};
use crate::error::{AcquisitionError, FetchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarSource {
    /// Project-specific location tried first.
    Preferred,
    /// The profile's `avatar_url` with a size hint.
    Profile,
    /// Platform default avatar, used when the profile has no `avatar_url`.
    PlatformDefault,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarCandidate {
    pub source: AvatarSource,
    pub url: String,
}

/// Appends `s=<size>` to `url`, joining with `&` when a query string exists.
pub fn sized_avatar_url(url: &str, size: u32) -> String {
    if url.contains('?') {
        format!("{url}&s={size}")
    } else {
        format!("{url}?s={size}")
    }
}

/// The ordered fallback chain: preferred location, then the profile avatar
/// (or the platform default when the profile has none), size-hinted.
pub fn avatar_candidates(
    preferred_url: &str,
    profile_avatar_url: Option<&str>,
    platform_default_url: &str,
    size: u32,
) -> Vec<AvatarCandidate> {
    let fallback = match profile_avatar_url.filter(|u| !u.is_empty()) {
        Some(url) => AvatarCandidate {
            source: AvatarSource::Profile,
            url: sized_avatar_url(url, size),
        },
        None => AvatarCandidate {
            source: AvatarSource::PlatformDefault,
            url: sized_avatar_url(platform_default_url, size),
        },
    };
    vec![
        AvatarCandidate {
            source: AvatarSource::Preferred,
            url: preferred_url.to_string(),
        },
        fallback,
    ]
}

/// Tries each candidate in turn and returns the first as a `data:` URI.
pub async fn resolve_avatar(
    fetcher: &dyn HttpFetch,
    candidates: &[AvatarCandidate],
) -> Result<String, AcquisitionError> {
    let mut attempts = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        debug!(url = %candidate.url, source = ?candidate.source, "fetching avatar");
        match fetch_image(fetcher, &candidate.url).await {
            Ok(response) => {
                let data_uri = to_data_uri(&response);
                info!(
                    url = %candidate.url,
                    source = ?candidate.source,
                    bytes = response.body.len(),
                    "avatar resolved"
                );
                return Ok(data_uri);
            }
            Err(err) => {
                warn!(url = %candidate.url, source = ?candidate.source, error = %err, "avatar source failed");
                attempts.push((candidate.url.clone(), err));
            }
        }
    }

    Err(AcquisitionError::Avatar { attempts })
}

async fn fetch_image(fetcher: &dyn HttpFetch, url: &str) -> Result<HttpResponse, FetchError> {
    let response = fetcher.get(url, None).await?;
    if !response.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status,
        });
    }
    if response.body.is_empty() {
        return Err(FetchError::Empty {
            url: url.to_string(),
        });
    }
    Ok(response)
}

/// Encodes the image body as `data:<mime>;base64,<payload>`.
pub fn to_data_uri(response: &HttpResponse) -> String {
    let mime = image_mime(response.content_type.as_deref(), &response.body);
    format!("data:{mime};base64,{}", STANDARD.encode(&response.body))
}

/// Declared `image/*` type if present, otherwise sniffed from the bytes.
fn image_mime(declared: Option<&str>, bytes: &[u8]) -> String {
    let declared = declared
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .filter(|ct| ct.starts_with("image/"));
    if let Some(mime) = declared {
        return mime;
    }

    image::guess_format(bytes)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| "application/octet-stream".to_string())
}
