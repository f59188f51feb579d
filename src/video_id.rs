/// Video identity extraction for watch-page URLs
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Query parameter that carries the video identifier on a watch page
pub const VIDEO_PARAM: &str = "v";

/// Path of the watch page
pub const WATCH_PATH: &str = "/watch";

/// Opaque identifier of a video on the host site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> VideoId {
        VideoId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a page address looks like from the extension's point of view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    /// A watch page with a non-empty video parameter
    Watch(VideoId),
    /// The watch host, but no usable video parameter
    OnSite,
    /// Anything else (other hosts, unparseable addresses)
    OffSite,
}

/// Classify a page address against the watch host
///
/// Algorithm:
/// 1. Parse the address; only http(s) counts
/// 2. The host must equal `watch_host` or be a subdomain of it
/// 3. The path must be `/watch`
/// 4. The `v` query parameter must be present and non-empty
///
/// Examples (watch_host = "youtube.com"):
/// - https://www.youtube.com/watch?v=XYZ → Watch("XYZ")
/// - https://m.youtube.com/watch?v=XYZ&t=42 → Watch("XYZ")
/// - https://www.youtube.com/feed/trending → OnSite
/// - https://notyoutube.com/watch?v=XYZ → OffSite
pub fn classify_page(url: &str, watch_host: &str) -> PageKind {
    let parsed = match Url::parse(url.trim()) {
        Ok(parsed) => parsed,
        Err(_) => return PageKind::OffSite,
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return PageKind::OffSite;
    }

    let on_site = parsed
        .host_str()
        .map_or(false, |host| host_matches(host, watch_host));
    if !on_site {
        return PageKind::OffSite;
    }

    if parsed.path() != WATCH_PATH {
        return PageKind::OnSite;
    }

    parsed
        .query_pairs()
        .find(|(key, _)| key == VIDEO_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .map_or(PageKind::OnSite, |value| PageKind::Watch(VideoId(value)))
}

/// Extract the video identifier from a watch-page address, if any
pub fn extract_video_id(url: &str, watch_host: &str) -> Option<VideoId> {
    match classify_page(url, watch_host) {
        PageKind::Watch(id) => Some(id),
        PageKind::OnSite | PageKind::OffSite => None,
    }
}

fn host_matches(host: &str, watch_host: &str) -> bool {
    let host = host.to_lowercase();
    let watch_host = watch_host.to_lowercase();

    host == watch_host
        || host
            .strip_suffix(&watch_host)
            .map_or(false, |prefix| prefix.ends_with('.'))
}
