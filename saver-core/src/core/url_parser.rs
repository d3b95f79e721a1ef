use crate::platforms::{self, Platform};

/// One incoming link, classified once and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRequest {
    pub raw_url: String,
    pub clean_url: String,
    pub platform: Option<Platform>,
}

impl MediaRequest {
    pub fn parse(raw: &str) -> Self {
        let raw_url = raw.trim().to_string();
        let clean_url = platforms::strip_query(&raw_url).to_string();
        let platform = Platform::from_url(&raw_url);

        Self {
            raw_url,
            clean_url,
            platform,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.platform.is_some()
    }

    /// Link handed to the resolver.
    ///
    /// Query parameters are dropped, except on YouTube and Facebook watch
    /// pages where the video id itself lives in `?v=`.
    pub fn resolver_url(&self) -> &str {
        let id_in_query = matches!(self.platform, Some(Platform::YouTube | Platform::Facebook));
        if id_in_query && has_video_param(&self.raw_url) {
            return &self.raw_url;
        }
        &self.clean_url
    }
}

fn has_video_param(url: &str) -> bool {
    url::Url::parse(url)
        .map(|parsed| parsed.query_pairs().any(|(k, _)| k == "v"))
        .unwrap_or(false)
}
