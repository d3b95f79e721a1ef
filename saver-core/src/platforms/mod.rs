pub mod traits;

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Instagram,
    TikTok,
    YouTube,
    Facebook,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Instagram,
        Platform::TikTok,
        Platform::YouTube,
        Platform::Facebook,
    ];

    /// Classifies a link by the shape of its query-stripped form.
    ///
    /// Every predicate is evaluated independently; when more than one holds the
    /// result follows Instagram, TikTok, Facebook, YouTube order.
    pub fn from_url(url: &str) -> Option<Self> {
        let clean = strip_query(url.trim()).to_lowercase();

        let is_instagram =
            clean.contains("instagram.com/reel/") || clean.contains("instagram.com/p/");
        let is_tiktok = clean.contains("tiktok.com") && clean.contains("/video/");
        let is_youtube = clean.contains("youtube.com") || clean.contains("youtu.be");
        let is_facebook = clean.contains("facebook.com")
            || clean.contains("fb.watch/")
            || clean.contains("fb.com");

        if is_instagram {
            Some(Platform::Instagram)
        } else if is_tiktok {
            Some(Platform::TikTok)
        } else if is_facebook {
            Some(Platform::Facebook)
        } else if is_youtube {
            Some(Platform::YouTube)
        } else {
            None
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
            Platform::Facebook => "Facebook",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

pub fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instagram_reel_and_post() {
        assert_eq!(
            Platform::from_url("https://www.instagram.com/reel/Cabc123/"),
            Some(Platform::Instagram)
        );
        assert_eq!(
            Platform::from_url("https://instagram.com/p/Cxyz/?igsh=abc"),
            Some(Platform::Instagram)
        );
    }

    #[test]
    fn instagram_profile_is_unsupported() {
        assert_eq!(Platform::from_url("https://www.instagram.com/someone/"), None);
    }

    #[test]
    fn tiktok_needs_video_path() {
        assert_eq!(
            Platform::from_url("https://www.tiktok.com/@user/video/123?lang=en"),
            Some(Platform::TikTok)
        );
        assert_eq!(Platform::from_url("https://www.tiktok.com/@user"), None);
    }

    #[test]
    fn youtube_any_path() {
        assert_eq!(
            Platform::from_url("https://www.youtube.com/shorts/abc"),
            Some(Platform::YouTube)
        );
        assert_eq!(Platform::from_url("https://youtu.be/x"), Some(Platform::YouTube));
    }

    #[test]
    fn query_string_does_not_change_classification() {
        assert_eq!(
            Platform::from_url("https://youtu.be/x?t=5"),
            Platform::from_url("https://youtu.be/x")
        );
        assert_eq!(Platform::from_url("https://example.com/?u=youtube.com"), None);
    }

    #[test]
    fn facebook_domains() {
        assert_eq!(
            Platform::from_url("https://www.facebook.com/user/videos/1234"),
            Some(Platform::Facebook)
        );
        assert_eq!(Platform::from_url("https://fb.watch/abcd/"), Some(Platform::Facebook));
        assert_eq!(Platform::from_url("https://fb.com/watch/1"), Some(Platform::Facebook));
    }

    #[test]
    fn unrelated_links_are_unsupported() {
        for url in [
            "https://vimeo.com/12345",
            "https://twitter.com/user/status/1",
            "not a url at all",
            "",
        ] {
            assert_eq!(Platform::from_url(url), None, "{url}");
        }
    }

    #[test]
    fn mixed_case_host() {
        assert_eq!(
            Platform::from_url("https://WWW.YouTube.com/watch?v=abc"),
            Some(Platform::YouTube)
        );
    }

    #[test]
    fn display_names() {
        let names: Vec<String> = Platform::ALL.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, ["Instagram", "TikTok", "YouTube", "Facebook"]);
    }
}
