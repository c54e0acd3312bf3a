//! Supported social platforms.
//!
//! This table is the only place platforms are listed. Intake normalization,
//! storage columns, the card view and the templates all iterate
//! [`SocialPlatform::ALL`], so its order is the display order.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SocialPlatform {
    Line,
    Whatsapp,
    Linkedin,
    Instagram,
    Threads,
    X,
    Wechat,
    Facebook,
}

impl SocialPlatform {
    pub const ALL: [Self; 8] = [
        Self::Line,
        Self::Whatsapp,
        Self::Linkedin,
        Self::Instagram,
        Self::Threads,
        Self::X,
        Self::Wechat,
        Self::Facebook,
    ];

    /// Stable key used in form fields (`social_<key>`, `<key>_url`),
    /// JSON maps and column names (`<key>_url`).
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Whatsapp => "whatsapp",
            Self::Linkedin => "linkedin",
            Self::Instagram => "instagram",
            Self::Threads => "threads",
            Self::X => "x",
            Self::Wechat => "wechat",
            Self::Facebook => "facebook",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Line => "LINE",
            Self::Whatsapp => "WhatsApp",
            Self::Linkedin => "LinkedIn",
            Self::Instagram => "Instagram",
            Self::Threads => "Threads",
            Self::X => "X",
            Self::Wechat => "WeChat",
            Self::Facebook => "Facebook",
        }
    }

    /// Public path of the platform icon.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Line => "/static/icons/line.svg",
            Self::Whatsapp => "/static/icons/whatsapp.svg",
            Self::Linkedin => "/static/icons/linkedin.svg",
            Self::Instagram => "/static/icons/instagram.svg",
            Self::Threads => "/static/icons/threads.svg",
            Self::X => "/static/icons/x.svg",
            Self::Wechat => "/static/icons/wechat.svg",
            Self::Facebook => "/static/icons/facebook.svg",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// Social URLs of a profile, at most one per platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialLinks(BTreeMap<SocialPlatform, String>);

impl SocialLinks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, platform: SocialPlatform) -> Option<&str> {
        self.0.get(&platform).map(String::as_str)
    }

    /// `None` removes the platform.
    pub fn set(&mut self, platform: SocialPlatform, url: Option<String>) {
        match url {
            Some(url) => {
                self.0.insert(platform, url);
            }
            None => {
                self.0.remove(&platform);
            }
        }
    }

    /// Present links in table order.
    pub fn entries(&self) -> impl Iterator<Item = (SocialPlatform, &str)> {
        self.0.iter().map(|(p, url)| (*p, url.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(SocialPlatform, String)> for SocialLinks {
    fn from_iter<T: IntoIterator<Item = (SocialPlatform, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
