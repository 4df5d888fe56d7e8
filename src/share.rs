// src/share.rs

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::str::FromStr;

/// 与浏览器 `encodeURIComponent` 一致：保留 `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePlatform {
    Facebook,
    Twitter,
    WhatsApp,
    /// 只能打开主页，无法预填分享内容
    Instagram,
}

impl SharePlatform {
    pub const ALL: [SharePlatform; 4] = [
        SharePlatform::Facebook,
        SharePlatform::Twitter,
        SharePlatform::WhatsApp,
        SharePlatform::Instagram,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            SharePlatform::Facebook => "facebook",
            SharePlatform::Twitter => "twitter",
            SharePlatform::WhatsApp => "whatsapp",
            SharePlatform::Instagram => "instagram",
        }
    }

    pub fn share_url(&self, url: &str) -> String {
        let encoded = encode_uri_component(url);
        match self {
            SharePlatform::Facebook => {
                format!("https://www.facebook.com/sharer/sharer.php?u={}", encoded)
            }
            SharePlatform::Twitter => format!("https://twitter.com/intent/tweet?url={}", encoded),
            SharePlatform::WhatsApp => format!("https://api.whatsapp.com/send?text={}", encoded),
            SharePlatform::Instagram => format!("https://www.instagram.com/?url={}", encoded),
        }
    }
}

impl FromStr for SharePlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SharePlatform::ALL
            .into_iter()
            .find(|p| p.tag() == s)
            .ok_or_else(|| format!("未知的分享平台 '{}'", s))
    }
}

pub fn encode_uri_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// 按平台标签生成分享链接，未知标签返回空字符串
pub fn share_url(platform: &str, url: &str) -> String {
    platform
        .parse::<SharePlatform>()
        .map(|p| p.share_url(url))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_url_templates() {
        let target = "https://example.com";
        assert_eq!(
            share_url("twitter", target),
            "https://twitter.com/intent/tweet?url=https%3A%2F%2Fexample.com"
        );
        assert_eq!(
            share_url("facebook", target),
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fexample.com"
        );
        assert_eq!(
            share_url("whatsapp", target),
            "https://api.whatsapp.com/send?text=https%3A%2F%2Fexample.com"
        );
        assert_eq!(
            share_url("instagram", target),
            "https://www.instagram.com/?url=https%3A%2F%2Fexample.com"
        );
    }

    #[test]
    fn test_unknown_platform_is_empty() {
        assert_eq!(share_url("unknown", "https://example.com"), "");
        // 标签区分大小写
        assert_eq!(share_url("Twitter", "https://example.com"), "");
        assert_eq!(share_url("", "https://example.com"), "");
    }

    #[test]
    fn test_encode_uri_component_matches_browser() {
        assert_eq!(encode_uri_component("a b&c=d/e?f#g"), "a%20b%26c%3Dd%2Fe%3Ff%23g");
        assert_eq!(encode_uri_component("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(encode_uri_component("视频"), "%E8%A7%86%E9%A2%91");
    }
}
