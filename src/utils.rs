// src/utils.rs

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// 可识别的视频站点链接形态：任意协议、可选 `www.`、任意子域和路径
pub static VIDEO_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(https?://)?(www\.)?(youtube|youtu|youtube-nocookie)\.(com|be)/.+").unwrap()
});

pub fn is_valid_video_url(text: &str) -> bool {
    VIDEO_URL_PATTERN.is_match(text)
}

/// 朴素的视频 ID 提取：取第一个 `v=` 之后（到下一个 `v=` 为止）的文本，否则取最后一段路径。
/// 不做任何校验，`&t=...` 之类的尾巴会原样保留。
pub fn extract_video_id(url: &str) -> String {
    if let Some(after) = url.split("v=").nth(1) {
        return after.to_string();
    }
    url.rsplit('/').next().unwrap_or_default().to_string()
}

/// 严格的视频 ID 解析，只认识几种标准链接形态
pub fn parse_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let id = match parsed.host_str()? {
        "youtu.be" => parsed.path().trim_start_matches('/').to_string(),
        "www.youtube.com" | "youtube.com" => {
            let path = parsed.path();
            if path == "/watch" {
                parsed
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned())?
            } else if path.starts_with("/embed/") || path.starts_with("/v/") {
                path.split('/').nth(2)?.to_string()
            } else {
                return None;
            }
        }
        _ => return None,
    };
    if id.is_empty() { None } else { Some(id) }
}

/// 替换模板中的 `{key}` 占位符
pub fn render_template(template: &str, params: &[(&str, &str)]) -> String {
    let mut rendered = template.to_string();
    for (key, val) in params {
        rendered = rendered.replace(&format!("{{{}}}", key), val);
    }
    rendered
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}
