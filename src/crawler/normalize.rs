//! 图片引用的选择、补全与校验

use anyhow::{Context, Result, anyhow};
use url::Url;

pub const DEFAULT_EXTENSION: &str = ".jpg";
const ALLOWED_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

fn looks_like_address(value: &str) -> bool {
    value.starts_with("http://")
        || value.starts_with("https://")
        || value.starts_with("//")
        || value.starts_with('/')
}

/// 懒加载占位图常用内联 `data:` 地址，不算章节图片
fn is_inline_data(value: &str) -> bool {
    value
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("data:"))
}

/// 在 data-src 与 src 之间选出原始引用。
///
/// 优先像地址的 data-src，其次像地址的 src，最后接受任一非空值。
/// 空值和内联 `data:` 值视为不存在。
pub fn pick_reference<'a>(data_src: Option<&'a str>, src: Option<&'a str>) -> Option<&'a str> {
    let usable = |v: &&str| !v.is_empty() && !is_inline_data(v);
    let data_src = data_src.map(str::trim).filter(usable);
    let src = src.map(str::trim).filter(usable);

    match (data_src, src) {
        (Some(d), _) if looks_like_address(d) => Some(d),
        (_, Some(s)) if looks_like_address(s) => Some(s),
        (d, s) => d.or(s),
    }
}

/// 把引用补全为绝对地址，`page_url` 只用于站内根路径
pub fn absolutize(reference: &str, page_url: &str) -> Result<String> {
    if reference.starts_with("//") {
        return Ok(format!("https:{}", reference));
    }
    if reference.starts_with('/') {
        let base = Url::parse(page_url).with_context(|| format!("无效的页面地址: {}", page_url))?;
        if !base.has_host() {
            return Err(anyhow!("页面地址缺少主机: {}", page_url));
        }
        return Ok(format!("{}{}", base.origin().ascii_serialization(), reference));
    }
    Ok(reference.to_string())
}

/// 补全并校验，返回可用的图片地址
pub fn normalize(reference: &str, page_url: &str) -> Result<Url> {
    let absolute = absolutize(reference, page_url)?;
    Url::parse(&absolute).with_context(|| format!("无效的图片地址: {}", absolute))
}

/// 从路径最后一段取扩展名，不在白名单内则用 `.jpg`
pub fn extension_of(image_url: &Url) -> &'static str {
    let last_segment = image_url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    let Some(dot) = last_segment.rfind('.') else {
        return DEFAULT_EXTENSION;
    };
    let candidate = last_segment[dot..].to_ascii_lowercase();

    ALLOWED_EXTENSIONS
        .iter()
        .find(|ext| **ext == candidate)
        .copied()
        .unwrap_or(DEFAULT_EXTENSION)
}
