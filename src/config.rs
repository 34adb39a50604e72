use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://manhwa18.cc";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 环境变量，覆盖默认站点地址
pub const BASE_URL_ENV: &str = "MANHWA_FETCH_BASE_URL";

#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub chapter_delay: Duration, // 两次章节请求之间的间隔
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            chapter_delay: Duration::from_millis(500),
        }
    }
}

impl CrawlerConfig {
    /// 读取环境变量后的配置
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var(BASE_URL_ENV) {
            Ok(base_url) if !base_url.trim().is_empty() => config.with_base_url(&base_url),
            _ => config,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_chapter_delay(mut self, delay: Duration) -> Self {
        self.chapter_delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `<base>/webtoon/<slug>/chapter-<n>`
    pub fn chapter_url(&self, slug: &str, chapter_number: u32) -> String {
        format!("{}/webtoon/{}/chapter-{}", self.base_url, slug, chapter_number)
    }
}
