pub mod extractor;
pub mod normalize;
pub mod strategy;
pub mod validate;

pub use extractor::{ChapterSource, Extraction, PageExtractor, PageStatus};
pub use validate::{Field, FieldError, ValidationErrors};

use std::any::Any;
use std::panic::AssertUnwindSafe;

use anyhow::Result;
use futures::FutureExt;
use log::{error, info, warn};

use crate::config::CrawlerConfig;
use crate::models::{AggregateResult, ChapterRangeRequest, ImageEntry, RangeInput};
use crate::utils::sanitize_slug;
use validate::{validate_input, validate_request};

pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred while fetching images.";

/// 章节范围爬虫：逐章顺序获取，汇总所有图片
pub struct ManhwaCrawler<S = PageExtractor> {
    config: CrawlerConfig,
    source: S,
}

impl ManhwaCrawler<PageExtractor> {
    pub fn new() -> Result<Self> {
        Self::with_config(CrawlerConfig::default())
    }

    pub fn with_config(config: CrawlerConfig) -> Result<Self> {
        let source = PageExtractor::new(&config)?;
        Ok(Self { config, source })
    }
}

/// 一次范围爬取的中间状态
#[derive(Debug, Default)]
struct RangeOutcome {
    images: Vec<ImageEntry>,
    succeeded: u32,
    errors: Vec<String>,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn describe_range(start: u32, end: u32) -> String {
    if start == end {
        format!("chapter {}", start)
    } else {
        format!("chapters {}–{}", start, end)
    }
}

impl RangeOutcome {
    fn into_result(self, manga_name: &str, start: u32, end: u32, constructed_url: String) -> AggregateResult {
        if self.images.is_empty() {
            let error = if self.errors.is_empty() {
                format!(
                    "No images found for '{}' in {}. The manga or chapters might not exist, \
                     the pages have no images, or the page layout was not recognized.",
                    manga_name,
                    describe_range(start, end)
                )
            } else {
                format!("No images found. Errors encountered: {}", self.errors.join("; "))
            };
            return AggregateResult::failure(error, Some(constructed_url));
        }

        let requested = end - start + 1;
        let missing = requested - self.succeeded;
        let mut message = format!(
            "Successfully fetched {} images from {} chapter(s).",
            self.images.len(),
            self.succeeded
        );
        if missing > 0 {
            message.push_str(&format!(
                " {} chapter(s) in range could not be fetched or contained no images.",
                missing
            ));
        }

        AggregateResult::success(self.images, message, constructed_url)
    }
}

impl<S: ChapterSource> ManhwaCrawler<S> {
    pub fn with_source(config: CrawlerConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// 处理调用方的原始输入，总是返回结果而不是错误
    pub async fn run(&self, input: &RangeInput) -> AggregateResult {
        match validate_input(input) {
            Ok(request) => self.run_validated(&request).await,
            Err(errors) => {
                warn!("输入校验失败: {}", errors);
                AggregateResult::failure(errors.to_string(), None)
            }
        }
    }

    pub async fn run_request(&self, request: &ChapterRangeRequest) -> AggregateResult {
        if let Err(errors) = validate_request(request) {
            warn!("输入校验失败: {}", errors);
            return AggregateResult::failure(errors.to_string(), None);
        }
        self.run_validated(request).await
    }

    async fn run_validated(&self, request: &ChapterRangeRequest) -> AggregateResult {
        let slug = sanitize_slug(&request.manga_name);
        let start = request.start_chapter;
        let end = request.resolved_end();

        let constructed_url = if request.is_single_chapter() {
            self.config.chapter_url(&slug, start)
        } else {
            format!("{} for '{}'", describe_range(start, end), request.manga_name)
        };

        match AssertUnwindSafe(self.fetch_range(&slug, start, end))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome.into_result(&request.manga_name, start, end, constructed_url),
            Err(payload) => {
                error!("爬取 '{}' 时发生意外错误: {}", slug, panic_message(&*payload));
                AggregateResult::failure(UNEXPECTED_ERROR, Some(constructed_url))
            }
        }
    }

    async fn fetch_range(&self, slug: &str, start: u32, end: u32) -> RangeOutcome {
        let mut outcome = RangeOutcome::default();

        for chapter_number in start..=end {
            // 避免请求过快
            if chapter_number > start && !self.config.chapter_delay.is_zero() {
                tokio::time::sleep(self.config.chapter_delay).await;
            }

            let page_url = self.config.chapter_url(slug, chapter_number);
            let extraction = AssertUnwindSafe(self.source.extract(&page_url, slug, chapter_number))
                .catch_unwind()
                .await;

            match extraction {
                Ok(extraction) if !extraction.is_empty() => {
                    info!("章节 {}: {} 张图片", chapter_number, extraction.images.len());
                    outcome.succeeded += 1;
                    outcome.images.extend(extraction.into_images());
                }
                Ok(extraction) => {
                    info!("章节 {}: 没有图片 ({:?})", chapter_number, extraction.status);
                }
                Err(payload) => {
                    let message = format!("Chapter {}: {}", chapter_number, panic_message(&*payload));
                    error!("{}", message);
                    outcome.errors.push(message);
                }
            }
        }

        outcome
    }
}
