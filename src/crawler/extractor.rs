use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use scraper::Html;

use super::normalize::{extension_of, normalize, pick_reference};
use super::strategy::{Strategy, default_chain, locate_images};
use crate::config::CrawlerConfig;
use crate::models::ImageEntry;

/// 章节页面的获取结果，仅用于诊断
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    Parsed,
    HttpStatus(u16),
    Failed(String),
}

/// 单个章节页面的提取结果。
///
/// 任何失败都表示为空的图片列表，`status` 说明原因。
#[derive(Debug, Clone)]
pub struct Extraction {
    pub images: Vec<ImageEntry>,
    pub status: PageStatus,
}

impl Extraction {
    pub fn found(images: Vec<ImageEntry>) -> Self {
        Self { images, status: PageStatus::Parsed }
    }

    pub fn empty(status: PageStatus) -> Self {
        Self { images: Vec::new(), status }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn into_images(self) -> Vec<ImageEntry> {
        self.images
    }
}

/// 章节图片来源，爬虫对每个章节调用一次
#[async_trait]
pub trait ChapterSource: Send + Sync {
    async fn extract(&self, page_url: &str, manga_slug: &str, chapter_number: u32) -> Extraction;
}

pub fn image_file_name(manga_slug: &str, chapter_number: u32, position: usize, extension: &str) -> String {
    format!("{}_chapter_{}_page_{}{}", manga_slug, chapter_number, position, extension)
}

pub struct PageExtractor {
    client: reqwest::Client,
    chain: Vec<Strategy>,
}

impl PageExtractor {
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .context("创建 HTTP 客户端失败")?;

        Self::with_client(client)
    }

    pub fn with_client(client: reqwest::Client) -> Result<Self> {
        Ok(Self {
            client,
            chain: default_chain()?,
        })
    }

    async fn try_extract(&self, page_url: &str, manga_slug: &str, chapter_number: u32) -> Result<Extraction> {
        info!("正在获取: {}", page_url);

        let response = self
            .client
            .get(page_url)
            .send()
            .await
            .with_context(|| format!("请求失败: {}", page_url))?;

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP {} : {}", status, page_url);
            return Ok(Extraction::empty(PageStatus::HttpStatus(status.as_u16())));
        }

        let html_content = response
            .text()
            .await
            .with_context(|| format!("读取页面内容失败: {}", page_url))?;

        let images = self.extract_from_html(&html_content, page_url, manga_slug, chapter_number);
        if images.is_empty() {
            info!("{} 上没有找到章节图片", page_url);
        }
        Ok(Extraction::found(images))
    }

    /// 从页面 HTML 中提取章节图片，位置编号只计入成功输出的图片
    pub fn extract_from_html(
        &self,
        html_content: &str,
        page_url: &str,
        manga_slug: &str,
        chapter_number: u32,
    ) -> Vec<ImageEntry> {
        let document = Html::parse_document(html_content);

        let Some((strategy, elements)) = locate_images(&self.chain, &document) else {
            return Vec::new();
        };
        debug!("策略 '{}' 命中 {} 个元素: {}", strategy, elements.len(), page_url);

        let mut images = Vec::new();
        for element in elements {
            let value = element.value();
            let Some(reference) = pick_reference(value.attr("data-src"), value.attr("src")) else {
                continue;
            };

            let image_url = match normalize(reference, page_url) {
                Ok(url) => url,
                Err(e) => {
                    warn!("跳过图片 '{}': {:#}", reference, e);
                    continue;
                }
            };

            let position = images.len() + 1;
            images.push(ImageEntry {
                name: image_file_name(manga_slug, chapter_number, position, extension_of(&image_url)),
                url: image_url.to_string(),
                manga_name: manga_slug.to_string(),
                chapter_number,
            });
        }

        images
    }
}

#[async_trait]
impl ChapterSource for PageExtractor {
    async fn extract(&self, page_url: &str, manga_slug: &str, chapter_number: u32) -> Extraction {
        match self.try_extract(page_url, manga_slug, chapter_number).await {
            Ok(extraction) => extraction,
            Err(e) => {
                warn!("章节 {} 获取失败: {:#}", chapter_number, e);
                Extraction::empty(PageStatus::Failed(format!("{:#}", e)))
            }
        }
    }
}
