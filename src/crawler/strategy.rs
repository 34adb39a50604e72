//! 章节图片元素的定位策略
//!
//! 按优先级依次尝试，第一个命中至少一个元素的策略胜出。
//! 站点换新的阅读器模板时，在 `default_chain` 末尾之前追加新策略即可。

use anyhow::{Result, anyhow};
use scraper::{ElementRef, Html, Selector};

/// 兜底策略识别章节图片时使用的路径片段
pub const PATH_HINTS: [&str; 3] = ["/uploads/", "/chapter", "/manga"];

#[derive(Debug, Clone, Copy)]
pub enum ElementFilter {
    /// 选择器命中即保留
    Any,
    /// data-src 或 src 中包含任一片段才保留
    PathHint(&'static [&'static str]),
}

impl ElementFilter {
    fn accepts(&self, element: &ElementRef) -> bool {
        match self {
            ElementFilter::Any => true,
            ElementFilter::PathHint(hints) => {
                let value = element.value();
                let source = value
                    .attr("data-src")
                    .filter(|v| !v.is_empty())
                    .or_else(|| value.attr("src"));
                source.is_some_and(|src| hints.iter().any(|hint| src.contains(hint)))
            }
        }
    }
}

pub struct Strategy {
    pub name: &'static str,
    selector: Selector,
    filter: ElementFilter,
}

impl Strategy {
    pub fn new(name: &'static str, css: &str, filter: ElementFilter) -> Result<Self> {
        let selector =
            Selector::parse(css).map_err(|e| anyhow!("无效的选择器 '{}': {:?}", css, e))?;
        Ok(Self { name, selector, filter })
    }

    /// 按文档顺序返回命中的元素。
    ///
    /// `Html::select` 只遍历一次文档树，命中多个备选的元素也只返回一次。
    pub fn select<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document
            .select(&self.selector)
            .filter(|element| self.filter.accepts(element))
            .collect()
    }
}

/// 默认的策略链，越往后越宽松
pub fn default_chain() -> Result<Vec<Strategy>> {
    Ok(vec![
        Strategy::new(
            "lazy-loading",
            "img.loading[data-src], img.loading[src]",
            ElementFilter::Any,
        )?,
        Strategy::new(
            "chapter-image",
            "img.wp-manga-chapter-img[data-src], img.wp-manga-chapter-img[src]",
            ElementFilter::Any,
        )?,
        Strategy::new(
            "reader-container",
            ".reading-content img[data-src], .reading-content img[src], \
             .entry-content img[data-src], .entry-content img[src], \
             #readerarea img[data-src], #readerarea img[src], \
             div.container-chapter-reader img[data-src], div.container-chapter-reader img[src]",
            ElementFilter::Any,
        )?,
        Strategy::new(
            "path-hint",
            "img[data-src], img[src]",
            ElementFilter::PathHint(&PATH_HINTS),
        )?,
    ])
}

/// 依次尝试策略，返回第一个有结果的策略名与元素
pub fn locate_images<'a>(
    chain: &[Strategy],
    document: &'a Html,
) -> Option<(&'static str, Vec<ElementRef<'a>>)> {
    chain.iter().find_map(|strategy| {
        let elements = strategy.select(document);
        (!elements.is_empty()).then_some((strategy.name, elements))
    })
}
