use serde::{Deserialize, Serialize};

/// 从章节页面提取出的一张图片
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEntry {
    pub url: String,
    pub name: String, // <slug>_chapter_<n>_page_<pos><ext>
    pub manga_name: String, // 已清理的 slug，不是用户原始输入
    pub chapter_number: u32,
}

/// 调用边界的原始输入，章节号仍是文本
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeInput {
    pub manga_name: String,
    pub start_chapter_number: String,
    pub end_chapter_number: String, // 空字符串表示未填写
}

impl RangeInput {
    pub fn new(manga_name: &str, start: &str, end: &str) -> Self {
        Self {
            manga_name: manga_name.to_string(),
            start_chapter_number: start.to_string(),
            end_chapter_number: end.to_string(),
        }
    }
}

/// 校验通过的章节范围请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRangeRequest {
    pub manga_name: String,
    pub start_chapter: u32,
    pub end_chapter: Option<u32>,
}

impl ChapterRangeRequest {
    /// 未填写结束章节时等同于单章请求
    pub fn resolved_end(&self) -> u32 {
        self.end_chapter.unwrap_or(self.start_chapter)
    }

    pub fn is_single_chapter(&self) -> bool {
        self.resolved_end() == self.start_chapter
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constructed_url: Option<String>,
}

impl AggregateResult {
    pub fn success(images: Vec<ImageEntry>, message: String, constructed_url: String) -> Self {
        Self {
            success: true,
            images: Some(images),
            message: Some(message),
            error: None,
            constructed_url: Some(constructed_url),
        }
    }

    pub fn failure(error: impl Into<String>, constructed_url: Option<String>) -> Self {
        Self {
            success: false,
            images: None,
            message: None,
            error: Some(error.into()),
            constructed_url,
        }
    }

    /// 成功时的图片列表，失败时为空切片
    pub fn images(&self) -> &[ImageEntry] {
        self.images.as_deref().unwrap_or(&[])
    }
}
