pub mod config;
pub mod crawler;
pub mod models;
pub mod utils;

pub use config::CrawlerConfig;
pub use crawler::{ChapterSource, Extraction, ManhwaCrawler, PageExtractor};
pub use models::{AggregateResult, ChapterRangeRequest, ImageEntry, RangeInput};
pub use utils::{get_user_input, sanitize_slug};
