use std::error::Error;
use std::io::{self, Write};

use crate::models::RangeInput;

fn prompt(label: &str) -> Result<String, Box<dyn Error>> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// 读取漫画名与章节范围，校验交给爬虫
pub fn get_user_input() -> Result<RangeInput, Box<dyn Error>> {
    let manga_name = prompt("请输入漫画名称: ")?;
    let start = prompt("请输入起始章节: ")?;
    let end = prompt("请输入结束章节 (可留空): ")?;

    Ok(RangeInput {
        manga_name,
        start_chapter_number: start,
        end_chapter_number: end,
    })
}

/// 漫画名 -> URL slug：去空白、小写、空白转连字符，只保留 [a-z0-9-]
pub fn sanitize_slug(manga_name: &str) -> String {
    manga_name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}
