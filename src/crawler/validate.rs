use std::fmt;

use crate::models::{ChapterRangeRequest, RangeInput};
use crate::utils::sanitize_slug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    MangaName,
    StartChapter,
    EndChapter,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::MangaName => "Manga Name",
            Field::StartChapter => "Start Chapter",
            Field::EndChapter => "End Chapter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// 所有字段的校验错误，按字段顺序排列
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: Field, message: &str) {
        self.errors.push(FieldError { field, message: message.to_string() });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid input:")?;
        for error in &self.errors {
            write!(f, " {}: {}", error.field.label(), error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn check_name(manga_name: &str, errors: &mut ValidationErrors) {
    if manga_name.trim().is_empty() {
        errors.push(Field::MangaName, "Manga name is required.");
    } else if sanitize_slug(manga_name).is_empty() {
        errors.push(Field::MangaName, "Manga name must contain at least one letter or digit.");
    }
}

fn parse_chapter(raw: &str, field: Field, errors: &mut ValidationErrors) -> Option<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            let message = match field {
                Field::EndChapter => "End chapter must be a positive integer.",
                _ => "Start chapter must be a positive integer.",
            };
            errors.push(field, message);
            None
        }
    }
}

fn check_order(start: u32, end: Option<u32>, errors: &mut ValidationErrors) {
    if end.is_some_and(|end| end < start) {
        errors.push(
            Field::EndChapter,
            "End chapter must be greater than or equal to start chapter.",
        );
    }
}

/// 校验文本形式的输入
pub fn validate_input(input: &RangeInput) -> Result<ChapterRangeRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_name(&input.manga_name, &mut errors);

    let start = if input.start_chapter_number.trim().is_empty() {
        errors.push(Field::StartChapter, "Start chapter is required.");
        None
    } else {
        parse_chapter(&input.start_chapter_number, Field::StartChapter, &mut errors)
    };

    let end = if input.end_chapter_number.trim().is_empty() {
        None
    } else {
        parse_chapter(&input.end_chapter_number, Field::EndChapter, &mut errors)
    };

    if let Some(start) = start {
        if !errors.has(Field::EndChapter) {
            check_order(start, end, &mut errors);
        }
    }

    match start {
        Some(start_chapter) if errors.is_empty() => Ok(ChapterRangeRequest {
            manga_name: input.manga_name.clone(),
            start_chapter,
            end_chapter: end,
        }),
        _ => Err(errors),
    }
}

/// 校验已是数字形式的请求
pub fn validate_request(request: &ChapterRangeRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_name(&request.manga_name, &mut errors);
    if request.start_chapter == 0 {
        errors.push(Field::StartChapter, "Start chapter must be a positive integer.");
    }
    match request.end_chapter {
        Some(0) => errors.push(Field::EndChapter, "End chapter must be a positive integer."),
        end if request.start_chapter > 0 => check_order(request.start_chapter, end, &mut errors),
        _ => {}
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
