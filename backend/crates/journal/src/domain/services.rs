//! Pure domain rules for entries, tags and categories.

use super::entities::{CategoryDraft, DEFAULT_CATEGORY_COLOR, EntryStats};
use crate::error::{JournalError, JournalResult};

pub const TITLE_MAX_LENGTH: usize = 255;
pub const MOOD_MAX_LENGTH: usize = 50;
pub const TAG_MAX_LENGTH: usize = 100;
pub const CATEGORY_NAME_MAX_LENGTH: usize = 100;
pub const COLOR_MAX_LENGTH: usize = 32;

/// Whitespace-separated word count.
pub fn count_words(content: &str) -> i32 {
    i32::try_from(content.split_whitespace().count()).unwrap_or(i32::MAX)
}

/// Trim, drop empties and duplicates, keep first-seen order.
pub fn normalize_tag_names(names: Vec<String>) -> JournalResult<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if name.chars().count() > TAG_MAX_LENGTH {
            return Err(JournalError::Validation(format!(
                "Tag names must be at most {TAG_MAX_LENGTH} characters"
            )));
        }
        if !out.iter().any(|existing| existing == name) {
            out.push(name.to_string());
        }
    }
    Ok(out)
}

pub fn required_text(value: &str, field: &str, max: Option<usize>) -> JournalResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(JournalError::Validation(format!("{field} is required")));
    }
    if let Some(max) = max {
        if trimmed.chars().count() > max {
            return Err(JournalError::Validation(format!(
                "{field} must be at most {max} characters"
            )));
        }
    }
    Ok(trimmed.to_string())
}

pub fn optional_text(value: Option<&str>, field: &str, max: usize) -> JournalResult<String> {
    let trimmed = value.unwrap_or_default().trim();
    if trimmed.chars().count() > max {
        return Err(JournalError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Name required; blank or missing color falls back to the default.
pub fn category_draft(name: &str, color: Option<&str>) -> JournalResult<CategoryDraft> {
    let name = required_text(name, "Name", Some(CATEGORY_NAME_MAX_LENGTH))?;
    let color = optional_text(color, "Color", COLOR_MAX_LENGTH)?;
    Ok(CategoryDraft {
        name,
        color: if color.is_empty() {
            DEFAULT_CATEGORY_COLOR.to_string()
        } else {
            color
        },
    })
}

/// `totalWords / totalEntries`, 0 for an empty journal.
pub fn with_average(mut stats: EntryStats) -> EntryStats {
    stats.avg_words_per_entry = if stats.total_entries > 0 {
        stats.total_words as f64 / stats.total_entries as f64
    } else {
        0.0
    };
    stats
}
