// Formatting helpers shared by the render functions
use chrono::{DateTime, Utc};

/// Fraction of `total` that is `done`, clamped to `[0, 1]`
pub fn calculate_progress(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (done as f64 / total as f64).min(1.0)
}

/// Formats a capture/modification time, or a dash when unknown
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(date) => date.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// Shortens `text` to at most `max` characters, ending in "..."
pub fn truncate_middle(text: &str, max: usize) -> String {
    let len = text.chars().count();
    if len <= max || max < 5 {
        return text.to_string();
    }
    let keep = max - 3;
    let head = keep / 2;
    let tail = keep - head;
    let start: String = text.chars().take(head).collect();
    let end: String = text.chars().skip(len - tail).collect();
    format!("{}...{}", start, end)
}
