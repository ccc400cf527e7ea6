//! Short summaries of free text.

/// Collapse whitespace and cap the result at `max_chars` characters.
///
/// Text over the limit is cut to `max_chars - 3` characters, trailing
/// whitespace removed, and `...` appended.
pub fn summarize(text: &str, max_chars: usize) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.chars().count() <= max_chars {
        return normalized;
    }

    let cut: String = normalized
        .chars()
        .take(max_chars.saturating_sub(3))
        .collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(summarize("  hola   mundo \n", 200), "hola mundo");
    }

    #[test]
    fn test_long_text_truncated() {
        let text = "a ".repeat(150);
        let summary = summarize(&text, 20);
        assert!(summary.ends_with("..."));
        assert!(summary.chars().count() <= 20);
        assert_eq!(summary, "a a a a a a a a a...");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "ñ".repeat(10);
        assert_eq!(summarize(&text, 10), text);
        assert_eq!(summarize(&text, 5), "ññ...");
    }
}
