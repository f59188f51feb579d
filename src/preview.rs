/// Short previews of long generated text

pub const DEFAULT_PREVIEW_LINES: usize = 3;

/// Marker appended when a preview drops lines
pub const ELLIPSIS: &str = "...";

/// First `max_lines` lines of `text`, with `...` appended if anything was cut
pub fn create_preview(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let preview = lines
        .iter()
        .take(max_lines)
        .copied()
        .collect::<Vec<_>>()
        .join("\n");

    if lines.len() > max_lines {
        preview + ELLIPSIS
    } else {
        preview
    }
}

/// Full text kept for copying, plus what gets rendered
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewedText {
    pub full: String,
    pub preview: String,
}

impl PreviewedText {
    pub fn new(full: String, max_lines: usize) -> PreviewedText {
        let preview = create_preview(&full, max_lines);
        PreviewedText { full, preview }
    }

    pub fn is_truncated(&self) -> bool {
        self.preview != self.full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_text() {
        let text = "one\ntwo\nthree\nfour\nfive";

        assert_eq!(create_preview(text, 3), "one\ntwo\nthree...");
    }

    #[test]
    fn test_preview_keeps_short_text() {
        let text = "one\ntwo";

        assert_eq!(create_preview(text, 3), "one\ntwo");
    }

    #[test]
    fn test_preview_exact_line_count() {
        assert_eq!(create_preview("a\nb\nc", 3), "a\nb\nc");
    }

    #[test]
    fn test_preview_trailing_newline_counts_as_line() {
        assert_eq!(create_preview("a\nb\nc\n", 3), "a\nb\nc...");
    }

    #[test]
    fn test_preview_empty_text() {
        assert_eq!(create_preview("", DEFAULT_PREVIEW_LINES), "");
    }

    #[test]
    fn test_previewed_text_keeps_full_copy() {
        let full = "# Title\n\nIntro\nBody\nOutro".to_string();

        let previewed = PreviewedText::new(full.clone(), 3);

        assert_eq!(previewed.full, full);
        assert_eq!(previewed.preview, "# Title\n\nIntro...");
        assert!(previewed.is_truncated());
        assert!(!PreviewedText::new("short".to_string(), 3).is_truncated());
    }
}
