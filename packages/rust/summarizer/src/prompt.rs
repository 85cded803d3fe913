//! Instruction text sent to the generative model.

/// Marker appended when the source text was cut to fit the input budget.
const TRUNCATION_MARKER: &str = "\n\n[... content truncated ...]";

/// Build the single instruction that embeds `text`.
///
/// `max_chars == 0` disables truncation.
pub fn build_prompt(text: &str, max_chars: usize) -> String {
    let body = truncate_chars(text, max_chars);
    format!(
        "Given the text from a research paper, provide a short description \
         (2 sentences max, concise), a list of relevant tags (5 max, concise), \
         a list of authors, and the document type (e.g., literature review, \
         experimental, meta-analysis). Respond with a single JSON object of the form \
         {{\"description\": \"...\", \"tags\": [...], \"authors\": [...], \"doc_type\": \"...\"}}. \
         Text: {body}"
    )
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return text.to_string();
    }
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_idx, _)) => format!("{}{TRUNCATION_MARKER}", &text[..byte_idx]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_text_and_shape() {
        let prompt = build_prompt("Mice on the ISS", 0);
        assert!(prompt.ends_with("Text: Mice on the ISS"));
        assert!(prompt.contains(r#""doc_type""#));
        assert!(prompt.contains("5 max"));
        assert!(prompt.contains("2 sentences max"));
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_chars("short text", 100), "short text");
        assert_eq!(truncate_chars("exact", 5), "exact");
    }

    #[test]
    fn long_text_is_truncated_with_marker() {
        let text = "a".repeat(200);
        let result = truncate_chars(&text, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(!result.starts_with(&"a".repeat(101)));
        assert!(result.contains("truncated"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "é".repeat(10);
        let result = truncate_chars(&text, 3);
        assert!(result.starts_with("ééé"));
        assert!(!result.starts_with("éééé"));
    }
}
