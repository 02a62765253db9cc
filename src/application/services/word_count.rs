const PREVIEW_WORDS: usize = 5;

/// Number of whitespace-separated words, which is also the charge in tokens.
pub fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// First few words of a transcript, for history listings.
pub fn preview(text: &str) -> String {
    text.split_whitespace()
        .take(PREVIEW_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}
