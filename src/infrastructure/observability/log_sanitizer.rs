use url::Url;

const MAX_VISIBLE_LENGTH: usize = 160;
const SENSITIVE_PARAMS: [&str; 7] = [
    "token",
    "access_token",
    "signature",
    "sig",
    "key",
    "x-goog-signature",
    "x-amz-signature",
];

/// Sanitizes a remote file URL for logging: signed-URL credentials in the
/// query string are redacted and very long URLs are truncated.
pub fn sanitize_url(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let redacted = match Url::parse(trimmed) {
        Ok(url) => redact_query(url),
        Err(_) => String::from("[INVALID URL]"),
    };

    truncate(&redacted)
}

fn redact_query(mut url: Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if SENSITIVE_PARAMS.contains(&k.to_ascii_lowercase().as_str()) {
                "[REDACTED]".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();

    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.to_string()
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_VISIBLE_LENGTH {
        return text.to_string();
    }
    let visible: String = text.chars().take(MAX_VISIBLE_LENGTH).collect();
    format!("{}... ({} chars total)", visible, text.chars().count())
}
