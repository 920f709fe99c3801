use unicode_segmentation::UnicodeSegmentation;

/// Percent-encode a value used as a single path segment (emails, ids).
pub fn encode_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// `"moderator"` -> `"Moderator"`
pub fn capitalize(value: &str) -> String {
    let mut graphemes = value.graphemes(true);
    match graphemes.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), graphemes.as_str()),
        None => String::new(),
    }
}

pub fn grapheme_len(value: &str) -> usize {
    value.graphemes(true).count()
}
