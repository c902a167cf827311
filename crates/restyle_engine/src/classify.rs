use once_cell::sync::Lazy;
use regex::Regex;

/// Content types saved to disk instead of being parsed as JSON.
const FILE_CONTENT_TYPES: &[&str] = &[
    "text/html",
    "application/octet-stream",
    "application/pdf",
    "text/plain",
];

// ── Lazy static regexes ──────────────────────────────────────────────────────

static FILENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bfilename\s*=\s*("[^"]*"|'[^']*'|[^;\n]*)"#).unwrap());

/// RFC 5987 form: `filename*=<charset>'<lang>'<percent-encoded>`.
static EXTENDED_FILENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bfilename\*\s*=\s*([^';]*)'[^';]*'([^;\s]+)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    File,
    Json,
}

/// Substring match, so parameters such as `; charset=utf-8` do not matter.
/// A missing header means JSON.
pub fn classify_content_type(content_type: Option<&str>) -> PayloadKind {
    let Some(content_type) = content_type else {
        return PayloadKind::Json;
    };
    let lowered = content_type.to_ascii_lowercase();
    if FILE_CONTENT_TYPES
        .iter()
        .any(|candidate| lowered.contains(candidate))
    {
        PayloadKind::File
    } else {
        PayloadKind::Json
    }
}

/// Extracts the suggested filename from a content-disposition header value.
///
/// `filename*` wins when it decodes to something non-empty. Quote characters
/// are stripped from the plain `filename` value.
pub fn filename_from_content_disposition(header: Option<&str>) -> Option<String> {
    let header = header?;

    if let Some(captures) = EXTENDED_FILENAME_RE.captures(header) {
        let charset = captures.get(1).map_or("", |m| m.as_str());
        let encoded = captures.get(2).map_or("", |m| m.as_str());
        if charset.eq_ignore_ascii_case("utf-8") || charset.is_empty() {
            let decoded = percent_decode(encoded);
            let decoded = decoded.trim();
            if !decoded.is_empty() {
                return Some(decoded.to_owned());
            }
        }
    }

    let raw = FILENAME_RE.captures(header)?.get(1)?.as_str();
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '"' | '\'')).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_owned())
    }
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(high), Some(low)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(high << 4 | low);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_decode_handles_utf8_and_stray_percent() {
        assert_eq!(percent_decode("caf%C3%A9.txt"), "café.txt");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("a%2"), "a%2");
        assert_eq!(percent_decode("%zz"), "%zz");
    }
}
