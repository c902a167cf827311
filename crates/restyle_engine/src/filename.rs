/// Fallback when a server-provided name sanitizes to nothing.
const EMPTY_FALLBACK: &str = "download";
const MAX_LEN: usize = 120;

/// Makes a server-provided filename safe to join onto the download directory.
///
/// Directory components are dropped, forbidden characters become `_`,
/// leading/trailing dots and spaces are trimmed and reserved Windows device
/// names get a `_` suffix.
pub fn safe_filename(name: &str) -> String {
    let last = name.rsplit(&['/', '\\'][..]).next().unwrap_or(name);

    let mut cleaned: String = last
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    cleaned = cleaned.trim_matches(&[' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        return EMPTY_FALLBACK.to_string();
    }

    if cleaned.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !cleaned.is_char_boundary(cut) {
            cut -= 1;
        }
        cleaned.truncate(cut);
    }
    if is_reserved_windows_name(&cleaned) {
        cleaned.push('_');
    }
    cleaned
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    let stem = name.split('.').next().unwrap_or(name);
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(stem))
}
