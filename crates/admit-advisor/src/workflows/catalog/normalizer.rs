/// Strips invisible marks and collapses runs of whitespace. Case is preserved.
pub(crate) fn normalize_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized text, or `None` when the cell is blank.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| normalize_text(&value))
        .filter(|value| !value.is_empty())
}

/// Accepts `1/0`, `true/false`, `yes/no` and `y/n` in any case; blank reads as `false`.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match normalize_text(value).to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "n" => Some(false),
        "1" | "true" | "yes" | "y" => Some(true),
        _ => None,
    }
}
