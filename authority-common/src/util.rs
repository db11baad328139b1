//! Utility functions.

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Works on character boundaries, so multi-byte text is never split.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            let truncated = &s[..idx];
            format!("{}...", truncated.trim_end())
        }
        None => s.to_string(),
    }
}

/// Parse a duration string like "5m", "1h", "30s" into seconds.
pub fn parse_duration_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let Some(unit) = s.chars().last() else {
        return Err("Empty duration string".into());
    };

    let num_str = &s[..s.len() - unit.len_utf8()];
    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {num_str}"))?;

    let scale: u64 = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3600,
        'd' => 86400,
        _ => return Err(format!("Unknown unit: {unit}")),
    };

    num.checked_mul(scale)
        .ok_or_else(|| format!("Duration out of range: {s}"))
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
