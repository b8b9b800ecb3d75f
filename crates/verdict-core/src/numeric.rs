/// Coerce a raw document value to a number.
///
/// Financial documents write numbers messily: currency symbols, thousands
/// separators, parenthesised negatives, percent suffixes. Returns `None`
/// when nothing numeric remains after cleanup.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    let mut s = raw.trim();
    if s.is_empty() {
        return None;
    }

    // Accounting convention: (500) means -500
    let negative = s.starts_with('(') && s.ends_with(')');
    if negative {
        s = &s[1..s.len() - 1];
    }

    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '€' | '£' | '%' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    Some(if negative { -value } else { value })
}
