use strsim::levenshtein;

/// Normalized similarity between two strings, case-insensitive.
///
/// Computed as `(max_len - levenshtein) / max_len` over the lower-cased
/// inputs, so 1.0 means identical and 0.0 means nothing in common. Two
/// empty strings have distance 0 over length 0 and count as identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein(&a, &b);
    (max_len - distance) as f64 / max_len as f64
}

/// True when the two strings meet the similarity threshold
pub fn is_similar(a: &str, b: &str, threshold: f64) -> bool {
    similarity(a, b) >= threshold
}
