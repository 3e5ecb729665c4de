use unicode_normalization::UnicodeNormalization;

/// Normalize text for fuzzy comparison: NFC, lowercase, strip everything that is
/// not alphanumeric or whitespace, trim.
///
/// Alphanumeric is the Unicode property, so Indic vowel signs (Other_Alphabetic)
/// are kept while viramas and other pure diacritics are stripped. NFC runs again
/// after filtering because removing a character can leave a base letter adjacent
/// to a mark it composes with.
pub fn normalize_text(text: &str) -> String {
    let folded: String = text
        .nfc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    folded.nfc().collect::<String>().trim().to_string()
}

/// Sorts whitespace tokens and rejoins them with single spaces.
fn sorted_tokens(normalized: &str) -> Vec<char> {
    let mut tokens: Vec<&str> = normalized.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ").chars().collect()
}

/// Longest common subsequence length over chars.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let n = b.len();
    let mut prev = vec![0usize; n + 1];
    let mut curr = vec![0usize; n + 1];

    for ca in a {
        for j in 1..=n {
            curr[j] = if *ca == b[j - 1] {
                prev[j - 1] + 1
            } else {
                prev[j].max(curr[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

/// Indel-distance ratio scaled to 0..=100: `200 * lcs / (len_a + len_b)`.
fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    let lcs = lcs_len(a, b);
    (200.0 * lcs as f64 / total as f64).clamp(0.0, 100.0)
}

/// Token-order-insensitive fuzzy similarity between `expected` and `actual`, 0..=100.
///
/// An `actual` that normalizes to nothing always scores 0.
pub fn similarity(expected: &str, actual: &str) -> f64 {
    let actual = normalize_text(actual);
    if actual.is_empty() {
        return 0.0;
    }
    let expected = normalize_text(expected);
    indel_ratio(&sorted_tokens(&expected), &sorted_tokens(&actual))
}

/// Rounds a score to one decimal place, as reported to clients.
pub fn round_score(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}
