//! Keyword extraction and similarity used by search and the fallback
//! company matcher. Deliberately simple: word-set Jaccard, no embeddings.

use std::collections::HashMap;

const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "and", "or", "but", "in", "with", "a", "an", "as", "are",
    "was", "were", "been", "be", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should",
];

pub fn preprocess(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect()
}

/// Top-10 keywords by frequency, stop-word filtered, words longer than
/// three characters only.
pub fn keywords(text: &str) -> Vec<String> {
    let normalized = preprocess(text);
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for word in normalized.split_whitespace() {
        if word.len() > 3 && !STOP_WORDS.contains(&word) {
            *freq.entry(word).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(&str, usize)> = freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.into_iter().take(10).map(|(w, _)| w.to_string()).collect()
}

/// Jaccard similarity over word sets, in [0, 1].
pub fn similarity(a: &str, b: &str) -> f64 {
    let words_a: std::collections::HashSet<String> =
        preprocess(a).split_whitespace().map(str::to_string).collect();
    let words_b: std::collections::HashSet<String> =
        preprocess(b).split_whitespace().map(str::to_string).collect();

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }
    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    intersection as f64 / union as f64
}

/// Stable identifier derived from free text, used as upsert keys.
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_dash = true;
    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_skip_stop_words_and_short_words() {
        let kw = keywords("The textile company in Chennai makes textile machinery");
        assert!(kw.contains(&"textile".to_string()));
        assert!(!kw.contains(&"the".to_string()));
        assert!(!kw.iter().any(|w| w.len() <= 3));
    }

    #[test]
    fn similarity_is_bounded_and_symmetric() {
        let a = "healthcare equipment exporter";
        let b = "healthcare supplies company";
        let s = similarity(a, b);
        assert!(s > 0.0 && s <= 1.0);
        assert_eq!(s, similarity(b, a));
        assert_eq!(similarity(a, a), 1.0);
        assert_eq!(similarity(a, ""), 0.0);
    }

    #[test]
    fn slug_is_stable_and_url_safe() {
        assert_eq!(slug("Acme Exports Pvt. Ltd."), "acme-exports-pvt-ltd");
        assert_eq!(slug("Acme Exports Pvt. Ltd."), slug("acme exports pvt ltd"));
    }
}
