//! Column label casing.

use std::sync::Arc;

/// Rewrites a column label before it is used as a field name.
pub type LabelRewrite = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// The default label rewrite: [`camelize`].
pub fn camelize_rewrite() -> LabelRewrite {
    Arc::new(camelize)
}

/// Convert a column label to lower camel case.
///
/// Words are split on `_`, `-`, `.`, whitespace and on lower→upper case
/// boundaries (`XMLHttp` splits as `XML` + `Http`). The first word is
/// lowercased, later words are capitalized.
///
/// ```
/// use sql_rowstream::casing::camelize;
///
/// assert_eq!(camelize("user_id"), "userId");
/// assert_eq!(camelize("USER_ID"), "userId");
/// assert_eq!(camelize("already_camelCase"), "alreadyCamelCase");
/// ```
pub fn camelize(label: &str) -> String {
    let words = split_words(label);
    let mut out = String::with_capacity(label.len());
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

fn is_separator(c: char) -> bool {
    matches!(c, '_' | '-' | '.') || c.is_whitespace()
}

fn split_words(label: &str) -> Vec<&str> {
    let mut words = Vec::new();
    for chunk in label.split(is_separator).filter(|c| !c.is_empty()) {
        let chars: Vec<(usize, char)> = chunk.char_indices().collect();
        let mut start = 0;
        for i in 1..chars.len() {
            let (idx, c) = chars[i];
            let prev = chars[i - 1].1;
            let next = chars.get(i + 1).map(|(_, n)| *n);
            let lower_to_upper = c.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit());
            let acronym_end = c.is_uppercase()
                && prev.is_uppercase()
                && next.is_some_and(|n| n.is_lowercase());
            if lower_to_upper || acronym_end {
                words.push(&chunk[start..idx]);
                start = idx;
            }
        }
        words.push(&chunk[start..]);
    }
    words
}
