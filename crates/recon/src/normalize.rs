//! Name normalization: comparison keys and display-name selection.

/// Lowercase alphabetic words of `name`, in order.
///
/// Anything that is not an ASCII letter separates words, so `"T-Rex"`
/// yields `["t", "rex"]`.
pub fn words(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_lowercase())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Letters-only lowercase key, order preserved.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

/// Word-order independent key: sorted words, concatenated.
pub fn normalize_words(name: &str) -> String {
    let mut w = words(name);
    w.sort();
    w.concat()
}

/// Prefer the longer variant; on equal length, the one with more uppercase letters.
pub fn choose_better_name<'a>(a: &'a str, b: &'a str) -> &'a str {
    let (len_a, len_b) = (a.chars().count(), b.chars().count());
    if len_b > len_a {
        return b;
    }
    if len_b == len_a && uppercase_count(b) > uppercase_count(a) {
        return b;
    }
    a
}

/// Left fold of [`choose_better_name`] over every recorded variant.
pub fn pick_display_name(variants: &[String]) -> String {
    let mut iter = variants.iter();
    let Some(first) = iter.next() else {
        return String::new();
    };
    iter.fold(first.as_str(), |best, cand| choose_better_name(best, cand))
        .to_string()
}

/// Title-case the letter runs of a bare key (`"rosequartz"` -> `"Rosequartz"`).
pub fn pretty_from_key(key: &str) -> String {
    let runs = words(key);
    if runs.is_empty() {
        return key.to_string();
    }
    runs.iter()
        .map(|run| {
            let mut chars = run.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn uppercase_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_uppercase()).count()
}
