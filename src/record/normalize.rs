//! Pure text transforms for tag and label strings

/// Normalizes a label for display
///
/// Replaces hyphens with spaces, capitalizes the first word, lowercases the
/// remaining words, and rejoins with single spaces. Inputs with no words
/// (empty or whitespace-only) are returned unchanged.
///
/// # Examples
///
/// ```
/// use foodfetch::record::normalize;
///
/// assert_eq!(normalize("palm-oil"), "Palm oil");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    let replaced = text.replace('-', " ");
    let mut words = replaced.split_whitespace();

    let Some(first) = words.next() else {
        return text.to_string();
    };

    let mut result = capitalize_word(first);
    for word in words {
        result.push(' ');
        result.push_str(&word.to_lowercase());
    }
    result
}

/// Capitalizes every word of a label
///
/// Used for country display names, which read as proper nouns.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercases the first character of a word and lowercases the rest
fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
