/// First `max_chars` characters of `input`, counted as `char`s so multi-byte
/// text is never split. Returns the prefix and whether anything was cut.
pub fn truncate_chars(input: &str, max_chars: usize) -> (&str, bool) {
    match input.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&input[..byte_index], true),
        None => (input, false),
    }
}

/// Truncated prefix followed by `...`, or the input unchanged when it fits.
pub fn ellipsize(input: &str, max_chars: usize) -> String {
    match truncate_chars(input, max_chars) {
        (prefix, true) => format!("{}...", prefix),
        (whole, false) => whole.to_string(),
    }
}

/// Usernames: 3 to 20 ASCII letters, digits or underscores.
pub fn is_valid_username(input: &str) -> bool {
    (3..=20).contains(&input.len())
        && input.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("perché sì", 6), ("perché", true));
        assert_eq!(truncate_chars("ciao", 4), ("ciao", false));
        assert_eq!(truncate_chars("", 3), ("", false));
    }

    #[test]
    fn ellipsize_only_when_cut() {
        assert_eq!(ellipsize("short", 50), "short");
        assert_eq!(ellipsize("abcdef", 3), "abc...");
    }

    #[test]
    fn username_rules() {
        assert!(is_valid_username("mario_rossi"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("with space"));
        assert!(!is_valid_username("àccento"));
    }
}
