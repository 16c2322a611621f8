//! Text normalization shared by the index, the resolvers, and search.

/// Reduce a citation to its lookup key: ASCII letters and digits only, lowercased.
///
/// This is the one normalization used on both sides of every lookup, so
/// `§ 101—`, `Sec. 101`, and `101` meet on the same key.
pub fn section_key(value: &str) -> String {
    return value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| return c.to_ascii_lowercase())
        .collect();
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn clean_whitespace(value: &str) -> String {
    return value.split_whitespace().collect::<Vec<_>>().join(" ");
}

/// Tidy a citation number for display: no trailing em-dashes, periods, or spaces.
pub fn clean_section_number(value: &str) -> String {
    let spaced = value.replace('\u{202f}', " ");
    let mut trimmed = spaced.trim_end();
    if trimmed.ends_with('—') {
        let without_dashes = trimmed.trim_end_matches('—');
        // Dashes only count as a suffix when whitespace separates them from the number.
        if without_dashes.ends_with(char::is_whitespace) {
            trimmed = without_dashes;
        }
    }
    let trimmed = trimmed.trim_end_matches(|c: char| return c == '.' || c.is_whitespace());
    return clean_whitespace(trimmed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_symbols_and_case() {
        assert_eq!(section_key("§ 101—"), "101");
        assert_eq!(section_key("Sec. 552a"), "sec552a");
        assert_eq!(section_key("TITLE 11"), "title11");
    }

    #[test]
    fn key_is_idempotent() {
        for raw in ["§ 101—", "  7 U.S.C. 2012 ", "Chapter 3", "", "§§"] {
            let once = section_key(raw);
            assert_eq!(section_key(&once), once);
        }
    }

    #[test]
    fn key_ignores_case() {
        assert_eq!(section_key("552A"), section_key("552a"));
    }

    #[test]
    fn non_ascii_letters_are_dropped() {
        assert_eq!(section_key("§ 101 Übergang"), "101bergang");
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(clean_whitespace("  a \n\t b\u{202f}c  "), "a b c");
        assert_eq!(clean_whitespace("   "), "");
    }

    #[test]
    fn section_number_loses_trailing_punctuation() {
        assert_eq!(clean_section_number("§ 101."), "§ 101");
        assert_eq!(clean_section_number("§\u{202f}101 —"), "§ 101");
        assert_eq!(clean_section_number("§ 101—"), "§ 101—");
        assert_eq!(clean_section_number(""), "");
    }
}
