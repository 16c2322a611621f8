//! Case-insensitive literal matching, snippet windows, and highlighting.
//!
//! Offsets are in characters. Folding maps each char to exactly one char, so
//! an offset found in folded text is valid in the original.

use serde::Serialize;

/// Lowercase a single char without changing the char count.
fn fold(c: char) -> char {
    return c.to_lowercase().next().unwrap_or(c);
}

/// Fold a string into chars for offset-preserving comparison.
fn folded_chars(text: &str) -> Vec<char> {
    return text.chars().map(fold).collect();
}

/// Offset of the first occurrence of `needle` in `haystack` at or after `from`.
fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let tail = haystack.get(from..)?;
    return tail
        .windows(needle.len())
        .position(|window| return window == needle)
        .map(|pos| return pos.saturating_add(from));
}

/// Character offset of the first case-insensitive occurrence of `query`.
pub fn first_match(text: &str, query: &str) -> Option<usize> {
    return find_from(&folded_chars(text), &folded_chars(query), 0);
}

/// A run of snippet text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    /// Text matching the query.
    Mark(String),
    /// Text between matches.
    Plain(String),
}

/// Split `text` into plain and marked runs for every occurrence of `query`.
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    let chars: Vec<char> = text.chars().collect();
    let haystack = folded_chars(text);
    let needle = folded_chars(query);
    let mut segments = Vec::new();
    let mut index = 0_usize;

    while index < chars.len() {
        let Some(found) = find_from(&haystack, &needle, index) else {
            segments.push(Segment::Plain(collect(&chars, index, chars.len())));
            break;
        };
        if found > index {
            segments.push(Segment::Plain(collect(&chars, index, found)));
        }
        let end = found.saturating_add(needle.len());
        segments.push(Segment::Mark(collect(&chars, found, end)));
        index = end;
    }
    return segments;
}

/// `chars[start..end]` as a string, clamped to bounds.
fn collect(chars: &[char], start: usize, end: usize) -> String {
    return chars.get(start..end.min(chars.len())).unwrap_or_default().iter().collect();
}

/// The window of section text shown under a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    /// Text was cut before the window.
    pub leading: bool,
    /// Highlighted runs inside the window.
    pub segments: Vec<Segment>,
    /// Text was cut after the window.
    pub trailing: bool,
}

impl Snippet {
    /// Take up to `radius` characters either side of the match at `offset`.
    pub fn around(text: &str, offset: usize, query: &str, radius: usize) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let query_len = query.chars().count();
        let start = offset.saturating_sub(radius).min(chars.len());
        let end = offset.saturating_add(query_len).saturating_add(radius).min(chars.len());
        let window = collect(&chars, start, end);

        return Self {
            leading: start > 0,
            segments: highlight(&window, query),
            trailing: end < chars.len(),
        };
    }

    /// Render with ellipses, wrapping marked runs in `open`/`close`.
    pub fn render(&self, open: &str, close: &str) -> String {
        let mut out = String::new();
        if self.leading {
            out.push('…');
        }
        for segment in &self.segments {
            match segment {
                Segment::Mark(text) => {
                    out.push_str(open);
                    out.push_str(text);
                    out.push_str(close);
                },
                Segment::Plain(text) => out.push_str(text),
            }
        }
        if self.trailing {
            out.push('…');
        }
        return out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_is_case_insensitive_char_offset() {
        assert_eq!(first_match("§ 101. Each Officer", "officer"), Some(12));
        assert_eq!(first_match("officer", "OFFICER"), Some(0));
        assert_eq!(first_match("officer", "agent"), None);
        assert_eq!(first_match("officer", ""), None);
    }

    #[test]
    fn highlight_marks_every_occurrence() {
        let segments = highlight("Agency and agency", "AGENCY");
        assert_eq!(
            segments,
            [
                Segment::Mark("Agency".to_string()),
                Segment::Plain(" and ".to_string()),
                Segment::Mark("agency".to_string()),
            ]
        );
    }

    #[test]
    fn highlight_without_match_is_one_plain_run() {
        assert_eq!(highlight("text", "zzz"), [Segment::Plain("text".to_string())]);
    }

    #[test]
    fn snippet_window_and_ellipses() {
        let text = "aaaaaaaaaa officer bbbbbbbbbb";
        let offset = first_match(text, "officer").unwrap();
        let snippet = Snippet::around(text, offset, "officer", 3);
        assert!(snippet.leading);
        assert!(snippet.trailing);
        assert_eq!(snippet.render("[", "]"), "…aa [officer] bb…");
    }

    #[test]
    fn short_text_has_no_ellipses() {
        let snippet = Snippet::around("an officer", 3, "officer", 160);
        assert!(!snippet.leading);
        assert!(!snippet.trailing);
        assert_eq!(snippet.render("*", "*"), "an *officer*");
    }
}
