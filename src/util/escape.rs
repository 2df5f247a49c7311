//! Query-syntax escaping.
//!
//! The backend's query parser treats a fixed set of characters as operators.
//! Values are escaped by prefixing each of them with a backslash.

/// Characters with operator meaning in the query syntax.
pub const SPECIAL_CHARS: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
    '/', ' ', '\t',
];

/// Words the parser reads as boolean operators.
pub const RESERVED_WORDS: &[&str] = &["AND", "OR", "NOT"];

pub fn is_special(c: char) -> bool {
    SPECIAL_CHARS.contains(&c)
}

/// Backslash-escape every special character.
pub fn escape_all(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if is_special(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape only the given characters.
pub fn escape_chars(s: &str, chars: &[char]) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if chars.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape a plain string term.
///
/// Reserved words and the empty string cannot be escaped character-wise, so
/// they are quoted instead.
pub fn escape_term(s: &str) -> String {
    if s.is_empty() || RESERVED_WORDS.contains(&s) {
        format!("\"{}\"", s)
    } else {
        escape_all(s)
    }
}

/// Escape a wildcard term, keeping unescaped `*` and `?` as wildcards.
///
/// A backslash in the input makes the next character literal. A trailing
/// lone backslash is matched literally.
pub fn escape_wildcard(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '*' | '?' => out.push(c),
            '\\' => {
                let literal = chars.next().unwrap_or('\\');
                if is_special(literal) {
                    out.push('\\');
                }
                out.push(literal);
            }
            _ => {
                if is_special(c) {
                    out.push('\\');
                }
                out.push(c);
            }
        }
    }
    if out.is_empty() {
        return "\"\"".to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all() {
        assert_eq!(escape_all("hello world"), "hello\\ world");
        assert_eq!(escape_all("abc*???"), "abc\\*\\?\\?\\?");
        assert_eq!(escape_all("a:b"), "a\\:b");
        assert_eq!(escape_all("-3"), "\\-3");
        assert_eq!(escape_all("a&&b||c"), "a\\&\\&b\\|\\|c");
        assert_eq!(escape_all("path/to"), "path\\/to");
    }

    #[test]
    fn test_escape_term_quotes_reserved_words() {
        assert_eq!(escape_term("AND"), "\"AND\"");
        assert_eq!(escape_term("NOT"), "\"NOT\"");
        assert_eq!(escape_term(""), "\"\"");
        assert_eq!(escape_term("and"), "and");
        assert_eq!(escape_term("ANDROID"), "ANDROID");
    }

    #[test]
    fn test_escape_wildcard() {
        assert_eq!(escape_wildcard("abc*"), "abc*");
        assert_eq!(escape_wildcard("a?c d"), "a?c\\ d");
        assert_eq!(escape_wildcard("abc\\*"), "abc\\*");
        assert_eq!(escape_wildcard("a\\b"), "ab");
        assert_eq!(escape_wildcard("tail\\"), "tail\\\\");
        assert_eq!(escape_wildcard(""), "\"\"");
    }

    #[test]
    fn test_escape_chars() {
        assert_eq!(
            escape_chars("2009-01-01T00:00:00Z", &[':']),
            "2009-01-01T00\\:00\\:00Z"
        );
    }
}
