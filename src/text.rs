//! Text cleaning applied to example inputs
//!
//! The same transform runs at training and prediction time; the classifier
//! only ever sees cleaned text. The transform is deterministic and
//! idempotent: lowercase, punctuation becomes whitespace, runs of
//! whitespace collapse to a single space, leading/trailing space trimmed.

/// Normalize raw input text for vectorization.
pub fn clean(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else {
            out.push(' ');
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(clean("Hello, World!"), "hello world");
        assert_eq!(clean("What's   up?"), "what s up");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean("  a\t\tb \n c  "), "a b c");
    }

    #[test]
    fn test_empty_and_symbol_only() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("!!! ???"), "");
    }

    #[test]
    fn test_idempotent() {
        for s in ["Hello, World!", "  a\t b ", "apa itu RUST?", "", "123 + 456"] {
            let once = clean(s);
            assert_eq!(clean(&once), once, "clean not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_unicode() {
        assert_eq!(clean("Kafé ÉCLAIR"), "kafé éclair");
    }
}
