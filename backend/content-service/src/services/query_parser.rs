//! Search query parser
//!
//! Splits a free-text feed query into keyword and hashtag terms.

/// Terms extracted from a search string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub keywords: Vec<String>,
    /// Hashtag terms without the leading `#`
    pub hashtags: Vec<String>,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.hashtags.is_empty()
    }

    /// All terms in the order keywords then hashtags, for an OR-of-contains filter
    pub fn terms(&self) -> Vec<String> {
        self.keywords
            .iter()
            .chain(self.hashtags.iter())
            .cloned()
            .collect()
    }
}

/// Parse a raw query
///
/// # Examples
/// ```
/// use content_service::services::query_parser::parse;
///
/// let parsed = parse("hello #world foo");
/// assert_eq!(parsed.keywords, vec!["hello", "foo"]);
/// assert_eq!(parsed.hashtags, vec!["world"]);
/// ```
pub fn parse(raw: &str) -> ParsedQuery {
    let mut parsed = ParsedQuery::default();

    for token in raw.split_whitespace() {
        match token.strip_prefix('#') {
            // A lone `#` carries no term.
            Some("") => {}
            Some(tag) => parsed.hashtags.push(tag.to_string()),
            None => parsed.keywords.push(token.to_string()),
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_and_hashtags() {
        let parsed = parse("hello #world foo");
        assert_eq!(parsed.keywords, vec!["hello", "foo"]);
        assert_eq!(parsed.hashtags, vec!["world"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \t\n ").is_empty());
    }

    #[test]
    fn test_bare_hash_dropped() {
        let parsed = parse("# rust #");
        assert_eq!(parsed.keywords, vec!["rust"]);
        assert!(parsed.hashtags.is_empty());
    }

    #[test]
    fn test_only_first_hash_stripped() {
        let parsed = parse("##double");
        assert_eq!(parsed.hashtags, vec!["#double"]);
    }

    #[test]
    fn test_mixed_whitespace() {
        let parsed = parse("  a\tb\n#c  ");
        assert_eq!(parsed.keywords, vec!["a", "b"]);
        assert_eq!(parsed.hashtags, vec!["c"]);
    }

    #[test]
    fn test_terms_order() {
        assert_eq!(parse("#tag word").terms(), vec!["word", "tag"]);
    }

    #[test]
    fn test_case_preserved() {
        assert_eq!(parse("Rust #RustLang").terms(), vec!["Rust", "RustLang"]);
    }
}
