// src/checker/html.rs
// =============================================================================
// This module extracts raw link references from HTML text.
//
// We deliberately do NOT build a DOM here. The pages are our own static
// output, and a single tolerant pattern applied over the whole text finds
// every href="..." and src="..." value, including ones inside malformed
// tags that a parser might drop or repair.
//
// What comes out is the reference exactly as written (trimmed), e.g.
// "../img/x.webp" or "#top". Nothing is resolved or deduplicated here; the
// auditor does that when it builds LinkRecords.
//
// Known limitation: values containing a literal '"' are not supported. Such
// an attribute simply produces no match.
// =============================================================================

use regex::Regex;

pub struct ReferenceExtractor {
    pattern: Regex,
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceExtractor {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r#"(?:href|src)="([^"]+)""#).expect("Invalid regex"),
        }
    }

    // Returns every href/src value in document order, one entry per
    // occurrence
    //
    // Example:
    //   html = r#"<a href="a.html">A</a><img src="x.png"><a href="a.html">"#
    //   result = ["a.html", "x.png", "a.html"]
    pub fn extract(&self, html: &str) -> Vec<String> {
        self.pattern
            .captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_href_and_src_in_order() {
        let html = r#"<a href="about.html">About</a><img src="img/logo.webp" alt="">"#;
        let refs = ReferenceExtractor::new().extract(html);
        assert_eq!(refs, vec!["about.html", "img/logo.webp"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let html = r#"<a href="a.html">1</a> <a href="a.html">2</a>"#;
        let refs = ReferenceExtractor::new().extract(html);
        assert_eq!(refs, vec!["a.html", "a.html"]);
    }

    #[test]
    fn test_values_are_trimmed() {
        let html = r#"<a href="  contact.html ">Contact</a>"#;
        assert_eq!(ReferenceExtractor::new().extract(html), vec!["contact.html"]);
    }

    #[test]
    fn test_empty_value_is_not_matched() {
        // The pattern requires at least one character between the quotes
        let html = r#"<a href="">nothing</a>"#;
        assert!(ReferenceExtractor::new().extract(html).is_empty());
    }

    #[test]
    fn test_malformed_markup_does_not_panic() {
        let html = r#"<a href="broken.html <div src=unquoted> <img src="ok.png""#;
        let refs = ReferenceExtractor::new().extract(html);
        // The unterminated href swallows text up to the next quote, which is
        // the accepted behaviour of a tolerant pattern
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn test_single_quoted_attributes_are_ignored() {
        let html = "<a href='single.html'>x</a>";
        assert!(ReferenceExtractor::new().extract(html).is_empty());
    }

    #[test]
    fn test_script_and_link_tags() {
        let html = r#"
            <link rel="stylesheet" href="/css/main.css">
            <script src="https://cdn.example.com/lib.js"></script>
            <a href="mailto:info@example.org">Mail</a>
        "#;
        let refs = ReferenceExtractor::new().extract(html);
        assert_eq!(
            refs,
            vec![
                "/css/main.css",
                "https://cdn.example.com/lib.js",
                "mailto:info@example.org"
            ]
        );
    }
}
