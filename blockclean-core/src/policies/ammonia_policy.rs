// blockclean-core/src/policies/ammonia_policy.rs
//! A `SanitizationPolicy` implementation backed by the `ammonia` HTML sanitizer.
//!
//! Each tag allowlist is compiled once per policy instance and turned into an
//! `ammonia::Builder` on every call. The cleaned output then goes through
//! [`finish_markup`], which strips elements left empty and adds
//! `target="_blank"` to links pointing at `http`, `https` or scheme-relative
//! URLs. Relative and `mailto:`/`tel:` links keep opening in place.
//! License: MIT OR APACHE 2.0

use ammonia::Builder;
use log::trace;
use std::collections::{HashMap, HashSet};

use crate::policy::SanitizationPolicy;
use crate::sanitizers::compiler::{CompiledMarkup, MarkupCache, NEVER_ALLOWED_TAGS};
use crate::sanitizers::markup::finish_markup;

/// URI schemes links and sources may use.
pub const ALLOWED_URL_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

/// `rel` value forced onto every link.
pub const LINK_REL: &str = "noopener noreferrer";

#[derive(Debug, Default)]
pub struct AmmoniaPolicy {
    cache: MarkupCache,
}

impl AmmoniaPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct tag allowlists compiled so far.
    pub fn cached_allowlists(&self) -> usize {
        self.cache.len()
    }

    fn builder(markup: &CompiledMarkup) -> Builder<'_> {
        let tag_attributes: HashMap<&str, HashSet<&str>> = markup
            .tag_attributes
            .iter()
            .map(|(tag, attributes)| (tag.as_str(), attributes.iter().map(String::as_str).collect()))
            .collect();

        let mut builder = Builder::default();
        builder
            .tags(markup.tags.iter().map(String::as_str).collect())
            .clean_content_tags(NEVER_ALLOWED_TAGS.iter().copied().collect())
            .tag_attributes(tag_attributes)
            .generic_attributes(markup.generic_attributes.iter().map(String::as_str).collect())
            .url_schemes(ALLOWED_URL_SCHEMES.iter().copied().collect())
            .link_rel(Some(LINK_REL))
            .strip_comments(true);
        builder
    }
}

impl SanitizationPolicy for AmmoniaPolicy {
    fn purify(&self, html: &str, allowed_tags: &str) -> String {
        let markup = self.cache.get_or_compile(allowed_tags);
        let cleaned = Self::builder(&markup).clean(html).to_string();
        let purified = finish_markup(&cleaned);
        trace!("Purified {} bytes into {} bytes with allowlist '{}'.", html.len(), purified.len(), allowed_tags);
        purified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purify(html: &str, allowed: &str) -> String {
        AmmoniaPolicy::new().purify(html, allowed)
    }

    #[test]
    fn test_script_is_dropped_with_its_content() {
        assert_eq!(purify("<script>x</script><b>ok</b>", "b,i"), "<b>ok</b>");
    }

    #[test]
    fn test_disallowed_tags_are_unwrapped() {
        assert_eq!(purify("<p>hi <b>there</b></p>", "b"), "hi <b>there</b>");
        assert_eq!(purify("<b>bold</b>", ""), "bold");
    }

    #[test]
    fn test_disallowed_attributes_are_removed() {
        assert_eq!(purify(r#"<b class="x" onclick="steal()">ok</b>"#, "b"), "<b>ok</b>");
    }

    #[test]
    fn test_highlight_is_always_allowed() {
        assert_eq!(purify("<mark>hot</mark>", ""), "<mark>hot</mark>");
    }

    #[test]
    fn test_links_open_safely() {
        let out = purify(r#"<a href="https://example.com" target="_self">x</a>"#, "a[href]");
        assert!(out.contains(r#"href="https://example.com""#), "got {}", out);
        assert!(out.contains(r#"target="_blank""#), "got {}", out);
        assert!(out.contains(r#"rel="noopener noreferrer""#), "got {}", out);
        assert!(!out.contains("_self"), "got {}", out);
    }

    #[test]
    fn test_relative_links_open_in_place() {
        let out = purify(r#"<a href="/rel" target="_blank">x</a>"#, "a[href]");
        assert!(out.contains(r#"href="/rel""#), "got {}", out);
        assert!(!out.contains("target="), "got {}", out);
    }

    #[test]
    fn test_unsafe_schemes_are_removed() {
        let out = purify(r#"<a href="javascript:alert(1)">x</a>"#, "a[href]");
        assert!(!out.contains("javascript"), "got {}", out);
        assert!(out.contains(">x</a>"), "got {}", out);

        let mail = purify(r#"<a href="mailto:me@example.com">m</a>"#, "a[href]");
        assert!(mail.contains("mailto:me@example.com"), "got {}", mail);
    }

    #[test]
    fn test_empty_elements_are_removed() {
        assert_eq!(purify("<b><i>  </i></b>text", "b,i"), "text");
        assert_eq!(purify("<b><span></span></b>x", "b"), "x");
    }

    #[test]
    fn test_deeply_nested_empty_markup_is_removed() {
        let depth = 2_000;
        let html = format!("{}{}x", "<span>".repeat(depth), "</span>".repeat(depth));
        let started = std::time::Instant::now();
        assert_eq!(purify(&html, "span"), "x");
        assert!(
            started.elapsed() < std::time::Duration::from_secs(10),
            "took {:?}",
            started.elapsed()
        );
    }

    #[test]
    fn test_large_allowlists_still_remove_empty_elements() {
        let allowlist: Vec<String> = (0..3000).map(|n| format!("x{}", n)).collect();
        assert_eq!(purify("<x5></x5>keep", &allowlist.join(",")), "keep");
    }

    #[test]
    fn test_purify_is_idempotent() {
        let policy = AmmoniaPolicy::new();
        let inputs = [
            r#"<a href="https://example.com" onclick="x()">link</a> & <i>it</i>"#,
            "<script>alert(1)</script><b> </b>plain < text",
            "<mark>m</mark><div><b>b</b></div>",
        ];
        for input in inputs {
            let once = policy.purify(input, "b,i,a[href]");
            assert_eq!(policy.purify(&once, "b,i,a[href]"), once);
        }
    }

    #[test]
    fn test_allowlists_are_compiled_once() {
        let policy = AmmoniaPolicy::new();
        policy.purify("a", "b");
        policy.purify("b", "b");
        policy.purify("c", "i");
        assert_eq!(policy.cached_allowlists(), 2);
    }
}
