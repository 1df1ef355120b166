//! compiler.rs - Compiles and caches tag allowlists.
//!
//! A tag allowlist lists the elements a string field may keep, with optional
//! per-element attributes:
//!
//! ```text
//! b,i,a[href|title],*[lang]
//! ```
//!
//! `*[...]` names attributes allowed on every element. Each distinct allowlist is
//! compiled once into a [`CompiledMarkup`] and shared through an `Arc`.
//! Cleanup of the sanitized output lives in [`markup`](super::markup).
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

/// Inline highlight element that every allowlist allows.
pub const HIGHLIGHT_TAG: &str = "mark";

/// Elements whose content is dropped along with the tag; never allowed.
pub const NEVER_ALLOWED_TAGS: [&str; 2] = ["script", "style"];

/// Link attributes the policy controls itself.
pub const RESERVED_LINK_ATTRIBUTES: [&str; 2] = ["rel", "target"];

static ITEM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<tag>\*|[a-z][a-z0-9-]*)(?:\[(?P<attrs>[^\[\]]*)\])?$")
        .expect("allowed-tag item pattern is valid")
});

static ATTRIBUTE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z_:][a-z0-9_:.-]*$").expect("attribute pattern is valid")
});

/// The compiled form of one tag allowlist.
#[derive(Debug)]
pub struct CompiledMarkup {
    pub tags: BTreeSet<String>,
    pub tag_attributes: BTreeMap<String, BTreeSet<String>>,
    pub generic_attributes: BTreeSet<String>,
}

/// Parses a tag allowlist. Malformed items are skipped with a warning.
pub fn compile_allowed_tags(allowlist: &str) -> CompiledMarkup {
    let mut tags = BTreeSet::new();
    let mut tag_attributes: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut generic_attributes = BTreeSet::new();

    for raw_item in allowlist.split(',') {
        let item = raw_item.trim().to_ascii_lowercase();
        if item.is_empty() {
            continue;
        }
        let Some(captures) = ITEM_PATTERN.captures(&item) else {
            warn!("Skipping malformed allowed-tag item '{}' in allowlist '{}'.", item, allowlist);
            continue;
        };
        let tag = &captures["tag"];
        if NEVER_ALLOWED_TAGS.contains(&tag) {
            warn!("Tag '{}' can never be allowed; ignoring it in allowlist '{}'.", tag, allowlist);
            continue;
        }

        let attributes = captures
            .name("attrs")
            .map(|m| parse_attributes(m.as_str(), tag, allowlist))
            .unwrap_or_default();

        if tag == "*" {
            generic_attributes.extend(attributes);
        } else {
            tags.insert(tag.to_string());
            if !attributes.is_empty() {
                tag_attributes.entry(tag.to_string()).or_default().extend(attributes);
            }
        }
    }

    tags.insert(HIGHLIGHT_TAG.to_string());

    debug!("Compiled tag allowlist '{}' into {} tags.", allowlist, tags.len());

    CompiledMarkup {
        tags,
        tag_attributes,
        generic_attributes,
    }
}

fn parse_attributes(list: &str, tag: &str, allowlist: &str) -> BTreeSet<String> {
    let mut attributes = BTreeSet::new();
    for raw in list.split('|') {
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }
        if !ATTRIBUTE_PATTERN.is_match(name) {
            warn!("Skipping malformed attribute '{}' on '{}' in allowlist '{}'.", name, tag, allowlist);
            continue;
        }
        if RESERVED_LINK_ATTRIBUTES.contains(&name) {
            debug!("Attribute '{}' is set by the policy; ignoring it on '{}'.", name, tag);
            continue;
        }
        attributes.insert(name.to_string());
    }
    attributes
}

/// A thread-safe cache of compiled allowlists, keyed by the allowlist text.
#[derive(Debug, Default)]
pub struct MarkupCache {
    entries: RwLock<HashMap<String, Arc<CompiledMarkup>>>,
}

impl MarkupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled form of `allowlist`, compiling it on first use.
    ///
    /// A poisoned lock only disables caching; compilation itself cannot fail.
    pub fn get_or_compile(&self, allowlist: &str) -> Arc<CompiledMarkup> {
        if let Ok(cache) = self.entries.read() {
            if let Some(markup) = cache.get(allowlist) {
                return Arc::clone(markup);
            }
        }

        let compiled = Arc::new(compile_allowed_tags(allowlist));
        if let Ok(mut cache) = self.entries.write() {
            return Arc::clone(cache.entry(allowlist.to_string()).or_insert(compiled));
        }
        compiled
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
