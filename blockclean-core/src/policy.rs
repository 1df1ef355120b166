// blockclean-core/src/policy.rs
//! Defines the `SanitizationPolicy` trait.
//!
//! The sanitizer walks block data and decides *which* strings to clean; a policy
//! decides *how*. Keeping the HTML transform behind this trait lets callers swap
//! the default ammonia-backed policy for their own.
//!
//! License: MIT OR APACHE 2.0

/// An HTML-safety transform for string leaves.
///
/// Implementations must:
///
/// * strip or neutralize every tag and attribute outside `allowed_tags`,
/// * open external links safely,
/// * restrict URI schemes to `http`, `https`, `mailto` and `tel`,
/// * remove elements left empty after stripping,
/// * always permit the inline `<mark>` highlight element.
///
/// `purify` is called concurrently from many threads, hence `Send + Sync`.
pub trait SanitizationPolicy: Send + Sync {
    /// Cleans `html`, keeping only what the `allowed_tags` allowlist permits.
    ///
    /// # Arguments
    /// * `html` - The string value to clean.
    /// * `allowed_tags` - An allowlist such as `"b,i,a[href]"`. The empty allowlist allows no tags.
    fn purify(&self, html: &str, allowed_tags: &str) -> String;
}
