// blockclean-core/src/policies/mod.rs
//! This module contains `SanitizationPolicy` implementations.
//!
//! Each policy lives in its own file and is declared here. The default policy,
//! `AmmoniaPolicy`, uses the `ammonia` HTML sanitizer.

pub mod ammonia_policy;
