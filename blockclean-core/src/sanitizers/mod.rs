//! Markup sanitization internals.
//!
//! `compiler` turns tag allowlists into the compiled sets the HTML policy
//! consumes and caches them, so each distinct allowlist in a schema is parsed
//! once. `markup` post-processes the policy's serialized output.

pub mod compiler;
pub mod markup;
