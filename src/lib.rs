//! Zero Prompt: deterministic prompt generation from a seed and an index.
//!
//! Every `(seed, index, profile)` triple names exactly one prompt. Nothing
//! is stored: a prompt is recomputed in constant time by hashing the seed
//! with a coordinate tuple per selection, then filling a template from the
//! profile's vocabulary pools.

pub mod builtin;
pub mod core;
