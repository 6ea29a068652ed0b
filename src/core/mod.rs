pub mod assembler;
pub mod cache;
pub mod engine;
pub mod hash;
pub mod profile;
pub mod source;
pub mod stats;
pub mod template;
