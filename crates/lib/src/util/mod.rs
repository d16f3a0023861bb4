//! Shared utilities.
//!
//! Filesystem access, lexical path handling and content hashing.

pub mod fs;
pub mod hash;
pub mod path;

#[cfg(test)]
pub mod testutil;
