//! Integration tests for stylepack-lib, exercised through the public API.

mod common;
mod compile_tests;
mod resolve_tests;
