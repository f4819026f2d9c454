//! End-to-end tests for packsmith-lib.

mod build_tests;
mod common;
mod discovery_tests;
