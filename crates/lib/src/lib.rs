//! packsmith-lib: Core types and logic for packsmith
//!
//! This crate assembles resource-pack archives from composable content modules:
//! - `module`: discovering modules and reading their manifests
//! - `select`: choosing modules and ordering them by priority
//! - `patch`: aggregating and applying key-level content patches
//! - `archive`: the entry set and the deterministic zip writer
//! - `build`: the platform-aware build pipeline tying everything together

pub mod archive;
pub mod build;
pub mod codec;
pub mod config;
pub mod consts;
pub mod module;
pub mod options;
pub mod patch;
pub mod platform;
pub mod select;
pub mod util;
