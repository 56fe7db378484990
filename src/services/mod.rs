//! Service layer containing scan logic and side-effect helpers.
//!
//! ## Service map
//! - `paths.rs` — glob expansion into absolute, cleaned paths.
//! - `owners.rs` — file owner and account id lookups.
//! - `gather.rs` — reading key files into the found/permitted/forbidden pools.
//! - `classify.rs` — problem classification over the pools.
//! - `config.rs` — config file loading.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible; `classify.rs` is pure.
//! - Side effects should be explicit and localized.
//! - One bad file or pattern is reported, never fatal to the scan.

pub mod classify;
pub mod config;
pub mod gather;
pub mod output;
pub mod owners;
pub mod paths;
