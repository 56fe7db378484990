//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `scan.rs` — command-line overrides and the gather/classify/report pipeline.
//! - `inspect.rs` — `keys` and `config` views used to check inputs.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate gathering and classification to `services/*`.
//! - Keep behavior and output schema stable.

pub mod inspect;
pub mod scan;

pub use inspect::{handle_config, handle_keys};
pub use scan::handle_scan;
