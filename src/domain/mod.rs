//! Shared data model layer (structs/constants only).
//!
//! ## Files
//! - `models.rs` — scan parameters, owned keys, problems, report structs.
//! - `constants.rs` — stable defaults (config path, globs, UID floor).
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem or identity lookups.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` outputs.
//! Keep schema-impacting changes synchronized with `docs/contracts/*`.

pub mod constants;
pub mod models;
