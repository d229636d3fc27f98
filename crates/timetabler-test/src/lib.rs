//! Shared test fixtures for timetabler crates.
//!
//! This crate provides ready-made terms for testing. It depends only on
//! `timetabler-core` so every other crate can take it as a dev-dependency.
//!
//! - [`scenario`] - the small acceptance scenarios and an oversubscribed batch
//! - [`campus`] - a mid-sized realistic term with several branches
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! timetabler-test = { workspace = true }
//! ```

pub mod campus;
pub mod scenario;

pub use campus::{campus, campus_spec};
pub use scenario::{
    oversubscribed_batch, oversubscribed_batch_spec, scenario_a, scenario_a_spec, scenario_b,
    scenario_b_spec, scenario_c, scenario_c_spec,
};
