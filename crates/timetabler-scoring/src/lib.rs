//! Constraint catalog, assignment store and scorer for the timetabler engine.
//!
//! This crate provides:
//! - The hard and soft constraint catalog (`HardConstraint`, `SoftConstraint`)
//! - `AssignmentStore`, the working schedule with O(1) clash checks
//! - `Scorer`, which prices a frozen schedule into a `ScheduleReport`
//! - `audit`, an exhaustive pairwise re-check of every hard constraint

pub mod audit;
pub mod constraint;
pub mod scorer;
pub mod store;

pub use audit::{audit, audit_with, hard_cost, HardViolation};
pub use constraint::{
    ConstraintViolation, HardConstraint, HardConstraintSet, SoftConstraint, SoftConstraintSet,
    WeightedConstraint,
};
pub use scorer::{ConstraintCost, ScheduleReport, Scorer};
pub use store::AssignmentStore;
