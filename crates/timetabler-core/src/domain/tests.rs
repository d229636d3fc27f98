//! Tests for the domain model (calendar, term loading, indices).

mod term_tests;
