//! Derived-field validation engine.
//!
//! Provides rule types, rule table construction, a pure-logic evaluator and
//! the framework-facing validator that binds a source field to a derived
//! field. None of it performs I/O.

pub mod derived;
pub mod discriminator;
pub mod evaluator;
pub mod rules;
pub mod table;
