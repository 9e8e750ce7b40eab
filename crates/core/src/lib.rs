//! Conditional cross-field validation.
//!
//! A rule table keyed by the value of a record's source field decides which
//! constraints apply to the properties of a sibling derived field.

pub mod error;
pub mod user;
pub mod validation;
