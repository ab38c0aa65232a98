//! Pattern Registry - the signal phrases behind every classification.
//!
//! Two ordered tables drive triage:
//! - **Category patterns**: each issue category owns a list of patterns; one
//!   hit is enough to assign the category
//! - **Priority patterns**: levels are checked in precedence order P1, P2,
//!   P3 and the first level with a hit wins
//!
//! Patterns are unanchored, case-insensitive regular expressions, so
//! `refund` also matches `refunded` and `nonrefundable`.

mod model;
mod patterns;

pub use model::{Categories, Category, Priority};
pub use patterns::{Pattern, PatternRegistry};
