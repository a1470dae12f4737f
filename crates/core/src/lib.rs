//! QE Bee domain core.
//!
//! Pure domain logic for the output-review pipeline: target/review type
//! enums, the result-code taxonomy, the structural validator checks, and
//! the capability traits ([`ContentSource`](content::ContentSource),
//! [`QualityBackend`](validators::quality::QualityBackend)) that the
//! service layer wires to concrete backends.
//!
//! This crate has no database or HTTP dependencies so the validator
//! pipeline can be tested in isolation.

pub mod content;
pub mod error;
pub mod review;
pub mod types;
pub mod validators;
