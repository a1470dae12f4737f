//! The structural validator checks.
//!
//! Each check is a pure function over [`ReviewContent`](crate::content::ReviewContent)
//! returning a [`CheckOutcome`]. Ordering, short-circuiting, and the
//! optional generative quality step are the pipeline executor's job
//! (in `qbee-review`); the checks themselves know nothing about each
//! other.

pub mod completeness;
pub mod format;
pub mod leak;
pub mod quality;

pub use completeness::completeness_check;
pub use format::format_check;
pub use leak::leak_check;

/// The result of a single validator check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The check found nothing wrong. Checks that grade content attach a
    /// confidence score (0–100); pure gate checks attach `None`.
    Pass { confidence: Option<i16> },

    /// A hard failure with a result code and a human-readable reason.
    Fail { code: &'static str, message: String },
}

impl CheckOutcome {
    pub fn is_fail(&self) -> bool {
        matches!(self, CheckOutcome::Fail { .. })
    }

    /// Confidence score, if this outcome carries one.
    pub fn confidence(&self) -> Option<i16> {
        match self {
            CheckOutcome::Pass { confidence } => *confidence,
            CheckOutcome::Fail { .. } => None,
        }
    }
}
