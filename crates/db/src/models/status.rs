//! Status helper enum mapping to the `review_statuses` lookup table.
//!
//! The variant discriminants match the seed data order (1-based) in the
//! initial migration. No magic numbers -- every status literal is a named
//! constant.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Review job lifecycle status.
    ///
    /// Transitions are strictly `Pending -> Reviewing -> {Passed|Failed|Error}`.
    ReviewStatus {
        Pending = 1,
        Reviewing = 2,
        Passed = 3,
        Failed = 4,
        Error = 5,
    }
}

impl ReviewStatus {
    /// Terminal statuses: passed, failed, error.
    pub const TERMINAL: [ReviewStatus; 3] = [
        ReviewStatus::Passed,
        ReviewStatus::Failed,
        ReviewStatus::Error,
    ];

    /// Whether a job in this status has finished processing.
    pub fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }

    /// Map a pipeline verdict to its terminal status.
    pub fn from_verdict(verdict: qbee_core::review::Verdict) -> Self {
        match verdict {
            qbee_core::review::Verdict::Passed => ReviewStatus::Passed,
            qbee_core::review::Verdict::Failed => ReviewStatus::Failed,
            qbee_core::review::Verdict::Error => ReviewStatus::Error,
        }
    }
}
