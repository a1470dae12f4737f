//! Long-lived background tasks spawned by the API binary.

pub mod reclaim;
