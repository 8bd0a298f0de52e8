//! Use cases
//!
//! - [`reconcile`] - one discover-compare-update pass

pub mod reconcile;

pub use reconcile::{reconcile, ReconcileOutcome};
