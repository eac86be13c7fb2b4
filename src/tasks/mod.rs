//! Background Tasks Module
//!
//! Contains background tasks that run while the service is up.
//!
//! # Tasks
//! - Catalog refresh: silently refreshes stale catalog data on an interval
//!   and when the host becomes visible

mod refresh;
mod visibility;

pub use refresh::{refresh_if_due, RefreshOutcome, RefreshScheduler, RefreshTrigger, SkipReason};
pub use visibility::{Visibility, VisibilityHandle};
