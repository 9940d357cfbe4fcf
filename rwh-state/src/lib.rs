//! Dashboard state shared between the form and the display widgets.
//!
//! This crate provides:
//! - `form`: the editable draft of the site form
//! - `store`: `DashboardStore`, the single writer of the current snapshot,
//!   and `DashboardReader`, the read-only handle widgets subscribe with
//! - `pending`: `PendingSubmission`, a cancellable delayed submission

pub mod form;
pub mod pending;
pub mod store;

pub use form::SiteField;
pub use pending::PendingSubmission;
pub use store::{DashboardReader, DashboardStore, Snapshot, SubmissionTicket};
