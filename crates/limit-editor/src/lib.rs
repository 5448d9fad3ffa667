//! Batch editing of the daily limits of the users a caller is allowed to manage
//!
//! The flow is: filter the users by the caller's role, open a session which
//! seeds a draft from the persisted limits, adjust the drafts locally, then
//! persist every draft at once and report a single outcome.

#![warn(unused_crate_dependencies)]

mod batch;
mod draft;
mod errors;
mod filter;
mod notification;
mod session;

#[cfg(test)]
mod test_store;

pub use batch::{BatchOutcome, FailedUpdate, PendingBatch};
pub use draft::{DraftLimits, Preset};
pub use errors::{PersistenceFailure, SessionError};
pub use filter::editable_users;
pub use notification::Notification;
pub use session::{LimitEditor, SessionPhase};
