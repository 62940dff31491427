//! Game listing edit flow.
//!
//! This crate holds the **business logic** for editing one catalog listing.
//! It has no UI or transport code: the front end feeds it field edits and
//! reads notices back, and a [`gamestall_catalog::CatalogService`]
//! implementation does the I/O.
//!
//! # Pipeline
//!
//! 1. **Load**: fetch the raw record by id
//! 2. **Normalize**: reconcile both record shapes into an [`EditableGame`]
//! 3. **Edit**: replace one field at a time via [`FieldEdit`]
//! 4. **Submit**: validate, send with the caller's credentials, then
//!    navigate away or return to editing

pub mod error;
pub mod flow;
pub mod model;
pub mod normalize;
pub mod session;
pub mod validate;

// Re-export primary types for convenience.
pub use error::{EditorError, ValidationError};
pub use flow::EditFlow;
pub use model::{EditableGame, FieldEdit, GameField};
pub use normalize::normalize;
pub use session::{EditSession, LoadOutcome, Phase, SubmitOutcome, SubmitTicket};
