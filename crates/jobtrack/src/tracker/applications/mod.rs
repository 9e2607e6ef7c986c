//! Application records, client-side validation, the persisted session,
//! and the typed client for the remote tracker API.

pub mod client;
pub mod domain;
pub mod session;

pub use client::{ApiError, SessionIdentity, StatisticsSnapshot, TrackerClient};
pub use domain::{ApplicationDraft, ApplicationRecord, DraftError};
pub use session::{SessionError, SessionStore};
