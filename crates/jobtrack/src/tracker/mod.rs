//! Job-application tracking: the status funnel taxonomy, statistics
//! aggregation over raw status counts, and the typed client for the
//! remote tracker API.

pub mod applications;
pub mod funnel;
pub mod stats;

pub use applications::{
    ApiError, ApplicationDraft, ApplicationRecord, DraftError, SessionError, SessionIdentity,
    SessionStore, StatisticsSnapshot, TrackerClient,
};
pub use funnel::{classify, FunnelStage, StageGroup};
pub use stats::{aggregate, AggregationError, StageTotals, StatusCountMap};
