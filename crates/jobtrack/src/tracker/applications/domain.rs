use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::tracker::funnel::{self, FunnelStage};

/// A stored job application as returned by the tracker API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub company: String,
    pub position: String,
    pub date_applied: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
}

impl ApplicationRecord {
    /// Funnel stage derived from the stored status string.
    pub fn stage(&self) -> FunnelStage {
        funnel::classify(&self.status)
    }

    /// Draft carrying this record's fields, for edit-and-resubmit flows.
    /// The API replaces records wholesale, so every field rides along.
    pub fn to_draft(&self) -> ApplicationDraft {
        ApplicationDraft {
            id: Some(self.id.clone()),
            company: self.company.clone(),
            position: self.position.clone(),
            date_applied: self.date_applied,
            status: self.status.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Submission payload for create and update calls. The API assigns `id`
/// on create; updates resubmit all fields under the existing id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub company: String,
    pub position: String,
    pub date_applied: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
}

impl ApplicationDraft {
    /// Guard applied before a draft reaches the API.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.company.trim().is_empty() {
            return Err(DraftError::BlankCompany);
        }
        if self.position.trim().is_empty() {
            return Err(DraftError::BlankPosition);
        }
        if self.status.trim().is_empty() {
            return Err(DraftError::BlankStatus);
        }
        Ok(())
    }
}

/// Validation errors raised before a draft is submitted.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("company must not be blank")]
    BlankCompany,
    #[error("position must not be blank")]
    BlankPosition,
    #[error("status must not be blank")]
    BlankStatus,
}
