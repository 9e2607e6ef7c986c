use serde::{Deserialize, Serialize};

/// Canonical funnel stage for a job application, derived from its free-text
/// status. Stages are recomputed on demand and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    Applied,
    PhoneScreening,
    InterviewScheduled,
    Offered,
    Hired,
    Rejected,
    Declined,
    Unclassified,
}

impl FunnelStage {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Applied,
            Self::PhoneScreening,
            Self::InterviewScheduled,
            Self::Offered,
            Self::Hired,
            Self::Rejected,
            Self::Declined,
            Self::Unclassified,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::PhoneScreening => "Phone Screening",
            Self::InterviewScheduled => "Interview Scheduled",
            Self::Offered => "Offered",
            Self::Hired => "Hired",
            Self::Rejected => "Rejected",
            Self::Declined => "Declined",
            Self::Unclassified => "Unclassified",
        }
    }

    /// Stable symbolic tag, one per stage, for style hooks and other
    /// machine-readable discriminators.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::PhoneScreening => "phone-screening",
            Self::InterviewScheduled => "interview-scheduled",
            Self::Offered => "offered",
            Self::Hired => "hired",
            Self::Rejected => "rejected",
            Self::Declined => "declined",
            Self::Unclassified => "unclassified",
        }
    }

    /// The summary bucket this stage contributes to, or `None` for
    /// `Unclassified`, which counts toward the overall total only.
    pub const fn group(self) -> Option<StageGroup> {
        match self {
            Self::Applied => Some(StageGroup::Applied),
            Self::PhoneScreening | Self::InterviewScheduled => Some(StageGroup::Interview),
            Self::Offered | Self::Hired => Some(StageGroup::Offered),
            Self::Rejected | Self::Declined => Some(StageGroup::Rejected),
            Self::Unclassified => None,
        }
    }
}

/// Merged funnel bucket used by the statistics summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageGroup {
    Applied,
    Interview,
    Offered,
    Rejected,
}

impl StageGroup {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Applied,
            Self::Interview,
            Self::Offered,
            Self::Rejected,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interview => "Interviews",
            Self::Offered => "Offers",
            Self::Rejected => "Rejected",
        }
    }
}

enum StatusMatcher {
    Exact(&'static str),
    Contains(&'static str),
}

impl StatusMatcher {
    fn matches(&self, status: &str) -> bool {
        match self {
            StatusMatcher::Exact(expected) => status == *expected,
            StatusMatcher::Contains(fragment) => status.contains(fragment),
        }
    }
}

struct ClassificationRule {
    matcher: StatusMatcher,
    stage: FunnelStage,
}

const RULES: [ClassificationRule; 8] = [
    ClassificationRule {
        matcher: StatusMatcher::Exact("applied"),
        stage: FunnelStage::Applied,
    },
    ClassificationRule {
        matcher: StatusMatcher::Exact("phone screening"),
        stage: FunnelStage::PhoneScreening,
    },
    ClassificationRule {
        matcher: StatusMatcher::Contains("interview"),
        stage: FunnelStage::InterviewScheduled,
    },
    ClassificationRule {
        matcher: StatusMatcher::Contains("phone"),
        stage: FunnelStage::InterviewScheduled,
    },
    ClassificationRule {
        matcher: StatusMatcher::Exact("offered"),
        stage: FunnelStage::Offered,
    },
    ClassificationRule {
        matcher: StatusMatcher::Exact("hired"),
        stage: FunnelStage::Hired,
    },
    ClassificationRule {
        matcher: StatusMatcher::Exact("rejected"),
        stage: FunnelStage::Rejected,
    },
    ClassificationRule {
        matcher: StatusMatcher::Exact("declined"),
        stage: FunnelStage::Declined,
    },
];

/// Maps a free-text status to its funnel stage.
///
/// Matching is case-insensitive and evaluated in rule order, first match
/// wins. The input is not trimmed, so surrounding whitespace defeats the
/// exact-match rules. Unrecognized input is a valid outcome
/// (`Unclassified`), never an error.
pub fn classify(raw: &str) -> FunnelStage {
    let status = raw.to_lowercase();
    for rule in &RULES {
        if rule.matcher.matches(&status) {
            return rule.stage;
        }
    }
    FunnelStage::Unclassified
}
